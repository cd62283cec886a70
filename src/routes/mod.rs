pub mod health;
pub mod itinerary;
pub mod place;
pub mod recommendation;
pub mod trip;
