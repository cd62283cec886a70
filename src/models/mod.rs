pub mod itinerary;
pub mod location;
pub mod preferences;
pub mod recommendation;
pub mod trip;
