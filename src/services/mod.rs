pub mod itinerary_manager;
pub mod places_service;
pub mod recommendation_service;
pub mod route_optimization_service;
pub mod trip_store;
