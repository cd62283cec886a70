use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpResponse, Responder};
use std::sync::Arc;

use findmytravel_api::db::mongo::create_mongo_client;
use findmytravel_api::routes;
use findmytravel_api::services::trip_store::TripStore;

pub struct TestApp {
    pub client: Arc<mongodb::Client>,
    pub store: TripStore,
}

impl TestApp {
    pub async fn new() -> Self {
        let mongo_uri = std::env::var("MONGODB_URI")
            .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
        let client = create_mongo_client(&mongo_uri).await;
        let store = TripStore::new(client.clone());

        Self { client, store }
    }

    /// The production route tree with the real handlers. Tests stick to
    /// requests that are decided before any database round trip, so no
    /// running MongoDB is needed. The health route is mocked because the
    /// real one pings the database.
    pub fn create_app(
        &self,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(web::Data::new(self.client.clone()))
            .app_data(web::Data::new(self.store.clone()))
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .route("/", web::get().to(|| async { "FindMyTravel API is running" }))
            .route("/health", web::get().to(mock_health))
            .service(
                web::scope("/api")
                    .service(
                        web::scope("/trips")
                            .route(
                                "/from-recommendation",
                                web::post().to(routes::trip::create_from_recommendation),
                            )
                            .route("", web::post().to(routes::trip::create_trip))
                            .route("", web::get().to(routes::trip::get_trips))
                            .route("/{id}", web::get().to(routes::trip::get_trip_by_id))
                            .route("/{id}", web::put().to(routes::trip::update_trip))
                            .route("/{id}", web::delete().to(routes::trip::delete_trip))
                            .route(
                                "/{id}/budget",
                                web::get().to(routes::itinerary::budget_summary),
                            )
                            .route(
                                "/{id}/itinerary/items",
                                web::post().to(routes::itinerary::add_item),
                            )
                            .route(
                                "/{id}/itinerary/items/{item_id}",
                                web::put().to(routes::itinerary::edit_item),
                            )
                            .route(
                                "/{id}/itinerary/items/{item_id}",
                                web::delete().to(routes::itinerary::delete_item),
                            )
                            .route(
                                "/{id}/itinerary/items/{item_id}/expenses",
                                web::post().to(routes::itinerary::add_expense),
                            )
                            .route(
                                "/{id}/itinerary/reorder",
                                web::put().to(routes::itinerary::reorder_items),
                            )
                            .route(
                                "/{id}/itinerary/days/{day}",
                                web::get().to(routes::itinerary::get_day_view),
                            )
                            .route(
                                "/{id}/itinerary/days/{day}/optimize",
                                web::post().to(routes::itinerary::optimize_day),
                            )
                            .route(
                                "/{id}/itinerary/days/{day}/label",
                                web::put().to(routes::itinerary::set_day_label),
                            ),
                    )
                    .route(
                        "/recommendations",
                        web::post().to(routes::recommendation::generate),
                    )
                    .route("/places", web::get().to(routes::place::search_places)),
            )
    }
}

async fn mock_health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({"status": "OK"}))
}

pub fn sample_trip_payload() -> serde_json::Value {
    serde_json::json!({
        "name": "Algarve week",
        "destination": "Lagos, Portugal",
        "start_date": "2025-07-10",
        "end_date": "2025-07-14",
        "total_budget": 1000.0
    })
}

pub fn travel_match_preferences() -> serde_json::Value {
    serde_json::json!({
        "schema_version": 1,
        "form": "travel-match",
        "departure_city": "Lisbon",
        "trip_types": ["beach"],
        "company": "couple",
        "number_of_travelers": 2,
        "destination_types": ["beach"],
        "activities": ["snorkeling"],
        "accommodation": ["hotel"],
        "travel_window": { "type": "month", "month": "July", "duration_days": 7 },
        "budget": { "amount": 1500.0, "type": "per-person" }
    })
}

pub fn sample_recommendation() -> serde_json::Value {
    serde_json::json!({
        "name": "Lagos",
        "country": "Portugal",
        "description": "Cliffs and beaches.",
        "why_recommended": "Warm water in July.",
        "match_score": 91,
        "estimated_cost": 1800.0,
        "best_time_to_visit": "June to September",
        "itinerary": [
            {
                "day": 1,
                "title": "Arrival",
                "activities": [
                    { "time": "10:00", "name": "Check in", "description": "", "category": "accommodation" }
                ]
            }
        ]
    })
}
