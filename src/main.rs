use std::env;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;

use findmytravel_api::db;
use findmytravel_api::routes;
use findmytravel_api::services::trip_store::TripStore;

const HOST: &str = "0.0.0.0";
const PORT: u16 = 8080;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    println!("Application starting...");

    env_logger::init_from_env(Env::default().default_filter_or("info"));
    println!("Logger initialized");

    if cfg!(debug_assertions) {
        dotenv::dotenv().ok();
    } else {
        println!("Release mode");
    }

    let host = env::var("HOST").unwrap_or_else(|_| HOST.to_string());
    let port: u16 = env::var("PORT")
        .unwrap_or_else(|_| PORT.to_string())
        .parse()
        .unwrap_or(PORT);
    println!("Attempting to bind to {}:{}", host, port);

    let mongo_uri = env::var("MONGODB_URI").expect("MONGODB_URI must be set");
    println!("Got MongoDB URI, attempting connection...");
    let client = db::mongo::create_mongo_client(&mongo_uri).await;
    println!("MongoDB connection established");

    let store = TripStore::new(client.clone());

    println!("Starting HTTP server...");

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .app_data(web::Data::new(client.clone()))
            .app_data(web::Data::new(store.clone()))
            .route("/health", web::get().to(routes::health::health_check))
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
    })
    .bind((host, port))?
    .run()
    .await
}
