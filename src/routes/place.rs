use actix_web::{web, HttpResponse, Responder};
use serde_json::json;

use crate::services::places_service::{PlaceSuggestion, PlacesService};

#[derive(Debug, serde::Deserialize)]
pub struct PlaceQuery {
    pub search: Option<String>,
}

/*
    GET /api/places?search=eiffel+tower
*/
pub async fn search_places(query: web::Query<PlaceQuery>) -> impl Responder {
    let search = query.into_inner().search.unwrap_or_default();
    let search = search.trim();
    // The location picker only suggests from three characters on.
    if search.chars().count() < 3 {
        return HttpResponse::Ok().json(Vec::<PlaceSuggestion>::new());
    }

    let service = match PlacesService::from_env() {
        Ok(service) => service,
        Err(err) => {
            eprintln!("Places service unavailable: {}", err);
            return HttpResponse::InternalServerError().json(json!({ "error": err.to_string() }));
        }
    };

    match service.search(search).await {
        Ok(suggestions) => HttpResponse::Ok().json(suggestions),
        Err(err) => {
            eprintln!("Places search failed: {}", err);
            HttpResponse::BadGateway().json(json!({ "error": "Failed to search places" }))
        }
    }
}
