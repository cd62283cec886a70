use std::collections::HashMap;

use actix_web::{web, HttpResponse, Responder};
use bson::oid::ObjectId;
use chrono::{Duration, NaiveDate, Utc};
use serde::Deserialize;
use serde_json::json;

use crate::models::recommendation::DestinationRecommendation;
use crate::models::trip::{Collaborator, Trip, TripDraft, TripStatus, TripUpdate};
use crate::services::itinerary_manager::ItineraryManager;
use crate::services::trip_store::{TripFilter, TripStore};

/*
    POST /api/trips
*/
pub async fn create_trip(
    store: web::Data<TripStore>,
    input: web::Json<TripDraft>,
) -> impl Responder {
    let draft = input.into_inner();
    if let Err(msg) = draft.validate() {
        return HttpResponse::BadRequest().json(json!({ "error": msg }));
    }

    match store.insert(draft.into_trip()).await {
        Ok(trip) => HttpResponse::Ok().json(trip),
        Err(err) => {
            eprintln!("Failed to insert trip: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to create trip")
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TripListQuery {
    pub status: Option<String>,
    pub search: Option<String>,
    pub limit: Option<i64>,
}

/*
    GET /api/trips?status=planning&search=lisbon
*/
pub async fn get_trips(
    store: web::Data<TripStore>,
    query: web::Query<TripListQuery>,
) -> impl Responder {
    let params = query.into_inner();
    let status = match params.status.as_deref() {
        None => None,
        Some(raw) => match TripStatus::parse(raw) {
            Some(status) => Some(status),
            None => {
                return HttpResponse::BadRequest()
                    .json(json!({ "error": format!("unknown trip status '{}'", raw) }))
            }
        },
    };

    let filter = TripFilter {
        status,
        search: params.search,
        limit: params.limit,
    };
    match store.list(filter).await {
        Ok(trips) => HttpResponse::Ok().json(trips),
        Err(err) => {
            eprintln!("Failed to list trips: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to list trips")
        }
    }
}

/*
    GET /api/trips/{id}
*/
pub async fn get_trip_by_id(
    path: web::Path<String>,
    store: web::Data<TripStore>,
) -> impl Responder {
    let id = match ObjectId::parse_str(path.into_inner().as_str()) {
        Ok(id) => id,
        Err(_) => return HttpResponse::BadRequest().body("Invalid trip ID"),
    };

    match store.find_by_id(id).await {
        Ok(Some(trip)) => HttpResponse::Ok().json(trip),
        Ok(None) => HttpResponse::NotFound().body("Trip not found"),
        Err(err) => {
            eprintln!("Failed to retrieve trip: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to retrieve trip")
        }
    }
}

/*
    PUT /api/trips/{id}
*/
pub async fn update_trip(
    path: web::Path<String>,
    store: web::Data<TripStore>,
    input: web::Json<TripUpdate>,
) -> impl Responder {
    let id = match ObjectId::parse_str(path.into_inner().as_str()) {
        Ok(id) => id,
        Err(_) => return HttpResponse::BadRequest().body("Invalid trip ID"),
    };
    let update = input.into_inner();

    let mut trip = match store.find_by_id(id).await {
        Ok(Some(trip)) => trip,
        Ok(None) => return HttpResponse::NotFound().body("Trip not found"),
        Err(err) => {
            eprintln!("Failed to retrieve trip: {:?}", err);
            return HttpResponse::InternalServerError().body("Failed to retrieve trip");
        }
    };

    if let Err(msg) = update.apply_to(&mut trip) {
        return HttpResponse::BadRequest().json(json!({ "error": msg }));
    }

    match store.save(&mut trip).await {
        Ok(()) => HttpResponse::Ok().json(trip),
        Err(err) => {
            eprintln!("Failed to update trip: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to update trip")
        }
    }
}

/*
    DELETE /api/trips/{id}
*/
pub async fn delete_trip(path: web::Path<String>, store: web::Data<TripStore>) -> impl Responder {
    let id = match ObjectId::parse_str(path.into_inner().as_str()) {
        Ok(id) => id,
        Err(_) => return HttpResponse::BadRequest().body("Invalid trip ID"),
    };

    match store.delete(id).await {
        Ok(true) => HttpResponse::Ok().json(json!({ "message": "Trip deleted" })),
        Ok(false) => HttpResponse::NotFound().body("Trip not found"),
        Err(err) => {
            eprintln!("Failed to delete trip: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to delete trip")
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AcceptRecommendationRequest {
    pub recommendation: DestinationRecommendation,
    pub start_date: Option<NaiveDate>,
    pub name: Option<String>,
    pub total_budget: Option<f64>,
    #[serde(default)]
    pub collaborators: Vec<Collaborator>,
}

/*
    POST /api/trips/from-recommendation

    Accept one of the destinations returned by /api/recommendations and turn
    its proposed plan into a stored trip. This is the only place provider
    output ever reaches the database.
*/
pub async fn create_from_recommendation(
    store: web::Data<TripStore>,
    input: web::Json<AcceptRecommendationRequest>,
) -> impl Responder {
    let request = input.into_inner();
    if let Err(msg) = request.recommendation.validate() {
        return HttpResponse::BadRequest().json(json!({ "error": msg }));
    }
    if let Some(budget) = request.total_budget {
        if budget <= 0.0 {
            return HttpResponse::BadRequest()
                .json(json!({ "error": "total_budget must be positive" }));
        }
    }

    // The trip spans exactly the days the plan mentions.
    let planned_days = request.recommendation.planned_days().max(1);
    let start_date = request.start_date.unwrap_or_else(|| Utc::now().date_naive());
    let end_date = start_date + Duration::days(planned_days as i64 - 1);

    let destination = if request.recommendation.country.trim().is_empty() {
        request.recommendation.name.clone()
    } else {
        format!(
            "{}, {}",
            request.recommendation.name, request.recommendation.country
        )
    };

    let trip = Trip {
        // Assigned up front so the seeded items carry their trip's id.
        id: Some(ObjectId::new()),
        name: request
            .name
            .unwrap_or_else(|| format!("Trip to {}", request.recommendation.name)),
        destination,
        start_date,
        end_date,
        status: TripStatus::Planning,
        total_budget: request.total_budget,
        collaborators: request.collaborators,
        day_labels: HashMap::new(),
        items: Vec::new(),
        created_at: None,
        updated_at: None,
    };

    let mut manager = ItineraryManager::new(trip);
    manager.ingest_recommendation(&request.recommendation);

    match store.insert(manager.into_trip()).await {
        Ok(trip) => HttpResponse::Ok().json(trip),
        Err(err) => {
            eprintln!("Failed to insert trip from recommendation: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to create trip")
        }
    }
}
