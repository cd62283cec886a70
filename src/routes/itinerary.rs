use actix_web::{web, HttpResponse, Responder};
use bson::oid::ObjectId;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::models::itinerary::ItemDraft;
use crate::models::trip::Trip;
use crate::services::itinerary_manager::{ItineraryError, ItineraryManager};
use crate::services::trip_store::TripStore;

/// Every itinerary operation follows the same shape: load the trip, run one
/// manager operation, save the whole document back.
async fn load_trip(store: &TripStore, raw_id: &str) -> Result<Trip, HttpResponse> {
    let id = match ObjectId::parse_str(raw_id) {
        Ok(id) => id,
        Err(_) => return Err(HttpResponse::BadRequest().body("Invalid trip ID")),
    };
    match store.find_by_id(id).await {
        Ok(Some(trip)) => Ok(trip),
        Ok(None) => Err(HttpResponse::NotFound().body("Trip not found")),
        Err(err) => {
            eprintln!("Failed to retrieve trip {}: {:?}", raw_id, err);
            Err(HttpResponse::InternalServerError().body("Failed to retrieve trip"))
        }
    }
}

async fn save_trip(store: &TripStore, mut trip: Trip) -> Option<HttpResponse> {
    match store.save(&mut trip).await {
        Ok(()) => None,
        Err(err) => {
            eprintln!("Failed to save itinerary: {:?}", err);
            Some(HttpResponse::InternalServerError().body("Failed to save itinerary"))
        }
    }
}

fn parse_item_id(raw: &str) -> Result<Uuid, HttpResponse> {
    Uuid::parse_str(raw).map_err(|_| HttpResponse::BadRequest().body("Invalid item ID"))
}

fn itinerary_error_response(err: &ItineraryError) -> HttpResponse {
    match err {
        ItineraryError::ItemNotFound(_) => {
            HttpResponse::NotFound().json(json!({ "error": err.to_string() }))
        }
        _ => HttpResponse::BadRequest().json(json!({ "error": err.to_string() })),
    }
}

#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    pub day: u32,
    #[serde(flatten)]
    pub item: ItemDraft,
}

/*
    POST /api/trips/{id}/itinerary/items
*/
pub async fn add_item(
    path: web::Path<String>,
    store: web::Data<TripStore>,
    input: web::Json<AddItemRequest>,
) -> impl Responder {
    let trip_id = path.into_inner();
    let request = input.into_inner();

    let trip = match load_trip(&store, &trip_id).await {
        Ok(trip) => trip,
        Err(response) => return response,
    };

    let mut manager = ItineraryManager::new(trip);
    let item = match manager.add_item(request.day, request.item) {
        Ok(item) => item,
        Err(err) => return itinerary_error_response(&err),
    };

    match save_trip(&store, manager.into_trip()).await {
        None => HttpResponse::Ok().json(item),
        Some(response) => response,
    }
}

/*
    PUT /api/trips/{id}/itinerary/items/{item_id}
*/
pub async fn edit_item(
    path: web::Path<(String, String)>,
    store: web::Data<TripStore>,
    input: web::Json<ItemDraft>,
) -> impl Responder {
    let (trip_id, raw_item_id) = path.into_inner();
    let item_id = match parse_item_id(&raw_item_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let trip = match load_trip(&store, &trip_id).await {
        Ok(trip) => trip,
        Err(response) => return response,
    };

    let mut manager = ItineraryManager::new(trip);
    let item = match manager.edit_item(item_id, input.into_inner()) {
        Ok(item) => item,
        Err(err) => return itinerary_error_response(&err),
    };

    match save_trip(&store, manager.into_trip()).await {
        None => HttpResponse::Ok().json(item),
        Some(response) => response,
    }
}

/*
    DELETE /api/trips/{id}/itinerary/items/{item_id}
*/
pub async fn delete_item(
    path: web::Path<(String, String)>,
    store: web::Data<TripStore>,
) -> impl Responder {
    let (trip_id, raw_item_id) = path.into_inner();
    let item_id = match parse_item_id(&raw_item_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let trip = match load_trip(&store, &trip_id).await {
        Ok(trip) => trip,
        Err(response) => return response,
    };

    let mut manager = ItineraryManager::new(trip);
    if let Err(err) = manager.remove_item(item_id) {
        return itinerary_error_response(&err);
    }

    match save_trip(&store, manager.into_trip()).await {
        None => HttpResponse::Ok().json(json!({ "message": "Item removed" })),
        Some(response) => response,
    }
}

#[derive(Debug, Deserialize)]
pub struct AddExpenseRequest {
    pub description: String,
    pub amount: f64,
    pub paid_by: String,
}

/*
    POST /api/trips/{id}/itinerary/items/{item_id}/expenses
*/
pub async fn add_expense(
    path: web::Path<(String, String)>,
    store: web::Data<TripStore>,
    input: web::Json<AddExpenseRequest>,
) -> impl Responder {
    let (trip_id, raw_item_id) = path.into_inner();
    let item_id = match parse_item_id(&raw_item_id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let request = input.into_inner();

    let trip = match load_trip(&store, &trip_id).await {
        Ok(trip) => trip,
        Err(response) => return response,
    };

    let mut manager = ItineraryManager::new(trip);
    let expense = match manager.add_expense(item_id, request.description, request.amount, request.paid_by)
    {
        Ok(expense) => expense,
        Err(err) => return itinerary_error_response(&err),
    };

    match save_trip(&store, manager.into_trip()).await {
        None => HttpResponse::Ok().json(expense),
        Some(response) => response,
    }
}

#[derive(Debug, Deserialize)]
pub struct ReorderRequest {
    pub day: u32,
    pub from_index: usize,
    pub to_index: usize,
}

/*
    PUT /api/trips/{id}/itinerary/reorder
*/
pub async fn reorder_items(
    path: web::Path<String>,
    store: web::Data<TripStore>,
    input: web::Json<ReorderRequest>,
) -> impl Responder {
    let trip_id = path.into_inner();
    let request = input.into_inner();

    let trip = match load_trip(&store, &trip_id).await {
        Ok(trip) => trip,
        Err(response) => return response,
    };

    let mut manager = ItineraryManager::new(trip);
    if let Err(err) = manager.reorder(request.day, request.from_index, request.to_index) {
        return itinerary_error_response(&err);
    }
    let view = match manager.day_view(request.day) {
        Ok(view) => view,
        Err(err) => return itinerary_error_response(&err),
    };

    match save_trip(&store, manager.into_trip()).await {
        None => HttpResponse::Ok().json(view),
        Some(response) => response,
    }
}

/*
    POST /api/trips/{id}/itinerary/days/{day}/optimize
*/
pub async fn optimize_day(
    path: web::Path<(String, u32)>,
    store: web::Data<TripStore>,
) -> impl Responder {
    let (trip_id, day) = path.into_inner();

    let trip = match load_trip(&store, &trip_id).await {
        Ok(trip) => trip,
        Err(response) => return response,
    };

    let mut manager = ItineraryManager::new(trip);
    if let Err(err) = manager.optimize_day(day) {
        return itinerary_error_response(&err);
    }
    let view = match manager.day_view(day) {
        Ok(view) => view,
        Err(err) => return itinerary_error_response(&err),
    };

    match save_trip(&store, manager.into_trip()).await {
        None => HttpResponse::Ok().json(view),
        Some(response) => response,
    }
}

/*
    GET /api/trips/{id}/itinerary/days/{day}
*/
pub async fn get_day_view(
    path: web::Path<(String, u32)>,
    store: web::Data<TripStore>,
) -> impl Responder {
    let (trip_id, day) = path.into_inner();

    let trip = match load_trip(&store, &trip_id).await {
        Ok(trip) => trip,
        Err(response) => return response,
    };

    let manager = ItineraryManager::new(trip);
    match manager.day_view(day) {
        Ok(view) => HttpResponse::Ok().json(view),
        Err(err) => itinerary_error_response(&err),
    }
}

#[derive(Debug, Deserialize)]
pub struct DayLabelRequest {
    pub label: String,
}

/*
    PUT /api/trips/{id}/itinerary/days/{day}/label
*/
pub async fn set_day_label(
    path: web::Path<(String, u32)>,
    store: web::Data<TripStore>,
    input: web::Json<DayLabelRequest>,
) -> impl Responder {
    let (trip_id, day) = path.into_inner();

    let trip = match load_trip(&store, &trip_id).await {
        Ok(trip) => trip,
        Err(response) => return response,
    };

    let mut manager = ItineraryManager::new(trip);
    if let Err(err) = manager.set_day_label(day, &input.label) {
        return itinerary_error_response(&err);
    }
    let label = manager.day_label(day);

    match save_trip(&store, manager.into_trip()).await {
        None => HttpResponse::Ok().json(json!({ "day": day, "label": label })),
        Some(response) => response,
    }
}

/*
    GET /api/trips/{id}/budget
*/
pub async fn budget_summary(
    path: web::Path<String>,
    store: web::Data<TripStore>,
) -> impl Responder {
    let trip_id = path.into_inner();

    let trip = match load_trip(&store, &trip_id).await {
        Ok(trip) => trip,
        Err(response) => return response,
    };

    let manager = ItineraryManager::new(trip);
    HttpResponse::Ok().json(manager.budget_summary())
}
