use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;
use serde_json::json;

use crate::models::preferences::TravelPreferences;
use crate::services::recommendation_service::{RecommendationError, RecommendationService};

#[derive(Debug, Deserialize)]
pub struct RecommendationRequest {
    pub preferences: TravelPreferences,
    /// Optional per-request override for how long to wait on the provider.
    pub timeout_secs: Option<u64>,
}

/*
    POST /api/recommendations

    Pure lookup: asks the provider for destination candidates and relays
    them. Nothing is stored; accepting a candidate goes through
    POST /api/trips/from-recommendation.
*/
pub async fn generate(input: web::Json<RecommendationRequest>) -> impl Responder {
    let request = input.into_inner();
    if let Err(msg) = request.preferences.validate() {
        return HttpResponse::BadRequest().json(json!({ "error": msg }));
    }

    let service = match RecommendationService::from_env() {
        Ok(service) => service,
        Err(err) => {
            eprintln!("Recommendation service unavailable: {}", err);
            return HttpResponse::InternalServerError().json(json!({ "error": err.to_string() }));
        }
    };

    match service
        .recommend(&request.preferences, request.timeout_secs)
        .await
    {
        Ok(set) => HttpResponse::Ok().json(set),
        Err(err) => {
            eprintln!("Recommendation request failed: {}", err);
            match err {
                RecommendationError::Timeout(_) => {
                    HttpResponse::GatewayTimeout().json(json!({ "error": err.to_string() }))
                }
                RecommendationError::ProviderError { .. }
                | RecommendationError::MalformedResponse(_)
                | RecommendationError::RequestError(_) => {
                    HttpResponse::BadGateway().json(json!({ "error": err.to_string() }))
                }
                RecommendationError::EnvironmentError(_) => {
                    HttpResponse::InternalServerError().json(json!({ "error": err.to_string() }))
                }
            }
        }
    }
}
