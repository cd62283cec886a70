use actix_web::{web, HttpResponse, Responder};
use mongodb::{bson::doc, Client};
use serde::Serialize;
use std::collections::HashMap;
use std::env;
use std::sync::Arc;

#[derive(Serialize)]
struct HealthStatus {
    status: String,
    services: HashMap<String, ServiceStatus>,
    environment: String,
    version: String,
}

#[derive(Serialize, Clone)]
struct ServiceStatus {
    status: String,
    details: Option<String>,
}

pub async fn health_check(client: web::Data<Arc<Client>>) -> impl Responder {
    let mut health = HealthStatus {
        status: "ok".to_string(),
        services: HashMap::new(),
        environment: env::var("RUST_ENV").unwrap_or("development".to_string()),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    let mongo_result = check_mongodb(&client).await;
    health
        .services
        .insert("mongodb".to_string(), mongo_result.clone());

    // Key presence only; the probe never calls the providers themselves.
    let openai_result = check_openai();
    health
        .services
        .insert("openai".to_string(), openai_result.clone());

    let places_result = check_google_places();
    health
        .services
        .insert("google_places".to_string(), places_result.clone());

    if mongo_result.status != "ok"
        || openai_result.status != "ok"
        || places_result.status != "ok"
    {
        health.status = "degraded".to_string();
    }

    HttpResponse::Ok().json(health)
}

async fn check_mongodb(client: &web::Data<Arc<Client>>) -> ServiceStatus {
    match client
        .database("FindMyTravel")
        .run_command(doc! {"ping": 1})
        .await
    {
        Ok(_) => ServiceStatus {
            status: "ok".to_string(),
            details: Some("Connected successfully to MongoDB".to_string()),
        },
        Err(e) => {
            eprintln!("MongoDB health check failed: {}", e);

            ServiceStatus {
                status: "error".to_string(),
                details: Some(format!("Failed to connect: {}", e)),
            }
        }
    }
}

fn check_openai() -> ServiceStatus {
    match env::var("OPENAI_API_KEY") {
        Ok(key) => ServiceStatus {
            status: "ok".to_string(),
            details: Some(format!("OpenAI API key configured ({})", mask_key(&key))),
        },
        Err(_) => ServiceStatus {
            status: "error".to_string(),
            details: Some("OPENAI_API_KEY not configured".to_string()),
        },
    }
}

fn check_google_places() -> ServiceStatus {
    match env::var("GOOGLE_PLACES_API_KEY") {
        Ok(key) => ServiceStatus {
            status: "ok".to_string(),
            details: Some(format!(
                "Google Places API key configured ({})",
                mask_key(&key)
            )),
        },
        Err(_) => ServiceStatus {
            status: "error".to_string(),
            details: Some("GOOGLE_PLACES_API_KEY not configured".to_string()),
        },
    }
}

fn mask_key(key: &str) -> String {
    if key.len() > 8 {
        format!("{}***{}", &key[0..4], &key[key.len() - 4..])
    } else {
        "***".to_string()
    }
}
