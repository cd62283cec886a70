mod common;

use actix_web::{http::StatusCode, test};
use common::TestApp;
use serde_json::json;
use serial_test::serial;

#[actix_rt::test]
#[serial]
async fn root_serves_a_banner() {
    let app = TestApp::new().await;
    let service = test::init_service(app.create_app()).await;

    let req = test::TestRequest::get().uri("/").to_request();
    let resp = test::call_service(&service, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = test::read_body(resp).await;
    assert_eq!(body, "FindMyTravel API is running");
}

#[actix_rt::test]
#[serial]
async fn health_endpoint_responds() {
    let app = TestApp::new().await;
    let service = test::init_service(app.create_app()).await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&service, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_rt::test]
#[serial]
async fn create_trip_rejects_inverted_dates() {
    let app = TestApp::new().await;
    let service = test::init_service(app.create_app()).await;

    let mut payload = common::sample_trip_payload();
    payload["start_date"] = json!("2025-07-20");
    payload["end_date"] = json!("2025-07-10");

    let req = test::TestRequest::post()
        .uri("/api/trips")
        .set_json(&payload)
        .to_request();
    let resp = test::call_service(&service, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body = test::read_body(resp).await;
    let error: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert!(error["error"].as_str().unwrap().contains("end_date"));
}

#[actix_rt::test]
#[serial]
async fn create_trip_rejects_a_blank_name() {
    let app = TestApp::new().await;
    let service = test::init_service(app.create_app()).await;

    let mut payload = common::sample_trip_payload();
    payload["name"] = json!("   ");

    let req = test::TestRequest::post()
        .uri("/api/trips")
        .set_json(&payload)
        .to_request();
    let resp = test::call_service(&service, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
#[serial]
async fn create_trip_rejects_incomplete_payloads() {
    let app = TestApp::new().await;
    let service = test::init_service(app.create_app()).await;

    // Missing destination and dates; the JSON extractor refuses it.
    let req = test::TestRequest::post()
        .uri("/api/trips")
        .set_json(&json!({ "name": "Just a name" }))
        .to_request();
    let resp = test::call_service(&service, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
#[serial]
async fn listing_rejects_unknown_status_values() {
    let app = TestApp::new().await;
    let service = test::init_service(app.create_app()).await;

    let req = test::TestRequest::get()
        .uri("/api/trips?status=bogus")
        .to_request();
    let resp = test::call_service(&service, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body = test::read_body(resp).await;
    let error: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert!(error["error"].as_str().unwrap().contains("bogus"));
}

#[actix_rt::test]
#[serial]
async fn trip_ids_must_be_object_ids() {
    let app = TestApp::new().await;
    let service = test::init_service(app.create_app()).await;

    let req = test::TestRequest::get()
        .uri("/api/trips/not-an-objectid")
        .to_request();
    let resp = test::call_service(&service, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::put()
        .uri("/api/trips/not-an-objectid")
        .set_json(&json!({}))
        .to_request();
    let resp = test::call_service(&service, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::delete()
        .uri("/api/trips/not-an-objectid")
        .to_request();
    let resp = test::call_service(&service, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
#[serial]
async fn unregistered_methods_are_not_found() {
    let app = TestApp::new().await;
    let service = test::init_service(app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/trips/65f1e77a8d2b4c0012345678")
        .set_json(&json!({}))
        .to_request();
    let resp = test::call_service(&service, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
#[serial]
async fn from_recommendation_rejects_day_zero_plans() {
    let app = TestApp::new().await;
    let service = test::init_service(app.create_app()).await;

    let payload = json!({
        "recommendation": {
            "name": "Lagos",
            "country": "Portugal",
            "itinerary": [ { "day": 0, "activities": [] } ]
        }
    });

    let req = test::TestRequest::post()
        .uri("/api/trips/from-recommendation")
        .set_json(&payload)
        .to_request();
    let resp = test::call_service(&service, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body = test::read_body(resp).await;
    let error: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert!(error["error"].as_str().unwrap().contains("day 0"));
}

#[actix_rt::test]
#[serial]
async fn from_recommendation_rejects_non_positive_budgets() {
    let app = TestApp::new().await;
    let service = test::init_service(app.create_app()).await;

    let payload = json!({
        "recommendation": common::sample_recommendation(),
        "total_budget": -10.0
    });

    let req = test::TestRequest::post()
        .uri("/api/trips/from-recommendation")
        .set_json(&payload)
        .to_request();
    let resp = test::call_service(&service, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
