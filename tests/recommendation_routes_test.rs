mod common;

use actix_web::{http::StatusCode, test};
use common::TestApp;
use serde_json::json;
use serial_test::serial;
use std::env;

#[actix_rt::test]
#[serial]
async fn rejects_unsupported_schema_versions() {
    let app = TestApp::new().await;
    let service = test::init_service(app.create_app()).await;

    let mut preferences = common::travel_match_preferences();
    preferences["schema_version"] = json!(99);

    let req = test::TestRequest::post()
        .uri("/api/recommendations")
        .set_json(&json!({ "preferences": preferences }))
        .to_request();
    let resp = test::call_service(&service, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body = test::read_body(resp).await;
    let error: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert!(error["error"].as_str().unwrap().contains("schema version"));
}

#[actix_rt::test]
#[serial]
async fn rejects_unknown_form_tags() {
    let app = TestApp::new().await;
    let service = test::init_service(app.create_app()).await;

    let mut preferences = common::travel_match_preferences();
    preferences["form"] = json!("crystal-ball");

    let req = test::TestRequest::post()
        .uri("/api/recommendations")
        .set_json(&json!({ "preferences": preferences }))
        .to_request();
    let resp = test::call_service(&service, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
#[serial]
async fn validation_failures_never_reach_the_provider() {
    // No key configured; an invalid form must still come back 400, not 500.
    env::remove_var("OPENAI_API_KEY");

    let app = TestApp::new().await;
    let service = test::init_service(app.create_app()).await;

    let mut preferences = common::travel_match_preferences();
    preferences["number_of_travelers"] = json!(0);

    let req = test::TestRequest::post()
        .uri("/api/recommendations")
        .set_json(&json!({ "preferences": preferences }))
        .to_request();
    let resp = test::call_service(&service, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
#[serial]
async fn missing_provider_key_is_a_server_error() {
    env::remove_var("OPENAI_API_KEY");

    let app = TestApp::new().await;
    let service = test::init_service(app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/recommendations")
        .set_json(&json!({
            "preferences": common::travel_match_preferences(),
            "timeout_secs": 5
        }))
        .to_request();
    let resp = test::call_service(&service, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = test::read_body(resp).await;
    let error: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert!(error["error"].as_str().unwrap().contains("OPENAI_API_KEY"));
}

#[actix_rt::test]
#[serial]
async fn place_search_needs_three_characters() {
    let app = TestApp::new().await;
    let service = test::init_service(app.create_app()).await;

    let req = test::TestRequest::get()
        .uri("/api/places?search=ab")
        .to_request();
    let resp = test::call_service(&service, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert!(body.as_array().unwrap().is_empty());
}

#[actix_rt::test]
#[serial]
async fn place_search_without_a_query_returns_nothing() {
    let app = TestApp::new().await;
    let service = test::init_service(app.create_app()).await;

    let req = test::TestRequest::get().uri("/api/places").to_request();
    let resp = test::call_service(&service, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert!(body.as_array().unwrap().is_empty());
}

#[actix_rt::test]
#[serial]
async fn place_search_without_a_key_is_a_server_error() {
    env::remove_var("GOOGLE_PLACES_API_KEY");

    let app = TestApp::new().await;
    let service = test::init_service(app.create_app()).await;

    let req = test::TestRequest::get()
        .uri("/api/places?search=lisbon%20cathedral")
        .to_request();
    let resp = test::call_service(&service, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
