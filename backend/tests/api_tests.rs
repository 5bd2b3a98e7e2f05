//! API integration tests
//!
//! Drives the full axum router (auth middleware included) against the
//! in-memory store.

mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt; // for oneshot

use mfa_backend::config::Config;
use mfa_backend::{create_app, AppState, DynStore};

async fn test_app() -> (Router, DynStore) {
    let config = Config::in_memory();
    let store = common::seeded_store(config.advisory.today()).await;
    (create_app(AppState::new(store.clone(), config)), store)
}

// Helper: Parse JSON response
async fn json_response(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read response body");
    serde_json::from_slice(&body).expect("Failed to parse JSON")
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

fn send_json(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// Register a farmer in Lilongwe growing maize; returns (token, maize id)
async fn register(app: &Router, store: &DynStore) -> (String, String) {
    let lilongwe = common::region(store, "Lilongwe").await;
    let maize = common::crop(store, "Maize").await;

    let response = app
        .clone()
        .oneshot(send_json(
            "POST",
            "/api/v1/auth/register",
            None,
            json!({
                "username": "tiyamike",
                "password": "chimanga2024",
                "full_name": "Tiyamike Phiri",
                "phone_number": "+265 991 234 567",
                "location": lilongwe.id,
                "farm_size_acres": 2.5,
                "preferred_language": "ny",
                "primary_crops": [maize.id]
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = json_response(response).await;
    (
        body["access_token"].as_str().unwrap().to_string(),
        maize.id.to_string(),
    )
}

// =========================================================================
// Section 1: Public endpoints
// =========================================================================

#[tokio::test]
async fn test_health_check() {
    let (app, _) = test_app().await;

    let response = app.oneshot(get("/api/v1/health", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_response(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["store"], "memory");
    assert_eq!(body["database"], "connected");
}

#[tokio::test]
async fn test_regions_and_filtered_crops() {
    let (app, store) = test_app().await;

    let response = app.clone().oneshot(get("/api/v1/regions", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_response(response).await.as_array().unwrap().len(), 27);

    let nsanje = common::region(&store, "Nsanje").await;
    let uri = format!("/api/v1/crops?region={}&type=cash", nsanje.id);
    let response = app.clone().oneshot(get(&uri, None)).await.unwrap();
    let crops = json_response(response).await;
    let names: Vec<&str> = crops
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name_en"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Cotton", "Sunflower"]);

    let response = app
        .oneshot(get("/api/v1/crops?type=grain", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_responses_are_gzipped_when_accepted() {
    let (app, _) = test_app().await;

    let request = Request::builder()
        .uri("/api/v1/regions")
        .header(header::ACCEPT_ENCODING, "gzip")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_ENCODING], "gzip");

    let response = app.oneshot(get("/api/v1/regions", None)).await.unwrap();
    assert!(response.headers().get(header::CONTENT_ENCODING).is_none());
}

#[tokio::test]
async fn test_weather_today_is_stable_and_feeds_history() {
    let (app, store) = test_app().await;
    let mzimba = common::region(&store, "Mzimba").await;

    let uri = format!("/api/v1/weather/{}/today", mzimba.id);
    let first = json_response(app.clone().oneshot(get(&uri, None)).await.unwrap()).await;
    let second = json_response(app.clone().oneshot(get(&uri, None)).await.unwrap()).await;
    assert_eq!(first, second);

    let uri = format!("/api/v1/weather/{}", mzimba.id);
    let history = json_response(app.clone().oneshot(get(&uri, None)).await.unwrap()).await;
    let points = history["weather_data"].as_array().unwrap();
    assert_eq!(points.len(), 1);
    assert_eq!(points[0]["condition"], first["weather_condition"]);
    assert_eq!(points[0]["temp_max"], first["temperature_max"]);

    let uri = format!("/api/v1/weather/{}/today", uuid::Uuid::new_v4());
    let response = app.oneshot(get(&uri, None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = json_response(response).await;
    assert_eq!(body["error"]["code"], "NOT_FOUND");
    assert!(body["error"]["message_ny"].is_string());
}

#[tokio::test]
async fn test_calendar_month_view() {
    let (app, _) = test_app().await;

    let response = app
        .clone()
        .oneshot(get("/api/v1/calendar?month=11", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_response(response).await;
    assert_eq!(body["month_name"], "November");
    // Maize, Groundnuts, Sweet Potato and Rice in every district
    assert_eq!(body["current_activities"].as_array().unwrap().len(), 4 * 27);

    let response = app
        .oneshot(get("/api/v1/calendar?month=0", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// =========================================================================
// Section 2: Authentication
// =========================================================================

#[tokio::test]
async fn test_protected_routes_require_token() {
    let (app, _) = test_app().await;

    for uri in ["/api/v1/farmers/me", "/api/v1/dashboard", "/api/v1/advice/history"] {
        let response = app.clone().oneshot(get(uri, None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{}", uri);
    }

    let response = app
        .oneshot(get("/api/v1/farmers/me", Some("garbage")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_login_and_profile() {
    let (app, store) = test_app().await;
    let (token, _) = register(&app, &store).await;

    let response = app
        .clone()
        .oneshot(send_json(
            "POST",
            "/api/v1/auth/login",
            None,
            json!({"username": "tiyamike", "password": "chimanga2024"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_response(response).await["token_type"], "Bearer");

    let response = app
        .clone()
        .oneshot(send_json(
            "POST",
            "/api/v1/auth/login",
            None,
            json!({"username": "tiyamike", "password": "wrong-password"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(get("/api/v1/farmers/me", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let profile = json_response(response).await;
    assert_eq!(profile["phone_number"], "+265991234567");
    assert_eq!(profile["preferred_language"], "ny");
    assert_eq!(profile["region"]["name"], "Lilongwe");

    let response = app
        .clone()
        .oneshot(send_json(
            "PUT",
            "/api/v1/farmers/me/language",
            Some(&token),
            json!({"language": "en"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_response(response).await["label"], "English");

    let response = app
        .oneshot(send_json(
            "PUT",
            "/api/v1/farmers/me/language",
            Some(&token),
            json!({"language": "fr"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// =========================================================================
// Section 3: Advice, prices and dashboard
// =========================================================================

#[tokio::test]
async fn test_generate_advice_and_history() {
    let (app, store) = test_app().await;
    let (token, maize_id) = register(&app, &store).await;

    let response = app
        .clone()
        .oneshot(get("/api/v1/advice/options", Some(&token)))
        .await
        .unwrap();
    let options = json_response(response).await;
    assert_eq!(options["crops"][0]["name_en"], "Maize");
    assert_eq!(options["advice_types"].as_array().unwrap().len(), 6);

    let response = app
        .clone()
        .oneshot(send_json(
            "POST",
            "/api/v1/advice",
            Some(&token),
            json!({"crop_id": maize_id, "advice_type": "weather"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let advice = json_response(response).await;
    assert_eq!(advice["advice_type"], "weather");
    assert_eq!(advice["title_en"], "Weather Advisory for Maize");
    assert_eq!(advice["title"], "Malangizo a Nyengo pa Chimanga");
    assert!(advice["weather_snapshot_id"].is_string());

    let response = app
        .clone()
        .oneshot(send_json(
            "POST",
            "/api/v1/advice",
            Some(&token),
            json!({"crop_id": maize_id, "advice_type": "not-a-type"}),
        ))
        .await
        .unwrap();
    assert_eq!(json_response(response).await["advice_type"], "general");

    let response = app
        .clone()
        .oneshot(get("/api/v1/advice/history", Some(&token)))
        .await
        .unwrap();
    let history = json_response(response).await;
    let history = history.as_array().unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0]["advice_type"], "general");

    let response = app
        .oneshot(send_json(
            "POST",
            "/api/v1/advice",
            Some(&token),
            json!({"crop_id": uuid::Uuid::new_v4(), "advice_type": "care"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_price_recording_and_feed() {
    let (app, store) = test_app().await;
    let (token, maize_id) = register(&app, &store).await;
    let lilongwe = common::region(&store, "Lilongwe").await;

    let price = json!({
        "crop_id": maize_id,
        "region_id": lilongwe.id,
        "price_per_kg": "385.00",
        "market_name": "Lilongwe Central Market"
    });

    let response = app
        .clone()
        .oneshot(send_json("POST", "/api/v1/prices", None, price.clone()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(send_json("POST", "/api/v1/prices", Some(&token), price))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(json_response(response).await["source"], "Manual Entry");

    let uri = format!("/api/v1/prices/{}", maize_id);
    let feed = json_response(app.clone().oneshot(get(&uri, None)).await.unwrap()).await;
    assert_eq!(feed["price_data"][0]["price"], json!(385.0));
    assert_eq!(feed["price_data"][0]["location"], "Lilongwe");

    let dashboard = json_response(
        app.oneshot(get("/api/v1/dashboard", Some(&token)))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(dashboard["market_prices"].as_array().unwrap().len(), 1);
    assert!(dashboard["current_weather"].is_null());
}

#[tokio::test]
async fn test_stats_count_reference_data() {
    let (app, store) = test_app().await;
    register(&app, &store).await;

    let stats = json_response(app.oneshot(get("/api/v1/stats", None)).await.unwrap()).await;
    assert_eq!(stats["total_farmers"], 1);
    assert_eq!(stats["total_crops"], 18);
    assert_eq!(stats["total_regions"], 27);
    assert_eq!(stats["recent_advice"], 0);
}
