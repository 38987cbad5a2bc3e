// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::{
    body::Body,
    extract::Query,
    http::{header, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use runlog::config::Config;
use runlog::db::RunLogDb;
use runlog::routes::create_router;
use runlog::services::WeatherService;
use runlog::AppState;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tower::ServiceExt;

/// Create a test app backed by an in-memory database.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (Router, Arc<AppState>) {
    create_test_app_with_config(Config::test_default())
}

/// Create a test app with a custom config (e.g. pointing at a weather stub).
#[allow(dead_code)]
pub fn create_test_app_with_config(config: Config) -> (Router, Arc<AppState>) {
    let db = RunLogDb::in_memory().expect("Failed to open in-memory database");
    let weather_service =
        WeatherService::from_config(&config).expect("Failed to build weather service");

    let state = Arc::new(AppState {
        config,
        db,
        weather_service,
    });

    (create_router(state.clone()), state)
}

/// Send a request with an optional JSON body; returns status and parsed body.
#[allow(dead_code)]
pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(serde_json::to_vec(&json).unwrap())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

/// A valid run body in miles.
#[allow(dead_code)]
pub fn run_body(date: &str, distance: f64, category: &str) -> Value {
    json!({
        "date": date,
        "distance": distance,
        "duration": 1800,
        "effort": 5,
        "category": category,
        "notes": null
    })
}

// ─── Weather provider stub ───────────────────────────────────

/// How the stub provider answers.
#[allow(dead_code)]
#[derive(Clone, Copy)]
pub enum StubBehavior {
    Ok,
    Unauthorized,
    Malformed,
    Slow,
}

impl StubBehavior {
    async fn respond(self, params: HashMap<String, String>) -> Response {
        match self {
            StubBehavior::Ok => {
                if !params.contains_key("appid") || !params.contains_key("lat") {
                    return (StatusCode::BAD_REQUEST, Json(json!({"cod": 400, "message": "missing params"})))
                        .into_response();
                }
                Json(json!({
                    "coord": {"lat": params["lat"], "lon": params["lon"]},
                    "main": {"temp": 55.4, "humidity": 63},
                    "weather": [{"main": "Clouds", "description": "overcast clouds"}],
                    "wind": {"speed": 7.2},
                    "name": "Aledo"
                }))
                .into_response()
            }
            StubBehavior::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                Json(json!({"cod": 401, "message": "Invalid API key"})),
            )
                .into_response(),
            StubBehavior::Malformed => Json(json!({"main": {"temp": "warm"}})).into_response(),
            StubBehavior::Slow => {
                tokio::time::sleep(std::time::Duration::from_secs(2)).await;
                StatusCode::GATEWAY_TIMEOUT.into_response()
            }
        }
    }
}

/// Start a local weather provider on a random port.
/// Returns its URL and a counter of requests it has served.
#[allow(dead_code)]
pub async fn spawn_weather_stub(behavior: StubBehavior) -> (String, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();

    let app = Router::new().route(
        "/weather",
        get(move |Query(params): Query<HashMap<String, String>>| {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                behavior.respond(params).await
            }
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}/weather", addr), hits)
}
