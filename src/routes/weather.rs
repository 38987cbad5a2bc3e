// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Weather lookup route.

use crate::error::{AppError, Result};
use crate::models::WeatherSnapshot;
use crate::AppState;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/weather", get(get_weather))
}

#[derive(Deserialize)]
struct WeatherQuery {
    lat: Option<f64>,
    lon: Option<f64>,
}

/// Current conditions at the caller's location.
///
/// Location fallback is the caller's job: by the time a request gets
/// here both coordinates must be present.
async fn get_weather(
    State(state): State<Arc<AppState>>,
    query: std::result::Result<Query<WeatherQuery>, QueryRejection>,
) -> Result<Json<WeatherSnapshot>> {
    let Query(params) = query?;
    let (Some(lat), Some(lon)) = (params.lat, params.lon) else {
        return Err(AppError::Validation(
            "Invalid location coordinates: lat and lon are required".to_string(),
        ));
    };

    tracing::debug!(lat, lon, "Weather requested");
    let snapshot = state.weather_service.fetch(lat, lon).await?;
    Ok(Json(snapshot))
}
