// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Weather lookups for run logging.
//!
//! Handles:
//! - Current-conditions requests against an OpenWeatherMap-style API
//! - A short-lived in-memory cache keyed by the exact coordinates asked for
//! - Coordinate validation before any network access

use crate::config::Config;
use crate::error::AppError;
use crate::models::WeatherSnapshot;
use serde::Deserialize;

/// Weather provider client.
#[derive(Clone)]
pub struct WeatherClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    units: String,
}

impl WeatherClient {
    /// Create a client whose requests give up after the configured timeout.
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(config.weather_timeout)
            .build()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("HTTP client error: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.weather_api_url.clone(),
            api_key: config.weather_api_key.clone(),
            units: config.weather_units.clone(),
        })
    }

    /// Fetch current conditions at a coordinate pair.
    pub async fn current_conditions(
        &self,
        lat: f64,
        lon: f64,
    ) -> Result<WeatherSnapshot, AppError> {
        let response = self
            .http
            .get(&self.base_url)
            .query(&[
                ("lat", lat.to_string()),
                ("lon", lon.to_string()),
                ("appid", self.api_key.clone()),
                ("units", self.units.clone()),
            ])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AppError::WeatherLookup("Weather request timed out".to_string())
                } else {
                    AppError::WeatherLookup(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, "Weather provider returned an error");
            return Err(AppError::WeatherLookup(upstream_reason(status, &body)));
        }

        let payload: ProviderResponse = response
            .json()
            .await
            .map_err(|e| AppError::WeatherLookup(format!("Malformed weather payload: {}", e)))?;

        payload.into_snapshot()
    }
}

/// The provider's own message when it sent one, else a generic line.
fn upstream_reason(status: reqwest::StatusCode, body: &str) -> String {
    serde_json::from_str::<ProviderError>(body)
        .ok()
        .and_then(|e| e.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| format!("{} (HTTP {})", AppError::WEATHER_UNAVAILABLE, status))
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    message: Option<String>,
}

/// Subset of the current-conditions response that we read.
#[derive(Debug, Deserialize)]
struct ProviderResponse {
    main: ProviderMain,
    weather: Vec<ProviderCondition>,
    wind: ProviderWind,
}

#[derive(Debug, Deserialize)]
struct ProviderMain {
    temp: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct ProviderCondition {
    main: String,
}

#[derive(Debug, Deserialize)]
struct ProviderWind {
    speed: f64,
}

impl ProviderResponse {
    fn into_snapshot(self) -> Result<WeatherSnapshot, AppError> {
        let condition = self
            .weather
            .into_iter()
            .next()
            .map(|c| c.main)
            .ok_or_else(|| {
                AppError::WeatherLookup("Malformed weather payload: no conditions".to_string())
            })?;

        Ok(WeatherSnapshot {
            temperature: self.main.temp,
            condition,
            humidity: self.main.humidity,
            wind_speed: self.wind.speed,
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// WeatherCache - snapshots with an explicit expiry check on read
// ─────────────────────────────────────────────────────────────────────────────

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;

/// Cached snapshot with the time it was fetched.
#[derive(Clone)]
pub struct CachedWeather {
    snapshot: WeatherSnapshot,
    fetched_at: DateTime<Utc>,
}

/// Process-wide snapshot cache. Clones share entries.
///
/// No lock spans a lookup: two requests for the same key that both miss
/// will both call the provider, and the later write wins.
#[derive(Clone)]
pub struct WeatherCache {
    entries: Arc<DashMap<String, CachedWeather>>,
    ttl: Duration,
}

impl WeatherCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            ttl,
        }
    }

    /// Cache key: the coordinates exactly as given.
    pub fn key(lat: f64, lon: f64) -> String {
        format!("{},{}", lat, lon)
    }

    /// Live snapshot for the coordinates at `now`, if any. Expired entries
    /// read as absent and are pruned on the next insert.
    pub fn get(&self, lat: f64, lon: f64, now: DateTime<Utc>) -> Option<WeatherSnapshot> {
        let entry = self.entries.get(&Self::key(lat, lon))?;
        self.is_live(&entry, now).then(|| entry.snapshot.clone())
    }

    fn is_live(&self, entry: &CachedWeather, now: DateTime<Utc>) -> bool {
        // A fetch time in the future (clock step) counts as fresh
        (now - entry.fetched_at)
            .to_std()
            .map_or(true, |age| age < self.ttl)
    }

    /// Store a snapshot and drop every entry that has expired by `now`.
    pub fn insert(&self, lat: f64, lon: f64, snapshot: WeatherSnapshot, now: DateTime<Utc>) {
        self.entries.retain(|_, entry| self.is_live(entry, now));
        self.entries.insert(
            Self::key(lat, lon),
            CachedWeather {
                snapshot,
                fetched_at: now,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// WeatherService - cache in front of the provider
// ─────────────────────────────────────────────────────────────────────────────

/// Weather lookups with caching. Owned by the application state.
#[derive(Clone)]
pub struct WeatherService {
    client: WeatherClient,
    cache: WeatherCache,
}

impl WeatherService {
    pub fn new(client: WeatherClient, cache: WeatherCache) -> Self {
        Self { client, cache }
    }

    /// Build the client and cache from config.
    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        Ok(Self::new(
            WeatherClient::new(config)?,
            WeatherCache::new(config.weather_cache_ttl),
        ))
    }

    pub fn cache(&self) -> &WeatherCache {
        &self.cache
    }

    /// Current conditions at the coordinates, from cache when a live
    /// snapshot exists.
    ///
    /// A failed lookup leaves the cache as it was.
    pub async fn fetch(&self, lat: f64, lon: f64) -> Result<WeatherSnapshot, AppError> {
        validate_coordinates(lat, lon)?;

        if let Some(snapshot) = self.cache.get(lat, lon, Utc::now()) {
            tracing::debug!(lat, lon, "Weather cache hit");
            return Ok(snapshot);
        }

        tracing::debug!(lat, lon, "Weather cache miss, querying provider");
        let snapshot = self.client.current_conditions(lat, lon).await.map_err(|e| {
            tracing::warn!(lat, lon, error = %e, "Weather lookup failed");
            e
        })?;

        self.cache.insert(lat, lon, snapshot.clone(), Utc::now());
        Ok(snapshot)
    }
}

/// Coordinates must be finite and on the globe.
pub fn validate_coordinates(lat: f64, lon: f64) -> Result<(), AppError> {
    if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
        return Err(AppError::Validation(format!("Invalid latitude: {}", lat)));
    }
    if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
        return Err(AppError::Validation(format!("Invalid longitude: {}", lon)));
    }
    Ok(())
}
