// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! A `.env` file in the working directory is honored for local use.

use std::env;
use std::time::Duration;

const DEFAULT_WEATHER_API_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path of the SQLite database file
    pub db_path: String,
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// Server port
    pub port: u16,

    // --- Weather provider ---
    /// API key sent as `appid`
    pub weather_api_key: String,
    /// Current-conditions endpoint
    pub weather_api_url: String,
    /// Unit system requested from the provider (`imperial`, `metric`)
    pub weather_units: String,
    /// Upper bound on a single upstream request
    pub weather_timeout: Duration,
    /// How long a cached snapshot stays live
    pub weather_cache_ttl: Duration,
}

impl Config {
    /// Offline config for tests.
    pub fn test_default() -> Self {
        Self {
            db_path: ":memory:".to_string(),
            frontend_url: "http://localhost:5173".to_string(),
            port: 8080,
            weather_api_key: "test_weather_key".to_string(),
            weather_api_url: "http://127.0.0.1:9/weather".to_string(),
            weather_units: "imperial".to_string(),
            weather_timeout: Duration::from_secs(2),
            weather_cache_ttl: Duration::from_secs(5 * 60),
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            db_path: env::var("RUNLOG_DB_PATH").unwrap_or_else(|_| "runs.db".to_string()),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),

            weather_api_key: env::var("WEATHER_API_KEY")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("WEATHER_API_KEY"))?,
            weather_api_url: env::var("WEATHER_API_URL")
                .unwrap_or_else(|_| DEFAULT_WEATHER_API_URL.to_string()),
            weather_units: env::var("WEATHER_UNITS").unwrap_or_else(|_| "imperial".to_string()),
            weather_timeout: Duration::from_secs(parse_secs("WEATHER_TIMEOUT_SECS", 10)?),
            weather_cache_ttl: Duration::from_secs(parse_secs("WEATHER_CACHE_TTL_SECS", 300)?),
        })
    }
}

fn parse_secs(name: &'static str, default: u64) -> Result<u64, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid(name, raw)),
        Err(_) => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1:?}")]
    Invalid(&'static str, String),
}
