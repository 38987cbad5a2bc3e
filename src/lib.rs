// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Runlog: a personal running log backend.
//!
//! This crate owns the local run/goal database, the statistics behind the
//! dashboard charts, and a cached weather lookup, all served over a small
//! JSON API to the presentation layer.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use db::RunLogDb;
use services::WeatherService;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: RunLogDb,
    pub weather_service: WeatherService,
}
