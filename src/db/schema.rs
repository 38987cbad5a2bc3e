// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Table definitions, created on startup.
//!
//! Creation is additive only: `IF NOT EXISTS` everywhere, no migrations.
//! Weather columns carry no declared type so a value keeps whatever type
//! the client sent (number or text).

use crate::error::AppError;
use rusqlite::Connection;

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS runs (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        date TEXT NOT NULL,
        distance REAL NOT NULL,
        duration INTEGER NOT NULL,
        pace REAL NOT NULL,
        effort INTEGER NOT NULL CHECK (effort BETWEEN 1 AND 10),
        category TEXT NOT NULL,
        notes TEXT,
        weather_temp,
        weather_condition,
        weather_humidity,
        weather_wind_speed
    );

    CREATE INDEX IF NOT EXISTS idx_runs_date ON runs(date);

    CREATE TABLE IF NOT EXISTS goals (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        type TEXT NOT NULL,
        target_value REAL NOT NULL,
        progress REAL,
        start_date TEXT NOT NULL,
        end_date TEXT NOT NULL,
        status TEXT NOT NULL,
        notes TEXT
    );

    CREATE TABLE IF NOT EXISTS achievements (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        type TEXT NOT NULL,
        title TEXT NOT NULL,
        description TEXT,
        value REAL,
        date_earned TEXT NOT NULL
    );
"#;

/// Create any missing tables and indexes. Safe to call on every start.
pub fn init_schema(conn: &Connection) -> Result<(), AppError> {
    conn.execute_batch(SCHEMA)
        .map_err(|e| AppError::Persistence(format!("Failed to create schema: {}", e)))?;
    tracing::debug!("Schema ready");
    Ok(())
}
