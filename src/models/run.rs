// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Run model for storage and API.
//!
//! Distances are persisted in miles only. Input may arrive in kilometers
//! and is converted before it reaches the database; display conversion is
//! left to the caller.

use chrono::NaiveDate;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;
use validator::{Validate, ValidationError};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub const MILES_TO_KM: f64 = 1.60934;
pub const KM_TO_MILES: f64 = 0.621371;

/// Stored run record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Run {
    pub id: i64,
    /// Calendar date (YYYY-MM-DD)
    pub date: String,
    /// Distance in miles
    pub distance: f64,
    /// Duration in seconds
    pub duration: u32,
    /// Minutes per mile
    pub pace: f64,
    /// Perceived effort, 1-10
    pub effort: u8,
    pub category: String,
    pub notes: Option<String>,
    pub weather_temp: Option<WeatherField>,
    pub weather_condition: Option<WeatherField>,
    pub weather_humidity: Option<WeatherField>,
    pub weather_wind_speed: Option<WeatherField>,
}

/// Run as submitted by the client, before an id is assigned.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewRun {
    #[validate(custom(function = "validate_iso_date"))]
    pub date: String,
    /// Distance in `unit`
    #[validate(range(exclusive_min = 0.0, message = "distance must be greater than 0"))]
    pub distance: f64,
    #[serde(default)]
    pub unit: DistanceUnit,
    /// Duration in seconds
    #[validate(range(min = 1, message = "duration must be at least one second"))]
    pub duration: u32,
    #[validate(range(min = 1, max = 10, message = "effort must be between 1 and 10"))]
    pub effort: u8,
    #[validate(length(min = 1, max = 64, message = "category is required"))]
    pub category: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub weather: RunWeather,
}

impl NewRun {
    /// Distance converted to miles.
    pub fn canonical_distance(&self) -> f64 {
        self.unit.to_miles(self.distance)
    }

    /// Pace in minutes per mile, derived from the canonical distance.
    pub fn canonical_pace(&self) -> f64 {
        pace_minutes_per_mile(self.canonical_distance(), self.duration)
    }
}

/// Weather snapshot attached to a run. Every field is independently optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunWeather {
    #[serde(default)]
    pub temp: Option<WeatherField>,
    #[serde(default)]
    pub condition: Option<WeatherField>,
    #[serde(default)]
    pub humidity: Option<WeatherField>,
    #[serde(default, alias = "windSpeed")]
    pub wind_speed: Option<WeatherField>,
}

impl RunWeather {
    /// Copy of the snapshot with every text field NFC-normalized and
    /// empty strings dropped.
    pub fn normalized(&self) -> RunWeather {
        let norm = |field: &Option<WeatherField>| field.clone().and_then(WeatherField::normalized);
        RunWeather {
            temp: norm(&self.temp),
            condition: norm(&self.condition),
            humidity: norm(&self.humidity),
            wind_speed: norm(&self.wind_speed),
        }
    }
}

/// A weather value as the client sent it: a reading or a label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[serde(untagged)]
pub enum WeatherField {
    Number(f64),
    Text(String),
}

impl WeatherField {
    fn normalized(self) -> Option<WeatherField> {
        match self {
            WeatherField::Text(text) if text.is_empty() => None,
            WeatherField::Text(text) => Some(WeatherField::Text(text.nfc().collect())),
            number => Some(number),
        }
    }
}

impl ToSql for WeatherField {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        match self {
            WeatherField::Number(n) => n.to_sql(),
            WeatherField::Text(s) => s.to_sql(),
        }
    }
}

impl FromSql for WeatherField {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value {
            ValueRef::Real(n) => Ok(WeatherField::Number(n)),
            ValueRef::Integer(n) => Ok(WeatherField::Number(n as f64)),
            ValueRef::Text(_) => value.as_str().map(|s| WeatherField::Text(s.to_string())),
            ValueRef::Null | ValueRef::Blob(_) => Err(FromSqlError::InvalidType),
        }
    }
}

/// Unit a distance was entered in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DistanceUnit {
    #[default]
    #[serde(rename = "mi", alias = "miles")]
    Miles,
    #[serde(rename = "km", alias = "kilometers")]
    Kilometers,
}

impl DistanceUnit {
    pub fn to_miles(self, distance: f64) -> f64 {
        match self {
            DistanceUnit::Miles => distance,
            DistanceUnit::Kilometers => distance * KM_TO_MILES,
        }
    }

    pub fn from_miles(self, miles: f64) -> f64 {
        match self {
            DistanceUnit::Miles => miles,
            DistanceUnit::Kilometers => miles * MILES_TO_KM,
        }
    }
}

/// Minutes per mile. Zero when there is no distance to divide by.
pub fn pace_minutes_per_mile(distance_miles: f64, duration_secs: u32) -> f64 {
    if distance_miles <= 0.0 {
        return 0.0;
    }
    (duration_secs as f64 / 60.0) / distance_miles
}

/// Parse the calendar date of a run. Accepts a full timestamp and keeps
/// only its date part.
pub fn parse_run_date(date: &str) -> Option<NaiveDate> {
    let day = date.get(..10)?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

/// Reject anything that is not a plain `YYYY-MM-DD` date.
pub(crate) fn validate_iso_date(date: &str) -> Result<(), ValidationError> {
    if date.len() == 10 && parse_run_date(date).is_some() {
        return Ok(());
    }
    Err(ValidationError::new("iso_date").with_message("date must be YYYY-MM-DD".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_run(distance: f64, unit: DistanceUnit, duration: u32) -> NewRun {
        NewRun {
            date: "2024-03-02".to_string(),
            distance,
            unit,
            duration,
            effort: 5,
            category: "Easy".to_string(),
            notes: None,
            weather: RunWeather::default(),
        }
    }

    #[test]
    fn test_kilometers_converted_to_miles() {
        let run = new_run(10.0, DistanceUnit::Kilometers, 3000);
        assert!((run.canonical_distance() - 6.21371).abs() < 1e-9);
        // 50 minutes over 6.21371 miles
        assert!((run.canonical_pace() - 50.0 / 6.21371).abs() < 1e-9);
    }

    #[test]
    fn test_miles_converted_back_for_display() {
        let km = DistanceUnit::Kilometers.from_miles(6.21371);
        assert!((km - 10.0).abs() < 1e-3);
        assert_eq!(DistanceUnit::Miles.from_miles(6.2), 6.2);

        let stored = DistanceUnit::Kilometers.to_miles(21.0975);
        assert!((DistanceUnit::Kilometers.from_miles(stored) - 21.0975).abs() < 1e-3);
    }

    #[test]
    fn test_pace_zero_distance() {
        assert_eq!(pace_minutes_per_mile(0.0, 600), 0.0);
        assert_eq!(pace_minutes_per_mile(2.0, 1200), 10.0);
    }

    #[test]
    fn test_validation_rejects_bad_input() {
        let mut run = new_run(3.0, DistanceUnit::Miles, 1500);
        assert!(run.validate().is_ok());

        run.effort = 11;
        assert!(run.validate().is_err());

        run.effort = 5;
        run.distance = 0.0;
        assert!(run.validate().is_err());

        run.distance = 3.0;
        run.date = "03/02/2024".to_string();
        assert!(run.validate().is_err());

        run.date = "2024-02-30".to_string();
        assert!(run.validate().is_err());

        run.date = "2024-03-02".to_string();
        run.category = String::new();
        assert!(run.validate().is_err());
    }

    #[test]
    fn test_weather_normalization() {
        let weather = RunWeather {
            temp: Some(WeatherField::Number(0.0)),
            condition: Some(WeatherField::Text("Ne\u{0301}ige".to_string())),
            humidity: Some(WeatherField::Text(String::new())),
            wind_speed: None,
        };

        let normalized = weather.normalized();
        assert_eq!(normalized.temp, Some(WeatherField::Number(0.0)));
        assert_eq!(
            normalized.condition,
            Some(WeatherField::Text("N\u{00e9}ige".to_string()))
        );
        assert_eq!(normalized.humidity, None);
        assert_eq!(normalized.wind_speed, None);
    }

    #[test]
    fn test_weather_accepts_numbers_and_strings() {
        let weather: RunWeather =
            serde_json::from_str(r#"{"temp": 71.5, "condition": "Clear", "windSpeed": "8 mph"}"#)
                .unwrap();
        assert_eq!(weather.temp, Some(WeatherField::Number(71.5)));
        assert_eq!(weather.condition, Some(WeatherField::Text("Clear".to_string())));
        assert_eq!(weather.wind_speed, Some(WeatherField::Text("8 mph".to_string())));
        assert_eq!(weather.humidity, None);
    }

    #[test]
    fn test_parse_run_date_accepts_timestamp_prefix() {
        assert_eq!(
            parse_run_date("2024-01-08T06:30:00Z"),
            NaiveDate::from_ymd_opt(2024, 1, 8)
        );
        assert_eq!(parse_run_date("2024-1-8"), None);
    }
}
