// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Goal and achievement models.

use crate::models::run::{parse_run_date, validate_iso_date};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Stored goal record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Goal {
    pub id: i64,
    /// Goal kind, e.g. "distance"
    #[serde(rename = "type")]
    pub goal_type: String,
    pub target_value: f64,
    /// Absent until the first progress update
    pub progress: Option<f64>,
    pub start_date: String,
    pub end_date: String,
    /// Lifecycle label ("active", "completed"); never changed automatically
    pub status: String,
    pub notes: Option<String>,
}

/// Goal as submitted by the client.
#[derive(Debug, Clone, Deserialize, Validate)]
#[validate(schema(function = "validate_goal_window"))]
pub struct NewGoal {
    #[serde(rename = "type")]
    #[validate(length(min = 1, max = 64, message = "goal type is required"))]
    pub goal_type: String,
    #[serde(alias = "targetValue")]
    #[validate(range(exclusive_min = 0.0, message = "target must be greater than 0"))]
    pub target_value: f64,
    #[serde(alias = "startDate")]
    #[validate(custom(function = "validate_iso_date"))]
    pub start_date: String,
    #[serde(alias = "endDate")]
    #[validate(custom(function = "validate_iso_date"))]
    pub end_date: String,
    #[serde(default = "default_status")]
    #[validate(length(min = 1, max = 32, message = "status is required"))]
    pub status: String,
    #[serde(default)]
    pub notes: Option<String>,
}

fn default_status() -> String {
    "active".to_string()
}

fn validate_goal_window(goal: &NewGoal) -> Result<(), ValidationError> {
    match (parse_run_date(&goal.start_date), parse_run_date(&goal.end_date)) {
        (Some(start), Some(end)) if start > end => Err(ValidationError::new("goal_window")
            .with_message("start_date must not be after end_date".into())),
        // Unparseable dates are reported by the field validators
        _ => Ok(()),
    }
}

/// Body of a progress update.
#[derive(Debug, Clone, Deserialize)]
pub struct GoalProgress {
    pub progress: f64,
}

/// Historical milestone. Read-only from the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Achievement {
    pub id: i64,
    #[serde(rename = "type")]
    pub achievement_type: String,
    pub title: String,
    pub description: Option<String>,
    pub value: Option<f64>,
    pub date_earned: String,
}
