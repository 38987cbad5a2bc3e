// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API routes for runs, goals, achievements and statistics.

use crate::error::{AppError, Result};
use crate::models::stats::{MonthlyMileage, WeeklyMileage};
use crate::models::{Achievement, Goal, GoalProgress, NewGoal, NewRun, Run, RunStats};
use crate::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    routing::{get, put},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

type JsonBody<T> = std::result::Result<Json<T>, JsonRejection>;
type IdPath = std::result::Result<Path<i64>, PathRejection>;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/runs", get(get_runs).post(save_run))
        .route(
            "/api/runs/{id}",
            get(get_run).put(update_run).delete(delete_run),
        )
        .route("/api/stats", get(get_run_stats))
        .route("/api/stats/weekly-mileage", get(get_weekly_mileage))
        .route("/api/stats/monthly-mileage", get(get_monthly_mileage))
        .route("/api/goals", get(get_goals).post(save_goal))
        .route("/api/goals/{id}/progress", put(update_goal_progress))
        .route("/api/achievements", get(get_achievements))
}

/// Id assigned to a newly saved record.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CreatedResponse {
    pub id: i64,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SuccessResponse {
    pub success: bool,
}

// ─── Runs ────────────────────────────────────────────────────

async fn save_run(
    State(state): State<Arc<AppState>>,
    body: JsonBody<NewRun>,
) -> Result<Json<CreatedResponse>> {
    let Json(run) = body?;
    run.validate()?;

    let id = state.db.create_run(&run)?;
    tracing::info!(run_id = id, date = %run.date, category = %run.category, "Run saved");
    Ok(Json(CreatedResponse { id }))
}

/// Replace a run. Unlike the delete path, an unknown id is an error here.
async fn update_run(
    State(state): State<Arc<AppState>>,
    id: IdPath,
    body: JsonBody<NewRun>,
) -> Result<Json<SuccessResponse>> {
    let Path(id) = id?;
    let Json(run) = body?;
    run.validate()?;

    if !state.db.update_run(id, &run)? {
        return Err(AppError::NotFound(format!("Run {} not found", id)));
    }
    tracing::info!(run_id = id, "Run updated");
    Ok(Json(SuccessResponse { success: true }))
}

async fn get_run(State(state): State<Arc<AppState>>, id: IdPath) -> Result<Json<Run>> {
    let Path(id) = id?;
    Ok(Json(state.db.get_run(id)?))
}

async fn get_runs(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Run>>> {
    Ok(Json(state.db.list_runs()?))
}

async fn delete_run(
    State(state): State<Arc<AppState>>,
    id: IdPath,
) -> Result<Json<SuccessResponse>> {
    let Path(id) = id?;
    state.db.delete_run(id)?;
    tracing::info!(run_id = id, "Run deleted");
    Ok(Json(SuccessResponse { success: true }))
}

// ─── Statistics ──────────────────────────────────────────────

async fn get_run_stats(State(state): State<Arc<AppState>>) -> Result<Json<RunStats>> {
    let stats = state.db.run_stats()?;
    tracing::debug!(
        total_runs = stats.totals.total_runs,
        categories = stats.runs_by_category.len(),
        "Computed run stats"
    );
    Ok(Json(stats))
}

async fn get_weekly_mileage(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<WeeklyMileage>>> {
    Ok(Json(state.db.weekly_mileage()?))
}

async fn get_monthly_mileage(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<MonthlyMileage>>> {
    Ok(Json(state.db.monthly_mileage()?))
}

// ─── Goals ───────────────────────────────────────────────────

async fn save_goal(
    State(state): State<Arc<AppState>>,
    body: JsonBody<NewGoal>,
) -> Result<Json<CreatedResponse>> {
    let Json(goal) = body?;
    goal.validate()?;

    let id = state.db.create_goal(&goal)?;
    tracing::info!(goal_id = id, goal_type = %goal.goal_type, "Goal saved");
    Ok(Json(CreatedResponse { id }))
}

async fn get_goals(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Goal>>> {
    Ok(Json(state.db.list_goals()?))
}

/// Set a goal's progress. Completing the goal is left to the caller.
async fn update_goal_progress(
    State(state): State<Arc<AppState>>,
    id: IdPath,
    body: JsonBody<GoalProgress>,
) -> Result<Json<SuccessResponse>> {
    let Path(id) = id?;
    let Json(update) = body?;

    if !state.db.update_goal_progress(id, update.progress)? {
        return Err(AppError::NotFound(format!("Goal {} not found", id)));
    }
    tracing::info!(goal_id = id, progress = update.progress, "Goal progress updated");
    Ok(Json(SuccessResponse { success: true }))
}

// ─── Achievements ────────────────────────────────────────────

async fn get_achievements(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Achievement>>> {
    Ok(Json(state.db.list_achievements()?))
}
