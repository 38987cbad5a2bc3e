// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod goal;
pub mod run;
pub mod stats;
pub mod weather;

pub use goal::{Achievement, Goal, GoalProgress, NewGoal};
pub use run::{DistanceUnit, NewRun, Run, RunWeather, WeatherField};
pub use stats::{RunSample, RunStats, RunTotals};
pub use weather::WeatherSnapshot;
