// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Run statistics for the dashboard charts.
//!
//! Nothing here is cached or stored: every figure is recomputed from the
//! current contents of the `runs` table, read once as a list of
//! [`RunSample`]s in insertion order.

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::models::run::parse_run_date;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// The columns of a run the aggregations need.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSample {
    pub id: i64,
    pub date: String,
    /// Miles
    pub distance: f64,
    /// Minutes per mile, as stored
    pub pace: f64,
    pub category: String,
}

/// Headline totals. All zero for an empty log.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[serde(rename_all = "camelCase")]
pub struct RunTotals {
    pub total_runs: u32,
    pub total_distance: f64,
    /// Unweighted mean of per-run pace
    pub avg_pace: f64,
}

impl RunTotals {
    pub fn from_samples(samples: &[RunSample]) -> Self {
        if samples.is_empty() {
            return Self::default();
        }

        let (total_distance, pace_sum) = samples
            .iter()
            .fold((0.0, 0.0), |(distance, pace), s| (distance + s.distance, pace + s.pace));

        Self {
            total_runs: samples.len() as u32,
            total_distance,
            avg_pace: pace_sum / samples.len() as f64,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
pub struct WeeklyMileage {
    /// ISO-8601 week, "YYYY-Www"
    pub week: String,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
pub struct MonthlyMileage {
    /// "YYYY-MM"
    pub month: String,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
pub struct CategoryCount {
    pub category: String,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
pub struct DateDistance {
    pub date: String,
    pub distance: f64,
}

/// Everything the dashboard shows in one response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct RunStats {
    #[serde(flatten)]
    pub totals: RunTotals,
    pub distance_by_date: Vec<DateDistance>,
    pub runs_by_category: Vec<CategoryCount>,
}

impl RunStats {
    pub fn from_samples(samples: &[RunSample]) -> Self {
        Self {
            totals: RunTotals::from_samples(samples),
            distance_by_date: distance_by_date(samples),
            runs_by_category: runs_by_category(samples),
        }
    }
}

/// ISO-8601 week key for a date: weeks start on Monday and week 1 is the
/// week holding January 4th, so early January can belong to the previous
/// year.
pub fn week_key(date: &str) -> Option<String> {
    let week = parse_run_date(date)?.iso_week();
    Some(format!("{:04}-W{:02}", week.year(), week.week()))
}

/// "YYYY-MM" for a date.
pub fn month_key(date: &str) -> Option<String> {
    parse_run_date(date).map(|d| d.format("%Y-%m").to_string())
}

/// Weekly distance totals, oldest week first.
pub fn mileage_by_week(samples: &[RunSample]) -> Vec<WeeklyMileage> {
    bucket_distance(samples, week_key)
        .into_iter()
        .map(|(week, total)| WeeklyMileage { week, total })
        .collect()
}

/// Monthly distance totals, oldest month first.
pub fn mileage_by_month(samples: &[RunSample]) -> Vec<MonthlyMileage> {
    bucket_distance(samples, month_key)
        .into_iter()
        .map(|(month, total)| MonthlyMileage { month, total })
        .collect()
}

fn bucket_distance(
    samples: &[RunSample],
    key_fn: fn(&str) -> Option<String>,
) -> BTreeMap<String, f64> {
    let mut buckets = BTreeMap::new();
    for sample in samples {
        match key_fn(&sample.date) {
            Some(key) => *buckets.entry(key).or_insert(0.0) += sample.distance,
            None => tracing::warn!(
                run_id = sample.id,
                date = %sample.date,
                "Skipping run with unparseable date"
            ),
        }
    }
    buckets
}

/// Run count per category, most frequent first. Categories with equal
/// counts keep the order in which they first appear in storage.
pub fn runs_by_category(samples: &[RunSample]) -> Vec<CategoryCount> {
    let mut counts: Vec<CategoryCount> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for sample in samples {
        match index.get(sample.category.as_str()) {
            Some(&i) => counts[i].count += 1,
            None => {
                index.insert(&sample.category, counts.len());
                counts.push(CategoryCount {
                    category: sample.category.clone(),
                    count: 1,
                });
            }
        }
    }

    // Stable sort keeps first-appearance order among ties
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

/// Per-run distance series for the line chart, oldest first.
pub fn distance_by_date(samples: &[RunSample]) -> Vec<DateDistance> {
    let mut series: Vec<&RunSample> = samples.iter().collect();
    series.sort_by(|a, b| a.date.cmp(&b.date));
    series
        .into_iter()
        .map(|s| DateDistance {
            date: s.date.clone(),
            distance: s.distance,
        })
        .collect()
}
