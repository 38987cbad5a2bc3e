// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Run repository and the statistics read path.

use super::RunLogDb;
use crate::error::AppError;
use crate::models::run::pace_minutes_per_mile;
use crate::models::stats::{self, MonthlyMileage, WeeklyMileage};
use crate::models::{NewRun, Run, RunSample, RunStats, RunTotals};
use rusqlite::{params, OptionalExtension, Row};

const RUN_COLUMNS: &str = "id, date, distance, duration, effort, category, notes, \
     weather_temp, weather_condition, weather_humidity, weather_wind_speed";

fn run_from_row(row: &Row<'_>) -> rusqlite::Result<Run> {
    let distance: f64 = row.get("distance")?;
    let duration: u32 = row.get("duration")?;
    Ok(Run {
        id: row.get("id")?,
        date: row.get("date")?,
        distance,
        duration,
        // Always derived from the canonical distance, never trusted from the row
        pace: pace_minutes_per_mile(distance, duration),
        effort: row.get("effort")?,
        category: row.get("category")?,
        notes: row.get("notes")?,
        weather_temp: row.get("weather_temp")?,
        weather_condition: row.get("weather_condition")?,
        weather_humidity: row.get("weather_humidity")?,
        weather_wind_speed: row.get("weather_wind_speed")?,
    })
}

impl RunLogDb {
    // ─── Run Operations ──────────────────────────────────────────

    /// Insert a run and return its new id.
    pub fn create_run(&self, run: &NewRun) -> Result<i64, AppError> {
        let weather = run.weather.normalized();
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO runs (
                date, distance, duration, pace, effort, category, notes,
                weather_temp, weather_condition, weather_humidity, weather_wind_speed
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                run.date,
                run.canonical_distance(),
                run.duration,
                run.canonical_pace(),
                run.effort,
                run.category,
                run.notes,
                weather.temp,
                weather.condition,
                weather.humidity,
                weather.wind_speed,
            ],
        )?;
        let id = conn.last_insert_rowid();

        tracing::debug!(run_id = id, date = %run.date, "Run created");
        Ok(id)
    }

    /// Replace every field of an existing run.
    ///
    /// Returns `false` when no run has this id; nothing is written then.
    pub fn update_run(&self, id: i64, run: &NewRun) -> Result<bool, AppError> {
        let weather = run.weather.normalized();
        let changed = self.conn()?.execute(
            "UPDATE runs
             SET date = ?1, distance = ?2, duration = ?3, pace = ?4, effort = ?5,
                 category = ?6, notes = ?7, weather_temp = ?8, weather_condition = ?9,
                 weather_humidity = ?10, weather_wind_speed = ?11
             WHERE id = ?12",
            params![
                run.date,
                run.canonical_distance(),
                run.duration,
                run.canonical_pace(),
                run.effort,
                run.category,
                run.notes,
                weather.temp,
                weather.condition,
                weather.humidity,
                weather.wind_speed,
                id,
            ],
        )?;

        tracing::debug!(run_id = id, matched = changed > 0, "Run update");
        Ok(changed > 0)
    }

    /// Get a run by id.
    pub fn get_run(&self, id: i64) -> Result<Run, AppError> {
        self.conn()?
            .query_row(
                &format!("SELECT {RUN_COLUMNS} FROM runs WHERE id = ?1"),
                params![id],
                run_from_row,
            )
            .optional()?
            .ok_or_else(|| AppError::NotFound(format!("Run {} not found", id)))
    }

    /// All runs, newest date first. Runs on the same date stay in the
    /// order they were logged.
    pub fn list_runs(&self) -> Result<Vec<Run>, AppError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {RUN_COLUMNS} FROM runs ORDER BY date DESC, id ASC"
        ))?;
        let runs = stmt
            .query_map([], run_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(runs)
    }

    /// Delete a run. Deleting an unknown id is not an error.
    pub fn delete_run(&self, id: i64) -> Result<(), AppError> {
        let deleted = self
            .conn()?
            .execute("DELETE FROM runs WHERE id = ?1", params![id])?;
        tracing::debug!(run_id = id, deleted, "Run delete");
        Ok(())
    }

    // ─── Statistics ──────────────────────────────────────────────

    /// One read of the columns the aggregations use, in insertion order.
    pub fn run_samples(&self) -> Result<Vec<RunSample>, AppError> {
        let conn = self.conn()?;
        let mut stmt =
            conn.prepare("SELECT id, date, distance, pace, category FROM runs ORDER BY id")?;
        let samples = stmt
            .query_map([], |row| {
                Ok(RunSample {
                    id: row.get(0)?,
                    date: row.get(1)?,
                    distance: row.get(2)?,
                    pace: row.get(3)?,
                    category: row.get(4)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(samples)
    }

    pub fn run_totals(&self) -> Result<RunTotals, AppError> {
        Ok(RunTotals::from_samples(&self.run_samples()?))
    }

    pub fn run_stats(&self) -> Result<RunStats, AppError> {
        Ok(RunStats::from_samples(&self.run_samples()?))
    }

    pub fn weekly_mileage(&self) -> Result<Vec<WeeklyMileage>, AppError> {
        Ok(stats::mileage_by_week(&self.run_samples()?))
    }

    pub fn monthly_mileage(&self) -> Result<Vec<MonthlyMileage>, AppError> {
        Ok(stats::mileage_by_month(&self.run_samples()?))
    }

    pub fn runs_by_category(&self) -> Result<Vec<stats::CategoryCount>, AppError> {
        Ok(stats::runs_by_category(&self.run_samples()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DistanceUnit, RunWeather, WeatherField};

    fn new_run(date: &str, distance: f64, category: &str) -> NewRun {
        NewRun {
            date: date.to_string(),
            distance,
            unit: DistanceUnit::Miles,
            duration: 1800,
            effort: 6,
            category: category.to_string(),
            notes: Some("felt good".to_string()),
            weather: RunWeather::default(),
        }
    }

    #[test]
    fn test_create_then_get_round_trip() {
        let db = RunLogDb::in_memory().unwrap();
        let id = db.create_run(&new_run("2024-05-01", 3.1, "Easy")).unwrap();

        let run = db.get_run(id).unwrap();
        assert_eq!(run.id, id);
        assert_eq!(run.distance, 3.1);
        assert_eq!(run.duration, 1800);
        assert_eq!(run.notes.as_deref(), Some("felt good"));
        assert!((run.pace - 30.0 / 3.1).abs() < 1e-12);
        assert_eq!(run.weather_temp, None);
    }

    #[test]
    fn test_kilometers_stored_as_miles() {
        let db = RunLogDb::in_memory().unwrap();
        let mut run = new_run("2024-05-01", 10.0, "Race");
        run.unit = DistanceUnit::Kilometers;

        let id = db.create_run(&run).unwrap();
        let stored = db.get_run(id).unwrap();
        assert!((stored.distance - 6.21371).abs() < 1e-9);
    }

    #[test]
    fn test_weather_keeps_type_and_is_normalized() {
        let db = RunLogDb::in_memory().unwrap();
        let mut run = new_run("2024-05-01", 3.0, "Easy");
        run.weather = RunWeather {
            temp: Some(WeatherField::Number(68.0)),
            condition: Some(WeatherField::Text("Bru\u{0308}me".to_string())),
            humidity: None,
            wind_speed: Some(WeatherField::Text("5 mph".to_string())),
        };

        let stored = db.get_run(db.create_run(&run).unwrap()).unwrap();
        assert_eq!(stored.weather_temp, Some(WeatherField::Number(68.0)));
        assert_eq!(
            stored.weather_condition,
            Some(WeatherField::Text("Br\u{00fc}me".to_string()))
        );
        assert_eq!(stored.weather_humidity, None);
        assert_eq!(stored.weather_wind_speed, Some(WeatherField::Text("5 mph".to_string())));
    }

    #[test]
    fn test_get_missing_run_is_not_found() {
        let db = RunLogDb::in_memory().unwrap();
        let err = db.get_run(42).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_update_reports_whether_row_matched() {
        let db = RunLogDb::in_memory().unwrap();
        let id = db.create_run(&new_run("2024-05-01", 3.0, "Easy")).unwrap();

        assert!(db.update_run(id, &new_run("2024-05-02", 4.0, "Tempo")).unwrap());
        let updated = db.get_run(id).unwrap();
        assert_eq!(updated.date, "2024-05-02");
        assert_eq!(updated.category, "Tempo");

        assert!(!db.update_run(id + 100, &new_run("2024-05-02", 4.0, "Tempo")).unwrap());
    }

    #[test]
    fn test_delete_is_idempotent() {
        let db = RunLogDb::in_memory().unwrap();
        let id = db.create_run(&new_run("2024-05-01", 3.0, "Easy")).unwrap();

        db.delete_run(id).unwrap();
        db.delete_run(id).unwrap();
        db.delete_run(9999).unwrap();
        assert!(db.list_runs().unwrap().is_empty());
    }

    #[test]
    fn test_list_orders_by_date_desc_then_insertion() {
        let db = RunLogDb::in_memory().unwrap();
        let a = db.create_run(&new_run("2024-05-01", 1.0, "Easy")).unwrap();
        let b = db.create_run(&new_run("2024-05-03", 2.0, "Easy")).unwrap();
        let c = db.create_run(&new_run("2024-05-01", 3.0, "Easy")).unwrap();

        let ids: Vec<i64> = db.list_runs().unwrap().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![b, a, c]);
    }

    #[test]
    fn test_two_run_scenario() {
        let db = RunLogDb::in_memory().unwrap();
        db.create_run(&new_run("2024-01-01", 3.0, "Easy")).unwrap();
        db.create_run(&new_run("2024-01-08", 2.0, "Easy")).unwrap();

        let categories = db.runs_by_category().unwrap();
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].category, "Easy");
        assert_eq!(categories[0].count, 2);

        let monthly = db.monthly_mileage().unwrap();
        assert_eq!(monthly.len(), 1);
        assert_eq!(monthly[0].month, "2024-01");
        assert_eq!(monthly[0].total, 5.0);

        let weekly = db.weekly_mileage().unwrap();
        assert_eq!(weekly.len(), 2);
        assert_eq!(db.run_totals().unwrap().total_distance, 5.0);
    }
}
