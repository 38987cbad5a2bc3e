// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Goal and achievement repositories.

use super::RunLogDb;
use crate::error::AppError;
use crate::models::{Achievement, Goal, NewGoal};
use rusqlite::params;

impl RunLogDb {
    // ─── Goal Operations ─────────────────────────────────────────

    /// Insert a goal and return its new id. Progress starts out absent.
    pub fn create_goal(&self, goal: &NewGoal) -> Result<i64, AppError> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO goals (type, target_value, start_date, end_date, status, notes)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                goal.goal_type,
                goal.target_value,
                goal.start_date,
                goal.end_date,
                goal.status,
                goal.notes,
            ],
        )?;
        let id = conn.last_insert_rowid();

        tracing::debug!(goal_id = id, goal_type = %goal.goal_type, "Goal created");
        Ok(id)
    }

    /// All goals, latest end date first.
    pub fn list_goals(&self) -> Result<Vec<Goal>, AppError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, type, target_value, progress, start_date, end_date, status, notes
             FROM goals ORDER BY end_date DESC, id ASC",
        )?;
        let goals = stmt
            .query_map([], |row| {
                Ok(Goal {
                    id: row.get(0)?,
                    goal_type: row.get(1)?,
                    target_value: row.get(2)?,
                    progress: row.get(3)?,
                    start_date: row.get(4)?,
                    end_date: row.get(5)?,
                    status: row.get(6)?,
                    notes: row.get(7)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(goals)
    }

    /// Set a goal's progress and nothing else. Status is left alone even
    /// when the target is reached.
    ///
    /// Returns `false` when no goal has this id.
    pub fn update_goal_progress(&self, id: i64, progress: f64) -> Result<bool, AppError> {
        let changed = self.conn()?.execute(
            "UPDATE goals SET progress = ?1 WHERE id = ?2",
            params![progress, id],
        )?;
        Ok(changed > 0)
    }

    // ─── Achievement Operations ──────────────────────────────────

    /// All achievements, most recently earned first.
    pub fn list_achievements(&self) -> Result<Vec<Achievement>, AppError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, type, title, description, value, date_earned
             FROM achievements ORDER BY date_earned DESC, id ASC",
        )?;
        let achievements = stmt
            .query_map([], |row| {
                Ok(Achievement {
                    id: row.get(0)?,
                    achievement_type: row.get(1)?,
                    title: row.get(2)?,
                    description: row.get(3)?,
                    value: row.get(4)?,
                    date_earned: row.get(5)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(achievements)
    }

    /// Record an achievement. Nothing in the API creates these; used when
    /// seeding a database.
    pub fn insert_achievement(
        &self,
        achievement_type: &str,
        title: &str,
        description: Option<&str>,
        value: Option<f64>,
        date_earned: &str,
    ) -> Result<i64, AppError> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO achievements (type, title, description, value, date_earned)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![achievement_type, title, description, value, date_earned],
        )?;
        Ok(conn.last_insert_rowid())
    }
}
