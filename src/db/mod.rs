// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Database layer (SQLite).
//!
//! Every repository operation is a single SQL statement, so each one is
//! atomic on its own and none spans another.

pub mod goals;
pub mod runs;
pub mod schema;

use crate::error::AppError;
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

/// Table names as constants.
pub mod tables {
    pub const RUNS: &str = "runs";
    pub const GOALS: &str = "goals";
    pub const ACHIEVEMENTS: &str = "achievements";
}

/// Handle to the run log database. Cheap to clone; clones share one
/// connection.
#[derive(Clone)]
pub struct RunLogDb {
    conn: Arc<Mutex<Connection>>,
}

impl RunLogDb {
    /// Open (or create) the database file and make sure the schema exists.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, AppError> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|e| {
            AppError::Persistence(format!("Failed to open {}: {}", path.display(), e))
        })?;
        schema::init_schema(&conn)?;

        tracing::info!(path = %path.display(), "Opened run log database");
        Ok(Self::from_connection(conn))
    }

    /// In-memory database for tests.
    pub fn in_memory() -> Result<Self, AppError> {
        let conn = Connection::open_in_memory()?;
        schema::init_schema(&conn)?;
        Ok(Self::from_connection(conn))
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Lock the shared connection for one statement.
    fn conn(&self) -> Result<MutexGuard<'_, Connection>, AppError> {
        self.conn
            .lock()
            .map_err(|_| AppError::Persistence("Database lock poisoned".to_string()))
    }
}
