// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Database file lifecycle: schema creation on open, reopen keeps data.

use runlog::db::RunLogDb;
use runlog::error::AppError;
use runlog::models::{DistanceUnit, NewGoal, NewRun, RunWeather};

fn new_run() -> NewRun {
    NewRun {
        date: "2024-07-04".to_string(),
        distance: 4.0,
        unit: DistanceUnit::Miles,
        duration: 2100,
        effort: 7,
        category: "Tempo".to_string(),
        notes: Some("hot".to_string()),
        weather: RunWeather::default(),
    }
}

#[test]
fn test_reopen_keeps_existing_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("runs.db");

    let id = {
        let db = RunLogDb::open(&path).unwrap();
        db.create_goal(&NewGoal {
            goal_type: "distance".to_string(),
            target_value: 40.0,
            start_date: "2024-07-01".to_string(),
            end_date: "2024-07-31".to_string(),
            status: "active".to_string(),
            notes: None,
        })
        .unwrap();
        db.create_run(&new_run()).unwrap()
    };

    // Second open runs schema creation again over the existing file
    let db = RunLogDb::open(&path).unwrap();
    let run = db.get_run(id).unwrap();
    assert_eq!(run.category, "Tempo");
    assert_eq!(db.list_goals().unwrap().len(), 1);
    assert!(db.list_achievements().unwrap().is_empty());
}

#[test]
fn test_open_fails_when_directory_missing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("no-such-dir").join("runs.db");

    let err = RunLogDb::open(&path).err().unwrap();
    assert!(matches!(err, AppError::Persistence(_)));
}
