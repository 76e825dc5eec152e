//! Workout export: CSV sheet and JSON.

use std::collections::HashMap;

use chrono::NaiveDate;
use gymtask_core::{Exercise, ExerciseId, Workout};

use crate::error::{CoachError, Result};

const SHEET_TITLE: &str = "GymTask - Workout Sheet";
const UNKNOWN_EXERCISE: &str = "Exercise not found";

/// A printable workout sheet for one student's day.
#[derive(Debug, Clone)]
pub struct WorkoutSheet {
    rows: Vec<Vec<String>>,
    day: String,
}

impl WorkoutSheet {
    /// Lay out the sheet. Exercise names are resolved through `catalog`.
    pub fn build(
        workout: &Workout,
        student_name: &str,
        catalog: &HashMap<ExerciseId, Exercise>,
        date: NaiveDate,
    ) -> Self {
        let title = if workout.name.trim().is_empty() {
            format!("{} workout", workout.day.label())
        } else {
            workout.name.clone()
        };

        let mut rows = vec![
            vec![SHEET_TITLE.to_string()],
            vec![],
            vec!["Student:".to_string(), student_name.to_string()],
            vec!["Day:".to_string(), workout.day.label().to_string()],
            vec!["Workout:".to_string(), title],
            vec!["Date:".to_string(), date.format("%Y-%m-%d").to_string()],
            vec![],
            ["Exercise", "Sets", "Reps", "Notes"].iter().map(|s| s.to_string()).collect(),
        ];

        for assignment in &workout.exercises {
            let name = catalog
                .get(&assignment.exercise_id)
                .map(|e| e.name.clone())
                .unwrap_or_else(|| UNKNOWN_EXERCISE.to_string());
            rows.push(vec![
                name,
                assignment.sets.to_string(),
                assignment.reps.to_string(),
                assignment.notes.clone().unwrap_or_default(),
            ]);
        }

        Self {
            rows,
            day: workout.day.as_str().to_string(),
        }
    }

    /// Sheet rows, ragged.
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Suggested file name, e.g. `workout-monday.csv`.
    pub fn file_name(&self, prefix: &str) -> String {
        format!("{}-{}.csv", prefix, self.day)
    }

    /// Render as CSV.
    pub fn to_csv(&self) -> Result<String> {
        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_writer(Vec::new());
        for row in &self.rows {
            if row.is_empty() {
                writer.write_record([""])?;
            } else {
                writer.write_record(row)?;
            }
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| CoachError::Export(e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| CoachError::Export(e.to_string()))
    }
}

/// Pretty-printed JSON for a workout.
pub fn workout_json(workout: &Workout) -> Result<String> {
    Ok(serde_json::to_string_pretty(workout)?)
}
