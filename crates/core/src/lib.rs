//! GymTask core data models.
//!
//! This crate defines the typed records shared by the store, the progress
//! evaluator and the coaching services.

#![warn(missing_docs)]

// Core identities
mod id;
mod day;

// Directory and catalog
mod student;
mod exercise;

// Plans
mod workout;
mod template;

// Derived state
mod progress;

// Re-exports
pub use id::*;
pub use day::{DayOfWeek, ParseDayError};

pub use student::{Student, Role};
pub use exercise::Exercise;

pub use workout::{Workout, ExerciseAssignment, WorkoutHistory, ExerciseHistory};
pub use template::WorkoutTemplate;

pub use progress::{ProgressSnapshot, Celebration, WeeklySummary};

/// Timestamp type
pub type Time = chrono::DateTime<chrono::Utc>;
