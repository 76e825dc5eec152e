//! Coaching services.
//!
//! Roster, catalog, workout and template management for coaches, plus the
//! admin dashboard and workout export.

#![warn(missing_docs)]

pub mod error;
pub mod validation;
pub mod manager;
pub mod dashboard;
pub mod export;

pub use error::{CoachError, Result};
pub use manager::{AssignmentSpec, BasicCoachService, CoachService, NewExercise, WorkoutSpec};
pub use dashboard::{Dashboard, DashboardStats, ExercisePopularity, StudentActivity};
pub use export::{workout_json, WorkoutSheet};
