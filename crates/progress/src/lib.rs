//! Progress Tracking
//!
//! Exercise and workout completion, weekly/monthly achievement flags, and the
//! storage-backed tracker that keeps them current after every change.

#![warn(missing_docs)]

pub mod evaluator;
pub mod tracker;

pub use evaluator::{
    apply_completion_policy, celebrations, clear_coach_completion, evaluate_progress,
    is_workout_fully_completed, last_day_of_month, mark_completed_by_coach,
    select_workout_for_day, toggle_exercise_completion, EvaluatorConfig, ProgressError,
    ProgressEvaluator, Result,
};
pub use tracker::{
    BasicProgressTracker, ExerciseLog, ProgressReport, ProgressTracker, ProgressUpdate,
};
