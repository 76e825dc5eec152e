//! Workout completion and streak evaluation.
//!
//! Everything here is pure: callers pass the workouts and the evaluation
//! date, nothing reads a clock or touches storage.

use chrono::{Datelike, Months, NaiveDate};
use gymtask_core::{
    AssignmentId, Celebration, DayOfWeek, ProgressSnapshot, Time, WeeklySummary, Workout,
    WorkoutId,
};
use gymtask_storage::StorageError;
use serde::{Deserialize, Serialize};

/// Error type for progress operations.
pub type Result<T> = std::result::Result<T, ProgressError>;

/// Errors raised while evaluating or updating progress.
#[derive(Debug, thiserror::Error)]
pub enum ProgressError {
    /// The assignment is not part of the workout.
    #[error("Exercise {assignment} not found in workout {workout}")]
    ExerciseNotFound {
        /// Workout searched
        workout: WorkoutId,
        /// Missing assignment
        assignment: AssignmentId,
    },

    /// The workout does not exist (or belongs to someone else).
    #[error("Workout not found: {0}")]
    WorkoutNotFound(WorkoutId),

    /// Rejected input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Storage failure
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Tunables for progress evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluatorConfig {
    /// Monthly completion counts when the evaluation day is within this many
    /// days of the month's last day.
    pub month_end_window_days: u32,

    /// Calories credited per completed exercise in summaries.
    pub calories_per_exercise: u32,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            month_end_window_days: 2,
            calories_per_exercise: 50,
        }
    }
}

/// Set one exercise's completion flag, returning the updated workout.
///
/// Only the matching assignment changes; the workout-level flags are left to
/// [`apply_completion_policy`]. The input is never modified.
pub fn toggle_exercise_completion(
    workout: &Workout,
    assignment_id: AssignmentId,
    completed: bool,
) -> Result<Workout> {
    if workout.assignment(assignment_id).is_none() {
        return Err(ProgressError::ExerciseNotFound {
            workout: workout.id,
            assignment: assignment_id,
        });
    }

    let mut updated = workout.clone();
    if let Some(exercise) = updated.assignment_mut(assignment_id) {
        exercise.completed = completed;
    }
    Ok(updated)
}

/// True when the workout has exercises and every one is ticked.
pub fn is_workout_fully_completed(workout: &Workout) -> bool {
    !workout.exercises.is_empty() && workout.exercises.iter().all(|e| e.completed)
}

/// Recompute the workout-level completion flags from exercise state.
///
/// `completed` becomes `auto_completed || coach_completed`. `completed_at` is
/// stamped with `now` when the workout becomes completed and cleared when it
/// stops being completed. Returns whether `completed` changed.
pub fn apply_completion_policy(workout: &mut Workout, now: Time) -> bool {
    let was_completed = workout.completed;

    workout.auto_completed = is_workout_fully_completed(workout);
    workout.completed = workout.auto_completed || workout.coach_completed;

    match (was_completed, workout.completed) {
        (false, true) => workout.completed_at = Some(now),
        (true, false) => workout.completed_at = None,
        _ => {}
    }
    if was_completed != workout.completed {
        workout.updated_at = now;
    }
    was_completed != workout.completed
}

/// Coach override: mark the workout completed regardless of exercise state.
pub fn mark_completed_by_coach(workout: &mut Workout, now: Time) -> bool {
    workout.coach_completed = true;
    apply_completion_policy(workout, now)
}

/// Drop the coach override; completion falls back to exercise state.
pub fn clear_coach_completion(workout: &mut Workout, now: Time) -> bool {
    workout.coach_completed = false;
    apply_completion_policy(workout, now)
}

/// The workout scheduled for `day`, if any.
///
/// The store keeps at most one workout per (student, day), so the first
/// match is the only one.
pub fn select_workout_for_day(workouts: &[Workout], day: DayOfWeek) -> Option<&Workout> {
    workouts.iter().find(|w| w.day == day)
}

/// Last day-of-month number for the month containing `date`.
pub fn last_day_of_month(date: NaiveDate) -> u32 {
    date.with_day(1)
        .and_then(|first| first.checked_add_months(Months::new(1)))
        .and_then(|next| next.pred_opt())
        .map(|last| last.day())
        .unwrap_or(31)
}

/// Achievements that are true in `current` but were not in `previous`.
pub fn celebrations(previous: &ProgressSnapshot, current: &ProgressSnapshot) -> Vec<Celebration> {
    let mut unlocked = Vec::new();
    if current.daily_completed && !previous.daily_completed {
        unlocked.push(Celebration::Daily);
    }
    if current.weekly_completed && !previous.weekly_completed {
        unlocked.push(Celebration::Weekly);
    }
    if current.monthly_completed && !previous.monthly_completed {
        unlocked.push(Celebration::Monthly);
    }
    unlocked
}

/// Evaluate progress with the default configuration.
pub fn evaluate_progress(workouts: &[Workout], as_of: NaiveDate) -> ProgressSnapshot {
    ProgressEvaluator::default().evaluate(workouts, as_of)
}

/// Rolls a student's workouts up into achievement flags and summaries.
#[derive(Debug, Clone, Default)]
pub struct ProgressEvaluator {
    config: EvaluatorConfig,
}

impl ProgressEvaluator {
    /// Create an evaluator with the given configuration.
    pub fn new(config: EvaluatorConfig) -> Self {
        Self { config }
    }

    /// Compute the daily/weekly/monthly snapshot as of `as_of` (UTC day).
    pub fn evaluate(&self, workouts: &[Workout], as_of: NaiveDate) -> ProgressSnapshot {
        let daily_completed = workouts.iter().any(|w| {
            w.completed && w.completed_at.is_some_and(|at| at.date_naive() == as_of)
        });

        // An empty week is never complete.
        let weekly_completed = !workouts.is_empty() && workouts.iter().all(|w| w.completed);

        let month_end = last_day_of_month(as_of);
        let monthly_completed = weekly_completed
            && as_of.day() >= month_end.saturating_sub(self.config.month_end_window_days);

        let stamp = |flag: bool| if flag { Some(as_of) } else { None };
        ProgressSnapshot {
            daily_completed,
            weekly_completed,
            monthly_completed,
            last_daily_completed: stamp(daily_completed),
            last_weekly_completed: stamp(weekly_completed),
            last_monthly_completed: stamp(monthly_completed),
        }
    }

    /// Aggregate workout and exercise counts for the week.
    pub fn summarize(&self, workouts: &[Workout]) -> WeeklySummary {
        let total_workouts = workouts.len();
        let completed_workouts = workouts.iter().filter(|w| w.completed).count();
        let total_exercises: usize = workouts.iter().map(|w| w.exercises.len()).sum();
        let completed_exercises: usize = workouts.iter().map(|w| w.completed_exercises()).sum();

        let completion_percentage = if total_exercises > 0 {
            ((completed_exercises as f64 / total_exercises as f64) * 100.0).round() as u32
        } else {
            0
        };

        WeeklySummary {
            completed_workouts,
            total_workouts,
            completed_exercises,
            total_exercises,
            completion_percentage,
            estimated_calories: completed_exercises as u32 * self.config.calories_per_exercise,
        }
    }
}
