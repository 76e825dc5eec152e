//! Derived progress types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Daily/weekly/monthly achievement flags computed from a student's workouts.
///
/// Never persisted authoritatively; recomputed after every load and mutation.
/// A flag that is false carries no date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    /// A workout was completed on the evaluation day
    pub daily_completed: bool,

    /// Every assigned workout is completed
    pub weekly_completed: bool,

    /// Weekly completion reached near the end of the month
    pub monthly_completed: bool,

    /// Evaluation day, when `daily_completed`
    pub last_daily_completed: Option<NaiveDate>,

    /// Evaluation day, when `weekly_completed`
    pub last_weekly_completed: Option<NaiveDate>,

    /// Evaluation day, when `monthly_completed`
    pub last_monthly_completed: Option<NaiveDate>,
}

/// An achievement that just became true.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Celebration {
    /// Today's workout done
    Daily,
    /// Whole week done
    Weekly,
    /// Month closed out
    Monthly,
}

impl Celebration {
    /// Short message shown to the student.
    pub fn message(&self) -> &'static str {
        match self {
            Celebration::Daily => "Workout of the day complete!",
            Celebration::Weekly => "Every workout this week is done!",
            Celebration::Monthly => "You closed out the month!",
        }
    }
}

/// Aggregate counts for a student's week.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeeklySummary {
    /// Workouts completed
    pub completed_workouts: usize,

    /// Workouts assigned
    pub total_workouts: usize,

    /// Exercise assignments ticked
    pub completed_exercises: usize,

    /// Exercise assignments across all workouts
    pub total_exercises: usize,

    /// Ticked exercises as a rounded percentage (0-100)
    pub completion_percentage: u32,

    /// Rough calorie estimate
    pub estimated_calories: u32,
}
