//! Reusable workout templates.

use serde::{Deserialize, Serialize};
use crate::day::DayOfWeek;
use crate::id::{StudentId, TemplateId};
use crate::workout::{ExerciseAssignment, Workout};
use crate::Time;

/// A named exercise list a coach can stamp onto any student's day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutTemplate {
    /// Unique identifier
    pub id: TemplateId,

    /// Template name
    pub name: String,

    /// Optional description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Prescribed exercises
    pub exercises: Vec<ExerciseAssignment>,

    /// When created
    pub created_at: Time,

    /// Coach who created it
    pub created_by: StudentId,
}

impl WorkoutTemplate {
    /// Capture a workout's prescription as a template.
    pub fn from_workout(
        workout: &Workout,
        name: impl Into<String>,
        description: Option<String>,
        created_by: StudentId,
    ) -> Self {
        Self {
            id: TemplateId::new(),
            name: name.into(),
            description,
            exercises: workout.exercises.iter().map(ExerciseAssignment::fresh_copy).collect(),
            created_at: chrono::Utc::now(),
            created_by,
        }
    }

    /// Instantiate a new workout from this template.
    pub fn instantiate(&self, student_id: StudentId, day: DayOfWeek) -> Workout {
        Workout::new(
            student_id,
            self.name.clone(),
            day,
            self.exercises.iter().map(ExerciseAssignment::fresh_copy).collect(),
        )
    }
}
