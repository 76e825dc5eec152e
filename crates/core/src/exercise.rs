//! Exercise catalog entry.

use serde::{Deserialize, Serialize};
use crate::id::ExerciseId;

/// A catalog exercise. Used for display only; completion state lives on
/// the assignment inside a workout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    /// Unique identifier
    pub id: ExerciseId,

    /// Exercise name
    pub name: String,

    /// Primary muscle group (free text, e.g. "chest")
    pub muscle_group: String,

    /// How to perform it
    pub instructions: String,

    /// Illustration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    /// Demonstration video
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
}

impl Exercise {
    /// Create a new catalog exercise.
    pub fn new(
        name: impl Into<String>,
        muscle_group: impl Into<String>,
        instructions: impl Into<String>,
    ) -> Self {
        Self {
            id: ExerciseId::new(),
            name: name.into(),
            muscle_group: muscle_group.into(),
            instructions: instructions.into(),
            image_url: None,
            video_url: None,
        }
    }
}
