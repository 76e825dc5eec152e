//! Unique identifiers for GymTask entities.

use serde::{Deserialize, Serialize};
use ulid::Ulid;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(Ulid);

        impl $name {
            /// Generate a new identifier
            pub fn new() -> Self {
                Self(Ulid::new())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                self.0.fmt(f)
            }
        }

        impl std::str::FromStr for $name {
            type Err = ulid::DecodeError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.parse()?))
            }
        }
    };
}

entity_id!(
    /// Unique identifier for a Student (or coach) account
    StudentId
);

entity_id!(
    /// Unique identifier for a catalog Exercise
    ExerciseId
);

entity_id!(
    /// Unique identifier for a Workout
    WorkoutId
);

entity_id!(
    /// Unique identifier for an exercise assignment inside a workout
    AssignmentId
);

entity_id!(
    /// Unique identifier for a WorkoutTemplate
    TemplateId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_display_roundtrip() {
        let id = WorkoutId::new();
        let parsed: WorkoutId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_invalid_id_rejected() {
        assert!("not-a-ulid".parse::<StudentId>().is_err());
    }
}
