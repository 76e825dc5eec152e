//! Input validation for coach forms.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::{CoachError, Result};
use crate::manager::WorkoutSpec;

fn email_pattern() -> Result<&'static Regex> {
    static EMAIL: OnceLock<std::result::Result<Regex, regex::Error>> = OnceLock::new();
    EMAIL
        .get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$"))
        .as_ref()
        .map_err(|e| CoachError::Validation(e.to_string()))
}

/// Require a non-blank value, returning it trimmed.
pub fn require_text(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CoachError::Validation(format!("{field} must not be empty")));
    }
    Ok(trimmed.to_string())
}

/// Validate and normalize an email address (trimmed, lowercased).
pub fn normalize_email(email: &str) -> Result<String> {
    let email = email.trim().to_lowercase();
    if !email_pattern()?.is_match(&email) {
        return Err(CoachError::Validation(format!("invalid email address: {email}")));
    }
    Ok(email)
}

/// Check a workout form: a name, at least one exercise, positive sets and reps.
///
/// Catalog membership is checked by the service, which has storage access.
pub fn validate_workout_spec(spec: &WorkoutSpec) -> Result<()> {
    require_text("workout name", &spec.name)?;

    if spec.exercises.is_empty() {
        return Err(CoachError::Validation("add at least one exercise".to_string()));
    }
    for (index, exercise) in spec.exercises.iter().enumerate() {
        if exercise.sets == 0 || exercise.reps == 0 {
            return Err(CoachError::Validation(format!(
                "exercise #{} needs at least one set and one rep",
                index + 1
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manager::AssignmentSpec;
    use gymtask_core::ExerciseId;

    #[test]
    fn test_email_validation() {
        assert_eq!(normalize_email("  Ana@Example.com ").unwrap(), "ana@example.com");
        assert!(normalize_email("ana@example").is_err());
        assert!(normalize_email("ana example@x.com").is_err());
        assert!(normalize_email("").is_err());
    }

    #[test]
    fn test_workout_spec_rules() {
        let mut spec = WorkoutSpec {
            name: "Full body".to_string(),
            exercises: vec![],
        };
        assert!(validate_workout_spec(&spec).is_err());

        spec.exercises.push(AssignmentSpec::new(ExerciseId::new(), 3, 0));
        assert!(validate_workout_spec(&spec).is_err());

        spec.exercises[0].reps = 12;
        assert!(validate_workout_spec(&spec).is_ok());

        spec.name = "   ".to_string();
        assert!(validate_workout_spec(&spec).is_err());
    }
}
