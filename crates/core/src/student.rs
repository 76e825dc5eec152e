//! Student directory model.

use serde::{Deserialize, Serialize};
use crate::id::StudentId;
use crate::Time;

/// A person with access to GymTask.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    /// Unique identifier
    pub id: StudentId,

    /// Display name
    pub name: String,

    /// Contact email, unique across the directory
    pub email: String,

    /// Access role
    pub role: Role,

    /// When created
    pub created_at: Time,
}

/// Access role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Views and completes assigned workouts
    Student,
    /// Coach: manages students, exercises and workouts
    Admin,
}

impl Student {
    /// Create a new student account.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self::with_role(name, email, Role::Student)
    }

    /// Create a new coach account.
    pub fn coach(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self::with_role(name, email, Role::Admin)
    }

    fn with_role(name: impl Into<String>, email: impl Into<String>, role: Role) -> Self {
        Self {
            id: StudentId::new(),
            name: name.into(),
            email: email.into(),
            role,
            created_at: chrono::Utc::now(),
        }
    }

    /// Whether this account can manage the roster.
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roles() {
        assert!(!Student::new("Ana", "ana@example.com").is_admin());

        let coach = Student::coach("Carla", "carla@example.com");
        assert!(coach.is_admin());
        let json = serde_json::to_value(&coach).unwrap();
        assert_eq!(json["role"], "admin");
    }
}
