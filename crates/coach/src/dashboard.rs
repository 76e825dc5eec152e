//! Admin dashboard statistics.

use std::collections::HashMap;
use std::sync::Arc;

use gymtask_core::{Exercise, Role, Student, Time};
use gymtask_storage::Storage;
use serde::Serialize;
use tokio::sync::Mutex;

use crate::error::Result;

/// Headline counts for the admin dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    /// Accounts with the student role
    pub student_count: usize,

    /// Catalog size
    pub exercise_count: usize,

    /// Workouts across all students
    pub workout_count: usize,

    /// When computed
    pub generated_at: Time,
}

/// A student ranked by assigned workouts.
#[derive(Debug, Clone, Serialize)]
pub struct StudentActivity {
    /// Ranked student
    pub student: Student,
    /// Workouts assigned to them
    pub workouts: usize,
}

/// An exercise ranked by how many assignments use it.
#[derive(Debug, Clone, Serialize)]
pub struct ExercisePopularity {
    /// Ranked exercise
    pub exercise: Exercise,
    /// Assignments referencing it
    pub assignments: usize,
}

/// Read-only dashboard queries.
pub struct Dashboard<S: Storage> {
    storage: Arc<Mutex<S>>,
}

impl<S: Storage> Dashboard<S> {
    /// Create a dashboard over shared storage.
    pub fn new(storage: Arc<Mutex<S>>) -> Self {
        Self { storage }
    }

    /// Headline counts.
    pub async fn stats(&self) -> Result<DashboardStats> {
        let storage = self.storage.lock().await;
        let student_count = storage
            .list_students()
            .await?
            .iter()
            .filter(|s| s.role == Role::Student)
            .count();

        Ok(DashboardStats {
            student_count,
            exercise_count: storage.list_exercises().await?.len(),
            workout_count: storage.list_workouts().await?.len(),
            generated_at: chrono::Utc::now(),
        })
    }

    /// Students with the most assigned workouts, busiest first.
    pub async fn top_active_students(&self, limit: usize) -> Result<Vec<StudentActivity>> {
        let storage = self.storage.lock().await;

        let mut counts = HashMap::new();
        for workout in storage.list_workouts().await? {
            *counts.entry(workout.student_id).or_insert(0usize) += 1;
        }

        let mut ranked: Vec<StudentActivity> = storage
            .list_students()
            .await?
            .into_iter()
            .filter_map(|student| {
                let workouts = counts.get(&student.id).copied()?;
                Some(StudentActivity { student, workouts })
            })
            .collect();
        ranked.sort_by(|a, b| {
            b.workouts
                .cmp(&a.workouts)
                .then_with(|| a.student.name.cmp(&b.student.name))
        });
        ranked.truncate(limit);
        Ok(ranked)
    }

    /// Exercises used by the most assignments, most popular first.
    pub async fn popular_exercises(&self, limit: usize) -> Result<Vec<ExercisePopularity>> {
        let storage = self.storage.lock().await;

        let mut counts = HashMap::new();
        for workout in storage.list_workouts().await? {
            for assignment in &workout.exercises {
                *counts.entry(assignment.exercise_id).or_insert(0usize) += 1;
            }
        }

        let mut ranked: Vec<ExercisePopularity> = storage
            .list_exercises()
            .await?
            .into_iter()
            .filter_map(|exercise| {
                let assignments = counts.get(&exercise.id).copied()?;
                Some(ExercisePopularity { exercise, assignments })
            })
            .collect();
        ranked.sort_by(|a, b| {
            b.assignments
                .cmp(&a.assignments)
                .then_with(|| a.exercise.name.cmp(&b.exercise.name))
        });
        ranked.truncate(limit);
        Ok(ranked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manager::{AssignmentSpec, BasicCoachService, CoachService, NewExercise, WorkoutSpec};
    use gymtask_core::DayOfWeek;
    use gymtask_storage::JsonStorage;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_rankings() {
        let dir = TempDir::new().unwrap();
        let service = BasicCoachService::new(JsonStorage::new(dir.path()).await.unwrap());

        let ana = service.create_student("Ana", "ana@example.com").await.unwrap();
        let bruno = service.create_student("Bruno", "bruno@example.com").await.unwrap();
        service.create_student("Caio", "caio@example.com").await.unwrap();

        let squat = service
            .create_exercise(NewExercise {
                name: "Squat".to_string(),
                muscle_group: "legs".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();
        let press = service
            .create_exercise(NewExercise {
                name: "Press".to_string(),
                muscle_group: "shoulders".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();

        let legs = |name: &str| WorkoutSpec {
            name: name.to_string(),
            exercises: vec![AssignmentSpec::new(squat.id, 3, 10)],
        };
        service.assign_workout(ana.id, DayOfWeek::Monday, legs("A"), false).await.unwrap();
        service.assign_workout(ana.id, DayOfWeek::Friday, legs("B"), false).await.unwrap();
        service
            .assign_workout(
                bruno.id,
                DayOfWeek::Monday,
                WorkoutSpec {
                    name: "C".to_string(),
                    exercises: vec![
                        AssignmentSpec::new(squat.id, 3, 10),
                        AssignmentSpec::new(press.id, 3, 8),
                    ],
                },
                false,
            )
            .await
            .unwrap();

        let dashboard = Dashboard::new(service.storage());

        let stats = dashboard.stats().await.unwrap();
        assert_eq!(stats.student_count, 3);
        assert_eq!(stats.exercise_count, 2);
        assert_eq!(stats.workout_count, 3);

        let top = dashboard.top_active_students(5).await.unwrap();
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].student.id, ana.id);
        assert_eq!(top[0].workouts, 2);

        let popular = dashboard.popular_exercises(1).await.unwrap();
        assert_eq!(popular.len(), 1);
        assert_eq!(popular[0].exercise.id, squat.id);
        assert_eq!(popular[0].assignments, 3);
    }
}
