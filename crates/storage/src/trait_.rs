//! Storage trait abstraction.

use async_trait::async_trait;
use gymtask_core::{
    DayOfWeek, Exercise, ExerciseId, Student, StudentId, Workout, WorkoutId, WorkoutTemplate,
    TemplateId,
};

/// Error type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Item not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// A different workout already occupies this student's day
    #[error("Student {student} already has workout {existing} on {day}")]
    DuplicateDay {
        /// Owning student
        student: StudentId,
        /// Contested day
        day: DayOfWeek,
        /// Workout currently holding the slot
        existing: WorkoutId,
    },
}

/// Workout records, keyed by student and day-of-week.
///
/// Implementations must guarantee at most one workout per (student, day).
#[async_trait]
pub trait WorkoutStore: Send + Sync {
    /// Save a workout (create or full replace).
    async fn save_workout(&mut self, workout: &Workout) -> Result<()>;

    /// Load a workout by ID.
    async fn load_workout(&self, id: WorkoutId) -> Result<Option<Workout>>;

    /// List every workout.
    async fn list_workouts(&self) -> Result<Vec<Workout>>;

    /// List one student's workouts, ordered by day.
    async fn list_workouts_for_student(&self, student_id: StudentId) -> Result<Vec<Workout>>;

    /// Delete a workout. Fails with `NotFound` if it does not exist.
    async fn delete_workout(&mut self, id: WorkoutId) -> Result<()>;
}

/// Exercise catalog.
#[async_trait]
pub trait ExerciseCatalog: Send + Sync {
    /// Save an exercise (create or update).
    async fn save_exercise(&mut self, exercise: &Exercise) -> Result<()>;

    /// Look up an exercise.
    async fn get_exercise(&self, id: ExerciseId) -> Result<Option<Exercise>>;

    /// List all exercises, ordered by name.
    async fn list_exercises(&self) -> Result<Vec<Exercise>>;

    /// Delete an exercise. Fails with `NotFound` if it does not exist.
    async fn delete_exercise(&mut self, id: ExerciseId) -> Result<()>;
}

/// Student directory.
#[async_trait]
pub trait StudentDirectory: Send + Sync {
    /// Save a student (create or update).
    async fn save_student(&mut self, student: &Student) -> Result<()>;

    /// Look up a student.
    async fn get_student(&self, id: StudentId) -> Result<Option<Student>>;

    /// List all accounts, ordered by name.
    async fn list_students(&self) -> Result<Vec<Student>>;

    /// Delete a student. Fails with `NotFound` if it does not exist.
    async fn delete_student(&mut self, id: StudentId) -> Result<()>;
}

/// Workout templates.
#[async_trait]
pub trait TemplateStore: Send + Sync {
    /// Save a template.
    async fn save_template(&mut self, template: &WorkoutTemplate) -> Result<()>;

    /// Load a template by ID.
    async fn load_template(&self, id: TemplateId) -> Result<Option<WorkoutTemplate>>;

    /// List all templates.
    async fn list_templates(&self) -> Result<Vec<WorkoutTemplate>>;

    /// Delete a template. Fails with `NotFound` if it does not exist.
    async fn delete_template(&mut self, id: TemplateId) -> Result<()>;
}

/// Full storage backend.
///
/// Blanket-implemented for anything providing all four stores.
pub trait Storage: WorkoutStore + ExerciseCatalog + StudentDirectory + TemplateStore {}

impl<T> Storage for T where T: WorkoutStore + ExerciseCatalog + StudentDirectory + TemplateStore {}
