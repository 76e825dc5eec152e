//! Coach management service.

use std::sync::Arc;

use async_trait::async_trait;
use gymtask_core::{
    DayOfWeek, Exercise, ExerciseAssignment, ExerciseId, Role, Student, StudentId, TemplateId,
    Time, Workout, WorkoutId, WorkoutTemplate,
};
use gymtask_progress::{clear_coach_completion, mark_completed_by_coach};
use gymtask_storage::Storage;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::error::{CoachError, Result};
use crate::validation::{normalize_email, require_text, validate_workout_spec};

/// Coach-side management of the roster, catalog, workouts and templates.
#[async_trait]
pub trait CoachService: Send + Sync {
    /// Register a new student.
    async fn create_student(&self, name: &str, email: &str) -> Result<Student>;

    /// Change a student's name and/or email.
    async fn update_student(
        &self,
        id: StudentId,
        name: Option<&str>,
        email: Option<&str>,
    ) -> Result<Student>;

    /// Remove a student and every workout assigned to them.
    /// Returns the number of workouts removed.
    async fn delete_student(&self, id: StudentId) -> Result<usize>;

    /// Accounts with the student role.
    async fn list_students(&self) -> Result<Vec<Student>>;

    /// Register a coach account. Coaches author templates.
    async fn create_coach(&self, name: &str, email: &str) -> Result<Student>;

    /// Accounts with the admin role.
    async fn list_coaches(&self) -> Result<Vec<Student>>;

    /// Add an exercise to the catalog.
    async fn create_exercise(&self, exercise: NewExercise) -> Result<Exercise>;

    /// Replace a catalog exercise.
    async fn update_exercise(&self, exercise: Exercise) -> Result<Exercise>;

    /// Remove an exercise no workout references.
    async fn delete_exercise(&self, id: ExerciseId) -> Result<()>;

    /// Assign a workout to a student's day. An occupied day is overwritten
    /// in place when `replace` is set, otherwise rejected.
    async fn assign_workout(
        &self,
        student_id: StudentId,
        day: DayOfWeek,
        spec: WorkoutSpec,
        replace: bool,
    ) -> Result<Workout>;

    /// Change a workout's name and exercises.
    async fn update_workout(&self, id: WorkoutId, spec: WorkoutSpec) -> Result<Workout>;

    /// Copy a workout to another student/day.
    async fn duplicate_workout(
        &self,
        id: WorkoutId,
        student_id: StudentId,
        day: DayOfWeek,
        replace: bool,
    ) -> Result<Workout>;

    /// Delete a workout.
    async fn delete_workout(&self, id: WorkoutId) -> Result<()>;

    /// Set or clear the coach completion override.
    async fn set_coach_completion(&self, id: WorkoutId, completed: bool, now: Time)
        -> Result<Workout>;

    /// Capture a workout as a reusable template. `created_by` must be a coach.
    async fn save_as_template(
        &self,
        workout_id: WorkoutId,
        name: &str,
        description: Option<String>,
        created_by: StudentId,
    ) -> Result<WorkoutTemplate>;

    /// Create a workout from a template.
    async fn apply_template(
        &self,
        template_id: TemplateId,
        student_id: StudentId,
        day: DayOfWeek,
        replace: bool,
    ) -> Result<Workout>;

    /// Delete a template.
    async fn delete_template(&self, id: TemplateId) -> Result<()>;
}

/// Form data for a workout.
#[derive(Debug, Clone)]
pub struct WorkoutSpec {
    /// Workout name
    pub name: String,
    /// Ordered exercises
    pub exercises: Vec<AssignmentSpec>,
}

/// Form data for one exercise inside a workout.
#[derive(Debug, Clone)]
pub struct AssignmentSpec {
    /// Catalog exercise
    pub exercise_id: ExerciseId,
    /// Set count
    pub sets: u32,
    /// Reps per set
    pub reps: u32,
    /// Coach note
    pub notes: Option<String>,
}

impl AssignmentSpec {
    /// Prescription without notes.
    pub fn new(exercise_id: ExerciseId, sets: u32, reps: u32) -> Self {
        Self {
            exercise_id,
            sets,
            reps,
            notes: None,
        }
    }

    fn into_assignment(self) -> ExerciseAssignment {
        let mut assignment = ExerciseAssignment::new(self.exercise_id, self.sets, self.reps);
        assignment.notes = self.notes.filter(|n| !n.trim().is_empty());
        assignment
    }
}

/// Form data for a catalog exercise.
#[derive(Debug, Clone, Default)]
pub struct NewExercise {
    /// Exercise name
    pub name: String,
    /// Primary muscle group
    pub muscle_group: String,
    /// How to perform it
    pub instructions: String,
    /// Illustration
    pub image_url: Option<String>,
    /// Demonstration video
    pub video_url: Option<String>,
}

/// Basic coach service implementation.
pub struct BasicCoachService<S: Storage> {
    storage: Arc<Mutex<S>>,
}

impl<S: Storage> BasicCoachService<S> {
    /// Create a new coach service.
    pub fn new(storage: S) -> Self {
        Self::with_shared(Arc::new(Mutex::new(storage)))
    }

    /// Create a coach service over storage shared with other services.
    pub fn with_shared(storage: Arc<Mutex<S>>) -> Self {
        Self { storage }
    }

    /// Shared storage handle.
    pub fn storage(&self) -> Arc<Mutex<S>> {
        Arc::clone(&self.storage)
    }
}

/// Reject assignments that reference exercises missing from the catalog.
async fn ensure_in_catalog<S: Storage>(storage: &S, spec: &WorkoutSpec) -> Result<()> {
    for exercise in &spec.exercises {
        if storage.get_exercise(exercise.exercise_id).await?.is_none() {
            return Err(CoachError::Validation(format!(
                "exercise {} is not in the catalog",
                exercise.exercise_id
            )));
        }
    }
    Ok(())
}

async fn ensure_student<S: Storage>(storage: &S, id: StudentId) -> Result<Student> {
    storage
        .get_student(id)
        .await?
        .ok_or_else(|| CoachError::NotFound(format!("student {id}")))
}

async fn load_workout<S: Storage>(storage: &S, id: WorkoutId) -> Result<Workout> {
    storage
        .load_workout(id)
        .await?
        .ok_or_else(|| CoachError::NotFound(format!("workout {id}")))
}

/// Place `workout` on its student's day, clearing an occupied slot first when
/// `replace` is set.
async fn place_workout<S: Storage>(storage: &mut S, workout: &Workout, replace: bool) -> Result<()> {
    let existing = storage
        .list_workouts_for_student(workout.student_id)
        .await?
        .into_iter()
        .find(|w| w.day == workout.day && w.id != workout.id);

    if let Some(existing) = existing {
        if !replace {
            return Err(gymtask_storage::StorageError::DuplicateDay {
                student: workout.student_id,
                day: workout.day,
                existing: existing.id,
            }
            .into());
        }
        info!("Replacing workout {} on {} for {}", existing.id, workout.day, workout.student_id);
        storage.delete_workout(existing.id).await?;
    }

    storage.save_workout(workout).await?;
    Ok(())
}

/// Create an account after checking the name and that the email is free.
async fn register<S: Storage>(storage: &mut S, name: &str, email: &str, role: Role) -> Result<Student> {
    let name = require_text("name", name)?;
    let email = normalize_email(email)?;

    let taken = storage
        .list_students()
        .await?
        .iter()
        .any(|s| s.email.eq_ignore_ascii_case(&email));
    if taken {
        return Err(CoachError::Validation(format!("email already registered: {email}")));
    }

    let account = match role {
        Role::Student => Student::new(name, email),
        Role::Admin => Student::coach(name, email),
    };
    storage.save_student(&account).await?;
    info!("Created {:?} account {} ({})", role, account.id, account.email);
    Ok(account)
}

#[async_trait]
impl<S: Storage + 'static> CoachService for BasicCoachService<S> {
    async fn create_student(&self, name: &str, email: &str) -> Result<Student> {
        let mut storage = self.storage.lock().await;
        register(&mut *storage, name, email, Role::Student).await
    }

    async fn update_student(
        &self,
        id: StudentId,
        name: Option<&str>,
        email: Option<&str>,
    ) -> Result<Student> {
        let mut storage = self.storage.lock().await;
        let mut student = ensure_student(&*storage, id).await?;

        if let Some(name) = name {
            student.name = require_text("name", name)?;
        }
        if let Some(email) = email {
            let email = normalize_email(email)?;
            let taken = storage
                .list_students()
                .await?
                .iter()
                .any(|s| s.id != id && s.email.eq_ignore_ascii_case(&email));
            if taken {
                return Err(CoachError::Validation(format!("email already registered: {email}")));
            }
            student.email = email;
        }

        storage.save_student(&student).await?;
        Ok(student)
    }

    async fn delete_student(&self, id: StudentId) -> Result<usize> {
        let mut storage = self.storage.lock().await;
        ensure_student(&*storage, id).await?;

        let workouts = storage.list_workouts_for_student(id).await?;
        for workout in &workouts {
            storage.delete_workout(workout.id).await?;
        }
        storage.delete_student(id).await?;

        info!("Deleted student {} and {} workouts", id, workouts.len());
        Ok(workouts.len())
    }

    async fn list_students(&self) -> Result<Vec<Student>> {
        let students = self.storage.lock().await.list_students().await?;
        Ok(students.into_iter().filter(|s| s.role == Role::Student).collect())
    }

    async fn create_coach(&self, name: &str, email: &str) -> Result<Student> {
        let mut storage = self.storage.lock().await;
        register(&mut *storage, name, email, Role::Admin).await
    }

    async fn list_coaches(&self) -> Result<Vec<Student>> {
        let accounts = self.storage.lock().await.list_students().await?;
        Ok(accounts.into_iter().filter(Student::is_admin).collect())
    }

    async fn create_exercise(&self, exercise: NewExercise) -> Result<Exercise> {
        let mut created = Exercise::new(
            require_text("exercise name", &exercise.name)?,
            require_text("muscle group", &exercise.muscle_group)?,
            exercise.instructions.trim(),
        );
        created.image_url = exercise.image_url.filter(|u| !u.trim().is_empty());
        created.video_url = exercise.video_url.filter(|u| !u.trim().is_empty());

        self.storage.lock().await.save_exercise(&created).await?;
        debug!("Created exercise {} ({})", created.id, created.name);
        Ok(created)
    }

    async fn update_exercise(&self, mut exercise: Exercise) -> Result<Exercise> {
        exercise.name = require_text("exercise name", &exercise.name)?;
        exercise.muscle_group = require_text("muscle group", &exercise.muscle_group)?;
        exercise.instructions = exercise.instructions.trim().to_string();
        exercise.image_url = exercise.image_url.filter(|u| !u.trim().is_empty());
        exercise.video_url = exercise.video_url.filter(|u| !u.trim().is_empty());

        let mut storage = self.storage.lock().await;
        if storage.get_exercise(exercise.id).await?.is_none() {
            return Err(CoachError::NotFound(format!("exercise {}", exercise.id)));
        }
        storage.save_exercise(&exercise).await?;
        Ok(exercise)
    }

    async fn delete_exercise(&self, id: ExerciseId) -> Result<()> {
        let mut storage = self.storage.lock().await;

        let referenced = storage
            .list_workouts()
            .await?
            .iter()
            .filter(|w| w.exercises.iter().any(|e| e.exercise_id == id))
            .count();
        if referenced > 0 {
            warn!("Refusing to delete exercise {}: used by {} workouts", id, referenced);
            return Err(CoachError::InUse(format!(
                "exercise {id} is used by {referenced} workout(s)"
            )));
        }

        storage.delete_exercise(id).await?;
        Ok(())
    }

    async fn assign_workout(
        &self,
        student_id: StudentId,
        day: DayOfWeek,
        spec: WorkoutSpec,
        replace: bool,
    ) -> Result<Workout> {
        validate_workout_spec(&spec)?;

        let mut storage = self.storage.lock().await;
        ensure_student(&*storage, student_id).await?;
        ensure_in_catalog(&*storage, &spec).await?;

        let name = spec.name.trim().to_string();
        let exercises: Vec<_> = spec.exercises.into_iter().map(AssignmentSpec::into_assignment).collect();

        let existing = storage
            .list_workouts_for_student(student_id)
            .await?
            .into_iter()
            .find(|w| w.day == day);

        let workout = match existing {
            Some(current) if !replace => {
                return Err(CoachError::Storage(gymtask_storage::StorageError::DuplicateDay {
                    student: student_id,
                    day,
                    existing: current.id,
                }));
            }
            Some(mut current) => {
                // Same slot, same id: history stays, progress restarts.
                current.name = name;
                current.exercises = exercises;
                current.reset_progress();
                current.updated_at = chrono::Utc::now();
                info!("Replaced workout {} on {} for {}", current.id, day, student_id);
                current
            }
            None => Workout::new(student_id, name, day, exercises),
        };

        storage.save_workout(&workout).await?;
        debug!("Assigned workout {} to {} on {}", workout.id, student_id, day);
        Ok(workout)
    }

    async fn update_workout(&self, id: WorkoutId, spec: WorkoutSpec) -> Result<Workout> {
        validate_workout_spec(&spec)?;

        let mut storage = self.storage.lock().await;
        ensure_in_catalog(&*storage, &spec).await?;
        let mut workout = load_workout(&*storage, id).await?;

        workout.name = spec.name.trim().to_string();
        workout.exercises = spec.exercises.into_iter().map(AssignmentSpec::into_assignment).collect();
        workout.reset_progress();
        workout.updated_at = chrono::Utc::now();

        storage.save_workout(&workout).await?;
        Ok(workout)
    }

    async fn duplicate_workout(
        &self,
        id: WorkoutId,
        student_id: StudentId,
        day: DayOfWeek,
        replace: bool,
    ) -> Result<Workout> {
        let mut storage = self.storage.lock().await;
        let source = load_workout(&*storage, id).await?;
        ensure_student(&*storage, student_id).await?;

        let copy = source.duplicate_for(student_id, day);
        place_workout(&mut *storage, &copy, replace).await?;

        info!("Duplicated workout {} as {} for {} on {}", id, copy.id, student_id, day);
        Ok(copy)
    }

    async fn delete_workout(&self, id: WorkoutId) -> Result<()> {
        let mut storage = self.storage.lock().await;
        load_workout(&*storage, id).await?;
        storage.delete_workout(id).await?;
        Ok(())
    }

    async fn set_coach_completion(
        &self,
        id: WorkoutId,
        completed: bool,
        now: Time,
    ) -> Result<Workout> {
        let mut storage = self.storage.lock().await;
        let mut workout = load_workout(&*storage, id).await?;

        let changed = if completed {
            mark_completed_by_coach(&mut workout, now)
        } else {
            clear_coach_completion(&mut workout, now)
        };
        if changed {
            info!("Coach set workout {} completed={}", id, workout.completed);
        }

        storage.save_workout(&workout).await?;
        Ok(workout)
    }

    async fn save_as_template(
        &self,
        workout_id: WorkoutId,
        name: &str,
        description: Option<String>,
        created_by: StudentId,
    ) -> Result<WorkoutTemplate> {
        let name = require_text("template name", name)?;

        let mut storage = self.storage.lock().await;
        let author = ensure_student(&*storage, created_by).await?;
        if !author.is_admin() {
            return Err(CoachError::Validation(format!(
                "only coaches can save templates, {} is a student",
                author.name
            )));
        }
        let workout = load_workout(&*storage, workout_id).await?;
        let template = WorkoutTemplate::from_workout(
            &workout,
            name,
            description.filter(|d| !d.trim().is_empty()),
            created_by,
        );

        storage.save_template(&template).await?;
        info!("Saved template {} from workout {}", template.id, workout_id);
        Ok(template)
    }

    async fn apply_template(
        &self,
        template_id: TemplateId,
        student_id: StudentId,
        day: DayOfWeek,
        replace: bool,
    ) -> Result<Workout> {
        let mut storage = self.storage.lock().await;
        let template = storage
            .load_template(template_id)
            .await?
            .ok_or_else(|| CoachError::NotFound(format!("template {template_id}")))?;
        ensure_student(&*storage, student_id).await?;

        let workout = template.instantiate(student_id, day);
        place_workout(&mut *storage, &workout, replace).await?;
        Ok(workout)
    }

    async fn delete_template(&self, id: TemplateId) -> Result<()> {
        self.storage.lock().await.delete_template(id).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gymtask_storage::{JsonStorage, StorageError, WorkoutStore};
    use tempfile::TempDir;

    struct Fixture {
        _dir: TempDir,
        service: BasicCoachService<JsonStorage>,
        student: Student,
        squat: Exercise,
        row: Exercise,
    }

    async fn fixture() -> Fixture {
        let dir = TempDir::new().unwrap();
        let storage = JsonStorage::new(dir.path()).await.unwrap();
        let service = BasicCoachService::new(storage);

        let student = service.create_student("Ana Souza", "ana@example.com").await.unwrap();
        let squat = service
            .create_exercise(NewExercise {
                name: "Squat".to_string(),
                muscle_group: "legs".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();
        let row = service
            .create_exercise(NewExercise {
                name: "Barbell row".to_string(),
                muscle_group: "back".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();

        Fixture { _dir: dir, service, student, squat, row }
    }

    fn spec(name: &str, exercises: &[&Exercise]) -> WorkoutSpec {
        WorkoutSpec {
            name: name.to_string(),
            exercises: exercises.iter().map(|e| AssignmentSpec::new(e.id, 3, 10)).collect(),
        }
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let f = fixture().await;
        let err = f.service.create_student("Other", "ANA@example.com").await.unwrap_err();
        assert!(matches!(err, CoachError::Validation(_)));
    }

    #[tokio::test]
    async fn test_assign_requires_catalog_exercises() {
        let f = fixture().await;
        let bogus = Exercise::new("Ghost", "none", "");

        let err = f
            .service
            .assign_workout(f.student.id, DayOfWeek::Monday, spec("A", &[&bogus]), false)
            .await
            .unwrap_err();
        assert!(matches!(err, CoachError::Validation(_)));
    }

    #[tokio::test]
    async fn test_assign_same_day_needs_replace() {
        let f = fixture().await;
        let first = f
            .service
            .assign_workout(f.student.id, DayOfWeek::Monday, spec("A", &[&f.squat]), false)
            .await
            .unwrap();

        let err = f
            .service
            .assign_workout(f.student.id, DayOfWeek::Monday, spec("B", &[&f.row]), false)
            .await
            .unwrap_err();
        assert!(matches!(err, CoachError::Storage(StorageError::DuplicateDay { .. })));

        let replaced = f
            .service
            .assign_workout(f.student.id, DayOfWeek::Monday, spec("B", &[&f.row]), true)
            .await
            .unwrap();
        assert_eq!(replaced.id, first.id);
        assert_eq!(replaced.name, "B");
        assert_eq!(replaced.exercises[0].exercise_id, f.row.id);
    }

    #[tokio::test]
    async fn test_duplicate_to_occupied_day() {
        let f = fixture().await;
        let other = f.service.create_student("Bruno", "bruno@example.com").await.unwrap();

        let source = f
            .service
            .assign_workout(f.student.id, DayOfWeek::Monday, spec("Legs", &[&f.squat]), false)
            .await
            .unwrap();
        let occupied = f
            .service
            .assign_workout(other.id, DayOfWeek::Friday, spec("Back", &[&f.row]), false)
            .await
            .unwrap();

        assert!(f
            .service
            .duplicate_workout(source.id, other.id, DayOfWeek::Friday, false)
            .await
            .is_err());

        let copy = f
            .service
            .duplicate_workout(source.id, other.id, DayOfWeek::Friday, true)
            .await
            .unwrap();
        assert_eq!(copy.name, "Legs");

        let storage = f.service.storage();
        let storage = storage.lock().await;
        assert!(storage.load_workout(occupied.id).await.unwrap().is_none());
        let theirs = storage.list_workouts_for_student(other.id).await.unwrap();
        assert_eq!(theirs.len(), 1);
        assert_eq!(theirs[0].id, copy.id);
    }

    #[tokio::test]
    async fn test_exercise_in_use_cannot_be_deleted() {
        let f = fixture().await;
        f.service
            .assign_workout(f.student.id, DayOfWeek::Monday, spec("Legs", &[&f.squat]), false)
            .await
            .unwrap();

        let err = f.service.delete_exercise(f.squat.id).await.unwrap_err();
        assert!(matches!(err, CoachError::InUse(_)));
        f.service.delete_exercise(f.row.id).await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_student_removes_workouts() {
        let f = fixture().await;
        for day in [DayOfWeek::Monday, DayOfWeek::Thursday] {
            f.service
                .assign_workout(f.student.id, day, spec("Legs", &[&f.squat]), false)
                .await
                .unwrap();
        }

        assert_eq!(f.service.delete_student(f.student.id).await.unwrap(), 2);
        assert!(f.service.list_students().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_template_roundtrip() {
        let f = fixture().await;
        let coach = f.service.create_coach("Carla", "carla@example.com").await.unwrap().id;
        let source = f
            .service
            .assign_workout(f.student.id, DayOfWeek::Monday, spec("Full", &[&f.squat, &f.row]), false)
            .await
            .unwrap();

        let template = f
            .service
            .save_as_template(source.id, "Full body", Some("Beginner".to_string()), coach)
            .await
            .unwrap();
        let applied = f
            .service
            .apply_template(template.id, f.student.id, DayOfWeek::Saturday, false)
            .await
            .unwrap();

        assert_eq!(applied.name, "Full body");
        assert_eq!(applied.day, DayOfWeek::Saturday);
        assert_eq!(applied.exercises.len(), 2);
        assert_ne!(applied.exercises[0].id, source.exercises[0].id);
    }

    #[tokio::test]
    async fn test_only_coaches_save_templates() {
        let f = fixture().await;
        let source = f
            .service
            .assign_workout(f.student.id, DayOfWeek::Monday, spec("Legs", &[&f.squat]), false)
            .await
            .unwrap();

        let err = f
            .service
            .save_as_template(source.id, "Legs", None, f.student.id)
            .await
            .unwrap_err();
        assert!(matches!(err, CoachError::Validation(_)));

        let err = f
            .service
            .save_as_template(source.id, "Legs", None, StudentId::new())
            .await
            .unwrap_err();
        assert!(matches!(err, CoachError::NotFound(_)));

        let coach = f.service.create_coach("Carla", "carla@example.com").await.unwrap();
        let template = f.service.save_as_template(source.id, "Legs", None, coach.id).await.unwrap();
        assert_eq!(template.created_by, coach.id);
    }

    #[tokio::test]
    async fn test_coaches_listed_apart_from_students() {
        let f = fixture().await;
        let coach = f.service.create_coach("Carla", "carla@example.com").await.unwrap();
        assert!(coach.is_admin());

        let students = f.service.list_students().await.unwrap();
        assert_eq!(students.len(), 1);
        assert_eq!(students[0].id, f.student.id);

        let coaches = f.service.list_coaches().await.unwrap();
        assert_eq!(coaches.len(), 1);
        assert_eq!(coaches[0].id, coach.id);

        let err = f.service.create_coach("Dup", "ana@example.com").await.unwrap_err();
        assert!(matches!(err, CoachError::Validation(_)));
    }

    #[tokio::test]
    async fn test_update_student_email_must_stay_unique() {
        let f = fixture().await;
        let bruno = f.service.create_student("Bruno", "bruno@example.com").await.unwrap();

        let err = f
            .service
            .update_student(bruno.id, None, Some(" Ana@Example.com "))
            .await
            .unwrap_err();
        assert!(matches!(err, CoachError::Validation(_)));

        // Keeping one's own address is fine.
        let updated = f
            .service
            .update_student(f.student.id, Some("Ana S."), Some("ANA@example.com"))
            .await
            .unwrap();
        assert_eq!(updated.name, "Ana S.");
        assert_eq!(updated.email, "ana@example.com");
    }

    #[tokio::test]
    async fn test_update_exercise_rules() {
        let f = fixture().await;

        let missing = Exercise::new("Lunge", "legs", "");
        let err = f.service.update_exercise(missing).await.unwrap_err();
        assert!(matches!(err, CoachError::NotFound(_)));

        let mut blank = f.squat.clone();
        blank.name = "  ".to_string();
        let err = f.service.update_exercise(blank).await.unwrap_err();
        assert!(matches!(err, CoachError::Validation(_)));

        let mut no_group = f.squat.clone();
        no_group.muscle_group = String::new();
        let err = f.service.update_exercise(no_group).await.unwrap_err();
        assert!(matches!(err, CoachError::Validation(_)));

        let mut renamed = f.squat.clone();
        renamed.name = "  Back squat ".to_string();
        renamed.video_url = Some(" ".to_string());
        let saved = f.service.update_exercise(renamed).await.unwrap();
        assert_eq!(saved.name, "Back squat");
        assert_eq!(saved.video_url, None);
    }

    #[tokio::test]
    async fn test_update_workout_replaces_exercises_and_resets_progress() {
        let f = fixture().await;
        let workout = f
            .service
            .assign_workout(f.student.id, DayOfWeek::Monday, spec("Legs", &[&f.squat]), false)
            .await
            .unwrap();
        f.service
            .set_coach_completion(workout.id, true, chrono::Utc::now())
            .await
            .unwrap();

        let updated = f
            .service
            .update_workout(workout.id, spec(" Back day ", &[&f.row, &f.squat]))
            .await
            .unwrap();
        assert_eq!(updated.id, workout.id);
        assert_eq!(updated.name, "Back day");
        assert_eq!(updated.exercises.len(), 2);
        assert_eq!(updated.exercises[0].exercise_id, f.row.id);
        assert!(!updated.completed);
        assert!(!updated.coach_completed);
        assert!(updated.completed_at.is_none());

        let err = f
            .service
            .update_workout(WorkoutId::new(), spec("Legs", &[&f.squat]))
            .await
            .unwrap_err();
        assert!(matches!(err, CoachError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_apply_template_replaces_occupied_day() {
        let f = fixture().await;
        let coach = f.service.create_coach("Carla", "carla@example.com").await.unwrap();
        let source = f
            .service
            .assign_workout(f.student.id, DayOfWeek::Monday, spec("Back", &[&f.row]), false)
            .await
            .unwrap();
        let template = f
            .service
            .save_as_template(source.id, "Back", None, coach.id)
            .await
            .unwrap();
        let occupant = f
            .service
            .assign_workout(f.student.id, DayOfWeek::Friday, spec("Legs", &[&f.squat]), false)
            .await
            .unwrap();

        let err = f
            .service
            .apply_template(template.id, f.student.id, DayOfWeek::Friday, false)
            .await
            .unwrap_err();
        assert!(matches!(err, CoachError::Storage(StorageError::DuplicateDay { existing, .. }) if existing == occupant.id));

        let applied = f
            .service
            .apply_template(template.id, f.student.id, DayOfWeek::Friday, true)
            .await
            .unwrap();

        let storage = f.service.storage();
        let storage = storage.lock().await;
        assert!(storage.load_workout(occupant.id).await.unwrap().is_none());
        let friday: Vec<_> = storage
            .list_workouts_for_student(f.student.id)
            .await
            .unwrap()
            .into_iter()
            .filter(|w| w.day == DayOfWeek::Friday)
            .collect();
        assert_eq!(friday.len(), 1);
        assert_eq!(friday[0].id, applied.id);
        assert_eq!(friday[0].exercises[0].exercise_id, f.row.id);
    }

    #[tokio::test]
    async fn test_delete_template() {
        let f = fixture().await;
        let coach = f.service.create_coach("Carla", "carla@example.com").await.unwrap();
        let source = f
            .service
            .assign_workout(f.student.id, DayOfWeek::Monday, spec("Legs", &[&f.squat]), false)
            .await
            .unwrap();
        let template = f
            .service
            .save_as_template(source.id, "Legs", None, coach.id)
            .await
            .unwrap();

        f.service.delete_template(template.id).await.unwrap();

        let err = f
            .service
            .apply_template(template.id, f.student.id, DayOfWeek::Tuesday, false)
            .await
            .unwrap_err();
        assert!(matches!(err, CoachError::NotFound(_)));

        let err = f.service.delete_template(template.id).await.unwrap_err();
        assert!(matches!(err, CoachError::Storage(StorageError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_coach_completion_override() {
        let f = fixture().await;
        let workout = f
            .service
            .assign_workout(f.student.id, DayOfWeek::Monday, spec("Legs", &[&f.squat]), false)
            .await
            .unwrap();
        let now = chrono::Utc::now();

        let done = f.service.set_coach_completion(workout.id, true, now).await.unwrap();
        assert!(done.completed);
        assert!(done.coach_completed);
        assert_eq!(done.completed_at, Some(now));

        let open = f.service.set_coach_completion(workout.id, false, now).await.unwrap();
        assert!(!open.completed);
    }
}
