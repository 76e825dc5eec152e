//! Progress tracking service.
//!
//! Wraps the pure evaluator with storage: every mutation loads a fresh copy
//! of the student's workouts, applies the change, persists it and evaluates
//! again from the re-read state.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use gymtask_core::{
    AssignmentId, Celebration, DayOfWeek, ProgressSnapshot, StudentId, Time, WeeklySummary,
    Workout, WorkoutId,
};
use gymtask_storage::Storage;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::evaluator::{
    apply_completion_policy, celebrations, select_workout_for_day, toggle_exercise_completion,
    ProgressError, ProgressEvaluator, Result,
};

/// Progress tracking service.
#[async_trait]
pub trait ProgressTracker: Send + Sync {
    /// Evaluate a student's week as of `as_of`.
    async fn report(&self, student_id: StudentId, as_of: NaiveDate) -> Result<ProgressReport>;

    /// The student's workout for `day`, if one is assigned.
    async fn workout_for_day(&self, student_id: StudentId, day: DayOfWeek)
        -> Result<Option<Workout>>;

    /// Tick or untick an exercise and persist the result.
    async fn toggle_exercise(
        &self,
        student_id: StudentId,
        workout_id: WorkoutId,
        assignment_id: AssignmentId,
        completed: bool,
        now: Time,
    ) -> Result<ProgressUpdate>;

    /// Tick every exercise of a workout at once.
    async fn complete_workout(
        &self,
        student_id: StudentId,
        workout_id: WorkoutId,
        now: Time,
    ) -> Result<ProgressUpdate>;

    /// Record weight, per-set reps or a note for an exercise.
    async fn log_exercise(
        &self,
        student_id: StudentId,
        workout_id: WorkoutId,
        assignment_id: AssignmentId,
        log: ExerciseLog,
        now: Time,
    ) -> Result<Workout>;

    /// Record perceived intensity (1-5) for a workout.
    async fn set_intensity(
        &self,
        student_id: StudentId,
        workout_id: WorkoutId,
        intensity: u8,
        now: Time,
    ) -> Result<Workout>;

    /// Archive the week into history and clear completion state.
    /// Returns the number of workouts archived.
    async fn start_new_week(&self, student_id: StudentId, now: Time) -> Result<usize>;
}

/// A student's week, evaluated.
#[derive(Debug, Clone)]
pub struct ProgressReport {
    /// Student evaluated
    pub student_id: StudentId,

    /// Evaluation day
    pub as_of: NaiveDate,

    /// Workouts, ordered by day
    pub workouts: Vec<Workout>,

    /// Achievement flags
    pub snapshot: ProgressSnapshot,

    /// Aggregate counts
    pub summary: WeeklySummary,
}

/// Outcome of a completion change.
#[derive(Debug, Clone)]
pub struct ProgressUpdate {
    /// The workout as persisted
    pub workout: Workout,

    /// Snapshot after the change
    pub snapshot: ProgressSnapshot,

    /// Achievements unlocked by this change
    pub celebrations: Vec<Celebration>,
}

/// Values a student logs against an exercise. `None` leaves a field as is.
#[derive(Debug, Clone, Default)]
pub struct ExerciseLog {
    /// Weight in kg
    pub weight: Option<f64>,

    /// Reps achieved per set
    pub reps_per_set: Option<Vec<u32>>,

    /// Free-text note
    pub notes: Option<String>,
}

/// Basic progress tracker implementation.
pub struct BasicProgressTracker<S: Storage> {
    storage: Arc<Mutex<S>>,
    evaluator: ProgressEvaluator,
}

impl<S: Storage> BasicProgressTracker<S> {
    /// Create a new progress tracker.
    pub fn new(storage: S) -> Self {
        Self::with_shared(Arc::new(Mutex::new(storage)))
    }

    /// Create a tracker over storage shared with other services.
    pub fn with_shared(storage: Arc<Mutex<S>>) -> Self {
        Self {
            storage,
            evaluator: ProgressEvaluator::default(),
        }
    }

    /// Use a specific evaluator.
    pub fn with_evaluator(mut self, evaluator: ProgressEvaluator) -> Self {
        self.evaluator = evaluator;
        self
    }

    /// Shared storage handle.
    pub fn storage(&self) -> Arc<Mutex<S>> {
        Arc::clone(&self.storage)
    }
}

/// Load a workout, hiding workouts owned by another student.
async fn load_owned<S: Storage>(
    storage: &S,
    student_id: StudentId,
    workout_id: WorkoutId,
) -> Result<Workout> {
    match storage.load_workout(workout_id).await? {
        Some(workout) if workout.student_id == student_id => Ok(workout),
        _ => Err(ProgressError::WorkoutNotFound(workout_id)),
    }
}

impl<S: Storage> BasicProgressTracker<S> {
    /// Apply the completion policy to `updated`, persist it and diff the
    /// student's snapshot against the one taken before the change.
    async fn commit(
        &self,
        storage: &mut S,
        previous: &ProgressSnapshot,
        mut updated: Workout,
        now: Time,
    ) -> Result<ProgressUpdate> {
        let as_of = now.date_naive();
        updated.updated_at = now;
        if apply_completion_policy(&mut updated, now) {
            info!(
                "Workout {} is now {}",
                updated.id,
                if updated.completed { "completed" } else { "open" }
            );
        }
        storage.save_workout(&updated).await?;

        let after = storage.list_workouts_for_student(updated.student_id).await?;
        let snapshot = self.evaluator.evaluate(&after, as_of);
        let unlocked = celebrations(previous, &snapshot);
        for celebration in &unlocked {
            info!("Student {} unlocked {:?}", updated.student_id, celebration);
        }

        Ok(ProgressUpdate {
            workout: updated,
            snapshot,
            celebrations: unlocked,
        })
    }
}

#[async_trait]
impl<S: Storage + 'static> ProgressTracker for BasicProgressTracker<S> {
    async fn report(&self, student_id: StudentId, as_of: NaiveDate) -> Result<ProgressReport> {
        let workouts = self
            .storage
            .lock()
            .await
            .list_workouts_for_student(student_id)
            .await?;

        let snapshot = self.evaluator.evaluate(&workouts, as_of);
        let summary = self.evaluator.summarize(&workouts);

        Ok(ProgressReport {
            student_id,
            as_of,
            workouts,
            snapshot,
            summary,
        })
    }

    async fn workout_for_day(
        &self,
        student_id: StudentId,
        day: DayOfWeek,
    ) -> Result<Option<Workout>> {
        let workouts = self
            .storage
            .lock()
            .await
            .list_workouts_for_student(student_id)
            .await?;
        Ok(select_workout_for_day(&workouts, day).cloned())
    }

    async fn toggle_exercise(
        &self,
        student_id: StudentId,
        workout_id: WorkoutId,
        assignment_id: AssignmentId,
        completed: bool,
        now: Time,
    ) -> Result<ProgressUpdate> {
        let mut storage = self.storage.lock().await;

        let before = storage.list_workouts_for_student(student_id).await?;
        let previous = self.evaluator.evaluate(&before, now.date_naive());

        let workout = load_owned(&*storage, student_id, workout_id).await?;
        let updated = toggle_exercise_completion(&workout, assignment_id, completed)?;
        self.commit(&mut *storage, &previous, updated, now).await
    }

    async fn complete_workout(
        &self,
        student_id: StudentId,
        workout_id: WorkoutId,
        now: Time,
    ) -> Result<ProgressUpdate> {
        let mut storage = self.storage.lock().await;

        let before = storage.list_workouts_for_student(student_id).await?;
        let previous = self.evaluator.evaluate(&before, now.date_naive());

        let mut workout = load_owned(&*storage, student_id, workout_id).await?;
        if workout.exercises.is_empty() {
            return Err(ProgressError::InvalidInput(format!(
                "workout {workout_id} has no exercises to complete"
            )));
        }
        for exercise in &mut workout.exercises {
            exercise.completed = true;
        }
        self.commit(&mut *storage, &previous, workout, now).await
    }

    async fn log_exercise(
        &self,
        student_id: StudentId,
        workout_id: WorkoutId,
        assignment_id: AssignmentId,
        log: ExerciseLog,
        now: Time,
    ) -> Result<Workout> {
        let mut storage = self.storage.lock().await;
        let mut workout = load_owned(&*storage, student_id, workout_id).await?;

        let exercise = workout
            .assignment_mut(assignment_id)
            .ok_or(ProgressError::ExerciseNotFound {
                workout: workout_id,
                assignment: assignment_id,
            })?;

        if let Some(weight) = log.weight {
            if !weight.is_finite() || weight < 0.0 {
                return Err(ProgressError::InvalidInput(format!("weight must be >= 0, got {weight}")));
            }
            exercise.weight = Some(weight);
        }
        if let Some(reps) = log.reps_per_set {
            if reps.len() > exercise.sets as usize {
                return Err(ProgressError::InvalidInput(format!(
                    "{} sets logged but only {} prescribed",
                    reps.len(),
                    exercise.sets
                )));
            }
            exercise.reps_per_set = Some(reps);
        }
        if let Some(notes) = log.notes {
            exercise.notes = if notes.trim().is_empty() { None } else { Some(notes) };
        }

        workout.updated_at = now;
        storage.save_workout(&workout).await?;
        debug!("Logged exercise {} in workout {}", assignment_id, workout_id);
        Ok(workout)
    }

    async fn set_intensity(
        &self,
        student_id: StudentId,
        workout_id: WorkoutId,
        intensity: u8,
        now: Time,
    ) -> Result<Workout> {
        if !(1..=5).contains(&intensity) {
            return Err(ProgressError::InvalidInput(format!(
                "intensity must be between 1 and 5, got {intensity}"
            )));
        }

        let mut storage = self.storage.lock().await;
        let mut workout = load_owned(&*storage, student_id, workout_id).await?;
        workout.intensity = Some(intensity);
        workout.updated_at = now;
        storage.save_workout(&workout).await?;
        Ok(workout)
    }

    async fn start_new_week(&self, student_id: StudentId, now: Time) -> Result<usize> {
        let mut storage = self.storage.lock().await;
        let workouts = storage.list_workouts_for_student(student_id).await?;

        let mut archived = 0;
        for mut workout in workouts {
            if workout.archive_session(now) {
                storage.save_workout(&workout).await?;
                archived += 1;
            }
        }

        info!("Started new week for {}: {} workouts archived", student_id, archived);
        Ok(archived)
    }
}
