//! Workout model - a student's plan for one day of the week.

use serde::{Deserialize, Serialize};
use crate::day::DayOfWeek;
use crate::id::{AssignmentId, ExerciseId, StudentId, WorkoutId};
use crate::Time;

/// A named, day-scoped list of exercise assignments for one student.
///
/// `completed` is the effective flag read by progress evaluation. It is kept
/// equal to `auto_completed || coach_completed`; the two sources are stored
/// separately so un-ticking an exercise can revert an automatic completion
/// without discarding a coach override.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workout {
    /// Unique identifier
    pub id: WorkoutId,

    /// Owning student
    pub student_id: StudentId,

    /// Display name
    pub name: String,

    /// Scheduled day
    pub day: DayOfWeek,

    /// Ordered exercise assignments
    pub exercises: Vec<ExerciseAssignment>,

    /// Effective completion flag
    #[serde(default)]
    pub completed: bool,

    /// Completion derived from every exercise being ticked
    #[serde(default)]
    pub auto_completed: bool,

    /// Completion set explicitly by a coach
    #[serde(default)]
    pub coach_completed: bool,

    /// When the workout last became completed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<Time>,

    /// Perceived intensity, 1-5
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intensity: Option<u8>,

    /// Archived sessions, oldest first
    #[serde(default)]
    pub history: Vec<WorkoutHistory>,

    /// When created
    pub created_at: Time,

    /// Last updated
    pub updated_at: Time,
}

/// One exercise inside a workout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseAssignment {
    /// Unique identifier within the workout
    pub id: AssignmentId,

    /// Catalog exercise
    pub exercise_id: ExerciseId,

    /// Prescribed set count
    pub sets: u32,

    /// Prescribed reps per set
    pub reps: u32,

    /// Actual reps logged per set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reps_per_set: Option<Vec<u32>>,

    /// Logged weight in kg
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,

    /// Free-text note
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// Ticked by the student
    #[serde(default)]
    pub completed: bool,

    /// Past sessions, oldest first
    #[serde(default)]
    pub history: Vec<ExerciseHistory>,
}

/// An archived workout session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutHistory {
    /// Session date
    pub date: Time,

    /// Intensity recorded for the session
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intensity: Option<u8>,

    /// Per-exercise results
    pub exercises: Vec<ExerciseHistory>,
}

/// An archived exercise result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseHistory {
    /// Catalog exercise
    pub exercise_id: ExerciseId,

    /// Weight used
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,

    /// Reps achieved per set
    #[serde(default)]
    pub reps_per_set: Vec<u32>,

    /// Whether it was ticked
    pub completed: bool,

    /// Session date
    pub date: Time,
}

impl ExerciseAssignment {
    /// Create a fresh assignment.
    pub fn new(exercise_id: ExerciseId, sets: u32, reps: u32) -> Self {
        Self {
            id: AssignmentId::new(),
            exercise_id,
            sets,
            reps,
            reps_per_set: None,
            weight: None,
            notes: None,
            completed: false,
            history: Vec::new(),
        }
    }

    /// Copy of the prescription with a new id and no logged state.
    pub fn fresh_copy(&self) -> Self {
        Self {
            id: AssignmentId::new(),
            exercise_id: self.exercise_id,
            sets: self.sets,
            reps: self.reps,
            reps_per_set: None,
            weight: None,
            notes: self.notes.clone(),
            completed: false,
            history: Vec::new(),
        }
    }

    /// Snapshot of the current session.
    pub fn to_history(&self, date: Time) -> ExerciseHistory {
        ExerciseHistory {
            exercise_id: self.exercise_id,
            weight: self.weight,
            reps_per_set: self.reps_per_set.clone().unwrap_or_default(),
            completed: self.completed,
            date,
        }
    }
}

impl Workout {
    /// Create a new, not yet completed workout.
    pub fn new(
        student_id: StudentId,
        name: impl Into<String>,
        day: DayOfWeek,
        exercises: Vec<ExerciseAssignment>,
    ) -> Self {
        let now = chrono::Utc::now();
        Self {
            id: WorkoutId::new(),
            student_id,
            name: name.into(),
            day,
            exercises,
            completed: false,
            auto_completed: false,
            coach_completed: false,
            completed_at: None,
            intensity: None,
            history: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Find an assignment by id.
    pub fn assignment(&self, id: AssignmentId) -> Option<&ExerciseAssignment> {
        self.exercises.iter().find(|e| e.id == id)
    }

    /// Find an assignment by id, mutably.
    pub fn assignment_mut(&mut self, id: AssignmentId) -> Option<&mut ExerciseAssignment> {
        self.exercises.iter_mut().find(|e| e.id == id)
    }

    /// Number of ticked assignments.
    pub fn completed_exercises(&self) -> usize {
        self.exercises.iter().filter(|e| e.completed).count()
    }

    /// Copy this workout for another student/day with fresh ids and no progress.
    pub fn duplicate_for(&self, student_id: StudentId, day: DayOfWeek) -> Workout {
        Workout::new(
            student_id,
            self.name.clone(),
            day,
            self.exercises.iter().map(ExerciseAssignment::fresh_copy).collect(),
        )
    }

    /// Clear every completion flag and the session rating.
    pub fn reset_progress(&mut self) {
        for exercise in &mut self.exercises {
            exercise.completed = false;
            exercise.reps_per_set = None;
        }
        self.intensity = None;
        self.completed = false;
        self.auto_completed = false;
        self.coach_completed = false;
        self.completed_at = None;
    }

    /// Archive the current session into history, then reset progress.
    ///
    /// Returns `false` (and leaves the workout untouched) when there is
    /// nothing to archive.
    pub fn archive_session(&mut self, date: Time) -> bool {
        if !self.completed && self.completed_exercises() == 0 {
            return false;
        }

        let mut results = Vec::with_capacity(self.exercises.len());
        for exercise in &mut self.exercises {
            let entry = exercise.to_history(date);
            exercise.history.push(entry.clone());
            results.push(entry);
        }
        self.history.push(WorkoutHistory {
            date,
            intensity: self.intensity,
            exercises: results,
        });

        self.reset_progress();
        self.updated_at = date;
        true
    }
}
