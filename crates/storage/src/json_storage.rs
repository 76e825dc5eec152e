//! JSON file storage implementation.
//!
//! Stores each record as a pretty-printed JSON file under a data directory
//! (`students/`, `exercises/`, `workouts/`, `templates/`). The one-workout-per-day
//! rule is checked on every workout save.

use std::path::{Path, PathBuf};
use gymtask_core::{
    Exercise, ExerciseId, Student, StudentId, TemplateId, Workout, WorkoutId, WorkoutTemplate,
};
use tokio::fs;
use tracing::{debug, warn};
use super::{
    ExerciseCatalog, Result, StorageError, StudentDirectory, TemplateStore, WorkoutStore,
};

/// File-based JSON storage backend.
pub struct JsonStorage {
    root: PathBuf,
}

impl JsonStorage {
    /// Create storage rooted at `root`, creating the collection directories.
    pub async fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();

        fs::create_dir_all(root.join("students")).await?;
        fs::create_dir_all(root.join("exercises")).await?;
        fs::create_dir_all(root.join("workouts")).await?;
        fs::create_dir_all(root.join("templates")).await?;

        debug!("Opened JSON storage at {}", root.display());
        Ok(Self { root })
    }

    fn student_path(&self, id: StudentId) -> PathBuf {
        self.root.join("students").join(format!("{}.json", id))
    }
    fn exercise_path(&self, id: ExerciseId) -> PathBuf {
        self.root.join("exercises").join(format!("{}.json", id))
    }
    fn workout_path(&self, id: WorkoutId) -> PathBuf {
        self.root.join("workouts").join(format!("{}.json", id))
    }
    fn template_path(&self, id: TemplateId) -> PathBuf {
        self.root.join("templates").join(format!("{}.json", id))
    }
}

#[async_trait::async_trait]
impl WorkoutStore for JsonStorage {
    async fn save_workout(&mut self, workout: &Workout) -> Result<()> {
        let siblings = self.list_workouts_for_student(workout.student_id).await?;
        if let Some(existing) = siblings
            .iter()
            .find(|w| w.day == workout.day && w.id != workout.id)
        {
            warn!(
                "Rejected workout {}: student {} already has {} on {}",
                workout.id, workout.student_id, existing.id, workout.day
            );
            return Err(StorageError::DuplicateDay {
                student: workout.student_id,
                day: workout.day,
                existing: existing.id,
            });
        }

        write_json(&self.workout_path(workout.id), workout).await?;
        debug!("Saved workout {} ({} / {})", workout.id, workout.student_id, workout.day);
        Ok(())
    }

    async fn load_workout(&self, id: WorkoutId) -> Result<Option<Workout>> {
        read_json(&self.workout_path(id)).await
    }

    async fn list_workouts(&self) -> Result<Vec<Workout>> {
        let mut workouts: Vec<Workout> = list_dir(&self.root.join("workouts")).await?;
        workouts.sort_by(|a, b| a.student_id.cmp(&b.student_id).then(a.day.cmp(&b.day)));
        Ok(workouts)
    }

    async fn list_workouts_for_student(&self, student_id: StudentId) -> Result<Vec<Workout>> {
        let all: Vec<Workout> = list_dir(&self.root.join("workouts")).await?;
        let mut workouts: Vec<Workout> = all
            .into_iter()
            .filter(|w| w.student_id == student_id)
            .collect();
        workouts.sort_by_key(|w| w.day);
        Ok(workouts)
    }

    async fn delete_workout(&mut self, id: WorkoutId) -> Result<()> {
        remove_file(&self.workout_path(id), "workout").await?;
        debug!("Deleted workout {}", id);
        Ok(())
    }
}

#[async_trait::async_trait]
impl ExerciseCatalog for JsonStorage {
    async fn save_exercise(&mut self, exercise: &Exercise) -> Result<()> {
        write_json(&self.exercise_path(exercise.id), exercise).await
    }

    async fn get_exercise(&self, id: ExerciseId) -> Result<Option<Exercise>> {
        read_json(&self.exercise_path(id)).await
    }

    async fn list_exercises(&self) -> Result<Vec<Exercise>> {
        let mut exercises: Vec<Exercise> = list_dir(&self.root.join("exercises")).await?;
        exercises.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(exercises)
    }

    async fn delete_exercise(&mut self, id: ExerciseId) -> Result<()> {
        remove_file(&self.exercise_path(id), "exercise").await
    }
}

#[async_trait::async_trait]
impl StudentDirectory for JsonStorage {
    async fn save_student(&mut self, student: &Student) -> Result<()> {
        write_json(&self.student_path(student.id), student).await
    }

    async fn get_student(&self, id: StudentId) -> Result<Option<Student>> {
        read_json(&self.student_path(id)).await
    }

    async fn list_students(&self) -> Result<Vec<Student>> {
        let mut students: Vec<Student> = list_dir(&self.root.join("students")).await?;
        students.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(students)
    }

    async fn delete_student(&mut self, id: StudentId) -> Result<()> {
        remove_file(&self.student_path(id), "student").await
    }
}

#[async_trait::async_trait]
impl TemplateStore for JsonStorage {
    async fn save_template(&mut self, template: &WorkoutTemplate) -> Result<()> {
        write_json(&self.template_path(template.id), template).await
    }

    async fn load_template(&self, id: TemplateId) -> Result<Option<WorkoutTemplate>> {
        read_json(&self.template_path(id)).await
    }

    async fn list_templates(&self) -> Result<Vec<WorkoutTemplate>> {
        let mut templates: Vec<WorkoutTemplate> = list_dir(&self.root.join("templates")).await?;
        templates.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(templates)
    }

    async fn delete_template(&mut self, id: TemplateId) -> Result<()> {
        remove_file(&self.template_path(id), "template").await
    }
}

async fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json.as_bytes()).await?;
    Ok(())
}

async fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    match fs::read_to_string(path).await {
        Ok(json) => {
            let value = serde_json::from_str(&json)?;
            Ok(Some(value))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

async fn remove_file(path: &Path, kind: &str) -> Result<()> {
    match fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            let id = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
            Err(StorageError::NotFound(format!("{kind} {id}")))
        }
        Err(e) => Err(e.into()),
    }
}

async fn list_dir<T: serde::de::DeserializeOwned>(dir: &Path) -> Result<Vec<T>> {
    let mut items = Vec::new();
    let mut rd = fs::read_dir(dir).await?;
    while let Some(entry) = rd.next_entry().await? {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) != Some("json") {
            continue;
        }
        match read_json(&path).await {
            Ok(Some(item)) => items.push(item),
            Ok(None) => {}
            Err(e) => warn!("Skipping unreadable record {}: {}", path.display(), e),
        }
    }
    Ok(items)
}
