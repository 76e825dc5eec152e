//! GymTask CLI - coaching and workout progress from the terminal.

mod config;

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use chrono::{NaiveDate, TimeZone, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use gymtask_coach::{
    workout_json, AssignmentSpec, BasicCoachService, CoachService, Dashboard, NewExercise,
    WorkoutSheet, WorkoutSpec,
};
use gymtask_core::{
    AssignmentId, DayOfWeek, ExerciseId, ProgressSnapshot, StudentId, TemplateId, Time, Workout,
    WorkoutId,
};
use gymtask_progress::{
    is_workout_fully_completed, BasicProgressTracker, ExerciseLog, ProgressEvaluator,
    ProgressTracker,
};
use gymtask_storage::{ExerciseCatalog, JsonStorage, StudentDirectory, TemplateStore};
use tokio::sync::Mutex;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;

#[derive(Parser)]
#[command(name = "gymtask")]
#[command(about = "Workout planning and progress tracking for coaches and students", long_about = None)]
struct Cli {
    /// Data directory
    #[arg(long, env = "GYMTASK_DATA_DIR", default_value = ".gymtask", global = true)]
    data_dir: PathBuf,

    /// Evaluate as of this date (YYYY-MM-DD) instead of today
    #[arg(long, global = true)]
    as_of: Option<NaiveDate>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage students
    #[command(subcommand)]
    Student(StudentCommand),
    /// Manage coach accounts
    #[command(subcommand)]
    Coach(CoachCommand),
    /// Manage the exercise catalog
    #[command(subcommand)]
    Exercise(ExerciseCommand),
    /// Manage workouts
    #[command(subcommand)]
    Workout(WorkoutCommand),
    /// Manage workout templates
    #[command(subcommand)]
    Template(TemplateCommand),
    /// Tick (or untick) an exercise
    Toggle {
        student: StudentId,
        workout: WorkoutId,
        exercise: AssignmentId,
        /// Untick instead
        #[arg(long)]
        undo: bool,
    },
    /// Tick every exercise of a workout
    Finish {
        student: StudentId,
        workout: WorkoutId,
    },
    /// Log weight, reps or notes for an exercise
    Log {
        student: StudentId,
        workout: WorkoutId,
        exercise: AssignmentId,
        /// Weight in kg
        #[arg(long)]
        weight: Option<f64>,
        /// Reps per set, comma separated (e.g. 12,10,8)
        #[arg(long, value_delimiter = ',')]
        reps: Option<Vec<u32>>,
        /// Note
        #[arg(long)]
        notes: Option<String>,
    },
    /// Record workout intensity (1-5)
    Intensity {
        student: StudentId,
        workout: WorkoutId,
        value: u8,
    },
    /// Show a student's weekly progress
    Progress { student: StudentId },
    /// Archive the week and start over
    NewWeek { student: StudentId },
    /// Show dashboard statistics
    Stats {
        /// Ranking size (defaults to config)
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Export a student's workout for a day
    Export {
        student: StudentId,
        day: DayOfWeek,
        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,
        /// Write to this directory instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum StudentCommand {
    /// Register a student
    Add { name: String, email: String },
    /// List students
    List,
    /// Remove a student and their workouts
    Remove { id: StudentId },
}

#[derive(Subcommand)]
enum CoachCommand {
    /// Register a coach
    Add { name: String, email: String },
    /// List coaches
    List,
}

#[derive(Subcommand)]
enum ExerciseCommand {
    /// Add a catalog exercise
    Add {
        name: String,
        #[arg(long)]
        muscle: String,
        #[arg(long, default_value = "")]
        instructions: String,
        #[arg(long)]
        image: Option<String>,
        #[arg(long)]
        video: Option<String>,
    },
    /// List the catalog
    List,
    /// Remove an unused exercise
    Remove { id: ExerciseId },
}

#[derive(Subcommand)]
enum WorkoutCommand {
    /// Assign a workout to a student's day
    Assign {
        student: StudentId,
        day: DayOfWeek,
        #[arg(long)]
        name: String,
        /// EXERCISE_ID:SETSxREPS, repeatable
        #[arg(long = "exercise", required = true, value_parser = parse_assignment)]
        exercises: Vec<AssignmentSpec>,
        /// Overwrite an existing workout on that day
        #[arg(long)]
        replace: bool,
    },
    /// Show a student's week, or one day in detail
    Show {
        student: StudentId,
        #[arg(long)]
        day: Option<DayOfWeek>,
    },
    /// Copy a workout to another student/day
    Duplicate {
        workout: WorkoutId,
        student: StudentId,
        day: DayOfWeek,
        #[arg(long)]
        replace: bool,
    },
    /// Delete a workout
    Remove { workout: WorkoutId },
    /// Mark a workout completed as coach
    Complete {
        workout: WorkoutId,
        /// Clear the coach override instead
        #[arg(long)]
        undo: bool,
    },
}

#[derive(Subcommand)]
enum TemplateCommand {
    /// Save a workout as a template
    Save {
        workout: WorkoutId,
        name: String,
        /// Coach account creating it
        #[arg(long)]
        by: StudentId,
        #[arg(long)]
        description: Option<String>,
    },
    /// Create a workout from a template
    Apply {
        template: TemplateId,
        student: StudentId,
        day: DayOfWeek,
        #[arg(long)]
        replace: bool,
    },
    /// List templates
    List,
    /// Delete a template
    Remove { id: TemplateId },
}

#[derive(Clone, Copy, ValueEnum)]
enum ExportFormat {
    Csv,
    Json,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = AppConfig::load(&cli.data_dir).await?;
    let storage = Arc::new(Mutex::new(JsonStorage::new(&cli.data_dir).await?));
    let coach = BasicCoachService::with_shared(Arc::clone(&storage));
    let tracker = BasicProgressTracker::with_shared(Arc::clone(&storage))
        .with_evaluator(ProgressEvaluator::new(config.evaluator.clone()));

    let now = match cli.as_of {
        Some(date) => date
            .and_hms_opt(12, 0, 0)
            .map(|dt| Utc.from_utc_datetime(&dt))
            .ok_or_else(|| anyhow!("invalid --as-of date"))?,
        None => Utc::now(),
    };
    let as_of = now.date_naive();

    match cli.command {
        Commands::Student(cmd) => match cmd {
            StudentCommand::Add { name, email } => {
                let student = coach.create_student(&name, &email).await?;
                println!("Added student: {} - {} <{}>", student.id, student.name, student.email);
            }
            StudentCommand::List => {
                let students = coach.list_students().await?;
                println!("Students ({})", students.len());
                for student in students {
                    println!("  {} | {} | {}", student.id, student.name, student.email);
                }
            }
            StudentCommand::Remove { id } => {
                let removed = coach.delete_student(id).await?;
                println!("Removed student {} ({} workouts)", id, removed);
            }
        },

        Commands::Coach(cmd) => match cmd {
            CoachCommand::Add { name, email } => {
                let coach_account = coach.create_coach(&name, &email).await?;
                println!(
                    "Added coach: {} - {} <{}>",
                    coach_account.id, coach_account.name, coach_account.email
                );
            }
            CoachCommand::List => {
                let coaches = coach.list_coaches().await?;
                println!("Coaches ({})", coaches.len());
                for account in coaches {
                    println!("  {} | {} | {}", account.id, account.name, account.email);
                }
            }
        },

        Commands::Exercise(cmd) => match cmd {
            ExerciseCommand::Add { name, muscle, instructions, image, video } => {
                let exercise = coach
                    .create_exercise(NewExercise {
                        name,
                        muscle_group: muscle,
                        instructions,
                        image_url: image,
                        video_url: video,
                    })
                    .await?;
                println!("Added exercise: {} - {}", exercise.id, exercise.name);
            }
            ExerciseCommand::List => {
                let exercises = storage.lock().await.list_exercises().await?;
                println!("Exercises ({})", exercises.len());
                for exercise in exercises {
                    println!("  {} | {:20} | {}", exercise.id, exercise.name, exercise.muscle_group);
                }
            }
            ExerciseCommand::Remove { id } => {
                coach.delete_exercise(id).await?;
                println!("Removed exercise {}", id);
            }
        },

        Commands::Workout(cmd) => match cmd {
            WorkoutCommand::Assign { student, day, name, exercises, replace } => {
                let workout = coach
                    .assign_workout(student, day, WorkoutSpec { name, exercises }, replace)
                    .await?;
                println!("Assigned workout: {} - {} ({})", workout.id, workout.name, day.label());
            }
            WorkoutCommand::Show { student, day } => {
                let catalog = load_catalog(&storage).await?;
                match day {
                    Some(day) => match tracker.workout_for_day(student, day).await? {
                        Some(workout) => print_workout(&workout, &catalog),
                        None => println!("No workout on {}", day.label()),
                    },
                    None => {
                        let report = tracker.report(student, as_of).await?;
                        for day in DayOfWeek::all() {
                            match report.workouts.iter().find(|w| w.day == *day) {
                                Some(w) => println!(
                                    "  {:9} | {} | {} | {}/{} {}",
                                    day.label(),
                                    w.id,
                                    w.name,
                                    w.completed_exercises(),
                                    w.exercises.len(),
                                    if w.completed { "DONE" } else { "" }
                                ),
                                None => println!("  {:9} | rest", day.label()),
                            }
                        }
                    }
                }
            }
            WorkoutCommand::Duplicate { workout, student, day, replace } => {
                let copy = coach.duplicate_workout(workout, student, day, replace).await?;
                println!("Duplicated as {} ({})", copy.id, day.label());
            }
            WorkoutCommand::Remove { workout } => {
                coach.delete_workout(workout).await?;
                println!("Removed workout {}", workout);
            }
            WorkoutCommand::Complete { workout, undo } => {
                let updated = coach.set_coach_completion(workout, !undo, now).await?;
                println!(
                    "Workout {} is {}",
                    updated.id,
                    if updated.completed { "completed" } else { "open" }
                );
            }
        },

        Commands::Template(cmd) => match cmd {
            TemplateCommand::Save { workout, name, by, description } => {
                let template = coach.save_as_template(workout, &name, description, by).await?;
                println!("Saved template: {} - {}", template.id, template.name);
            }
            TemplateCommand::Apply { template, student, day, replace } => {
                let workout = coach.apply_template(template, student, day, replace).await?;
                println!("Created workout {} on {}", workout.id, day.label());
            }
            TemplateCommand::List => {
                let templates = storage.lock().await.list_templates().await?;
                println!("Templates ({})", templates.len());
                for template in templates {
                    println!(
                        "  {} | {} | {} exercises | {}",
                        template.id,
                        template.name,
                        template.exercises.len(),
                        template.description.as_deref().unwrap_or("-")
                    );
                }
            }
            TemplateCommand::Remove { id } => {
                coach.delete_template(id).await?;
                println!("Removed template {}", id);
            }
        },

        Commands::Toggle { student, workout, exercise, undo } => {
            let update = tracker.toggle_exercise(student, workout, exercise, !undo, now).await?;
            println!(
                "{}/{} exercises done",
                update.workout.completed_exercises(),
                update.workout.exercises.len()
            );
            if is_workout_fully_completed(&update.workout) {
                println!("All exercises in {} are done", update.workout.name);
            }
            print_snapshot(&update.snapshot);
            for celebration in update.celebrations {
                println!("*** {} ***", celebration.message());
            }
        }

        Commands::Finish { student, workout } => {
            let update = tracker.complete_workout(student, workout, now).await?;
            println!("Finished {}", update.workout.name);
            print_snapshot(&update.snapshot);
            for celebration in update.celebrations {
                println!("*** {} ***", celebration.message());
            }
        }

        Commands::Log { student, workout, exercise, weight, reps, notes } => {
            let log = ExerciseLog { weight, reps_per_set: reps, notes };
            tracker.log_exercise(student, workout, exercise, log, now).await?;
            println!("Logged exercise {}", exercise);
        }

        Commands::Intensity { student, workout, value } => {
            tracker.set_intensity(student, workout, value, now).await?;
            println!("Intensity set to {}", value);
        }

        Commands::Progress { student } => {
            let report = tracker.report(student, as_of).await?;
            let summary = &report.summary;
            println!("Progress as of {}", report.as_of);
            println!("  Workouts:  {}/{}", summary.completed_workouts, summary.total_workouts);
            println!("  Exercises: {}/{}", summary.completed_exercises, summary.total_exercises);
            println!("  Week:      {}%", summary.completion_percentage);
            println!("  Calories:  ~{}", summary.estimated_calories);
            print_snapshot(&report.snapshot);
        }

        Commands::NewWeek { student } => {
            let archived = tracker.start_new_week(student, now).await?;
            println!("Archived {} workouts", archived);
        }

        Commands::Stats { limit } => {
            let limit = limit.unwrap_or(config.top_limit);
            let dashboard = Dashboard::new(Arc::clone(&storage));
            let stats = dashboard.stats().await?;

            println!("GymTask Status");
            println!("  Students:  {}", stats.student_count);
            println!("  Exercises: {}", stats.exercise_count);
            println!("  Workouts:  {}", stats.workout_count);
            println!("Most active students");
            for entry in dashboard.top_active_students(limit).await? {
                println!("  {:20} {}", entry.student.name, entry.workouts);
            }
            println!("Most popular exercises");
            for entry in dashboard.popular_exercises(limit).await? {
                println!("  {:20} {}", entry.exercise.name, entry.assignments);
            }
        }

        Commands::Export { student, day, format, out } => {
            let Some(workout) = tracker.workout_for_day(student, day).await? else {
                println!("No workout on {}", day.label());
                return Ok(());
            };
            let profile = storage
                .lock()
                .await
                .get_student(student)
                .await?
                .ok_or_else(|| anyhow!("Student not found"))?;

            let (file_name, body) = match format {
                ExportFormat::Csv => {
                    let catalog = load_catalog(&storage).await?;
                    let sheet = WorkoutSheet::build(&workout, &profile.name, &catalog, as_of);
                    (sheet.file_name("workout"), sheet.to_csv()?)
                }
                ExportFormat::Json => (format!("workout-{}.json", day), workout_json(&workout)?),
            };

            match out {
                Some(dir) => {
                    let path = dir.join(file_name);
                    tokio::fs::write(&path, body).await?;
                    info!("Exported {}", path.display());
                    println!("Wrote {}", path.display());
                }
                None => print!("{}", body),
            }
        }
    }

    Ok(())
}

fn parse_assignment(s: &str) -> Result<AssignmentSpec, String> {
    let (id, prescription) = s
        .split_once(':')
        .ok_or_else(|| format!("expected EXERCISE_ID:SETSxREPS, got {s}"))?;
    let (sets, reps) = prescription
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected SETSxREPS, got {prescription}"))?;

    let exercise_id = id.parse::<ExerciseId>().map_err(|e| e.to_string())?;
    let sets = sets.trim().parse().map_err(|_| format!("invalid set count: {sets}"))?;
    let reps = reps.trim().parse().map_err(|_| format!("invalid rep count: {reps}"))?;
    Ok(AssignmentSpec::new(exercise_id, sets, reps))
}

async fn load_catalog(
    storage: &Mutex<JsonStorage>,
) -> Result<HashMap<ExerciseId, gymtask_core::Exercise>> {
    let exercises = storage.lock().await.list_exercises().await?;
    Ok(exercises.into_iter().map(|e| (e.id, e)).collect())
}

fn print_workout(workout: &Workout, catalog: &HashMap<ExerciseId, gymtask_core::Exercise>) {
    println!("Workout: {} ({})", workout.name, workout.day.label());
    println!("  ID: {}", workout.id);
    println!("  Completed: {}", format_completed(workout.completed, workout.completed_at));
    if let Some(intensity) = workout.intensity {
        println!("  Intensity: {}/5", intensity);
    }
    for exercise in &workout.exercises {
        let name = catalog
            .get(&exercise.exercise_id)
            .map(|e| e.name.as_str())
            .unwrap_or("?");
        println!(
            "  [{}] {} | {:20} | {}x{}{}",
            if exercise.completed { "x" } else { " " },
            exercise.id,
            name,
            exercise.sets,
            exercise.reps,
            exercise.weight.map(|w| format!(" @ {w}kg")).unwrap_or_default(),
        );
    }
}

fn print_snapshot(snapshot: &ProgressSnapshot) {
    println!("  Daily:   {}", if snapshot.daily_completed { "done" } else { "-" });
    println!("  Weekly:  {}", if snapshot.weekly_completed { "done" } else { "-" });
    println!("  Monthly: {}", if snapshot.monthly_completed { "done" } else { "-" });
}

fn format_completed(completed: bool, at: Option<Time>) -> String {
    match (completed, at) {
        (true, Some(at)) => format!("yes ({})", at.format("%Y-%m-%d %H:%M")),
        (true, None) => "yes".to_string(),
        (false, _) => "no".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_assignment() {
        let id = ExerciseId::new();
        let spec = parse_assignment(&format!("{id}:4x8")).unwrap();
        assert_eq!(spec.exercise_id, id);
        assert_eq!((spec.sets, spec.reps), (4, 8));

        assert!(parse_assignment("nope").is_err());
        assert!(parse_assignment(&format!("{id}:4-8")).is_err());
        assert!(parse_assignment(&format!("{id}:ax8")).is_err());
    }

    #[test]
    fn test_cli_parses_assign() {
        let id = ExerciseId::new();
        let student = StudentId::new();
        let cli = Cli::try_parse_from([
            "gymtask",
            "workout",
            "assign",
            &student.to_string(),
            "wed",
            "--name",
            "Pull",
            "--exercise",
            &format!("{id}:3x10"),
        ])
        .unwrap();

        match cli.command {
            Commands::Workout(WorkoutCommand::Assign { day, exercises, replace, .. }) => {
                assert_eq!(day, DayOfWeek::Wednesday);
                assert_eq!(exercises.len(), 1);
                assert!(!replace);
            }
            _ => panic!("wrong subcommand"),
        }
    }

    #[test]
    fn test_cli_parses_coach_and_finish() {
        let cli = Cli::try_parse_from(["gymtask", "coach", "add", "Carla", "carla@example.com"]).unwrap();
        assert!(matches!(cli.command, Commands::Coach(CoachCommand::Add { ref name, .. }) if name == "Carla"));

        let student = StudentId::new();
        let workout = WorkoutId::new();
        let cli = Cli::try_parse_from([
            "gymtask",
            "--as-of",
            "2024-06-28",
            "finish",
            &student.to_string(),
            &workout.to_string(),
        ])
        .unwrap();
        assert_eq!(cli.as_of, NaiveDate::from_ymd_opt(2024, 6, 28));
        assert!(matches!(cli.command, Commands::Finish { workout: w, .. } if w == workout));
    }
}
