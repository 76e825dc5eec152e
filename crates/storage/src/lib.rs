//! Storage abstraction and implementations for GymTask.
//!
//! This crate provides the workout store, exercise catalog, student directory
//! and template store contracts with a JSON-file reference implementation.

#![warn(missing_docs)]

pub mod trait_;
pub mod json_storage;

pub use trait_::{
    Storage, StorageError, Result, WorkoutStore, ExerciseCatalog, StudentDirectory, TemplateStore,
};
pub use json_storage::JsonStorage;
