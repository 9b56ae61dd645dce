// src/storage/mod.rs

//! Durable progress state.

mod progress;

pub use progress::{FailureEntry, Outcome, ProgressTracker, SCHEMA_VERSION};
