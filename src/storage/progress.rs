// src/storage/progress.rs

//! Durable, resumable progress tracking.
//!
//! The tracker is the single source of truth for "is this record done with
//! this phase". Every mutation rewrites the whole document atomically
//! (temp file + rename) before the orchestrator touches the next record, so
//! process termination at any point leaves a consistent, resumable state:
//! at most one record's outcome is lost, never corrupted.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::Phase;

/// Version stamp of the durable document. Documents with any other version
/// (including legacy unversioned ones) are discarded and replaced by a
/// fresh default rather than misread.
pub const SCHEMA_VERSION: u32 = 1;

/// Terminal outcome of one phase attempt for one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum Outcome {
    /// Phase attempted, value resolved.
    Found(String),
    /// Phase attempted, nothing found (including caught resolver failures).
    NotFound,
}

/// One entry in the append-only failure log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureEntry {
    pub company: String,
    pub error: String,
    pub timestamp: String,
}

/// Per-phase mapping plus cached counters.
///
/// Invariant: a record name appears in `outcomes` iff the phase has been
/// attempted for it; `found`/`not_found` are always recomputable by summing
/// the mapping.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct PhaseProgress {
    #[serde(default)]
    outcomes: BTreeMap<String, Outcome>,
    #[serde(default)]
    found: u64,
    #[serde(default)]
    not_found: u64,
}

/// Named per-phase slots (explicit fields instead of a loose map, so old or
/// malformed documents fail deserialization cleanly).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct PhaseSlots {
    #[serde(default)]
    website: PhaseProgress,
    #[serde(default)]
    email: PhaseProgress,
    #[serde(default)]
    phone: PhaseProgress,
}

impl PhaseSlots {
    fn get(&self, phase: Phase) -> &PhaseProgress {
        match phase {
            Phase::Website => &self.website,
            Phase::Email => &self.email,
            Phase::Phone => &self.phone,
        }
    }

    fn get_mut(&mut self, phase: Phase) -> &mut PhaseProgress {
        match phase {
            Phase::Website => &mut self.website,
            Phase::Email => &mut self.email,
            Phase::Phone => &mut self.phone,
        }
    }
}

/// The complete durable document.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ProgressState {
    #[serde(default)]
    version: u32,
    #[serde(default)]
    started_at: Option<String>,
    #[serde(default)]
    last_updated: Option<String>,
    #[serde(default)]
    phases: PhaseSlots,
    #[serde(default)]
    failures: Vec<FailureEntry>,
}

impl Default for ProgressState {
    fn default() -> Self {
        Self {
            version: SCHEMA_VERSION,
            started_at: None,
            last_updated: None,
            phases: PhaseSlots::default(),
            failures: Vec::new(),
        }
    }
}

/// Durable progress tracker.
pub struct ProgressTracker {
    path: PathBuf,
    state: ProgressState,
}

impl ProgressTracker {
    /// Load state from the given file. A missing, corrupt or wrong-version
    /// file yields a fresh default state, never an error.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let state = Self::load_state(&path);
        Self { path, state }
    }

    fn load_state(path: &Path) -> ProgressState {
        if !path.exists() {
            log::info!("No progress file at {}. Starting fresh.", path.display());
            return ProgressState::default();
        }

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                log::warn!("Could not read progress file: {}. Starting fresh.", e);
                return ProgressState::default();
            }
        };

        match serde_json::from_str::<ProgressState>(&content) {
            Ok(state) if state.version == SCHEMA_VERSION => {
                let attempted: usize = Phase::ALL
                    .iter()
                    .map(|p| state.phases.get(*p).outcomes.len())
                    .sum();
                log::info!("Resumed previous session: {} phase outcomes recorded.", attempted);
                state
            }
            Ok(state) => {
                log::warn!(
                    "Progress file has schema version {} (expected {}). Starting fresh.",
                    state.version,
                    SCHEMA_VERSION
                );
                ProgressState::default()
            }
            Err(e) => {
                log::warn!("Could not parse progress file: {}. Starting fresh.", e);
                ProgressState::default()
            }
        }
    }

    /// Persist the whole document atomically: write a temp file, flush,
    /// rename over the target.
    fn save(&mut self) -> Result<()> {
        self.state.last_updated = Some(Utc::now().to_rfc3339());

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let bytes = serde_json::to_vec_pretty(&self.state)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, &bytes)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    /// Record the started-at timestamp once per session.
    pub fn start_session(&mut self) -> Result<()> {
        if self.state.started_at.is_none() {
            self.state.started_at = Some(Utc::now().to_rfc3339());
        }
        self.save()
    }

    /// Record a phase outcome for a record and flush it durably.
    ///
    /// Re-marking an already-attempted record replaces the old outcome and
    /// keeps the counters consistent with the mapping.
    pub fn mark(&mut self, phase: Phase, name: &str, value: Option<String>) -> Result<()> {
        let outcome = match value {
            Some(v) => Outcome::Found(v),
            None => Outcome::NotFound,
        };

        let progress = self.state.phases.get_mut(phase);
        if let Some(old) = progress.outcomes.insert(name.to_string(), outcome.clone()) {
            match old {
                Outcome::Found(_) => progress.found -= 1,
                Outcome::NotFound => progress.not_found -= 1,
            }
        }
        match outcome {
            Outcome::Found(_) => progress.found += 1,
            Outcome::NotFound => progress.not_found += 1,
        }

        self.save()
    }

    /// Append to the failure log without altering any phase mapping.
    pub fn mark_failure(&mut self, name: &str, error: &str) -> Result<()> {
        self.state.failures.push(FailureEntry {
            company: name.to_string(),
            error: error.to_string(),
            timestamp: Utc::now().to_rfc3339(),
        });
        self.save()
    }

    /// Whether the phase has been attempted for this record.
    pub fn is_processed(&self, phase: Phase, name: &str) -> bool {
        self.state.phases.get(phase).outcomes.contains_key(name)
    }

    /// The recorded outcome, if any.
    pub fn outcome(&self, phase: Phase, name: &str) -> Option<&Outcome> {
        self.state.phases.get(phase).outcomes.get(name)
    }

    /// The resolved value, only when the phase found one.
    pub fn found_value(&self, phase: Phase, name: &str) -> Option<&str> {
        match self.outcome(phase, name) {
            Some(Outcome::Found(value)) => Some(value.as_str()),
            _ => None,
        }
    }

    /// Cached (found, not_found) counters for a phase.
    pub fn counts(&self, phase: Phase) -> (u64, u64) {
        let progress = self.state.phases.get(phase);
        (progress.found, progress.not_found)
    }

    /// Recompute (found, not_found) from the mapping. Test support: must
    /// always equal [`counts`](Self::counts).
    pub fn recount(&self, phase: Phase) -> (u64, u64) {
        let progress = self.state.phases.get(phase);
        let found = progress
            .outcomes
            .values()
            .filter(|o| matches!(o, Outcome::Found(_)))
            .count() as u64;
        let not_found = progress.outcomes.len() as u64 - found;
        (found, not_found)
    }

    /// The failure log.
    pub fn failures(&self) -> &[FailureEntry] {
        &self.state.failures
    }

    /// Clear all phases to unattempted and discard the durable file.
    pub fn reset(&mut self) -> Result<()> {
        self.state = ProgressState::default();
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}
