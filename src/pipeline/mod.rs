// src/pipeline/mod.rs

//! Enrichment pipeline: input loading, phase orchestration and export.

mod enrich;
mod export;
mod load;

pub use enrich::{Enricher, PhaseFilter};
pub use export::{dated_output_path, write_export};
pub use load::load_companies;
