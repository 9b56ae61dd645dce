// src/pipeline/load.rs

//! Input CSV loading.

use std::path::Path;

use crate::error::{AppError, Result};
use crate::models::Company;

/// Header spellings accepted for the required name column.
const NAME_HEADERS: &[&str] = &["Name", "name", "Company", "company"];

/// Load company records from a CSV file.
///
/// Fails fast (before any network work) when the file is missing or lacks a
/// name column. Rows with an empty name are skipped.
pub fn load_companies(path: impl AsRef<Path>) -> Result<Vec<Company>> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(AppError::input(format!(
            "Input file {} does not exist",
            path.display()
        )));
    }

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)?;

    let headers = reader.headers()?.clone();
    if !headers.iter().any(|h| NAME_HEADERS.contains(&h)) {
        return Err(AppError::input(format!(
            "Input file {} is missing the required 'Name' column",
            path.display()
        )));
    }

    let mut companies = Vec::new();
    for record in reader.deserialize() {
        let company: Company = record?;
        if company.name.trim().is_empty() {
            continue;
        }
        companies.push(company);
    }

    log::info!("Loaded {} companies from {}", companies.len(), path.display());
    Ok(companies)
}
