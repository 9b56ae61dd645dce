// src/pipeline/export.rs

//! Final merged export.
//!
//! Confirmed and guessed emails stay in separate columns so downstream
//! consumers can tell verified addresses from heuristic ones.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::error::Result;
use crate::extract::email::generate_probable_email;
use crate::models::{Company, Phase};
use crate::storage::ProgressTracker;

/// Local part used for guessed fallback addresses.
const PROBABLE_PREFIX: &str = "info";

/// Dated default export location under the configured output directory.
pub fn dated_output_path(output_dir: &str) -> PathBuf {
    let date = Local::now().format("%Y-%m-%d");
    Path::new(output_dir).join(format!("{date} - Companies Enriched.csv"))
}

/// Write the merged export: input values win over tracker values, sentinels
/// become empty cells, and a probable email is derived from the effective
/// website.
pub fn write_export(
    companies: &[Company],
    tracker: &ProgressTracker,
    path: &Path,
) -> Result<usize> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["Name", "City", "Website", "Email", "Probable_Email", "Phone"])?;

    for company in companies {
        let website = if company.has_website() {
            company.website.trim().to_string()
        } else {
            tracker
                .found_value(Phase::Website, &company.name)
                .unwrap_or("")
                .to_string()
        };

        let email = if company.has_email() {
            company.email.trim().to_string()
        } else {
            tracker
                .found_value(Phase::Email, &company.name)
                .unwrap_or("")
                .to_string()
        };

        let phone = tracker
            .found_value(Phase::Phone, &company.name)
            .unwrap_or("")
            .to_string();

        let probable_email = generate_probable_email(&website, PROBABLE_PREFIX);

        writer.write_record([
            company.name.as_str(),
            company.city.as_str(),
            website.as_str(),
            email.as_str(),
            probable_email.as_str(),
            phone.as_str(),
        ])?;
    }

    writer.flush()?;
    log::info!("Exported {} companies to {}", companies.len(), path.display());
    Ok(companies.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn company(name: &str, city: &str, website: &str, email: &str) -> Company {
        let csv = format!("Name,City,Website,Email\n{name},{city},{website},{email}\n");
        let mut reader = csv::Reader::from_reader(csv.as_bytes());
        reader.deserialize().next().unwrap().unwrap()
    }

    #[test]
    fn merges_input_and_tracker_values() {
        let tmp = TempDir::new().unwrap();
        let mut tracker = ProgressTracker::load(tmp.path().join("progress.json"));
        tracker
            .mark(Phase::Website, "Bakkerij Jansen", Some("https://www.bakkerij-jansen.nl".into()))
            .unwrap();
        tracker
            .mark(Phase::Email, "Bakkerij Jansen", Some("post@bakkerij-jansen.nl".into()))
            .unwrap();
        tracker
            .mark(Phase::Phone, "Bakkerij Jansen", Some("020-123 4567".into()))
            .unwrap();

        let companies = vec![company("Bakkerij Jansen", "Amsterdam", "", "")];
        let out = tmp.path().join("out.csv");
        assert_eq!(write_export(&companies, &tracker, &out).unwrap(), 1);

        let content = fs::read_to_string(&out).unwrap();
        let mut lines = content.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Name,City,Website,Email,Probable_Email,Phone"
        );
        assert_eq!(
            lines.next().unwrap(),
            "Bakkerij Jansen,Amsterdam,https://www.bakkerij-jansen.nl,\
             post@bakkerij-jansen.nl,info@bakkerij-jansen.nl,020-123 4567"
        );
    }

    #[test]
    fn input_website_wins_and_sentinel_becomes_empty() {
        let tmp = TempDir::new().unwrap();
        let mut tracker = ProgressTracker::load(tmp.path().join("progress.json"));
        tracker
            .mark(Phase::Website, "Met Site", Some("https://tracker.nl".into()))
            .unwrap();
        tracker.mark(Phase::Website, "Zonder Site", None).unwrap();

        let companies = vec![
            company("Met Site", "", "https://input.nl", ""),
            company("Zonder Site", "", "Not found", ""),
        ];
        let out = tmp.path().join("out.csv");
        write_export(&companies, &tracker, &out).unwrap();

        let content = fs::read_to_string(&out).unwrap();
        let rows: Vec<&str> = content.lines().skip(1).collect();
        assert_eq!(rows[0], "Met Site,,https://input.nl,,info@input.nl,");
        assert_eq!(rows[1], "Zonder Site,,,,,");
    }
}
