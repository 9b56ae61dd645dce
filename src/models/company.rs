// src/models/company.rs

//! Company record and enrichment phase types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Display sentinel meaning "attempted, nothing found". Appears in legacy
/// input files; normalized to an empty cell at the export boundary.
pub const NOT_FOUND: &str = "Not found";

/// Check whether a raw field carries a usable value.
pub fn is_present(value: &str) -> bool {
    let trimmed = value.trim();
    !trimmed.is_empty() && trimmed != NOT_FOUND
}

/// One input record. The company name is the unique key across all phases.
#[derive(Debug, Clone, Deserialize)]
pub struct Company {
    /// Company name (required column)
    #[serde(rename = "Name", alias = "name", alias = "Company", alias = "company")]
    pub name: String,

    /// Optional city hint for search queries
    #[serde(default, rename = "City", alias = "city")]
    pub city: String,

    /// Website, if already known in the input
    #[serde(default, rename = "Website", alias = "website", alias = "URL", alias = "url")]
    pub website: String,

    /// Confirmed email, if already known in the input
    #[serde(default, rename = "Email", alias = "email")]
    pub email: String,
}

impl Company {
    /// Whether the input row already carries a usable website.
    pub fn has_website(&self) -> bool {
        is_present(&self.website)
    }

    /// Whether the input row already carries a confirmed email.
    pub fn has_email(&self) -> bool {
        is_present(&self.email)
    }
}

/// One attribute-resolution pass applied across the full record set.
///
/// Phases run in declaration order: email and phone resolution may consult
/// the website value, so the website phase goes first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Website,
    Email,
    Phone,
}

impl Phase {
    /// All phases in dependency order.
    pub const ALL: [Phase; 3] = [Phase::Website, Phase::Email, Phase::Phone];

    /// Stable name used as a key in the durable progress document.
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Website => "website",
            Phase::Email => "email",
            Phase::Phone => "phone",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_present_rejects_sentinel_and_blank() {
        assert!(is_present("https://example.nl"));
        assert!(!is_present(""));
        assert!(!is_present("   "));
        assert!(!is_present("Not found"));
    }

    #[test]
    fn phase_names_are_stable() {
        assert_eq!(Phase::Website.as_str(), "website");
        assert_eq!(Phase::Email.as_str(), "email");
        assert_eq!(Phase::Phone.as_str(), "phone");
    }
}
