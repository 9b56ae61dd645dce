// src/services/phone.rs

//! Phone resolver: homepage scrape with contact-page fallback chain.

use crate::error::Result;
use crate::extract::phone::extract_phone;
use crate::services::{CONTACT_PATHS, RemoteSource};

/// Resolves a company's phone number from its website.
pub struct PhoneResolver<'a> {
    source: &'a dyn RemoteSource,
}

impl<'a> PhoneResolver<'a> {
    pub fn new(source: &'a dyn RemoteSource) -> Self {
        Self { source }
    }

    /// Scrape the homepage, then each contact path, stopping at the first
    /// page yielding a valid number.
    pub async fn resolve(&self, website: &str) -> Result<Option<String>> {
        if let Some(text) = self.source.fetch_text(website).await? {
            if let Some(phone) = extract_phone(&text) {
                return Ok(Some(phone));
            }
        }

        let base = website.trim_end_matches('/');
        for path in CONTACT_PATHS {
            let contact_url = format!("{base}{path}");
            if let Some(text) = self.source.fetch_text(&contact_url).await? {
                if let Some(phone) = extract_phone(&text) {
                    return Ok(Some(phone));
                }
            }
        }

        Ok(None)
    }
}
