// src/services/email.rs

//! Email resolver: search-snippet stage first, website scraping second.

use crate::error::Result;
use crate::extract::email::{extract_email, find_addresses};
use crate::services::{CONTACT_PATHS, RemoteSource, SearchHit};

/// Resolves a company's contact email.
pub struct EmailResolver<'a> {
    source: &'a dyn RemoteSource,
}

impl<'a> EmailResolver<'a> {
    pub fn new(source: &'a dyn RemoteSource) -> Self {
        Self { source }
    }

    /// Two-stage, first-match-wins resolution.
    ///
    /// Stage 1 mines search-result titles and snippets; stage 2 (only when
    /// stage 1 finds nothing and a website is known) scrapes the homepage
    /// and then the fixed contact-page paths.
    pub async fn resolve(
        &self,
        name: &str,
        city: &str,
        website: Option<&str>,
    ) -> Result<Option<String>> {
        if let Some(email) = self.search_stage(name, city).await? {
            log::debug!("Found email via search for {}: {}", name, email);
            return Ok(Some(email));
        }

        if let Some(site) = website {
            if let Some(email) = self.scrape_stage(site).await? {
                log::debug!("Found email via website for {}: {}", name, email);
                return Ok(Some(email));
            }
        }

        Ok(None)
    }

    async fn search_stage(&self, name: &str, city: &str) -> Result<Option<String>> {
        let queries = [
            format!("\"{name}\" email contact"),
            if city.trim().is_empty() {
                format!("\"{name}\" email")
            } else {
                format!("\"{name}\" {city} email")
            },
        ];

        for query in &queries {
            let hits = self.source.search(query).await?;
            if let Some(email) = email_from_hits(&hits, name) {
                return Ok(Some(email));
            }
        }
        Ok(None)
    }

    async fn scrape_stage(&self, website: &str) -> Result<Option<String>> {
        if let Some(text) = self.source.fetch_text(website).await? {
            if let Some(email) = extract_email(&text, website) {
                return Ok(Some(email));
            }
        }

        let base = website.trim_end_matches('/');
        for path in CONTACT_PATHS {
            let contact_url = format!("{base}{path}");
            if let Some(text) = self.source.fetch_text(&contact_url).await? {
                if let Some(email) = extract_email(&text, website) {
                    return Ok(Some(email));
                }
            }
        }

        Ok(None)
    }
}

/// Pick an address from search-hit text, preferring one whose domain
/// contains a company-name token (len > 3); else the first valid address.
fn email_from_hits(hits: &[SearchHit], name: &str) -> Option<String> {
    let mut candidates: Vec<String> = Vec::new();
    for hit in hits {
        for email in find_addresses(&format!("{} {}", hit.title, hit.snippet)) {
            if !candidates.contains(&email) {
                candidates.push(email);
            }
        }
    }

    if candidates.is_empty() {
        return None;
    }

    let name_lower = name.to_lowercase();
    let tokens: Vec<&str> = name_lower
        .split_whitespace()
        .filter(|t| t.len() > 3)
        .collect();

    for email in &candidates {
        let domain = email.split('@').nth(1).unwrap_or("");
        if tokens.iter().any(|t| domain.contains(t)) {
            return Some(email.clone());
        }
    }

    candidates.into_iter().next()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(title: &str, snippet: &str) -> SearchHit {
        SearchHit {
            url: String::new(),
            title: title.to_string(),
            snippet: snippet.to_string(),
        }
    }

    #[test]
    fn prefers_name_token_domain_over_earlier_hit() {
        let hits = vec![
            hit("Gids", "mail ons via lijst@verzamelgids.nl"),
            hit("Bakkerij Jansen", "contact: post@bakkerijjansen.nl"),
        ];
        assert_eq!(
            email_from_hits(&hits, "Bakkerij Jansen"),
            Some("post@bakkerijjansen.nl".to_string())
        );
    }

    #[test]
    fn falls_back_to_first_valid_address() {
        let hits = vec![hit("Gids", "mail ons via lijst@verzamelgids.nl")];
        assert_eq!(
            email_from_hits(&hits, "Onvindbaar BV"),
            Some("lijst@verzamelgids.nl".to_string())
        );
    }

    #[test]
    fn no_hits_no_email() {
        assert_eq!(email_from_hits(&[], "Bakkerij Jansen"), None);
        let noise = vec![hit("Platform", "noreply@platform.nl")];
        assert_eq!(email_from_hits(&noise, "Bakkerij Jansen"), None);
    }
}
