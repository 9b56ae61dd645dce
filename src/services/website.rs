// src/services/website.rs

//! Website resolver: search queries plus heuristic candidate scoring.

use crate::error::Result;
use crate::extract::email::bare_domain;
use crate::services::{RemoteSource, SearchHit};

/// Domains that are never a company's own website: social networks,
/// directories, registries and the search engines themselves.
const EXCLUDE_DOMAINS: &[&str] = &[
    "facebook.com",
    "linkedin.com",
    "twitter.com",
    "instagram.com",
    "youtube.com",
    "tiktok.com",
    "pinterest.com",
    "x.com",
    "yelp.com",
    "yellowpages.com",
    "glassdoor.com",
    "indeed.com",
    "wikipedia.org",
    "crunchbase.com",
    "bloomberg.com",
    "kvk.nl",
    "openkvk.nl",
    "companyweb.be",
    "companyinfo.nl",
    "google.com",
    "google.nl",
    "bing.com",
];

/// Resolves a company's official website via web search.
pub struct WebsiteResolver<'a> {
    source: &'a dyn RemoteSource,
}

impl<'a> WebsiteResolver<'a> {
    pub fn new(source: &'a dyn RemoteSource) -> Self {
        Self { source }
    }

    /// Find the most likely official website, or `None`.
    pub async fn resolve(&self, name: &str, city: &str) -> Result<Option<String>> {
        let query = if city.trim().is_empty() {
            format!("{name} official website")
        } else {
            format!("{name} {city} official website")
        };

        let mut results = self.source.search(&query).await?;
        if results.is_empty() {
            // Simpler query as fallback.
            let fallback = if city.trim().is_empty() {
                name.to_string()
            } else {
                format!("{name} {city}")
            };
            results = self.source.search(&fallback).await?;
        }

        Ok(select_best_website(&results, name))
    }
}

/// Score candidates and return the winner, normalized to carry a scheme.
///
/// +10 per name token (len > 2) appearing in the candidate's domain, +5 for
/// a `.nl` domain, +3 for `.com`. The sort is stable: ties keep search
/// order.
fn select_best_website(results: &[SearchHit], name: &str) -> Option<String> {
    let name_lower = name.to_lowercase();
    let tokens: Vec<&str> = name_lower
        .split_whitespace()
        .filter(|t| t.len() > 2)
        .collect();

    let mut scored: Vec<(String, i32)> = Vec::new();
    for hit in results {
        if hit.url.is_empty() {
            continue;
        }
        let url_lower = hit.url.to_lowercase();
        if EXCLUDE_DOMAINS.iter().any(|excl| url_lower.contains(excl)) {
            continue;
        }

        let domain = bare_domain(&hit.url);
        let mut score = 0;
        for token in &tokens {
            if domain.contains(token) {
                score += 10;
            }
        }
        if domain.ends_with(".nl") {
            score += 5;
        } else if domain.ends_with(".com") {
            score += 3;
        }

        scored.push((hit.url.clone(), score));
    }

    scored.sort_by(|a, b| b.1.cmp(&a.1));

    scored.into_iter().next().map(|(url, _)| {
        if url.starts_with("http") {
            url
        } else {
            format!("https://{url}")
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(url: &str) -> SearchHit {
        SearchHit {
            url: url.to_string(),
            ..SearchHit::default()
        }
    }

    #[test]
    fn two_tokens_and_tld_bonus_outrank_one_token() {
        // Weaker candidate listed first: search order must not matter here.
        let results = vec![
            hit("https://jansen-webshop.org"),
            hit("https://bakkerij-jansen.nl"),
        ];
        assert_eq!(
            select_best_website(&results, "Bakkerij Jansen"),
            Some("https://bakkerij-jansen.nl".to_string())
        );
    }

    #[test]
    fn ties_keep_search_result_order() {
        let results = vec![hit("https://eerste.dev"), hit("https://tweede.dev")];
        assert_eq!(
            select_best_website(&results, "Onbekend"),
            Some("https://eerste.dev".to_string())
        );
    }

    #[test]
    fn excluded_domains_never_win() {
        let results = vec![
            hit("https://www.facebook.com/bakkerij-jansen"),
            hit("https://www.kvk.nl/bakkerij-jansen"),
        ];
        assert_eq!(select_best_website(&results, "Bakkerij Jansen"), None);
    }

    #[test]
    fn short_name_tokens_are_ignored() {
        // "De" (len 2) must not score; ".nl" bonus decides.
        let results = vec![hit("https://de-winkel.org"), hit("https://iets.nl")];
        assert_eq!(
            select_best_website(&results, "De Zaak"),
            Some("https://iets.nl".to_string())
        );
    }

    #[test]
    fn schemeless_winner_gets_https_prefix() {
        let results = vec![hit("bakkerij-jansen.nl")];
        assert_eq!(
            select_best_website(&results, "Bakkerij Jansen"),
            Some("https://bakkerij-jansen.nl".to_string())
        );
    }
}
