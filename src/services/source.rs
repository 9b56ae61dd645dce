// src/services/source.rs

//! Source client: structured web search and page-to-text scraping.
//!
//! Both operations go through a zone-based backend request API when a token
//! is configured, and fall back to unauthenticated direct requests when the
//! token is missing or the backend call fails. Neither operation surfaces
//! transient failures: a failed search is an empty list, a failed fetch is
//! `None`, and callers proceed with their other strategies.

use std::time::Duration;

use async_trait::async_trait;
use scraper::{Html, Selector};
use serde_json::json;
use url::Url;

use crate::error::Result;
use crate::extract::text::html_to_text;
use crate::models::Config;

/// One structured search result.
#[derive(Debug, Clone, Default)]
pub struct SearchHit {
    pub url: String,
    pub title: String,
    pub snippet: String,
}

/// Remote operations the resolvers depend on.
///
/// The production implementation is [`SourceClient`]; tests substitute
/// scripted fakes, including ones that return `Err` to exercise the
/// orchestrator's failure boundary.
#[async_trait]
pub trait RemoteSource: Send + Sync {
    /// Search the web, returning an ordered, deduplicated result list.
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>>;

    /// Fetch a URL and normalize it to plain text; `None` on any failure.
    async fn fetch_text(&self, url: &str) -> Result<Option<String>>;
}

/// Maximum number of search hits returned per query.
const MAX_RESULTS: usize = 10;

/// Domains never returned as search hits: search engines, social networks
/// and media hosts are not company websites.
const SKIP_DOMAINS: &[&str] = &[
    "google.",
    "gstatic.",
    "youtube.",
    "facebook.",
    "twitter.",
    "linkedin.",
    "instagram.",
    "wikipedia.",
];

/// Production source client backed by the scraping API with direct-fetch
/// fallback.
pub struct SourceClient {
    client: reqwest::Client,
    api_url: String,
    web_zone: String,
    serp_zone: String,
    api_token: Option<String>,
    backend_timeout: Duration,
}

impl SourceClient {
    /// Build a client from configuration. Warns once when no API token is
    /// available; all calls then use the direct path.
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(&config.http.user_agent)
            .timeout(Duration::from_secs(config.http.timeout_secs))
            .build()?;

        let api_token = config.backend.resolve_token();
        if api_token.is_none() {
            log::warn!(
                "Backend API token not configured ({}); using direct requests only",
                crate::models::BackendConfig::TOKEN_ENV
            );
        }

        Ok(Self {
            client,
            api_url: config.backend.api_url.clone(),
            web_zone: config.backend.web_zone.clone(),
            serp_zone: config.backend.serp_zone.clone(),
            api_token,
            backend_timeout: Duration::from_secs(config.http.backend_timeout_secs),
        })
    }

    /// Fetch raw markup for a URL through the backend request API.
    async fn backend_fetch(&self, token: &str, zone: &str, target: &str) -> Result<String> {
        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(token)
            .timeout(self.backend_timeout)
            .json(&json!({ "zone": zone, "url": target, "format": "raw" }))
            .send()
            .await?
            .error_for_status()?;

        Ok(response.text().await?)
    }

    /// Fetch raw markup with a plain unauthenticated request.
    async fn direct_fetch(&self, target: &str) -> Result<String> {
        let response = self
            .client
            .get(target)
            .header("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8")
            .header("Accept-Language", "en-US,en;q=0.5")
            .send()
            .await?
            .error_for_status()?;

        Ok(response.text().await?)
    }

    /// Backend first, direct second; `None` when both paths fail.
    async fn fetch_markup(&self, zone: &str, target: &str) -> Option<String> {
        if let Some(token) = &self.api_token {
            match self.backend_fetch(token, zone, target).await {
                Ok(html) => return Some(html),
                Err(e) => log::debug!("Backend fetch failed for {}: {}", target, e),
            }
        }

        match self.direct_fetch(target).await {
            Ok(html) => Some(html),
            Err(e) => {
                log::debug!("Direct fetch failed for {}: {}", target, e);
                None
            }
        }
    }
}

#[async_trait]
impl RemoteSource for SourceClient {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>> {
        let search_url = Url::parse_with_params("https://www.google.com/search", [("q", query)])
            .expect("valid search url");

        let hits = match self.fetch_markup(&self.serp_zone, search_url.as_str()).await {
            Some(html) => parse_search_results(&html),
            None => Vec::new(),
        };

        if hits.is_empty() {
            log::debug!("Search yielded no results for '{}'", query);
        }
        Ok(hits)
    }

    async fn fetch_text(&self, url: &str) -> Result<Option<String>> {
        if Url::parse(url).is_err() {
            log::debug!("Skipping malformed URL: {}", url);
            return Ok(None);
        }

        let text = self
            .fetch_markup(&self.web_zone, url)
            .await
            .map(|html| html_to_text(&html));
        Ok(text)
    }
}

/// Parse raw search-engine markup into outbound links.
///
/// Handles both `/url?q=` redirect hrefs and direct anchors; anchor text
/// becomes the hit title. Blocked domains are dropped, duplicates keep
/// their first position, and the list is capped at [`MAX_RESULTS`].
fn parse_search_results(html: &str) -> Vec<SearchHit> {
    let document = Html::parse_document(html);
    let anchor_sel = Selector::parse("a[href]").expect("valid selector");

    let mut hits: Vec<SearchHit> = Vec::new();
    for anchor in document.select(&anchor_sel) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };

        let candidate = match href.strip_prefix("/url?q=") {
            Some(rest) => rest,
            None => href,
        };
        // Drop tracking parameters.
        let candidate = candidate.split('&').next().unwrap_or("");

        if !candidate.starts_with("http") {
            continue;
        }
        let lower = candidate.to_lowercase();
        if SKIP_DOMAINS.iter().any(|d| lower.contains(d)) {
            continue;
        }
        if hits.iter().any(|h| h.url == candidate) {
            continue;
        }

        let title = anchor.text().collect::<String>().trim().to_string();
        hits.push(SearchHit {
            url: candidate.to_string(),
            title,
            snippet: String::new(),
        });

        if hits.len() >= MAX_RESULTS {
            break;
        }
    }

    hits
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_redirect_and_direct_anchors() {
        let html = r#"
            <a href="/url?q=https://bakkerij.nl/&amp;sa=U">Bakkerij Jansen</a>
            <a href="https://www.slagerij.nl/contact">Slagerij</a>
        "#;
        let hits = parse_search_results(html);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].url, "https://bakkerij.nl/");
        assert_eq!(hits[0].title, "Bakkerij Jansen");
        assert_eq!(hits[1].url, "https://www.slagerij.nl/contact");
    }

    #[test]
    fn drops_blocked_domains_and_non_http() {
        let html = r#"
            <a href="https://www.facebook.com/bakkerij">FB</a>
            <a href="https://nl.wikipedia.org/wiki/Bakkerij">Wiki</a>
            <a href="/settings">Settings</a>
            <a href="https://bakkerij.nl/">Site</a>
        "#;
        let hits = parse_search_results(html);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].url, "https://bakkerij.nl/");
    }

    #[test]
    fn dedupes_preserving_first_position() {
        let html = r#"
            <a href="https://a.nl/">First</a>
            <a href="https://b.nl/">Second</a>
            <a href="https://a.nl/">Again</a>
        "#;
        let hits = parse_search_results(html);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].url, "https://a.nl/");
        assert_eq!(hits[1].url, "https://b.nl/");
    }

    #[test]
    fn caps_result_list() {
        let mut html = String::new();
        for i in 0..15 {
            html.push_str(&format!(r#"<a href="https://site{i}.nl/">S{i}</a>"#));
        }
        assert_eq!(parse_search_results(&html).len(), 10);
    }
}
