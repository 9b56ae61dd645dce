// src/extract/email.rs

//! Email extraction, filtering and selection.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::is_present;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}").expect("valid regex")
});

/// Substrings that mark an address as a placeholder, an asset filename or a
/// platform address rather than a real contact.
const EXCLUDE_PATTERNS: &[&str] = &[
    ".png",
    ".jpg",
    ".gif",
    ".svg",
    ".jpeg",
    ".webp",
    "example.",
    "your@",
    "email@",
    "name@",
    "user@",
    "test@",
    "sample@",
    "demo@",
    "@example",
    "@test",
    "test.com",
    "domain.com",
    "yourcompany.",
    "company.com",
    "website.com",
    "wixpress.com",
    "sentry.io",
    "wordpress.com",
    "squarespace.com",
    "noreply@",
    "no-reply@",
    "donotreply@",
    "support@google",
    "support@facebook",
];

/// Local parts tried in order when several valid addresses remain.
const PRIORITY_PREFIXES: &[&str] = &[
    "info@", "contact@", "hello@", "office@", "admin@", "sales@",
];

/// Collect valid, lowercased addresses from text, deduplicated in discovery
/// order.
pub fn find_addresses(text: &str) -> Vec<String> {
    let mut seen = Vec::new();
    for m in EMAIL_RE.find_iter(text) {
        let email = m.as_str().to_lowercase();
        if EXCLUDE_PATTERNS.iter().any(|excl| email.contains(excl)) {
            continue;
        }
        if !seen.contains(&email) {
            seen.push(email);
        }
    }
    seen
}

/// Extract the best email from content, preferring addresses on the target
/// website's domain when one is known.
pub fn extract_email(content: &str, website: &str) -> Option<String> {
    let candidates = find_addresses(content);
    if candidates.is_empty() {
        return None;
    }

    let domain = bare_domain(website);
    select_best(&candidates, &domain)
}

/// Selection preference: on-domain addresses first, priority local parts
/// within each set, discovery order as the final tiebreak.
fn select_best(candidates: &[String], domain: &str) -> Option<String> {
    if !domain.is_empty() {
        let matching: Vec<&String> = candidates.iter().filter(|e| e.contains(domain)).collect();

        for prefix in PRIORITY_PREFIXES {
            if let Some(email) = matching.iter().find(|e| e.starts_with(prefix)) {
                return Some((*email).clone());
            }
        }
        if let Some(email) = matching.first() {
            return Some((*email).clone());
        }
    }

    for prefix in PRIORITY_PREFIXES {
        if let Some(email) = candidates.iter().find(|e| e.starts_with(prefix)) {
            return Some(email.clone());
        }
    }

    candidates.first().cloned()
}

/// Generate a probable (unverified) email from a website domain.
///
/// Returns an empty string when the website is absent, the "Not found"
/// sentinel, or yields no dotted domain. The result must never be exported
/// as a confirmed address.
pub fn generate_probable_email(website: &str, prefix: &str) -> String {
    if !is_present(website) {
        return String::new();
    }

    let domain = bare_domain(website);
    if domain.is_empty() {
        return String::new();
    }

    format!("{prefix}@{domain}")
}

/// Strip scheme, `www.`, path and port from a URL; empty when no dotted
/// domain remains.
pub fn bare_domain(url: &str) -> String {
    let domain = url.to_lowercase();
    let domain = domain
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .trim_start_matches("www.");
    let domain = domain.split('/').next().unwrap_or("");
    let domain = domain.split(':').next().unwrap_or("");

    if domain.contains('.') {
        domain.to_string()
    } else {
        String::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_single_address() {
        assert_eq!(
            extract_email("Contact us at info@x.nl", ""),
            Some("info@x.nl".to_string())
        );
    }

    #[test]
    fn priority_prefix_wins_over_discovery_order() {
        let content = "Reach john@x.nl or info@x.nl";
        assert_eq!(extract_email(content, ""), Some("info@x.nl".to_string()));
    }

    #[test]
    fn on_domain_address_beats_off_domain_priority_prefix() {
        let content = "info@platform.com en verkoop@bakkerij.nl";
        assert_eq!(
            extract_email(content, "https://www.bakkerij.nl"),
            Some("verkoop@bakkerij.nl".to_string())
        );
    }

    #[test]
    fn placeholder_and_asset_addresses_are_rejected() {
        assert!(extract_email("your@email.com noreply@shop.nl", "").is_none());
        assert!(extract_email("icon@2x.png", "").is_none());
    }

    #[test]
    fn dedupes_preserving_discovery_order() {
        let found = find_addresses("a@x.nl b@x.nl a@x.nl");
        assert_eq!(found, vec!["a@x.nl".to_string(), "b@x.nl".to_string()]);
    }

    #[test]
    fn probable_email_from_website() {
        assert_eq!(
            generate_probable_email("https://www.example.nl", "info"),
            "info@example.nl"
        );
        assert_eq!(
            generate_probable_email("http://shop.example.nl/contact", "info"),
            "info@shop.example.nl"
        );
    }

    #[test]
    fn probable_email_empty_for_sentinel_or_dotless() {
        assert_eq!(generate_probable_email("Not found", "info"), "");
        assert_eq!(generate_probable_email("", "info"), "");
        assert_eq!(generate_probable_email("https://localhost", "info"), "");
    }

    #[test]
    fn bare_domain_strips_port_and_path() {
        assert_eq!(bare_domain("https://www.example.nl:8080/over-ons"), "example.nl");
        assert_eq!(bare_domain("no-dots"), "");
    }
}
