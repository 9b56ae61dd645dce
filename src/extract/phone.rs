// src/extract/phone.rs

//! Dutch phone number extraction and normalization.

use std::sync::LazyLock;

use regex::Regex;

/// National format matchers, tried in order: international prefix form,
/// area-code landline, mobile prefix, parenthetical area code, bare
/// 10-digit.
static DUTCH_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"\+31[\s.\-]?(?:\(0\))?[\s.\-]?\d{1,2}[\s.\-]?\d{3}[\s.\-]?\d{4}",
        r"0\d{2}[\s.\-]?\d{3}[\s.\-]?\d{4}",
        r"06[\s.\-]?\d{4}[\s.\-]?\d{4}",
        r"\(0\d{2}\)[\s.\-]?\d{3}[\s.\-]?\d{4}",
        r"0\d{9}",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid regex"))
    .collect()
});

/// Extract the first valid Dutch phone number from content, in 3-3-4
/// display format (e.g. `020-123 4567`).
pub fn extract_phone(content: &str) -> Option<String> {
    if content.is_empty() {
        return None;
    }

    let mut valid = Vec::new();
    for pattern in DUTCH_PATTERNS.iter() {
        for m in pattern.find_iter(content) {
            if let Some(digits) = normalize(m.as_str()) {
                if !valid.contains(&digits) {
                    valid.push(digits);
                }
            }
        }
    }

    valid.first().map(|digits| format_phone(digits))
}

/// Strip separators, rewrite the international prefix to the national
/// leading zero, and require exactly 10 digits starting with 0.
fn normalize(raw: &str) -> Option<String> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, ' ' | '.' | '-' | '(' | ')'))
        .collect();

    let national = match cleaned.strip_prefix("+31") {
        Some(rest) => format!("0{rest}"),
        None => cleaned,
    };

    if national.len() == 10
        && national.starts_with('0')
        && national.chars().all(|c| c.is_ascii_digit())
    {
        Some(national)
    } else {
        None
    }
}

/// Group a 10-digit national number as 3-3-4.
fn format_phone(digits: &str) -> String {
    format!("{}-{} {}", &digits[..3], &digits[3..6], &digits[6..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_landline() {
        assert_eq!(
            extract_phone("Bel ons op 020-123 4567"),
            Some("020-123 4567".to_string())
        );
    }

    #[test]
    fn normalizes_international_prefix() {
        assert_eq!(
            extract_phone("Call +31 20 123 4567"),
            Some("020-123 4567".to_string())
        );
    }

    #[test]
    fn extracts_mobile() {
        assert_eq!(
            extract_phone("Mobiel: 06 1234 5678"),
            Some("061-234 5678".to_string())
        );
    }

    #[test]
    fn parenthetical_area_code() {
        assert_eq!(
            extract_phone("Tel (020) 123 4567"),
            Some("020-123 4567".to_string())
        );
    }

    #[test]
    fn rejects_wrong_length_and_foreign_numbers() {
        assert!(extract_phone("Call 020-123 456").is_none());
        assert!(extract_phone("Call +49 30 123456").is_none());
        assert!(extract_phone("").is_none());
    }

    #[test]
    fn first_match_wins_over_later_numbers() {
        let text = "Hoofdkantoor 020-123 4567, filiaal 010-765 4321";
        assert_eq!(extract_phone(text), Some("020-123 4567".to_string()));
    }
}
