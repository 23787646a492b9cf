//! Input normalization shared by the CLI and the web handlers.

use crate::core::types::{SymptomId, Threshold};

/// Maximum length accepted for ids, names and disease names
pub const MAX_FIELD_LENGTH: usize = 200;

/// Maximum number of symptoms in one selection or rule
pub const MAX_SELECTION: usize = 1_000;

/// Normalize the id of a symptom being added: trimmed and upper-cased.
///
/// Ids that already exist compare exactly, so lookups, deletes and
/// selections only trim their input (see [`collect_symptom_ids`]).
///
/// # Examples
///
/// ```
/// use symptom_solver::utils::validation::normalize_symptom_id;
///
/// assert_eq!(normalize_symptom_id("  g020 "), "G020");
/// ```
#[must_use]
pub fn normalize_symptom_id(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Normalize a user-entered display name or disease name (trimmed only)
#[must_use]
pub fn normalize_name(raw: &str) -> String {
    raw.trim().to_string()
}

/// Check a free-text field against [`MAX_FIELD_LENGTH`].
/// Returns an error message if it is too long.
#[must_use]
pub fn check_field_length(field: &str, value: &str) -> Option<String> {
    if value.chars().count() > MAX_FIELD_LENGTH {
        Some(format!(
            "{field} exceeds maximum length of {MAX_FIELD_LENGTH} characters"
        ))
    } else {
        None
    }
}

/// Convert raw id strings into symptom ids, dropping blanks and duplicates
/// while keeping the first-seen order.
pub fn collect_symptom_ids<'a, I>(raw: I) -> Vec<SymptomId>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut ids: Vec<SymptomId> = Vec::new();
    for value in raw {
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        let id = SymptomId::new(value);
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    ids
}

/// Parse a threshold percentage, rejecting values outside `0..=100`.
///
/// # Errors
///
/// Returns a message suitable for display if the value is not a number or
/// is out of range.
pub fn parse_threshold(s: &str) -> Result<Threshold, String> {
    let value: f64 = s
        .trim()
        .trim_end_matches('%')
        .parse()
        .map_err(|_| format!("'{s}' is not a number"))?;
    Threshold::new(value).ok_or_else(|| format!("threshold must be between 0 and 100, got {value}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize_symptom_id("g001"), "G001");
        assert_eq!(normalize_symptom_id("\tG002\n"), "G002");
        assert_eq!(normalize_name("  Stomach cramps "), "Stomach cramps");
    }

    #[test]
    fn test_check_field_length() {
        assert!(check_field_length("name", "Fever").is_none());
        let long = "x".repeat(MAX_FIELD_LENGTH + 1);
        assert!(check_field_length("name", &long).is_some());
    }

    #[test]
    fn test_collect_symptom_ids() {
        let ids = collect_symptom_ids(["G002", " ", "G001", "G002", " G003 "]);
        let raw: Vec<_> = ids.iter().map(SymptomId::as_str).collect();
        assert_eq!(raw, vec!["G002", "G001", "G003"]);
    }

    #[test]
    fn test_parse_threshold() {
        assert!((parse_threshold("50").unwrap().value() - 50.0).abs() < f64::EPSILON);
        assert!((parse_threshold("12.5%").unwrap().value() - 12.5).abs() < f64::EPSILON);
        assert!(parse_threshold("101").is_err());
        assert!(parse_threshold("-1").is_err());
        assert!(parse_threshold("abc").is_err());
    }
}
