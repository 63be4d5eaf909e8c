//! Input validation helpers
//!
//! Centralized text length constants and validation functions.
//! SQLite TEXT has no built-in length enforcement, so limits are applied
//! here before anything reaches the store.

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// POI names
pub const MAX_NAME_LEN: usize = 200;

/// Descriptions
pub const MAX_DESCRIPTION_LEN: usize = 2000;

/// Single tag
pub const MAX_TAG_LEN: usize = 100;

/// Comma-separated tag string as submitted by the admin form
pub const MAX_TAGS_LEN: usize = 1000;

/// Image references / URLs
pub const MAX_IMAGE_LEN: usize = 2048;

// ── Validation helpers (CRUD handlers) ──────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate an "HH:MM" opening-hours field.
pub fn validate_hhmm(value: &str, field: &str) -> Result<(), AppError> {
    if !crate::utils::time::is_valid_hhmm(value) {
        return Err(AppError::validation(format!(
            "{field} must be a zero-padded HH:MM time, got '{value}'"
        )));
    }
    Ok(())
}

/// Parse a non-negative integer field submitted as text.
pub fn parse_non_negative(value: &str, field: &str) -> Result<i64, AppError> {
    let parsed: i64 = value
        .trim()
        .parse()
        .map_err(|_| AppError::validation(format!("{field} must be a number, got '{value}'")))?;
    if parsed < 0 {
        return Err(AppError::validation(format!(
            "{field} must not be negative"
        )));
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_text() {
        assert!(validate_required_text("Splash Mountain", "name", MAX_NAME_LEN).is_ok());
        assert!(validate_required_text("   ", "name", MAX_NAME_LEN).is_err());
        assert!(validate_required_text(&"x".repeat(201), "name", MAX_NAME_LEN).is_err());
    }

    #[test]
    fn test_parse_non_negative() {
        assert_eq!(parse_non_negative("120", "requiredMinLength").unwrap(), 120);
        assert_eq!(parse_non_negative(" 0 ", "requiredMinLength").unwrap(), 0);
        assert!(parse_non_negative("-5", "requiredMinLength").is_err());
        assert!(parse_non_negative("tall", "requiredMinLength").is_err());
    }
}
