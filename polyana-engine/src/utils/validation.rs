//! Input validation helpers
//!
//! Centralized text length constants and validation functions.
//! Limits are reasonable UX bounds; the store does not enforce any.

use crate::utils::AppError;

// ========== Text Length Limits ==========

/// Customer and operator names
pub const MAX_NAME_LEN: usize = 200;

/// Notes and free-form tags (booking note, shift note, source)
pub const MAX_NOTE_LEN: usize = 500;

/// Short identifiers: phone, box code, expense category
pub const MAX_SHORT_TEXT_LEN: usize = 100;

// ========== Validation Helpers ==========

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

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}

/// Validate a positive money amount (sign is carried by the transaction
/// kind, never by the stored number).
pub fn validate_positive_amount(amount: i64, field: &str) -> Result<(), AppError> {
    if amount <= 0 {
        return Err(AppError::validation(format!(
            "{field} must be positive: {amount}"
        )));
    }
    Ok(())
}

/// Validate a discount percent (0-100 inclusive).
pub fn validate_percent(pct: u32) -> Result<(), AppError> {
    if pct > 100 {
        return Err(AppError::validation(format!(
            "Discount percent out of range: {pct}"
        )));
    }
    Ok(())
}
