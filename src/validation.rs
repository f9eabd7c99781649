//! Field rules used by every validated setter and constructor.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ValidationError;

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

/// Trims `value` and rejects it if nothing is left.
pub fn non_empty(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::empty_field(field));
    }
    Ok(trimmed.to_string())
}

/// A finite number strictly greater than zero.
pub fn positive(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ValidationError::NotPositive {
            field,
            min: 0.0,
            actual: value,
        });
    }
    Ok(value)
}

pub fn positive_count(field: &'static str, value: u32) -> Result<u32, ValidationError> {
    if value == 0 {
        return Err(ValidationError::NotPositive {
            field,
            min: 0.0,
            actual: 0.0,
        });
    }
    Ok(value)
}

/// Inclusive bounds check.
pub fn in_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<f64, ValidationError> {
    if !value.is_finite() || value < min || value > max {
        return Err(ValidationError::out_of_range(field, min, max, value));
    }
    Ok(value)
}

/// Inclusive bounds check for whole counts.
pub fn count_in_range(
    field: &'static str,
    value: u32,
    min: u32,
    max: u32,
) -> Result<u32, ValidationError> {
    if value < min || value > max {
        return Err(ValidationError::out_of_range(
            field,
            min as f64,
            max as f64,
            value as f64,
        ));
    }
    Ok(value)
}

/// Basic `local@domain.tld` shape; stored lowercase.
pub fn email(value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::empty_field("email"));
    }
    if !EMAIL_PATTERN.is_match(trimmed) {
        return Err(ValidationError::invalid_format(
            "email",
            format!("'{}' is not an email address", trimmed),
        ));
    }
    Ok(trimmed.to_lowercase())
}

/// Empty phone input clears the field.
pub fn phone(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
}
