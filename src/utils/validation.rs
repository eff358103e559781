//! Centralized input limits and validation helpers.

/// Maximum number of hits read from a single table (DOS protection)
pub const MAX_HITS: usize = 5_000_000;

/// Maximum sample name length accepted from input files
pub const MAX_SAMPLE_NAME_LENGTH: usize = 255;

/// Check if adding another hit would exceed the maximum allowed.
///
/// Call this with the current count BEFORE adding a new hit.
/// Returns an error message if adding would exceed the limit, None if safe to add.
///
/// # Example
/// ```
/// use typing_resolver::utils::validation::{check_hit_limit, MAX_HITS};
///
/// assert!(check_hit_limit(0).is_none());
/// assert!(check_hit_limit(MAX_HITS).is_some());
/// ```
#[must_use]
pub fn check_hit_limit(count: usize) -> Option<String> {
    if count >= MAX_HITS {
        Some(format!(
            "Too many hits: adding another would exceed maximum of {MAX_HITS}"
        ))
    } else {
        None
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Empty sample name")]
    EmptySampleName,
    #[error("Sample name too long: exceeds {MAX_SAMPLE_NAME_LENGTH} characters")]
    SampleNameTooLong,
    #[error("Sample name '{0}' contains control characters")]
    InvalidSampleName(String),
}

/// Validate a sample name read from an input table.
///
/// Names become the first column of every report, so they must be
/// non-blank, reasonably short, and free of control characters.
///
/// # Errors
///
/// Returns `ValidationError::EmptySampleName`, `SampleNameTooLong` or
/// `InvalidSampleName`.
pub fn validate_sample_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptySampleName);
    }
    if name.len() > MAX_SAMPLE_NAME_LENGTH {
        return Err(ValidationError::SampleNameTooLong);
    }
    if name.chars().any(char::is_control) {
        return Err(ValidationError::InvalidSampleName(name.escape_default().to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_hit_limit() {
        assert!(check_hit_limit(MAX_HITS - 1).is_none());
        let msg = check_hit_limit(MAX_HITS).unwrap();
        assert!(msg.contains("5000000"));
    }

    #[test]
    fn test_validate_sample_name() {
        assert!(validate_sample_name("2014-SEQ-0276").is_ok());
        assert_eq!(validate_sample_name("  "), Err(ValidationError::EmptySampleName));
        assert_eq!(
            validate_sample_name(&"x".repeat(MAX_SAMPLE_NAME_LENGTH + 1)),
            Err(ValidationError::SampleNameTooLong)
        );
        assert!(matches!(
            validate_sample_name("bad\tname"),
            Err(ValidationError::InvalidSampleName(_))
        ));
    }
}
