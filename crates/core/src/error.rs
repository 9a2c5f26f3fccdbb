//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Infrastructure failures (files, serialization) are carried as rendered
/// messages so the error stays `Clone` and comparable in tests.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A referenced item does not exist in the catalog.
    #[error("not found: {0}")]
    NotFound(String),

    /// A star count outside the rating scale.
    #[error("invalid rating input: {stars} stars (expected 1..={max})")]
    InvalidRatingInput { stars: i32, max: usize },

    /// A snapshot or report file could not be read or written.
    #[error("io failure: {0}")]
    Io(String),

    /// Persisted data does not have the expected structure.
    #[error("serialization failure: {0}")]
    Serialization(String),

    /// A value failed validation (e.g. malformed input).
    #[error("validation failed: {0}")]
    Validation(String),

    /// Shared state is unusable (a lock was poisoned by a panicking holder).
    #[error("unavailable: {0}")]
    Unavailable(String),
}

impl DomainError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn invalid_rating(stars: i32, max: usize) -> Self {
        Self::InvalidRatingInput { stars, max }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }

    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    /// Whether the caller can fix the failure by changing its input.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_) | Self::InvalidRatingInput { .. } | Self::Validation(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_rating_message_names_the_range() {
        let err = DomainError::invalid_rating(6, 5);
        assert_eq!(err.to_string(), "invalid rating input: 6 stars (expected 1..=5)");
    }

    #[test]
    fn caller_errors_are_distinguished_from_infrastructure_failures() {
        assert!(DomainError::not_found("item 7").is_caller_error());
        assert!(DomainError::invalid_rating(0, 5).is_caller_error());
        assert!(!DomainError::io("disk full").is_caller_error());
        assert!(!DomainError::serialization("bad json").is_caller_error());
        assert!(!DomainError::unavailable("poisoned").is_caller_error());
    }
}
