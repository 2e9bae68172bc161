//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A policy or chat was configured in a way that can never work.
    ///
    /// Not recoverable at runtime: the caller has to fix the configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Invalid participant id: {0}")]
    InvalidParticipant(String),
}

impl DomainError {
    /// Check if this error is a configuration problem
    pub fn is_configuration(&self) -> bool {
        matches!(self, DomainError::InvalidConfiguration(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_configuration_display() {
        let error = DomainError::InvalidConfiguration("no authorized participants".to_string());
        assert_eq!(
            error.to_string(),
            "Invalid configuration: no authorized participants"
        );
    }

    #[test]
    fn test_is_configuration_check() {
        assert!(DomainError::InvalidConfiguration("x".to_string()).is_configuration());
        assert!(!DomainError::InvalidParticipant("x".to_string()).is_configuration());
    }
}
