//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DomainError {
    #[error("Unknown message kind: {0}")]
    UnknownMessageKind(String),

    #[error("Unknown project type: {0}")]
    UnknownProjectKind(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_message_kind_display() {
        let error = DomainError::UnknownMessageKind("system".to_string());
        assert_eq!(error.to_string(), "Unknown message kind: system");
    }
}
