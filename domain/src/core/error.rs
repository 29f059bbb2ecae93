//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Unknown profile: {0}")]
    UnknownProfile(String),

    #[error("No responses to reconcile")]
    EmptyBallot,

    #[error("Ballot has {payloads} payloads but {weights} weights")]
    WeightMismatch { payloads: usize, weights: usize },

    #[error("Similarity threshold must be within 0.0..=1.0, got {0}")]
    InvalidThreshold(f64),

    #[error("Invalid question: {0}")]
    InvalidQuestion(String),

    #[error("Invalid consensus: {0}")]
    InvalidConsensus(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            DomainError::UnknownProfile("turbo".to_string()).to_string(),
            "Unknown profile: turbo"
        );
        assert_eq!(
            DomainError::WeightMismatch {
                payloads: 3,
                weights: 2
            }
            .to_string(),
            "Ballot has 3 payloads but 2 weights"
        );
    }
}
