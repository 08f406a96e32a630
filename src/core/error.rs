use thiserror::Error;

/// Errors surfaced by the matching engine
///
/// All of these are caller-input problems. The engine is deterministic, so
/// none of them are worth retrying.
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("Type constraint violated: expected an array of candidates, got {found}")]
    TypeConstraint { found: &'static str },

    #[error("Invalid candidate record: {0}")]
    InvalidCandidate(#[from] serde_json::Error),

    #[error("Question weights must sum to 100, got {0}")]
    InvalidWeights(u32),
}

impl MatchError {
    /// Stable machine-readable code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            MatchError::TypeConstraint { .. } => "type_constraint",
            MatchError::InvalidCandidate(_) => "invalid_candidate",
            MatchError::InvalidWeights(_) => "invalid_weights",
        }
    }
}
