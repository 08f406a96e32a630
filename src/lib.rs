//! Ishqrisk matchmaker - daily pairing engine for the Ishqrisk dating app
//!
//! The engine takes a pool of normalized candidates and decides who gets
//! paired today: hard-constraint filtering, weighted questionnaire scoring,
//! mutual-best rounds, and a greedy fallback pass over whoever is left.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{calculate_compatibility_score, is_compatible, MatchError, Matcher};
pub use crate::models::{Candidate, MatchResult, Pair, RawProfile, ScoringWeights};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let result = Matcher::default().find_matches(&[]);
        assert!(result.is_empty());
    }
}
