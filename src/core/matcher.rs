use serde_json::Value;

use crate::core::{
    error::MatchError,
    fallback::FallbackPairer,
    filters::is_compatible,
    matrix::{CompatibilityMatrix, UnmatchedPool},
    mutual::MutualMatcher,
    scoring::calculate_compatibility_score,
};
use crate::models::{Candidate, MatchResult, Pair, ScoringWeights};

/// Main matching orchestrator
///
/// # Pipeline Stages
/// 1. Eligibility filter (approved and not yet matched)
/// 2. Pairwise compatibility matrix (hard constraints + scoring)
/// 3. Mutual-best rounds
/// 4. Greedy fallback over the leftovers
///
/// The matcher holds no per-run state and can be shared freely between threads.
#[derive(Debug, Clone)]
pub struct Matcher {
    weights: ScoringWeights,
}

impl Matcher {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn with_default_weights() -> Self {
        Self {
            weights: ScoringWeights::default(),
        }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    pub fn is_compatible(&self, user1: &Candidate, user2: &Candidate) -> bool {
        is_compatible(user1, user2)
    }

    pub fn score(&self, user1: &Candidate, user2: &Candidate) -> f64 {
        calculate_compatibility_score(user1, user2, &self.weights)
    }

    /// Pair up the candidate pool
    ///
    /// # Arguments
    /// * `candidates` - Normalized candidates, in the order used for tie-breaking
    ///
    /// # Returns
    /// MatchResult with mutual-best pairs first, then fallback pairs
    pub fn find_matches(&self, candidates: &[Candidate]) -> MatchResult {
        let eligible: Vec<&Candidate> = candidates.iter().filter(|c| c.is_available()).collect();

        tracing::info!(
            "Matching {} eligible candidates (from {} submitted)",
            eligible.len(),
            candidates.len()
        );

        let mut result = MatchResult::default();
        if eligible.len() < 2 {
            return result;
        }

        let matrix = CompatibilityMatrix::build(&eligible, &self.weights);
        tracing::debug!(
            "Compatibility matrix built: {} of {} ordered pairs eligible",
            matrix.eligible_pairs(),
            eligible.len() * (eligible.len() - 1)
        );

        let mut pool = UnmatchedPool::new(eligible.len());

        let mutual_pairs = MutualMatcher::new(matrix).run(&mut pool);
        for pair in &mutual_pairs {
            result.push(Self::pair_of(&eligible, pair.first, pair.second));
        }

        let fallback_pairs = FallbackPairer::new(&eligible).run(&mut pool);
        for &(first, second) in &fallback_pairs {
            result.push(Self::pair_of(&eligible, first, second));
        }

        tracing::info!(
            "Matching complete: {} mutual pairs, {} fallback pairs, {} left unmatched",
            mutual_pairs.len(),
            fallback_pairs.len(),
            pool.remaining()
        );

        result
    }

    /// Pair up a pool given as untyped JSON
    ///
    /// Input that is not an array is rejected before any matching happens.
    pub fn find_matches_value(&self, input: &Value) -> Result<MatchResult, MatchError> {
        if !input.is_array() {
            return Err(MatchError::TypeConstraint {
                found: json_kind(input),
            });
        }

        let candidates: Vec<Candidate> = serde_json::from_value(input.clone())?;
        Ok(self.find_matches(&candidates))
    }

    fn pair_of(eligible: &[&Candidate], first: usize, second: usize) -> Pair {
        Pair {
            id1: eligible[first].id.clone(),
            id2: eligible[second].id.clone(),
        }
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_default_weights()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AgePreference, Answer, Intent};
    use serde_json::json;

    fn create_candidate(id: &str, gender: &str, gender_preference: &str) -> Candidate {
        Candidate {
            id: id.to_string(),
            nickname: None,
            age: Some(21),
            gender: Some(gender.to_string()),
            gender_preference: Some(gender_preference.to_string()),
            year: Some("2nd".to_string()),
            year_preference: vec![],
            age_preference: AgePreference::Any,
            opento: Intent::Open,
            approved: true,
            is_matched: false,
            interests: vec![Some(Answer::A); 10],
        }
    }

    #[test]
    fn test_find_matches_basic() {
        let matcher = Matcher::with_default_weights();
        let candidates = vec![
            create_candidate("1", "male", "female"),
            create_candidate("2", "female", "male"),
        ];

        let result = matcher.find_matches(&candidates);

        assert_eq!(result.len(), 1);
        assert_eq!(
            result.pairs[0],
            Pair {
                id1: "1".to_string(),
                id2: "2".to_string(),
            }
        );
        assert_eq!(matcher.score(&candidates[0], &candidates[1]), 100.0);
    }

    #[test]
    fn test_ineligible_candidates_skipped() {
        let matcher = Matcher::default();
        let mut unapproved = create_candidate("1", "male", "female");
        unapproved.approved = false;
        let mut already_matched = create_candidate("2", "male", "female");
        already_matched.is_matched = true;
        let candidates = vec![unapproved, already_matched, create_candidate("3", "female", "male")];

        let result = matcher.find_matches(&candidates);

        assert!(result.is_empty());
    }

    #[test]
    fn test_empty_pool() {
        let result = Matcher::default().find_matches(&[]);
        assert!(result.is_empty());
        assert!(result.matched_ids.is_empty());
    }

    #[test]
    fn test_rejects_non_array_input() {
        let matcher = Matcher::default();

        let err = matcher.find_matches_value(&json!({"id": "1"})).unwrap_err();
        assert!(matches!(err, MatchError::TypeConstraint { found: "object" }));

        let err = matcher.find_matches_value(&json!("users")).unwrap_err();
        assert!(matches!(err, MatchError::TypeConstraint { found: "string" }));
    }

    #[test]
    fn test_rejects_malformed_candidate() {
        let err = Matcher::default()
            .find_matches_value(&json!([{"age": 20}]))
            .unwrap_err();
        assert!(matches!(err, MatchError::InvalidCandidate(_)));
    }

    #[test]
    fn test_accepts_json_array() {
        let input = json!([
            {"id": "1", "age": 20, "gender": "male", "genderPreference": "female",
             "year": "1st", "approved": true, "interests": ["A", "B"]},
            {"id": "2", "age": 20, "gender": "female", "genderPreference": "male",
             "year": "1st", "approved": true, "interests": ["A", "B"]}
        ]);

        let result = Matcher::default().find_matches_value(&input).unwrap();
        assert_eq!(result.len(), 1);
        assert!(result.is_matched("1") && result.is_matched("2"));
    }
}
