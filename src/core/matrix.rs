use crate::core::{filters::is_compatible, scoring::calculate_compatibility_score};
use crate::models::{Candidate, ScoringWeights};

/// Marker for a pair that fails the hard constraints
pub const INELIGIBLE: f64 = -1.0;

/// Dense pairwise compatibility scores for one matching run
///
/// Cell `(i, j)` holds `INELIGIBLE` or a score in `[0, 100]`, indexed by the
/// candidates' positions in the eligible pool. The diagonal is `INELIGIBLE`.
#[derive(Debug, Clone)]
pub struct CompatibilityMatrix {
    size: usize,
    scores: Vec<f64>,
}

impl CompatibilityMatrix {
    /// Score every ordered pair of candidates
    pub fn build(candidates: &[&Candidate], weights: &ScoringWeights) -> Self {
        let size = candidates.len();
        let mut scores = vec![INELIGIBLE; size * size];

        for (i, user1) in candidates.iter().enumerate() {
            for (j, user2) in candidates.iter().enumerate() {
                if i == j {
                    continue;
                }

                if is_compatible(user1, user2) {
                    scores[i * size + j] = calculate_compatibility_score(user1, user2, weights);
                }
            }
        }

        Self { size, scores }
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.scores[i * self.size + j]
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Number of ordered pairs that passed the hard constraints
    pub fn eligible_pairs(&self) -> usize {
        self.scores.iter().filter(|score| **score >= 0.0).count()
    }
}

/// Candidates still waiting for a partner, by pool position
#[derive(Debug, Clone)]
pub struct UnmatchedPool {
    matched: Vec<bool>,
    remaining: usize,
}

impl UnmatchedPool {
    pub fn new(size: usize) -> Self {
        Self {
            matched: vec![false; size],
            remaining: size,
        }
    }

    #[inline]
    pub fn contains(&self, index: usize) -> bool {
        !self.matched[index]
    }

    /// Remove both members of a committed pair
    pub fn commit(&mut self, first: usize, second: usize) {
        debug_assert!(first != second);
        debug_assert!(self.contains(first) && self.contains(second));

        self.matched[first] = true;
        self.matched[second] = true;
        self.remaining -= 2;
    }

    pub fn remaining(&self) -> usize {
        self.remaining
    }

    /// Unmatched positions in ascending order
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.matched
            .iter()
            .enumerate()
            .filter(|(_, matched)| !**matched)
            .map(|(index, _)| index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AgePreference, Answer, Intent};

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
    fn test_matrix_marks_ineligible_pairs() {
        let a = create_candidate("a", "male", "female");
        let b = create_candidate("b", "female", "male");
        let c = create_candidate("c", "male", "male");
        let pool = vec![&a, &b, &c];

        let matrix = CompatibilityMatrix::build(&pool, &ScoringWeights::default());

        assert_eq!(matrix.len(), 3);
        assert_eq!(matrix.get(0, 0), INELIGIBLE);
        assert_eq!(matrix.get(0, 1), 100.0);
        assert_eq!(matrix.get(1, 0), 100.0);
        assert_eq!(matrix.get(0, 2), INELIGIBLE);
        assert_eq!(matrix.get(2, 1), INELIGIBLE);
        assert_eq!(matrix.eligible_pairs(), 2);
    }

    #[test]
    fn test_pool_commit() {
        let mut pool = UnmatchedPool::new(4);
        assert_eq!(pool.remaining(), 4);

        pool.commit(1, 3);

        assert_eq!(pool.remaining(), 2);
        assert!(!pool.contains(1));
        assert_eq!(pool.iter().collect::<Vec<_>>(), vec![0, 2]);
    }
}
