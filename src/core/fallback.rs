use crate::core::{filters::is_compatible, matrix::UnmatchedPool};
use crate::models::Candidate;

/// Greedy second pass over candidates left after the mutual-best rounds
///
/// Only the hard constraints are checked; scores are ignored. Each leftover
/// candidate, in input order, is paired with the first later leftover it is
/// compatible with. The result is maximal but not necessarily maximum.
pub struct FallbackPairer<'a> {
    candidates: &'a [&'a Candidate],
}

impl<'a> FallbackPairer<'a> {
    pub fn new(candidates: &'a [&'a Candidate]) -> Self {
        Self { candidates }
    }

    /// Pair the remaining candidates, returning pool positions of each pair
    pub fn run(&self, pool: &mut UnmatchedPool) -> Vec<(usize, usize)> {
        let remaining: Vec<usize> = pool.iter().collect();
        let mut pairs = Vec::new();

        for (offset, &user) in remaining.iter().enumerate() {
            if !pool.contains(user) {
                continue;
            }

            let partner = remaining[offset + 1..].iter().copied().find(|&other| {
                pool.contains(other) && is_compatible(self.candidates[user], self.candidates[other])
            });

            match partner {
                Some(other) => {
                    pool.commit(user, other);
                    tracing::debug!(
                        user1 = %self.candidates[user].id,
                        user2 = %self.candidates[other].id,
                        "Fallback pair committed"
                    );
                    pairs.push((user, other));
                }
                None => {
                    tracing::debug!(user = %self.candidates[user].id, "No compatible fallback partner");
                }
            }
        }

        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AgePreference, Intent};

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
            interests: vec![],
        }
    }

    #[test]
    fn test_pairs_first_compatible_later_candidate() {
        let a = create_candidate("a", "male", "female");
        let b = create_candidate("b", "male", "female");
        let c = create_candidate("c", "female", "male");
        let d = create_candidate("d", "female", "male");
        let candidates = vec![&a, &b, &c, &d];
        let mut pool = UnmatchedPool::new(4);

        let pairs = FallbackPairer::new(&candidates).run(&mut pool);

        assert_eq!(pairs, vec![(0, 2), (1, 3)]);
        assert_eq!(pool.remaining(), 0);
    }

    #[test]
    fn test_skips_already_matched() {
        let a = create_candidate("a", "male", "female");
        let b = create_candidate("b", "female", "male");
        let c = create_candidate("c", "female", "male");
        let candidates = vec![&a, &b, &c];
        let mut pool = UnmatchedPool::new(3);
        pool.commit(0, 1);

        let pairs = FallbackPairer::new(&candidates).run(&mut pool);

        assert!(pairs.is_empty());
        assert_eq!(pool.remaining(), 1);
    }

    #[test]
    fn test_leaves_incompatible_unmatched() {
        let a = create_candidate("a", "male", "female");
        let b = create_candidate("b", "male", "male");
        let c = create_candidate("c", "female", "male");
        let candidates = vec![&a, &b, &c];
        let mut pool = UnmatchedPool::new(3);

        let pairs = FallbackPairer::new(&candidates).run(&mut pool);

        assert_eq!(pairs, vec![(0, 2)]);
        assert!(pool.contains(1));
    }
}
