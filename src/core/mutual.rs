use crate::core::matrix::{CompatibilityMatrix, UnmatchedPool};

/// A pair committed by the mutual-best rounds, by pool position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MutualPair {
    pub first: usize,
    pub second: usize,
    pub score: f64,
    pub round: usize,
}

/// Round-based mutual-best matching
///
/// Each round every unmatched candidate picks its highest-scoring unmatched
/// partner. Among the pairs that picked each other, the one with the highest
/// score is committed. Rounds continue until no mutual pair is left.
///
/// Ties are broken by input position: a candidate's best partner is the
/// earliest one among equal scores, and among equally scored mutual pairs the
/// one whose earlier member comes first in the input wins.
#[derive(Debug)]
pub struct MutualMatcher {
    matrix: CompatibilityMatrix,
}

impl MutualMatcher {
    pub fn new(matrix: CompatibilityMatrix) -> Self {
        Self { matrix }
    }

    pub fn matrix(&self) -> &CompatibilityMatrix {
        &self.matrix
    }

    /// Best positive-scoring unmatched partner for `user`
    pub fn best_of(&self, user: usize, pool: &UnmatchedPool) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;

        for other in pool.iter() {
            if other == user {
                continue;
            }

            let score = self.matrix.get(user, other);
            if score > 0.0 && best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((other, score));
            }
        }

        best.map(|(other, _)| other)
    }

    /// Find this round's winning mutual-best pair without committing it
    pub fn find_round_winner(&self, pool: &UnmatchedPool) -> Option<(usize, usize, f64)> {
        let mut best_of = vec![None; self.matrix.len()];
        for user in pool.iter() {
            best_of[user] = self.best_of(user, pool);
        }

        let mut winner: Option<(usize, usize, f64)> = None;

        for user in pool.iter() {
            let Some(partner) = best_of[user] else {
                continue;
            };

            // Each mutual pair is visited twice; keep the visit from its earlier member
            if partner < user || best_of[partner] != Some(user) {
                continue;
            }

            let score = self.matrix.get(user, partner);
            if winner.map_or(true, |(_, _, best_score)| score > best_score) {
                winner = Some((user, partner, score));
            }
        }

        winner
    }

    /// Run rounds until no mutual-best pair remains
    pub fn run(&self, pool: &mut UnmatchedPool) -> Vec<MutualPair> {
        let mut pairs = Vec::new();
        let mut round = 0;

        while pool.remaining() >= 2 {
            let Some((first, second, score)) = self.find_round_winner(pool) else {
                tracing::debug!(round, remaining = pool.remaining(), "No mutual-best pair left");
                break;
            };

            pool.commit(first, second);
            tracing::debug!(round, first, second, score, "Committed mutual-best pair");

            pairs.push(MutualPair {
                first,
                second,
                score,
                round,
            });
            round += 1;
        }

        pairs
    }
}
