use crate::models::{Answer, Candidate, ScoringWeights};

const IDENTICAL_SCORE: f64 = 1.0;
const COMPLEMENT_SCORE: f64 = 0.85;
const FRICTION_SCORE: f64 = 0.25;
const RULED_MISMATCH_SCORE: f64 = 0.6;
const DEFAULT_MISMATCH_SCORE: f64 = 0.5;

/// Per-question override for specific answer combinations
///
/// Pairs are unordered: `(A, C)` also covers `(C, A)`.
#[derive(Debug, Clone, Copy)]
pub struct StructuralRule {
    pub question: usize,
    pub complement: &'static [(Answer, Answer)],
    pub friction: &'static [(Answer, Answer)],
}

pub const STRUCTURAL_RULES: &[StructuralRule] = &[
    StructuralRule {
        question: 3,
        complement: &[(Answer::A, Answer::C), (Answer::D, Answer::B)],
        friction: &[(Answer::A, Answer::D)],
    },
    StructuralRule {
        question: 5,
        complement: &[],
        friction: &[(Answer::B, Answer::E), (Answer::D, Answer::E)],
    },
    StructuralRule {
        question: 7,
        complement: &[(Answer::A, Answer::E)],
        friction: &[],
    },
    StructuralRule {
        question: 8,
        complement: &[],
        friction: &[(Answer::B, Answer::D), (Answer::E, Answer::D)],
    },
];

/// Structural rule for a question, if it has one
pub fn rule_for(question: usize) -> Option<&'static StructuralRule> {
    STRUCTURAL_RULES.iter().find(|rule| rule.question == question)
}

#[inline]
fn contains_unordered(pairs: &[(Answer, Answer)], a1: Answer, a2: Answer) -> bool {
    pairs
        .iter()
        .any(|&(x, y)| (a1 == x && a2 == y) || (a1 == y && a2 == x))
}

/// Score agreement on a single question (0-1)
///
/// A missing answer on either side scores 0.
pub fn calculate_question_score(question: usize, a1: Option<Answer>, a2: Option<Answer>) -> f64 {
    let (a1, a2) = match (a1, a2) {
        (Some(a1), Some(a2)) => (a1, a2),
        _ => return 0.0,
    };

    if a1 == a2 {
        return IDENTICAL_SCORE;
    }

    match rule_for(question) {
        Some(rule) if contains_unordered(rule.complement, a1, a2) => COMPLEMENT_SCORE,
        Some(rule) if contains_unordered(rule.friction, a1, a2) => FRICTION_SCORE,
        Some(_) => RULED_MISMATCH_SCORE,
        None => DEFAULT_MISMATCH_SCORE,
    }
}

/// Calculate the compatibility score (0-100) between two candidates
///
/// Scoring formula:
/// score = 100 * sum(weight_k * question_score_k) / sum(weight_k)
///
/// Every weighted question counts toward the denominator, so unanswered
/// questions pull the score down rather than being ignored.
pub fn calculate_compatibility_score(
    user1: &Candidate,
    user2: &Candidate,
    weights: &ScoringWeights,
) -> f64 {
    let mut total_score = 0.0;
    let mut total_weight = 0.0;

    for (question, weight) in weights.iter() {
        let weight = weight as f64;
        let score = calculate_question_score(question, user1.answer(question), user2.answer(question));

        total_score += weight * score;
        total_weight += weight;
    }

    if total_weight > 0.0 {
        ((total_score / total_weight) * 100.0).clamp(0.0, 100.0)
    } else {
        0.0
    }
}
