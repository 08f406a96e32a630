use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use validator::Validate;

use crate::core::MatchError;

/// Gender preference sentinel meaning "accepts any gender"
pub const OPEN_TO_ALL: &str = "open to all";

/// Year preference sentinel meaning "accepts any year"
pub const ANY_YEAR: &str = "any year";

/// Number of questions in the onboarding questionnaire
pub const QUESTION_COUNT: usize = 10;

/// Default per-question weights (total = 100)
///
/// 0: warning label for your personality
/// 1: you fall for someone...
/// 2: food slice
/// 3: when you're emotionally drained
/// 4: your idea of flirting
/// 5: what scares you more
/// 6: life philosophy
/// 7: you feel closest when...
/// 8: your biggest red flag
/// 9: dating experience
pub const DEFAULT_QUESTION_WEIGHTS: [u32; QUESTION_COUNT] = [7, 11, 7, 13, 8, 12, 8, 12, 15, 7];

/// A single questionnaire answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Answer {
    A,
    B,
    C,
    D,
    E,
}

impl Answer {
    /// Parse a raw answer, ignoring surrounding whitespace and case
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "A" => Some(Answer::A),
            "B" => Some(Answer::B),
            "C" => Some(Answer::C),
            "D" => Some(Answer::D),
            "E" => Some(Answer::E),
            _ => None,
        }
    }
}

/// Who a candidate is willing to be matched with, age-wise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AgePreference {
    #[default]
    Any,
    Older,
    Younger,
    SameOrOlder,
    SameOrYounger,
}

impl AgePreference {
    /// Parse a stored preference. Unknown values fall back to `Any`.
    pub fn parse(raw: &str) -> Self {
        let normalized = raw.trim().to_lowercase().replace(['-', '_'], " ");
        match normalized.as_str() {
            "older" => AgePreference::Older,
            "younger" => AgePreference::Younger,
            "same or older" => AgePreference::SameOrOlder,
            "same or younger" => AgePreference::SameOrYounger,
            _ => AgePreference::Any,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AgePreference::Any => "any",
            AgePreference::Older => "older",
            AgePreference::Younger => "younger",
            AgePreference::SameOrOlder => "same-or-older",
            AgePreference::SameOrYounger => "same-or-younger",
        }
    }

    /// Does `other_age` satisfy this preference for someone aged `own_age`?
    pub fn accepts(&self, own_age: u32, other_age: u32) -> bool {
        match self {
            AgePreference::Any => true,
            AgePreference::Older => other_age > own_age,
            AgePreference::Younger => other_age < own_age,
            AgePreference::SameOrOlder => other_age >= own_age,
            AgePreference::SameOrYounger => other_age <= own_age,
        }
    }
}

impl From<String> for AgePreference {
    fn from(value: String) -> Self {
        AgePreference::parse(&value)
    }
}

impl From<AgePreference> for String {
    fn from(value: AgePreference) -> Self {
        value.as_str().to_string()
    }
}

/// What a candidate is open to
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Intent {
    #[default]
    Open,
    Only(String),
}

impl Intent {
    pub fn parse(raw: &str) -> Self {
        let normalized = raw.trim().to_lowercase();
        if normalized.is_empty() || normalized == "open" {
            Intent::Open
        } else {
            Intent::Only(normalized)
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, Intent::Open)
    }
}

impl From<String> for Intent {
    fn from(value: String) -> Self {
        Intent::parse(&value)
    }
}

impl From<Intent> for String {
    fn from(value: Intent) -> Self {
        match value {
            Intent::Open => "open".to_string(),
            Intent::Only(intent) => intent,
        }
    }
}

/// Normalized candidate profile consumed by the matching engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: String,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(rename = "genderPreference", default)]
    pub gender_preference: Option<String>,
    #[serde(default)]
    pub year: Option<String>,
    #[serde(rename = "yearPreference", default)]
    pub year_preference: Vec<String>,
    #[serde(rename = "agePreference", default)]
    pub age_preference: AgePreference,
    #[serde(default)]
    pub opento: Intent,
    #[serde(default)]
    pub approved: bool,
    #[serde(rename = "isMatched", default)]
    pub is_matched: bool,
    #[serde(default)]
    pub interests: Vec<Option<Answer>>,
}

impl Candidate {
    /// Answer to question `index`, if present
    #[inline]
    pub fn answer(&self, index: usize) -> Option<Answer> {
        self.interests.get(index).copied().flatten()
    }

    /// Approved and not yet matched
    #[inline]
    pub fn is_available(&self) -> bool {
        self.approved && !self.is_matched
    }
}

/// Profile row as stored, before normalization
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct RawProfile {
    #[validate(length(min = 1))]
    pub id: String,
    #[serde(rename = "firstName", default)]
    pub first_name: Option<String>,
    #[serde(rename = "lastName", default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub age: Option<i32>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub gender_preference: Option<String>,
    #[serde(default)]
    pub year: Option<String>,
    #[serde(default)]
    pub year_preference: Option<Vec<String>>,
    #[serde(default)]
    pub age_preference: Option<String>,
    #[serde(default)]
    pub opento: Option<String>,
    #[serde(default)]
    pub approved: Option<bool>,
    #[serde(default)]
    pub ismatched: Option<bool>,
    #[serde(default)]
    pub interests: Value,
}

impl RawProfile {
    /// Name used in logs: nickname, then first name, then id
    pub fn display_name(&self) -> &str {
        self.nickname
            .as_deref()
            .or(self.first_name.as_deref())
            .unwrap_or(&self.id)
    }
}

/// A committed pair of candidate ids
///
/// `id1` is the candidate that appears earlier in the input.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pair {
    pub id1: String,
    pub id2: String,
}

impl Pair {
    pub fn contains(&self, id: &str) -> bool {
        self.id1 == id || self.id2 == id
    }
}

impl fmt::Display for Pair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <-> {}", self.id1, self.id2)
    }
}

/// Output of one matching run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub pairs: Vec<Pair>,
    #[serde(rename = "userIds")]
    pub matched_ids: BTreeSet<String>,
}

impl MatchResult {
    pub(crate) fn push(&mut self, pair: Pair) {
        self.matched_ids.insert(pair.id1.clone());
        self.matched_ids.insert(pair.id2.clone());
        self.pairs.push(pair);
    }

    pub fn is_matched(&self, id: &str) -> bool {
        self.matched_ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Per-question scoring weights, keyed by question index
///
/// An index missing from the table contributes nothing to the score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoringWeights {
    questions: BTreeMap<usize, u32>,
}

impl ScoringWeights {
    /// Build a weight table from positional weights. Zero weights are left out.
    pub fn from_questions(weights: &[u32]) -> Result<Self, MatchError> {
        let total: u32 = weights.iter().sum();
        if total != 100 {
            return Err(MatchError::InvalidWeights(total));
        }

        let questions = weights
            .iter()
            .enumerate()
            .filter(|(_, weight)| **weight > 0)
            .map(|(index, weight)| (index, *weight))
            .collect();

        Ok(Self { questions })
    }

    pub fn get(&self, index: usize) -> Option<u32> {
        self.questions.get(&index).copied()
    }

    /// Weighted questions in ascending index order
    pub fn iter(&self) -> impl Iterator<Item = (usize, u32)> + '_ {
        self.questions.iter().map(|(index, weight)| (*index, *weight))
    }

    pub fn total(&self) -> u32 {
        self.questions.values().sum()
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            questions: DEFAULT_QUESTION_WEIGHTS
                .iter()
                .enumerate()
                .map(|(index, weight)| (index, *weight))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights_sum_to_100() {
        assert_eq!(ScoringWeights::default().total(), 100);
        assert_eq!(DEFAULT_QUESTION_WEIGHTS.iter().sum::<u32>(), 100);
    }

    #[test]
    fn test_weights_reject_bad_total() {
        let err = ScoringWeights::from_questions(&[50, 49]).unwrap_err();
        assert!(matches!(err, MatchError::InvalidWeights(99)));
    }

    #[test]
    fn test_zero_weight_is_absent() {
        let weights = ScoringWeights::from_questions(&[50, 0, 50]).unwrap();
        assert_eq!(weights.get(1), None);
        assert_eq!(weights.iter().count(), 2);
    }

    #[test]
    fn test_age_preference_parsing() {
        assert_eq!(AgePreference::parse("same or older"), AgePreference::SameOrOlder);
        assert_eq!(AgePreference::parse("Same-Or-Younger"), AgePreference::SameOrYounger);
        assert_eq!(AgePreference::parse("older"), AgePreference::Older);
        assert_eq!(AgePreference::parse("whatever"), AgePreference::Any);
    }

    #[test]
    fn test_intent_parsing() {
        assert_eq!(Intent::parse(" Open "), Intent::Open);
        assert_eq!(Intent::parse(""), Intent::Open);
        assert_eq!(Intent::parse("Dating"), Intent::Only("dating".to_string()));
    }

    #[test]
    fn test_candidate_deserializes_camel_case() {
        let json = serde_json::json!({
            "id": "u1",
            "age": 21,
            "gender": "female",
            "genderPreference": "open to all",
            "year": "2nd",
            "yearPreference": ["any year"],
            "agePreference": "same or older",
            "opento": "dating",
            "approved": true,
            "isMatched": false,
            "interests": ["A", null, "C"]
        });

        let candidate: Candidate = serde_json::from_value(json).unwrap();
        assert_eq!(candidate.age_preference, AgePreference::SameOrOlder);
        assert_eq!(candidate.opento, Intent::Only("dating".to_string()));
        assert_eq!(candidate.answer(0), Some(Answer::A));
        assert_eq!(candidate.answer(1), None);
        assert_eq!(candidate.answer(9), None);
        assert!(candidate.is_available());
    }

    #[test]
    fn test_match_result_tracks_ids() {
        let mut result = MatchResult::default();
        result.push(Pair {
            id1: "a".to_string(),
            id2: "b".to_string(),
        });

        assert_eq!(result.len(), 1);
        assert!(result.is_matched("a"));
        assert!(result.is_matched("b"));
        assert!(!result.is_matched("c"));
    }
}
