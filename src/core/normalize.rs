use serde_json::Value;

use crate::models::{AgePreference, Answer, Candidate, Intent, RawProfile, QUESTION_COUNT};

/// Turn a stored profile into an engine candidate
///
/// Strings are trimmed and lower-cased, blank values become absent, and
/// missing preferences fall back to "any" / "open".
pub fn normalize_profile(profile: &RawProfile) -> Candidate {
    Candidate {
        id: profile.id.clone(),
        nickname: profile.nickname.clone(),
        age: profile
            .age
            .filter(|age| *age > 0)
            .and_then(|age| u32::try_from(age).ok()),
        gender: normalize_text(profile.gender.as_deref()),
        gender_preference: normalize_text(profile.gender_preference.as_deref()),
        year: normalize_text(profile.year.as_deref()),
        year_preference: profile
            .year_preference
            .iter()
            .flatten()
            .filter_map(|year| normalize_text(Some(year.as_str())))
            .collect(),
        age_preference: profile
            .age_preference
            .as_deref()
            .map(AgePreference::parse)
            .unwrap_or_default(),
        opento: profile
            .opento
            .as_deref()
            .map(Intent::parse)
            .unwrap_or_default(),
        approved: profile.approved.unwrap_or(false),
        is_matched: profile.ismatched.unwrap_or(false),
        interests: normalize_interests(&profile.interests),
    }
}

/// Whether a normalized candidate can enter the matching pool
///
/// Requires approval, no existing match, and every field the hard
/// constraints and scoring depend on.
pub fn is_eligible(candidate: &Candidate) -> bool {
    candidate.is_available()
        && candidate.gender.is_some()
        && candidate.gender_preference.is_some()
        && candidate.age.is_some()
        && candidate.year.is_some()
        && !candidate.interests.is_empty()
}

/// Normalize stored profiles and keep the eligible ones, preserving order
pub fn prepare_pool(profiles: &[RawProfile]) -> Vec<Candidate> {
    let pool: Vec<Candidate> = profiles
        .iter()
        .map(normalize_profile)
        .filter(is_eligible)
        .collect();

    tracing::info!(
        "Prepared {} eligible candidates from {} profiles",
        pool.len(),
        profiles.len()
    );

    pool
}

fn normalize_text(value: Option<&str>) -> Option<String> {
    value
        .map(|v| v.trim().to_lowercase())
        .filter(|v| !v.is_empty())
}

/// Lay out stored questionnaire answers by question index
///
/// Stored answers may be an array, an object keyed by question index, or
/// either of those encoded (possibly more than once) as a JSON string.
/// Object keys outside the questionnaire are ignored.
pub fn normalize_interests(raw: &Value) -> Vec<Option<Answer>> {
    let mut data = raw.clone();

    loop {
        let decoded = match &data {
            Value::String(encoded) => serde_json::from_str::<Value>(encoded),
            _ => break,
        };

        match decoded {
            Ok(value) => data = value,
            Err(e) => {
                tracing::debug!("Discarding undecodable interests: {}", e);
                return Vec::new();
            }
        }
    }

    match data {
        Value::Array(answers) => answers.iter().map(parse_answer).collect(),
        Value::Object(map) => {
            let indexed: Vec<(usize, Option<Answer>)> = map
                .iter()
                .filter_map(|(key, value)| {
                    key.trim()
                        .parse::<usize>()
                        .ok()
                        .filter(|index| *index < QUESTION_COUNT)
                        .map(|index| (index, parse_answer(value)))
                })
                .collect();

            let len = indexed.iter().map(|(index, _)| index + 1).max().unwrap_or(0);
            let mut interests = vec![None; len];
            for (index, answer) in indexed {
                interests[index] = answer;
            }
            interests
        }
        _ => Vec::new(),
    }
}

fn parse_answer(value: &Value) -> Option<Answer> {
    value.as_str().and_then(Answer::parse)
}
