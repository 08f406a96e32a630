use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::models::{Candidate, MatchResult};

/// Session status for freshly matched pairs
pub const SESSION_STATUS_ACTIVE: &str = "active";

/// Chat session to be created for a matched pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSession {
    pub id: Uuid,
    pub user_a: String,
    pub user_b: String,
    pub nickname_a: Option<String>,
    pub nickname_b: Option<String>,
    pub message_count: i32,
    pub status: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

/// Build one session per matched pair
///
/// Pairs referencing ids missing from `candidates` are skipped.
pub fn build_sessions(
    result: &MatchResult,
    candidates: &[Candidate],
    now: DateTime<Utc>,
    duration: Duration,
) -> Vec<NewSession> {
    let by_id: HashMap<&str, &Candidate> = candidates.iter().map(|c| (c.id.as_str(), c)).collect();

    result
        .pairs
        .iter()
        .filter_map(|pair| {
            let (Some(user_a), Some(user_b)) = (by_id.get(pair.id1.as_str()), by_id.get(pair.id2.as_str())) else {
                tracing::warn!("Skipping pair {}: user missing from candidate pool", pair);
                return None;
            };

            Some(NewSession {
                id: Uuid::new_v4(),
                user_a: user_a.id.clone(),
                user_b: user_b.id.clone(),
                nickname_a: user_a.nickname.clone(),
                nickname_b: user_b.nickname.clone(),
                message_count: 0,
                status: SESSION_STATUS_ACTIVE.to_string(),
                start_time: now,
                end_time: now + duration,
            })
        })
        .collect()
}

/// Every user id that appears in a session
pub fn session_user_ids(sessions: &[NewSession]) -> Vec<String> {
    sessions
        .iter()
        .flat_map(|s| [s.user_a.clone(), s.user_b.clone()])
        .collect()
}
