use serde::{Deserialize, Serialize};
use crate::models::domain::Pair;

/// Response for the run matching endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunMatchingResponse {
    pub success: bool,
    #[serde(rename = "matchedPairs")]
    pub matched_pairs: usize,
    pub pairs: Vec<Pair>,
    #[serde(rename = "dryRun")]
    pub dry_run: bool,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
