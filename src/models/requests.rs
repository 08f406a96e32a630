use serde::{Deserialize, Serialize};

/// Request to run the daily matching pass
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunMatchingRequest {
    /// Compute pairs without creating sessions or flipping matched status
    #[serde(default)]
    #[serde(alias = "dry_run", rename = "dryRun")]
    pub dry_run: bool,
}
