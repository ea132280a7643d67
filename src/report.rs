use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Full output of a report run.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommunityReport {
    pub project: String,
    pub generated_at: DateTime<Utc>,
    pub stale: StaleReport,
    pub recognition: RecognitionReport,
}

/// Stale community PRs, grouped by owner and ranked by backlog size.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaleReport {
    /// Days of inactivity used as the staleness cutoff
    pub cutoff_days: i64,
    /// Stale-days threshold after which rows are flagged overdue
    pub sla_days: i64,
    pub groups: Vec<StaleGroup>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaleGroup {
    /// Owner display name; never empty, unattributable PRs are dropped upstream
    pub owner: String,
    /// Rows ordered by last activity, oldest first
    pub rows: Vec<StaleRow>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaleRow {
    pub number: u64,
    pub title: String,
    pub url: String,
    /// Display name of the assignee, when one resolved
    pub assignee: Option<String>,
    /// Area scope with its prefix stripped (e.g. "infra" for "area-infra")
    pub area: Option<String>,
    pub last_activity: DateTime<Utc>,
    pub stale_days: i64,
    /// Whether `stale_days` breached the SLA threshold
    pub overdue: bool,
}

/// Per-member recognition counts for the lookback window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecognitionReport {
    /// Lookback window in days
    pub window_days: i64,
    /// Members ranked by total handled PRs, then by name
    pub members: Vec<MemberRecognition>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberRecognition {
    pub member: String,
    pub merged: usize,
    pub closed_without_merge: usize,
    pub help_wanted_conversions: usize,
}

impl MemberRecognition {
    pub fn total_pull_requests(&self) -> usize {
        self.merged + self.closed_without_merge
    }
}
