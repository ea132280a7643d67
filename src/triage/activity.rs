use chrono::{DateTime, NaiveDate, Utc};

use crate::config::LabelConfig;
use crate::github::types::{Comment, PullRequest};

/// Pull request paired with its latest qualifying activity signal.
#[derive(Debug, Clone)]
pub struct ActivityRecord {
    pub pull_request: PullRequest,
    pub last_activity: DateTime<Utc>,
}

/// Why an open pull request was excluded from staleness classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Not labeled as a community contribution
    NotCommunity,
    /// Waiting on its author
    PendingAuthorInput,
    /// Draft pull requests are never stale
    Draft,
    /// Created after the cutoff; too new to have gone stale
    TooRecent,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let reason = match self {
            Self::NotCommunity => "not a community contribution",
            Self::PendingAuthorInput => "pending author input",
            Self::Draft => "draft",
            Self::TooRecent => "created after the cutoff",
        };
        f.write_str(reason)
    }
}

/// Applies the cheap, metadata-only rejections to an open pull request.
///
/// Returns the first matching reason, or `None` when the PR is a staleness
/// candidate whose activity signals are worth fetching.
pub fn open_pr_rejection(
    pr: &PullRequest,
    cutoff: DateTime<Utc>,
    labels: &LabelConfig,
) -> Option<SkipReason> {
    if !pr.has_label(&labels.community_contribution) {
        return Some(SkipReason::NotCommunity);
    }

    if pr.has_label(&labels.pending_author_input) {
        return Some(SkipReason::PendingAuthorInput);
    }

    if pr.draft {
        return Some(SkipReason::Draft);
    }

    if pr.created_at > cutoff {
        return Some(SkipReason::TooRecent);
    }

    None
}

/// Whether a comment is noise rather than a real activity signal.
///
/// Bot chatter, CLA boilerplate, `@mention`-only acknowledgements and
/// `ping`/`cc` notes would otherwise mask genuinely stale pull requests.
pub fn is_noise_comment(comment: &Comment) -> bool {
    if comment
        .user
        .as_ref()
        .is_some_and(|u| u.login.ends_with("[bot]"))
    {
        return true;
    }

    let body = comment.body.trim();
    if body.is_empty() {
        return true;
    }

    let lowered = body.to_lowercase();
    if lowered.contains("contributor license agreement") {
        return true;
    }

    if lowered.starts_with("ping") || lowered.starts_with("cc ") || lowered.starts_with("cc:") {
        return true;
    }

    // A body made up entirely of @mentions carries no activity signal
    body.split_whitespace().all(|word| word.starts_with('@'))
}

/// Latest qualifying activity signal across commits and non-noise comments.
///
/// Falls back to the PR creation date when a pull request somehow has neither
/// commits nor comments, so every candidate has a defined last-activity date.
pub fn last_activity(
    pr: &PullRequest,
    last_commit: Option<DateTime<Utc>>,
    comments: &[Comment],
) -> DateTime<Utc> {
    let last_comment = comments
        .iter()
        .filter(|c| !is_noise_comment(c))
        .map(|c| c.created_at)
        .max();

    match (last_commit, last_comment) {
        (Some(commit), Some(comment)) => commit.max(comment),
        (Some(commit), None) => commit,
        (None, Some(comment)) => comment,
        (None, None) => pr.created_at,
    }
}

/// Classifies a surviving open pull request as stale or active.
///
/// A pull request is stale iff its latest qualifying signal is on or before
/// the cutoff; any fresher commit or non-noise comment makes it active.
pub fn classify_stale(
    pr: &PullRequest,
    cutoff: DateTime<Utc>,
    last_commit: Option<DateTime<Utc>>,
    comments: &[Comment],
) -> Option<ActivityRecord> {
    let last = last_activity(pr, last_commit, comments);
    if last > cutoff {
        return None;
    }

    Some(ActivityRecord {
        pull_request: pr.clone(),
        last_activity: last,
    })
}

/// Whether a closed pull request counts as completed within the window.
///
/// Closure date alone gates inclusion; no activity signals are inspected.
pub fn is_completed(pr: &PullRequest, community_label: &str, since: DateTime<Utc>) -> bool {
    if !pr.has_label(community_label) {
        return false;
    }

    match pr.closed_at {
        Some(closed) => closed > since,
        None => false,
    }
}

/// Days a pull request has been inactive as of `today`.
pub fn stale_days(today: NaiveDate, last_activity: DateTime<Utc>) -> i64 {
    (today - last_activity.date_naive()).num_days()
}

/// Whether a stale-days value breaches the SLA threshold.
pub fn is_overdue(stale_days: i64, sla_days: i64) -> bool {
    stale_days >= sla_days
}
