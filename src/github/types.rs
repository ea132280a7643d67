use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// GitHub account, as returned inline on pull requests, issues and events.
///
/// The `name` field is only populated by the dedicated user endpoint; list
/// endpoints return the login alone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Account login (handle)
    pub login: String,
    /// Display name, when the profile has one
    #[serde(default)]
    pub name: Option<String>,
}

/// Label attached to a pull request or issue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Label {
    /// Label name (e.g. "community-contribution", "area-infra")
    pub name: String,
}

/// Pull request snapshot fetched once per report run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequest {
    /// Pull request number
    pub number: u64,
    /// Title
    pub title: String,
    /// Web URL
    pub html_url: String,
    /// Open/closed state
    pub state: String,
    /// Whether the pull request is a draft
    #[serde(default)]
    pub draft: bool,
    /// Labels, in API order
    #[serde(default)]
    pub labels: Vec<Label>,
    /// Assignees, in API order
    #[serde(default)]
    pub assignees: Vec<User>,
    /// Who pressed merge, populated only on hydrated pull requests
    #[serde(default)]
    pub merged_by: Option<User>,
    /// When the pull request was created
    pub created_at: DateTime<Utc>,
    /// When the pull request was last updated
    pub updated_at: DateTime<Utc>,
    /// When the pull request was merged, if it was
    #[serde(default)]
    pub merged_at: Option<DateTime<Utc>>,
    /// When the pull request was closed, if it was
    #[serde(default)]
    pub closed_at: Option<DateTime<Utc>>,
}

impl PullRequest {
    /// Whether the pull request carries a label with the given name (exact match).
    pub fn has_label(&self, name: &str) -> bool {
        self.labels.iter().any(|l| l.name == name)
    }

    /// Login of the first assignee, if any.
    pub fn assignee_login(&self) -> Option<&str> {
        self.assignees.first().map(|a| a.login.as_str())
    }

    pub fn is_merged(&self) -> bool {
        self.merged_at.is_some()
    }
}

/// Commit on a pull request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequestCommit {
    pub commit: CommitDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitDetail {
    /// Git author signature; absent on some imported commits
    #[serde(default)]
    pub author: Option<CommitSignature>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitSignature {
    /// Author date of the commit
    pub date: DateTime<Utc>,
}

impl PullRequestCommit {
    pub fn author_date(&self) -> Option<DateTime<Utc>> {
        self.commit.author.as_ref().map(|a| a.date)
    }
}

/// Review or issue comment on a pull request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    /// Comment body
    #[serde(default)]
    pub body: String,
    /// Comment author
    #[serde(default)]
    pub user: Option<User>,
    /// When the comment was posted
    pub created_at: DateTime<Utc>,
}

/// Issue snapshot, used for help-wanted conversion tracking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    /// Issue number
    pub number: u64,
    /// Title
    pub title: String,
    /// Web URL
    pub html_url: String,
    /// Labels, in API order
    #[serde(default)]
    pub labels: Vec<Label>,
    /// When the issue was created
    pub created_at: DateTime<Utc>,
    /// When the issue was last updated
    pub updated_at: DateTime<Utc>,
    /// Present when the "issue" is actually a pull request
    #[serde(default)]
    pub pull_request: Option<serde_json::Value>,
}

/// Timeline event on an issue (labeled, assigned, closed, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueEvent {
    /// Event kind (e.g. "labeled")
    pub event: String,
    /// Who triggered the event
    #[serde(default)]
    pub actor: Option<User>,
    /// Label involved, for labeled/unlabeled events
    #[serde(default)]
    pub label: Option<Label>,
    /// When the event happened
    pub created_at: DateTime<Utc>,
}
