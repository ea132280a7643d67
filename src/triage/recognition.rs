use indexmap::IndexMap;

use crate::github::types::{Issue, PullRequest};

/// Per-member recognition data for one report run.
///
/// Counts are derived from the underlying lists rather than stored, so they
/// can never drift apart.
#[derive(Debug, Clone)]
pub struct MemberRecognitionRecord {
    /// Member identity (login or display name)
    pub member: String,
    /// Pull requests attributed to this member as merged-or-closed-by
    pub pull_requests: Vec<PullRequest>,
    /// Issues this member converted by applying the help-wanted label
    pub converted_help_wanted_issues: Vec<Issue>,
}

impl MemberRecognitionRecord {
    fn new(member: String) -> Self {
        Self {
            member,
            pull_requests: Vec::new(),
            converted_help_wanted_issues: Vec::new(),
        }
    }

    pub fn merged_count(&self) -> usize {
        self.pull_requests.iter().filter(|pr| pr.is_merged()).count()
    }

    pub fn closed_without_merge_count(&self) -> usize {
        self.pull_requests.len() - self.merged_count()
    }

    pub fn conversions_count(&self) -> usize {
        self.converted_help_wanted_issues.len()
    }

    pub fn total_pull_requests(&self) -> usize {
        self.pull_requests.len()
    }
}

/// Builds one record per distinct member across completed pull requests and
/// help-wanted conversions.
///
/// Membership is the union of both sources, case-insensitive on login: a
/// member with conversions but no pull requests still gets a record. Output
/// is ranked descending by total pull-request count with the member name as
/// a stable secondary key.
pub fn aggregate_recognition(
    owned_prs: Vec<(String, PullRequest)>,
    conversions: IndexMap<String, Vec<Issue>>,
) -> Vec<MemberRecognitionRecord> {
    let mut records: IndexMap<String, MemberRecognitionRecord> = IndexMap::new();

    for (owner, pr) in owned_prs {
        let key = owner.to_lowercase();
        records
            .entry(key)
            .or_insert_with(|| MemberRecognitionRecord::new(owner))
            .pull_requests
            .push(pr);
    }

    for (login, issues) in conversions {
        let key = login.to_lowercase();
        records
            .entry(key)
            .or_insert_with(|| MemberRecognitionRecord::new(login))
            .converted_help_wanted_issues
            .extend(issues);
    }

    let mut result: Vec<MemberRecognitionRecord> = records.into_values().collect();
    result.sort_by(|a, b| {
        b.total_pull_requests()
            .cmp(&a.total_pull_requests())
            .then_with(|| a.member.cmp(&b.member))
    });

    result
}
