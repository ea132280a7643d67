use log::warn;

use crate::error::Result;
use crate::github::types::PullRequest;

use super::leads::AreaLeadTable;
use super::usernames::UserNameResolver;

/// How a pull request is attributed to a responsible member.
///
/// Both policies implement the same capability: map a pull request to at most
/// one owning identity. Which one applies depends on the report being built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnershipPolicy {
    /// Assignee display name first, area lead as fallback. Used for the
    /// stale-PR report, where the question is "who should unblock this".
    AssigneeThenAreaLead,
    /// Merged-by actor, unless the PR carries the servicing-approved label,
    /// in which case accountability stays with the assignee. Used for the
    /// completed-PR and recognition reports.
    MergerUnlessServicing,
}

/// Resolves pull requests to owning identities under a selected policy.
pub struct OwnershipResolver<'a> {
    usernames: &'a UserNameResolver,
    leads: &'a AreaLeadTable,
    servicing_label: &'a str,
}

impl<'a> OwnershipResolver<'a> {
    pub fn new(
        usernames: &'a UserNameResolver,
        leads: &'a AreaLeadTable,
        servicing_label: &'a str,
    ) -> Self {
        Self {
            usernames,
            leads,
            servicing_label,
        }
    }

    /// Maps a pull request to its owning identity, or `None` when no owner
    /// resolves. Unowned pull requests are dropped from grouped reports by
    /// the caller; they never appear under a null owner.
    pub async fn resolve_owner(
        &self,
        pr: &PullRequest,
        area: Option<&str>,
        policy: OwnershipPolicy,
    ) -> Result<Option<String>> {
        match policy {
            OwnershipPolicy::AssigneeThenAreaLead => self.assignee_then_area_lead(pr, area).await,
            OwnershipPolicy::MergerUnlessServicing => Ok(self.merger_unless_servicing(pr)),
        }
    }

    /// Assignee display name when one resolves; otherwise the display name of
    /// the area's lead. A PR with neither is unresolved.
    async fn assignee_then_area_lead(
        &self,
        pr: &PullRequest,
        area: Option<&str>,
    ) -> Result<Option<String>> {
        if let Some(assignee) = pr.assignee_login() {
            if let Some(name) = self.usernames.resolve(assignee).await? {
                return Ok(Some(name));
            }
        }

        let Some(area) = area else {
            return Ok(None);
        };

        let Some(lead) = self.leads.lead_for(area) else {
            warn!("No lead mapping for area {area} (PR #{})", pr.number);
            return Ok(None);
        };

        match self.usernames.resolve(lead).await? {
            Some(name) => Ok(Some(name)),
            None => {
                warn!("No display name for area lead {lead} (PR #{})", pr.number);
                Ok(None)
            }
        }
    }

    /// Merged-by actor for normally merged PRs; the assignee for unmerged
    /// ones and for servicing merges, where whoever pressed merge was acting
    /// on behalf of the original assignee.
    fn merger_unless_servicing(&self, pr: &PullRequest) -> Option<String> {
        let assignee = pr.assignee_login();

        let owner = if pr.is_merged() && !pr.has_label(self.servicing_label) {
            pr.merged_by
                .as_ref()
                .map(|u| u.login.as_str())
                .or(assignee)
        } else {
            assignee
        };

        owner.map(str::to_string)
    }
}
