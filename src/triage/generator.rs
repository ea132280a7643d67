use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use futures::stream::{self, StreamExt};
use indexmap::IndexMap;
use log::{debug, info, warn};
use std::sync::Arc;

use crate::config::{LabelConfig, ReportConfig};
use crate::github::types::{Comment, Issue, IssueEvent, PullRequest};
use crate::github::GitHubClient;
use crate::output::PhaseProgress;
use crate::report::{
    CommunityReport, MemberRecognition, RecognitionReport, StaleGroup, StaleReport, StaleRow,
};

use super::activity::{self, ActivityRecord};
use super::area;
use super::grouping::{group_and_rank, OwnedItem};
use super::leads::AreaLeadTable;
use super::ownership::{OwnershipPolicy, OwnershipResolver};
use super::recognition::aggregate_recognition;
use super::usernames::UserNameResolver;

/// Independent per-PR lookups run concurrently up to this bound.
const MAX_CONCURRENT_LOOKUPS: usize = 8;

/// Builds the community PR reports for one repository.
///
/// Owns the run-scoped state: the API client, the username cache and the
/// area-lead table. All per-item classification joins before any grouping
/// or ranking is applied.
#[derive(Debug)]
pub struct ReportGenerator {
    client: Arc<GitHubClient>,
    usernames: UserNameResolver,
    leads: AreaLeadTable,
    labels: LabelConfig,
    windows: ReportConfig,
    project: String,
}

impl ReportGenerator {
    /// Create a new report generator.
    ///
    /// # Arguments
    ///
    /// * `base_url` - GitHub API base URL
    /// * `project_path` - Repository path in format "owner/repo"
    /// * `token` - Optional GitHub personal access token
    /// * `leads` - Area-lead table parsed from the area-owners document
    /// * `labels` - Label names driving classification
    /// * `windows` - Report windows and thresholds
    pub fn new(
        base_url: String,
        project_path: String,
        token: Option<crate::auth::Token>,
        leads: AreaLeadTable,
        labels: LabelConfig,
        windows: ReportConfig,
    ) -> Result<Self> {
        let parts: Vec<&str> = project_path.split('/').collect();
        if parts.len() != 2 {
            anyhow::bail!("Project path must be in format 'owner/repo'");
        }

        let client = Arc::new(GitHubClient::new(
            base_url,
            parts[0].to_string(),
            parts[1].to_string(),
            token,
        )?);

        Ok(Self {
            usernames: UserNameResolver::new(Arc::clone(&client)),
            client,
            leads,
            labels,
            windows,
            project: project_path,
        })
    }

    /// Run the full pipeline and produce both reports.
    pub async fn generate(&self) -> Result<CommunityReport> {
        info!("Starting report generation for {}", self.project);

        let progress = PhaseProgress::start_phase_1();
        let stale = self.stale_pr_report().await?;

        let stale_count = stale.groups.iter().map(|g| g.rows.len()).sum();
        let progress = progress.finish_phase_1_start_phase_2(stale_count);
        let recognition = self.recognition_report().await?;

        let progress = progress.finish_phase_2_start_phase_3(recognition.members.len());
        let report = CommunityReport {
            project: self.project.clone(),
            generated_at: Utc::now(),
            stale,
            recognition,
        };
        progress.finish_phase_3();

        Ok(report)
    }

    /// Classify open pull requests and keep the stale ones.
    ///
    /// Cheap metadata rejections run first; surviving candidates get their
    /// commit and comment signals fetched concurrently. The collect below is
    /// the join point: nothing downstream starts until every candidate is
    /// classified.
    async fn collect_stale_activity(&self) -> Result<Vec<ActivityRecord>> {
        let cutoff = Utc::now() - Duration::days(self.windows.cutoff_days_for_stale_prs);

        let open_prs = self
            .client
            .list_open_pull_requests()
            .await
            .context("Failed to fetch open pull requests")?;

        let candidates: Vec<PullRequest> = open_prs
            .into_iter()
            .filter(|pr| match activity::open_pr_rejection(pr, cutoff, &self.labels) {
                Some(reason) => {
                    debug!("Skipping PR #{}: {reason}", pr.number);
                    false
                }
                None => true,
            })
            .collect();

        debug!("{} staleness candidates after metadata rejections", candidates.len());

        let records: Vec<Option<ActivityRecord>> = stream::iter(candidates)
            .map(|pr| async move {
                match self.fetch_activity_signals(&pr).await {
                    Ok((last_commit, comments)) => {
                        activity::classify_stale(&pr, cutoff, last_commit, &comments)
                    }
                    Err(e) => {
                        warn!("Could not check activity for PR #{}: {e}", pr.number);
                        None
                    }
                }
            })
            .buffer_unordered(MAX_CONCURRENT_LOOKUPS)
            .collect()
            .await;

        Ok(records.into_iter().flatten().collect())
    }

    /// Fetch the activity signals of one pull request: the last commit author
    /// date plus all review and issue comments.
    async fn fetch_activity_signals(
        &self,
        pr: &PullRequest,
    ) -> Result<(Option<DateTime<Utc>>, Vec<Comment>)> {
        let (commits, review_comments, issue_comments) = futures::try_join!(
            self.client.list_commits(pr.number),
            self.client.list_review_comments(pr.number),
            self.client.list_issue_comments(pr.number),
        )?;

        let last_commit = commits.iter().rev().find_map(|c| c.author_date());

        let mut comments = review_comments;
        comments.extend(issue_comments);

        Ok((last_commit, comments))
    }

    /// Build the stale-PR report: attribute each stale PR to an owner and
    /// group-rank the result.
    async fn stale_pr_report(&self) -> Result<StaleReport> {
        let records = self.collect_stale_activity().await?;
        info!("{} stale community pull requests", records.len());

        let resolver = OwnershipResolver::new(
            &self.usernames,
            &self.leads,
            &self.labels.servicing_approved,
        );

        let today = Utc::now().date_naive();
        let mut items = Vec::new();

        for record in records {
            let pr = &record.pull_request;
            let area = area::area_label(pr, &self.labels.area_prefixes);

            let owner = resolver
                .resolve_owner(pr, area.as_deref(), OwnershipPolicy::AssigneeThenAreaLead)
                .await?;
            let Some(owner) = owner else {
                warn!(
                    "PR #{} has no resolvable owner; dropping from the stale report",
                    pr.number
                );
                continue;
            };

            let assignee = match pr.assignee_login() {
                Some(login) => self.usernames.resolve(login).await?,
                None => None,
            };

            let days = activity::stale_days(today, record.last_activity);
            let row = StaleRow {
                number: pr.number,
                title: pr.title.trim().to_string(),
                url: pr.html_url.clone(),
                assignee,
                area: area.as_deref().map(|a| area::area_display(a).to_string()),
                last_activity: record.last_activity,
                stale_days: days,
                overdue: activity::is_overdue(days, self.windows.community_pr_sla_days),
            };

            items.push(OwnedItem {
                reference_date: record.last_activity,
                owner,
                item: row,
            });
        }

        let groups = group_and_rank(items, |row| row.number)
            .into_iter()
            .map(|group| StaleGroup {
                owner: group.owner,
                rows: group.items.into_iter().map(|i| i.item).collect(),
            })
            .collect();

        Ok(StaleReport {
            cutoff_days: self.windows.cutoff_days_for_stale_prs,
            sla_days: self.windows.community_pr_sla_days,
            groups,
        })
    }

    /// Build the recognition report from completed PRs and help-wanted
    /// conversions within the lookback window.
    async fn recognition_report(&self) -> Result<RecognitionReport> {
        let since = Utc::now() - Duration::days(self.windows.cutoff_days_for_completed_prs);

        let completed = self.completed_community_prs(since).await?;
        info!("{} completed community pull requests", completed.len());

        let resolver = OwnershipResolver::new(
            &self.usernames,
            &self.leads,
            &self.labels.servicing_approved,
        );

        let mut owned = Vec::new();
        for pr in completed {
            match resolver
                .resolve_owner(&pr, None, OwnershipPolicy::MergerUnlessServicing)
                .await?
            {
                Some(owner) => owned.push((owner, pr)),
                None => warn!(
                    "PR #{} has no resolvable owner; dropping from the recognition report",
                    pr.number
                ),
            }
        }

        let conversions = self.help_wanted_conversions(since).await?;
        let records = aggregate_recognition(owned, conversions);

        let mut members = Vec::with_capacity(records.len());
        for record in &records {
            let display = self
                .usernames
                .resolve(&record.member)
                .await?
                .unwrap_or_else(|| record.member.clone());
            members.push(MemberRecognition {
                member: display,
                merged: record.merged_count(),
                closed_without_merge: record.closed_without_merge_count(),
                help_wanted_conversions: record.conversions_count(),
            });
        }

        Ok(RecognitionReport {
            window_days: self.windows.cutoff_days_for_completed_prs,
            members,
        })
    }

    /// Completed community pull requests: closed, community-labeled, closed
    /// after the lookback date.
    async fn completed_community_prs(&self, since: DateTime<Utc>) -> Result<Vec<PullRequest>> {
        let prs = self
            .client
            .search_closed_pull_requests(&self.labels.community_contribution, since)
            .await
            .context("Failed to search for completed pull requests")?;

        // The search query already filters; this re-check keeps the gate in
        // one place and guards against search index lag.
        Ok(prs
            .into_iter()
            .filter(|pr| activity::is_completed(pr, &self.labels.community_contribution, since))
            .collect())
    }

    /// Map from member login (lowercased) to the issues they converted by
    /// applying the help-wanted label within the window.
    async fn help_wanted_conversions(
        &self,
        since: DateTime<Utc>,
    ) -> Result<IndexMap<String, Vec<Issue>>> {
        let issues = self
            .client
            .list_issues_updated_since(&self.labels.help_wanted, since)
            .await
            .context("Failed to fetch help-wanted issues")?;

        let with_events: Vec<(Issue, crate::error::Result<Vec<IssueEvent>>)> =
            stream::iter(issues)
                .map(|issue| async move {
                    let events = self.client.list_issue_events(issue.number).await;
                    (issue, events)
                })
                .buffer_unordered(MAX_CONCURRENT_LOOKUPS)
                .collect()
                .await;

        let mut result: IndexMap<String, Vec<Issue>> = IndexMap::new();
        for (issue, events) in with_events {
            let events = match events {
                Ok(events) => events,
                Err(e) => {
                    warn!("Could not fetch events for issue #{}: {e}", issue.number);
                    continue;
                }
            };

            let Some(actor) = converted_by(&events, &self.labels.help_wanted, since) else {
                // The label predates the window; not a fresh conversion
                continue;
            };

            result.entry(actor.to_lowercase()).or_default().push(issue);
        }

        Ok(result)
    }
}

/// Who applied the help-wanted label within the window, if anyone did.
fn converted_by<'a>(
    events: &'a [IssueEvent],
    help_wanted_label: &str,
    since: DateTime<Utc>,
) -> Option<&'a str> {
    events.iter().find_map(|event| {
        let qualifies = event.event == "labeled"
            && event.created_at >= since
            && event
                .label
                .as_ref()
                .is_some_and(|l| l.name == help_wanted_label);

        if qualifies {
            event.actor.as_ref().map(|a| a.login.as_str())
        } else {
            None
        }
    })
}
