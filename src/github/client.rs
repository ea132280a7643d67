use chrono::{DateTime, Utc};
use log::{debug, info};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, USER_AGENT};
use serde::Deserialize;

use crate::auth::Token;
use crate::error::{PrLensError, Result};

use super::types::{Comment, Issue, IssueEvent, PullRequest, PullRequestCommit, User};

const PAGE_SIZE: usize = 100;
/// The search API caps results at 1000 items (10 pages of 100).
const MAX_SEARCH_PAGES: usize = 10;

/// GitHub REST API client for fetching pull request and issue data.
#[derive(Clone, Debug)]
pub struct GitHubClient {
    /// HTTP client
    client: reqwest::Client,
    /// Base URL for the GitHub API
    base_url: String,
    /// Repository owner
    owner: String,
    /// Repository name
    repo: String,
}

impl GitHubClient {
    /// Create a new GitHub API client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - GitHub API base URL (e.g., "https://api.github.com")
    /// * `owner` - Repository owner/organization
    /// * `repo` - Repository name
    /// * `token` - Optional GitHub personal access token
    pub fn new(base_url: String, owner: String, repo: String, token: Option<Token>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("prlens/0.3"));

        if let Some(token) = token {
            let value = HeaderValue::from_str(&format!("Bearer {}", token.as_str()))
                .map_err(|e| PrLensError::Config(format!("Invalid token: {e}")))?;
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| PrLensError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url,
            owner,
            repo,
        })
    }

    /// Fetch all open pull requests for the repository, following pagination.
    pub async fn list_open_pull_requests(&self) -> Result<Vec<PullRequest>> {
        let mut all = Vec::new();
        let mut page = 1;

        loop {
            let url = format!(
                "{}/repos/{}/{}/pulls?state=open&per_page={}&page={}",
                self.base_url, self.owner, self.repo, PAGE_SIZE, page
            );

            let prs: Vec<PullRequest> = self.get_json(&url).await?;
            let page_len = prs.len();
            all.extend(prs);

            if page_len < PAGE_SIZE {
                break;
            }
            page += 1;
        }

        info!("Fetched {} open pull requests", all.len());
        Ok(all)
    }

    /// Fetch a single pull request with full merge metadata.
    ///
    /// Search results omit `merged_by`, so completed pull requests are
    /// hydrated individually through this endpoint.
    pub async fn get_pull_request(&self, number: u64) -> Result<PullRequest> {
        let url = format!(
            "{}/repos/{}/{}/pulls/{}",
            self.base_url, self.owner, self.repo, number
        );
        self.get_json(&url).await
    }

    /// Fetch the commits of a pull request, in chronological order.
    pub async fn list_commits(&self, number: u64) -> Result<Vec<PullRequestCommit>> {
        let mut all = Vec::new();
        let mut page = 1;

        loop {
            let url = format!(
                "{}/repos/{}/{}/pulls/{}/commits?per_page={}&page={}",
                self.base_url, self.owner, self.repo, number, PAGE_SIZE, page
            );

            let commits: Vec<PullRequestCommit> = self.get_json(&url).await?;
            let page_len = commits.len();
            all.extend(commits);

            if page_len < PAGE_SIZE {
                break;
            }
            page += 1;
        }

        Ok(all)
    }

    /// Fetch the review comments (inline code comments) of a pull request.
    ///
    /// Comments arrive oldest-first, so a truncated fetch would drop the
    /// newest activity; every page is followed.
    pub async fn list_review_comments(&self, number: u64) -> Result<Vec<Comment>> {
        let mut all = Vec::new();
        let mut page = 1;

        loop {
            let url = format!(
                "{}/repos/{}/{}/pulls/{}/comments?per_page={}&page={}",
                self.base_url, self.owner, self.repo, number, PAGE_SIZE, page
            );

            let comments: Vec<Comment> = self.get_json(&url).await?;
            let page_len = comments.len();
            all.extend(comments);

            if page_len < PAGE_SIZE {
                break;
            }
            page += 1;
        }

        Ok(all)
    }

    /// Fetch the issue comments (conversation tab) of a pull request,
    /// following pagination.
    pub async fn list_issue_comments(&self, number: u64) -> Result<Vec<Comment>> {
        let mut all = Vec::new();
        let mut page = 1;

        loop {
            let url = format!(
                "{}/repos/{}/{}/issues/{}/comments?per_page={}&page={}",
                self.base_url, self.owner, self.repo, number, PAGE_SIZE, page
            );

            let comments: Vec<Comment> = self.get_json(&url).await?;
            let page_len = comments.len();
            all.extend(comments);

            if page_len < PAGE_SIZE {
                break;
            }
            page += 1;
        }

        Ok(all)
    }

    /// Search for closed pull requests carrying `label` that were closed after
    /// `since`, hydrating each search hit into a full pull request.
    pub async fn search_closed_pull_requests(
        &self,
        label: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<PullRequest>> {
        let query = format!(
            "is:pr+repo:{}/{}+is:closed+label:{}+closed:>{}",
            self.owner,
            self.repo,
            label,
            since.format("%Y-%m-%d")
        );

        let mut result = Vec::new();
        let mut page = 1;

        loop {
            let url = format!(
                "{}/search/issues?q={}&per_page={}&page={}",
                self.base_url, query, PAGE_SIZE, page
            );

            let response: SearchResponse = self.get_json(&url).await?;
            let page_len = response.items.len();

            for item in response.items {
                result.push(self.get_pull_request(item.number).await?);
            }

            if page_len < PAGE_SIZE || page >= MAX_SEARCH_PAGES {
                break;
            }
            page += 1;
        }

        debug!("Search returned {} closed pull requests", result.len());
        Ok(result)
    }

    /// Fetch open issues carrying `label` that were updated since `since`.
    ///
    /// The issues endpoint also returns pull requests; those are filtered out.
    pub async fn list_issues_updated_since(
        &self,
        label: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<Issue>> {
        let mut all = Vec::new();
        let mut page = 1;

        loop {
            let url = format!(
                "{}/repos/{}/{}/issues?state=open&labels={}&since={}&per_page={}&page={}",
                self.base_url,
                self.owner,
                self.repo,
                label.replace(' ', "%20"),
                since.format("%Y-%m-%dT%H:%M:%SZ"),
                PAGE_SIZE,
                page
            );

            let issues: Vec<Issue> = self.get_json(&url).await?;
            let page_len = issues.len();
            all.extend(issues.into_iter().filter(|i| i.pull_request.is_none()));

            if page_len < PAGE_SIZE {
                break;
            }
            page += 1;
        }

        Ok(all)
    }

    /// Fetch the timeline events of an issue, oldest first, following
    /// pagination.
    pub async fn list_issue_events(&self, number: u64) -> Result<Vec<IssueEvent>> {
        let mut all = Vec::new();
        let mut page = 1;

        loop {
            let url = format!(
                "{}/repos/{}/{}/issues/{}/events?per_page={}&page={}",
                self.base_url, self.owner, self.repo, number, PAGE_SIZE, page
            );

            let events: Vec<IssueEvent> = self.get_json(&url).await?;
            let page_len = events.len();
            all.extend(events);

            if page_len < PAGE_SIZE {
                break;
            }
            page += 1;
        }

        Ok(all)
    }

    /// Fetch a user profile by login.
    pub async fn get_user(&self, login: &str) -> Result<User> {
        let url = format!("{}/users/{}", self.base_url, login);
        self.get_json(&url).await
    }

    /// Issue a GET request and deserialize the JSON response.
    ///
    /// Non-success statuses become `PrLensError::Api`; retry and backoff are
    /// left to the caller's environment.
    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self.client.get(url).send().await?;

        if let Some(remaining) = response
            .headers()
            .get("x-ratelimit-remaining")
            .and_then(|v| v.to_str().ok())
        {
            debug!("GitHub API quota remaining: {remaining}");
        }

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            return Err(PrLensError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }
}

/// Response from the search API.
#[derive(Deserialize)]
struct SearchResponse {
    items: Vec<SearchItem>,
}

#[derive(Deserialize)]
struct SearchItem {
    number: u64,
}
