use crate::analysis::Timestamped;
use crate::error::{ReportError, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

pub mod client;

pub use client::GitHubClient;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepoRef {
    pub owner: String,
    pub repo: String,
}

impl RepoRef {
    /// Takes owner and repository from the last two path segments of a
    /// repository URL. A trailing slash or `.git` suffix is ignored.
    pub fn from_url(url: &str) -> Result<Self> {
        let trimmed = url.trim().trim_end_matches('/');
        let trimmed = trimmed.strip_suffix(".git").unwrap_or(trimmed);

        let mut segments = trimmed.rsplit('/');
        match (segments.next(), segments.next()) {
            (Some(repo), Some(owner)) if !repo.is_empty() && !owner.is_empty() => Ok(Self {
                owner: owner.to_string(),
                repo: repo.to_string(),
            }),
            _ => Err(ReportError::Usage(format!(
                "'{}' is not a repository URL (expected .../<owner>/<repo>)",
                url
            ))),
        }
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointKind {
    Commits,
    Pulls,
    Issues,
}

impl EndpointKind {
    pub fn path(&self) -> &'static str {
        match self {
            EndpointKind::Commits => "commits",
            EndpointKind::Pulls => "pulls",
            EndpointKind::Issues => "issues",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingState {
    Open,
    Closed,
}

/// Query for one listing endpoint. Only `page` changes between round-trips.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingRequest {
    pub kind: EndpointKind,
    pub per_page: u32,
    pub page: u32,
    pub branch: Option<String>,
    pub state: ListingState,
    pub since: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
}

impl ListingRequest {
    pub fn new(kind: EndpointKind, per_page: u32) -> Self {
        Self {
            kind,
            per_page,
            page: 1,
            branch: None,
            state: ListingState::Open,
            since: None,
            until: None,
        }
    }

    pub fn branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }

    pub fn state(mut self, state: ListingState) -> Self {
        self.state = state;
        self
    }

    pub fn since(mut self, since: Option<DateTime<Utc>>) -> Self {
        self.since = since;
        self
    }

    pub fn until(mut self, until: Option<DateTime<Utc>>) -> Self {
        self.until = until;
        self
    }

    pub fn advance(&mut self) {
        self.page += 1;
    }

    pub fn query(&self) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("per_page", self.per_page.to_string()),
            ("page", self.page.to_string()),
        ];

        // The issues listing has no branch filter.
        match (&self.branch, self.kind) {
            (Some(branch), EndpointKind::Commits) => query.push(("sha", branch.clone())),
            (Some(branch), EndpointKind::Pulls) => query.push(("base", branch.clone())),
            _ => {}
        }
        if self.state == ListingState::Closed {
            query.push(("state", "closed".to_string()));
        }
        if let Some(since) = self.since {
            query.push(("since", api_timestamp(since)));
        }
        if let Some(until) = self.until {
            query.push(("until", api_timestamp(until)));
        }

        query
    }
}

pub fn api_timestamp(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommitEntry {
    pub sha: Option<String>,
    pub commit: CommitDetail,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommitDetail {
    pub author: CommitAuthor,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommitAuthor {
    pub name: String,
}

impl CommitEntry {
    pub fn author_name(&self) -> &str {
        &self.commit.author.name
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestEntry {
    pub number: Option<u64>,
    pub created_at: DateTime<Utc>,
}

/// Issue listing record. The issues endpoint also returns pull requests,
/// which carry a `pull_request` key, whatever its value.
#[derive(Debug, Clone, Deserialize)]
pub struct IssueEntry {
    pub number: Option<u64>,
    pub created_at: DateTime<Utc>,
    #[serde(default, rename = "pull_request", deserialize_with = "key_present")]
    pub has_pull_request: bool,
}

fn key_present<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    IgnoredAny::deserialize(deserializer).map(|_| true)
}

impl IssueEntry {
    pub fn is_pull_request(&self) -> bool {
        self.has_pull_request
    }
}

impl Timestamped for PullRequestEntry {
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Timestamped for IssueEntry {
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

pub fn without_pull_requests(issues: Vec<IssueEntry>) -> Vec<IssueEntry> {
    issues
        .into_iter()
        .filter(|issue| !issue.is_pull_request())
        .collect()
}
