use super::*;
use crate::analysis::{classify_stale, is_newest_first, AuthorTally, FilterPolicy, Timestamped};
use crate::config::ReportConfig;
use crate::error::Result;
use crate::github::{
    without_pull_requests, CommitEntry, EndpointKind, GitHubClient, IssueEntry, ListingRequest,
    ListingState, PullRequestEntry,
};
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub branch: String,
    pub window: DateWindow,
    pub per_page: u32,
    pub top_authors: usize,
    pub pull_request_stale_days: u32,
    pub issue_stale_days: u32,
    pub filter_policy: FilterPolicy,
}

impl ReportOptions {
    pub fn new(
        branch: impl Into<String>,
        window: DateWindow,
        per_page: u32,
        report: &ReportConfig,
    ) -> Self {
        Self {
            branch: branch.into(),
            window,
            per_page,
            top_authors: report.top_authors,
            pull_request_stale_days: report.pull_request_stale_days,
            issue_stale_days: report.issue_stale_days,
            filter_policy: report.filter_policy,
        }
    }
}

/// Builds the three report sections one after another against a single
/// client. Each section owns its fetched data for the duration of the call.
pub struct ReportAssembler<'a> {
    client: &'a GitHubClient,
    options: ReportOptions,
}

impl<'a> ReportAssembler<'a> {
    pub fn new(client: &'a GitHubClient, options: ReportOptions) -> Self {
        Self { client, options }
    }

    /// Runs authors, pull requests and issues in that order, handing each
    /// section to `on_section` as soon as it is complete. The first failure
    /// stops the run; sections already handed out stay delivered.
    pub async fn run<F>(&self, mut on_section: F) -> anyhow::Result<Report>
    where
        F: FnMut(&Section) -> anyhow::Result<()>,
    {
        let authors = self.authors().await?;
        on_section(&Section::authors(&authors))?;

        let pull_requests = self.pull_requests().await?;
        on_section(&Section::pull_requests(&pull_requests))?;

        let issues = self.issues().await?;
        on_section(&Section::issues(&issues))?;

        Ok(Report {
            repository: self.client.repo().clone(),
            branch: self.options.branch.clone(),
            window: self.options.window,
            authors,
            pull_requests,
            issues,
        })
    }

    pub async fn authors(&self) -> Result<AuthorRanking> {
        let request = ListingRequest::new(EndpointKind::Commits, self.options.per_page)
            .branch(self.options.branch.as_str())
            .since(self.options.window.start)
            .until(self.options.window.end);
        let commits: Vec<CommitEntry> = self.client.fetch_all(request).await?;

        let tally: AuthorTally = commits.iter().map(CommitEntry::author_name).collect();
        info!(
            "{} commits by {} distinct authors on {}",
            commits.len(),
            tally.len(),
            self.options.branch
        );
        Ok(tally.rank(self.options.top_authors))
    }

    pub async fn pull_requests(&self) -> Result<ActivityCounts> {
        let open = self.fetch_pulls(ListingState::Open).await?;
        let closed = self.fetch_pulls(ListingState::Closed).await?;
        let stale = classify_stale(&open, self.options.pull_request_stale_days);

        let counts = ActivityCounts {
            open: open.len(),
            closed: closed.len(),
            stale: stale.len(),
        };
        info!(
            "Pull requests: {} open, {} closed, {} older than {} days",
            counts.open, counts.closed, counts.stale, self.options.pull_request_stale_days
        );
        Ok(counts)
    }

    pub async fn issues(&self) -> Result<ActivityCounts> {
        let open = self.fetch_issues(ListingState::Open).await?;
        let closed = self.fetch_issues(ListingState::Closed).await?;
        let stale = classify_stale(&open, self.options.issue_stale_days);

        let counts = ActivityCounts {
            open: open.len(),
            closed: closed.len(),
            stale: stale.len(),
        };
        info!(
            "Issues: {} open, {} closed, {} older than {} days",
            counts.open, counts.closed, counts.stale, self.options.issue_stale_days
        );
        Ok(counts)
    }

    async fn fetch_pulls(&self, state: ListingState) -> Result<Vec<PullRequestEntry>> {
        let request = ListingRequest::new(EndpointKind::Pulls, self.options.per_page)
            .branch(self.options.branch.as_str())
            .state(state);
        let pulls = self.client.fetch_all(request).await?;
        Ok(self.apply_window("pull requests", pulls))
    }

    async fn fetch_issues(&self, state: ListingState) -> Result<Vec<IssueEntry>> {
        let request = ListingRequest::new(EndpointKind::Issues, self.options.per_page)
            .state(state)
            .since(self.options.window.start);
        let issues = self.client.fetch_all(request).await?;
        Ok(without_pull_requests(self.apply_window("issues", issues)))
    }

    /// Early exit is only used when the listing is verifiably newest-first.
    fn apply_window<T: Timestamped>(&self, what: &str, entries: Vec<T>) -> Vec<T> {
        let window = self.options.window;
        let policy = match self.options.filter_policy {
            FilterPolicy::EarlyExit if !window.is_open() && !is_newest_first(&entries) => {
                warn!(
                    "{} are not ordered newest-first, using exhaustive date filtering",
                    what
                );
                FilterPolicy::Exhaustive
            }
            policy => policy,
        };
        window.filter(entries, policy)
    }
}
