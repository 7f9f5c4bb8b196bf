use super::*;
use crate::config::{ApiConfig, AuthConfig};
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info};

const RATE_LIMIT_REMAINING: &str = "x-ratelimit-remaining";

/// Client for the listing endpoints of one repository.
pub struct GitHubClient {
    http_client: reqwest::Client,
    base_url: String,
    repo: RepoRef,
    auth: AuthConfig,
    show_progress: bool,
}

impl GitHubClient {
    pub fn new(api: &ApiConfig, auth: AuthConfig, repo: RepoRef) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github.v3+json"),
        );

        let http_client = reqwest::Client::builder()
            .user_agent(api.user_agent.clone())
            .default_headers(headers)
            .build()
            .map_err(ReportError::Client)?;

        if auth.basic_credentials().is_some() {
            info!("Using authenticated GitHub API requests");
        } else {
            info!("Using unauthenticated GitHub API requests (60 requests per hour)");
        }

        Ok(Self {
            http_client,
            base_url: api.base_url.trim_end_matches('/').to_string(),
            repo,
            auth,
            show_progress: false,
        })
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn repo(&self) -> &RepoRef {
        &self.repo
    }

    pub fn listing_url(&self, kind: EndpointKind) -> String {
        format!(
            "{}/repos/{}/{}/{}",
            self.base_url,
            self.repo.owner,
            self.repo.repo,
            kind.path()
        )
    }

    /// Requests pages 1, 2, 3, ... until one decodes to an empty array and
    /// returns every element in order. A short page is not treated as the
    /// last one; only an empty page ends the listing. Any failure discards
    /// the pages gathered so far.
    pub async fn fetch_all<T: DeserializeOwned>(
        &self,
        mut request: ListingRequest,
    ) -> Result<Vec<T>> {
        let url = self.listing_url(request.kind);
        let progress = self.progress_for(&url);
        let mut entries = Vec::new();

        loop {
            progress.set_message(format!("{} page {}", request.kind.path(), request.page));
            let page: Vec<T> = match self.fetch_page(&url, &request).await {
                Ok(page) => page,
                Err(err) => {
                    progress.finish_and_clear();
                    return Err(err);
                }
            };
            debug!("GET {} page {} -> {} entries", url, request.page, page.len());

            request.advance();
            if page.is_empty() {
                break;
            }
            entries.extend(page);
        }

        progress.finish_and_clear();
        debug!(
            "Fetched {} entries from {} in {} requests",
            entries.len(),
            url,
            request.page - 1
        );
        Ok(entries)
    }

    async fn fetch_page<T: DeserializeOwned>(
        &self,
        url: &str,
        request: &ListingRequest,
    ) -> Result<Vec<T>> {
        let mut builder = self.http_client.get(url).query(&request.query());
        if let Some((username, token)) = self.auth.basic_credentials() {
            builder = builder.basic_auth(username, Some(token));
        }

        let transport = |source| ReportError::Transport {
            url: url.to_string(),
            page: request.page,
            source,
        };

        let response = builder.send().await.map_err(transport)?;
        let status = response.status();
        if !status.is_success() {
            let rate_limit_remaining = response
                .headers()
                .get(RATE_LIMIT_REMAINING)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string);
            return Err(ReportError::Fetch {
                url: url.to_string(),
                page: request.page,
                status,
                rate_limit_remaining,
            });
        }

        let body = response.bytes().await.map_err(transport)?;
        serde_json::from_slice(&body).map_err(|source| ReportError::MalformedResponse {
            url: url.to_string(),
            page: request.page,
            source,
        })
    }

    fn progress_for(&self, url: &str) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new_spinner();
        if let Ok(style) =
            ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {msg}")
        {
            pb.set_style(style);
        }
        pb.enable_steady_tick(Duration::from_millis(120));
        pb.set_message(url.to_string());
        pb
    }
}
