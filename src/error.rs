use thiserror::Error;

/// Errors raised while building a repository activity report.
///
/// `Fetch`, `Transport` and `MalformedResponse` all abort the section that is
/// currently being assembled; pages accumulated for it are dropped.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Usage error: {0}")]
    Usage(String),

    #[error("GitHub API request to {url} (page {page}) failed with status {status}{}", rate_limit_hint(.rate_limit_remaining))]
    Fetch {
        url: String,
        page: u32,
        status: reqwest::StatusCode,
        rate_limit_remaining: Option<String>,
    },

    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("GitHub API request to {url} (page {page}) could not be sent: {source}")]
    Transport {
        url: String,
        page: u32,
        #[source]
        source: reqwest::Error,
    },

    #[error("Malformed response from {url} (page {page}): {source}")]
    MalformedResponse {
        url: String,
        page: u32,
        #[source]
        source: serde_json::Error,
    },

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl ReportError {
    pub fn is_usage(&self) -> bool {
        matches!(self, ReportError::Usage(_))
    }
}

fn rate_limit_hint(remaining: &Option<String>) -> String {
    match remaining.as_deref() {
        Some("0") => " (rate limit exhausted, provide --username and --token)".to_string(),
        Some(left) => format!(" ({} requests left in rate limit window)", left),
        None => String::new(),
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;
