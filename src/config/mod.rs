use crate::analysis::FilterPolicy;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

pub const ENV_PREFIX: &str = "REPOSTATS";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub auth: AuthConfig,
    pub report: ReportConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub per_page: u32,
    pub user_agent: String,
}

/// Optional credential pair. Requests are only authenticated when both
/// halves are present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub username: Option<String>,
    #[serde(skip_serializing)]
    pub token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub top_authors: usize,
    pub pull_request_stale_days: u32,
    pub issue_stale_days: u32,
    pub filter_policy: FilterPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub color: bool,
    pub progress: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.github.com".to_string(),
            per_page: 100,
            user_agent: "repostats".to_string(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            top_authors: 30,
            pull_request_stale_days: 30,
            issue_stale_days: 14,
            filter_policy: FilterPolicy::EarlyExit,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            color: true,
            progress: true,
        }
    }
}

impl AuthConfig {
    pub fn basic_credentials(&self) -> Option<(&str, &str)> {
        match (self.username.as_deref(), self.token.as_deref()) {
            (Some(username), Some(token)) => Some((username, token)),
            _ => None,
        }
    }
}

impl Config {
    /// Layers built-in defaults, an optional TOML file and `REPOSTATS_*`
    /// environment variables, later sources winning.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, config::Environment::with_prefix(ENV_PREFIX))
    }

    fn load_with_env(path: Option<&Path>, env: config::Environment) -> Result<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            debug!("Reading configuration from {}", path.display());
            builder = builder.add_source(
                config::File::from(path)
                    .format(config::FileFormat::Toml)
                    .required(false),
            );
        }

        let config = builder
            .add_source(
                env.prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Command-line credentials replace configured ones field by field.
    pub fn with_credentials(mut self, username: Option<String>, token: Option<String>) -> Self {
        if username.is_some() {
            self.auth.username = username;
        }
        if token.is_some() {
            self.auth.token = token;
        }
        self
    }
}
