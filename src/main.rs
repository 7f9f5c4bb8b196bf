use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use clap::Parser;
use colored::*;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info, Level};
use tracing_subscriber::EnvFilter;

mod analysis;
mod config;
mod error;
mod github;
mod output;
mod report;

use analysis::{DateWindow, FilterPolicy};
use config::Config;
use error::ReportError;
use github::{GitHubClient, RepoRef};
use output::Reporter;
use report::assembler::ReportOptions;
use report::ReportAssembler;

const AUTH_HELP: &str = "For unauthenticated requests, the API rate limit allows for up to 60 \
requests per hour. If that is not sufficient, you can make up to 5,000 requests per hour using \
an OAuth token. Provide the username and token using the -u and -t keys.";

#[derive(Parser)]
#[command(author, version, about, long_about = None, after_help = AUTH_HELP)]
struct Cli {
    /// Repository URL, e.g. https://github.com/owner/repo
    url: String,

    /// Branch to analyze
    #[arg(short, long, default_value = "master")]
    branch: String,

    /// Start date as YYYY-MM-DD (inclusive, from 00:00:00 UTC)
    #[arg(short, long, value_parser = parse_date)]
    start_date: Option<NaiveDate>,

    /// End date as YYYY-MM-DD (up to 23:59:59 UTC)
    #[arg(short, long, value_parser = parse_date)]
    end_date: Option<NaiveDate>,

    /// GitHub username
    #[arg(short, long, env = "REPOSTATS_USERNAME")]
    username: Option<String>,

    /// GitHub OAuth token
    #[arg(short, long, env = "REPOSTATS_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    output: String,

    /// Configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Scan every entry when applying the date window
    #[arg(long)]
    exhaustive_filter: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn parse_date(value: &str) -> std::result::Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| format!("'{}' is not a valid date", value))
}

fn day_start(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

fn day_end(date: NaiveDate) -> DateTime<Utc> {
    date.and_hms_opt(23, 59, 59)
        .unwrap_or_else(|| date.and_time(NaiveTime::MIN))
        .and_utc()
}

fn date_window(start: Option<NaiveDate>, end: Option<NaiveDate>) -> error::Result<DateWindow> {
    if let (Some(start), Some(end)) = (start, end) {
        if start > end {
            return Err(ReportError::Usage(format!(
                "start date {} is after end date {}",
                start, end
            )));
        }
    }
    Ok(DateWindow::new(start.map(day_start), end.map(day_end)))
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let repo = RepoRef::from_url(&cli.url)?;
    let window = date_window(cli.start_date, cli.end_date)?;

    let mut config = Config::load(cli.config.as_deref())
        .context("Failed to load configuration")?
        .with_credentials(cli.username, cli.token);
    if cli.exhaustive_filter {
        config.report.filter_policy = FilterPolicy::Exhaustive;
    }
    if !config.output.color {
        colored::control::set_override(false);
    }

    eprintln!(
        "{}",
        "RepoStats - GitHub Repository Activity Report"
            .bright_cyan()
            .bold()
    );
    eprintln!("Repository: {}", repo.to_string().bright_white());

    let client = GitHubClient::new(&config.api, config.auth.clone(), repo)?
        .with_progress(config.output.progress);
    let options = ReportOptions::new(cli.branch, window, config.api.per_page, &config.report);
    let assembler = ReportAssembler::new(&client, options);
    let mut reporter = Reporter::stdout(&cli.output);

    info!("Collecting activity for {}", client.repo());
    let report = assembler
        .run(|section| reporter.section(section))
        .await?;
    reporter.finish(&report)?;

    eprintln!("\n{}", "Report complete!".bright_green().bold());
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let usage = err
                .downcast_ref::<ReportError>()
                .is_some_and(ReportError::is_usage);
            error!("{:#}", err);
            if usage {
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dates_expand_to_day_boundaries() {
        let window = date_window(
            Some(parse_date("2024-01-01").unwrap()),
            Some(parse_date("2024-01-31").unwrap()),
        )
        .unwrap();

        assert_eq!(
            window.start,
            Some("2024-01-01T00:00:00Z".parse().unwrap())
        );
        assert_eq!(window.end, Some("2024-01-31T23:59:59Z".parse().unwrap()));
    }

    #[test]
    fn missing_dates_leave_window_open() {
        assert!(date_window(None, None).unwrap().is_open());
        let window = date_window(Some(parse_date("2024-03-01").unwrap()), None).unwrap();
        assert!(window.end.is_none());
    }

    #[test]
    fn invalid_dates_are_rejected() {
        assert!(parse_date("2024-13-01").is_err());
        assert!(parse_date("01/02/2024").is_err());
        let err = date_window(
            Some(parse_date("2024-02-01").unwrap()),
            Some(parse_date("2024-01-01").unwrap()),
        )
        .unwrap_err();
        assert!(err.is_usage());
    }

    #[test]
    fn cli_parses_original_flags() {
        let cli = Cli::try_parse_from([
            "repostats",
            "-b",
            "main",
            "-s",
            "2024-01-01",
            "-e",
            "2024-06-30",
            "-u",
            "alice",
            "-t",
            "secret",
            "https://github.com/octo/widgets",
        ])
        .unwrap();

        assert_eq!(cli.branch, "main");
        assert_eq!(cli.start_date, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(cli.username.as_deref(), Some("alice"));
        assert_eq!(cli.url, "https://github.com/octo/widgets");
    }

    #[test]
    fn cli_requires_url() {
        assert!(Cli::try_parse_from(["repostats"]).is_err());
        assert!(Cli::try_parse_from(["repostats", "-s", "yesterday", "o/r"]).is_err());
    }
}
