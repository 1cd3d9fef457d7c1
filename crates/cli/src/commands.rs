//! Command execution.
//!
//! Each command loads configuration, wires the GitHub publisher and the
//! Homebrew tap into a [`ReleaseOrchestrator`], runs one entry point, and
//! returns the text to print on stdout.

use crate::cli::{Cli, Commands, OkEnvelope};
use nanoscope_github::{GitHubReleaseConfig, GitHubReleasePublisher};
use nanoscope_homebrew::{FormulaRepository, TapConfig};
use nanoscope_release::{
    Credentials, DryRun, IncrementKind, ReleaseConfig, ReleaseOrchestrator, ReleaseSummary, Result,
};
use serde::Serialize;
use std::path::Path;
use tracing::{debug, info};

/// Orchestrator wired to the production providers.
pub type Orchestrator = ReleaseOrchestrator<FormulaRepository, GitHubReleasePublisher>;

/// Result of `delete-drafts`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeleteDraftsSummary {
    /// Number of drafts deleted
    pub deleted: usize,
}

/// Builds the orchestrator from configuration.
///
/// The token is read from the configured environment variable. A missing
/// token is reported by the orchestrator when a command runs.
///
/// # Errors
///
/// Returns an error if the clone directory cannot be resolved or the HTTP
/// client cannot be built.
pub fn build_orchestrator(config: &ReleaseConfig, dry_run: DryRun) -> Result<Orchestrator> {
    let tap = TapConfig::from_settings(&config.formula)?;
    let publisher = GitHubReleasePublisher::new(GitHubReleaseConfig::from_settings(
        &config.github,
        config.http_timeout(),
    ))?;
    let credentials = Credentials::from_env_optional(&config.token_env);
    debug!(
        token_env = %config.token_env,
        has_credentials = credentials.is_some(),
        clone_dir = %tap.clone_dir.display(),
        "Built release orchestrator"
    );

    Ok(
        ReleaseOrchestrator::new(FormulaRepository::new(tap), publisher, credentials)
            .with_credentials_source(config.token_env.clone())
            .with_dry_run(dry_run),
    )
}

/// Runs the parsed command line and returns its stdout text.
///
/// # Errors
///
/// Returns the first error raised by configuration loading or the command.
pub fn execute(cli: &Cli) -> Result<String> {
    let config = ReleaseConfig::load(cli.config.as_deref())?;

    match &cli.command {
        Commands::Release {
            artifact,
            increment,
            dry_run,
        } => {
            let summary = run_release(&config, artifact, *increment, DryRun::from(*dry_run))?;
            if cli.json {
                render_json(&summary)
            } else {
                Ok(render_release(&summary))
            }
        }
        Commands::DeleteDrafts => {
            let summary = run_delete_drafts(&config)?;
            if cli.json {
                render_json(&summary)
            } else {
                Ok(render_delete_drafts(summary))
            }
        }
    }
}

/// Runs `release`.
///
/// # Errors
///
/// Returns an error if any release step fails.
pub fn run_release(
    config: &ReleaseConfig,
    artifact: &Path,
    increment: IncrementKind,
    dry_run: DryRun,
) -> Result<ReleaseSummary> {
    info!(
        artifact = %artifact.display(),
        increment = %increment,
        dry_run = dry_run.is_dry_run(),
        "Starting release"
    );
    build_orchestrator(config, dry_run)?.release(artifact, increment)
}

/// Runs `delete-drafts`.
///
/// # Errors
///
/// Returns an error if listing or any delete fails.
pub fn run_delete_drafts(config: &ReleaseConfig) -> Result<DeleteDraftsSummary> {
    let deleted = build_orchestrator(config, DryRun::No)?.delete_release_drafts()?;
    Ok(DeleteDraftsSummary { deleted })
}

/// Human-readable release summary.
#[must_use]
pub fn render_release(summary: &ReleaseSummary) -> String {
    if summary.dry_run {
        return format!(
            "Dry run: would release {} (current {})",
            summary.version, summary.previous_version
        );
    }

    let mut out = format!(
        "Released {} (was {})",
        summary.version, summary.previous_version
    );
    if let Some(url) = &summary.download_url {
        out.push_str(&format!("\n  url:    {url}"));
    }
    if let Some(sha256) = &summary.sha256 {
        out.push_str(&format!("\n  sha256: {sha256}"));
    }
    out
}

/// Human-readable draft cleanup summary.
#[must_use]
pub fn render_delete_drafts(summary: DeleteDraftsSummary) -> String {
    match summary.deleted {
        1 => "Deleted 1 draft release".to_string(),
        n => format!("Deleted {n} draft releases"),
    }
}

fn render_json<T: Serialize>(data: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(&OkEnvelope::new(data))?)
}
