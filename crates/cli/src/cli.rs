//! Command-line definition and error rendering.

use crate::tracing::{LogLevel, TracingFormat};
use clap::{Parser, Subcommand};
use miette::Report;
use nanoscope_release::IncrementKind;
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;

/// Exit code for success
pub const EXIT_OK: i32 = 0;
/// Exit code for any failure
pub const EXIT_ERROR: i32 = 1;

/// Release automation for nanoscope.
///
/// Bumps the Homebrew formula version, publishes the build artifact to
/// GitHub Releases, and pushes the updated formula.
#[derive(Parser, Debug)]
#[command(name = "nanoscope-release")]
#[command(about = "Publish nanoscope releases and update the Homebrew formula")]
#[command(long_about = None)]
#[command(version)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file.
    #[arg(
        long,
        global = true,
        env = "NANOSCOPE_RELEASE_CONFIG",
        value_name = "PATH",
        help = "TOML configuration file (default: ./nanoscope-release.toml if present)"
    )]
    pub config: Option<PathBuf>,

    /// Logging verbosity level.
    #[arg(
        long,
        global = true,
        help = "Set logging level (RUST_LOG takes precedence)",
        default_value = "info",
        value_enum
    )]
    pub log_level: LogLevel,

    /// Log output format.
    #[arg(
        long,
        global = true,
        help = "Log output format",
        default_value = "pretty",
        value_enum
    )]
    pub log_format: TracingFormat,

    /// Print results as JSON.
    #[arg(long, global = true, help = "Print the result as a JSON envelope")]
    pub json: bool,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Cut a release.
    #[command(about = "Bump the version, publish the artifact and update the formula")]
    Release {
        /// Build artifact to upload.
        #[arg(long, value_name = "PATH", help = "Build artifact to upload")]
        artifact: PathBuf,

        /// Version component to increment.
        #[arg(
            long,
            value_name = "major|minor|patch",
            help = "Version component to increment"
        )]
        increment: IncrementKind,

        /// Stop after computing the next version.
        #[arg(long, help = "Compute the next version without publishing or pushing")]
        dry_run: bool,
    },

    /// Delete draft releases.
    #[command(about = "Delete every draft release")]
    DeleteDrafts,
}

/// Parse command-line arguments
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}

/// Success response envelope for JSON output
#[derive(Debug, Clone, Serialize)]
pub struct OkEnvelope<T> {
    /// Status indicator - always "ok" for success
    pub status: &'static str,
    /// The actual data payload
    pub data: T,
}

impl<T> OkEnvelope<T> {
    /// Create a new success envelope
    #[must_use]
    pub const fn new(data: T) -> Self {
        Self { status: "ok", data }
    }
}

/// Render an error through miette on stderr.
#[allow(clippy::print_stderr)]
pub fn render_error(report: &Report) {
    eprintln!("{report:?}");
    // Ensure output is flushed before process exit
    let _ = io::stderr().flush();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_release() {
        let cli = Cli::try_parse_from([
            "nanoscope-release",
            "release",
            "--artifact",
            "build/nanoscope.zip",
            "--increment",
            "minor",
        ])
        .unwrap();

        match cli.command {
            Commands::Release {
                artifact,
                increment,
                dry_run,
            } => {
                assert_eq!(artifact, PathBuf::from("build/nanoscope.zip"));
                assert_eq!(increment, IncrementKind::Minor);
                assert!(!dry_run);
            }
            Commands::DeleteDrafts => panic!("expected release"),
        }
        assert_eq!(cli.log_level, LogLevel::Info);
        assert_eq!(cli.log_format, TracingFormat::Pretty);
    }

    #[test]
    fn test_parse_increment_is_case_insensitive() {
        let cli = Cli::try_parse_from([
            "nanoscope-release",
            "release",
            "--artifact",
            "a.zip",
            "--increment",
            "MAJOR",
            "--dry-run",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Release {
                increment: IncrementKind::Major,
                dry_run: true,
                ..
            }
        ));
    }

    #[test]
    fn test_parse_rejects_unknown_increment() {
        let result = Cli::try_parse_from([
            "nanoscope-release",
            "release",
            "--artifact",
            "a.zip",
            "--increment",
            "huge",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "nanoscope-release",
            "delete-drafts",
            "--config",
            "release.toml",
            "--log-level",
            "debug",
            "--log-format",
            "json",
            "--json",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::DeleteDrafts));
        assert_eq!(cli.config, Some(PathBuf::from("release.toml")));
        assert_eq!(cli.log_level, LogLevel::Debug);
        assert_eq!(cli.log_format, TracingFormat::Json);
        assert!(cli.json);
    }

    #[test]
    fn test_ok_envelope_serializes() {
        let json = serde_json::to_value(OkEnvelope::new(3)).unwrap();
        assert_eq!(json, serde_json::json!({ "status": "ok", "data": 3 }));
    }
}
