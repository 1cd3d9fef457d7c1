//! Release automation for nanoscope.
//!
//! Cuts a release by reading the current version from the Homebrew formula,
//! bumping it, publishing the build artifact, and writing the new version,
//! download URL and checksum back to the formula. Draft releases left behind
//! by failed runs can be deleted in bulk.
//!
//! # Architecture
//!
//! - [`version`] - `major.minor.patch` parsing and bumping
//! - [`process`] - external command execution with exit-status checks
//! - [`credentials`] - the API token, threaded explicitly to callers
//! - [`artifact`] - uploaded assets and their SHA-256
//! - [`config`] - TOML configuration with defaults
//! - [`backends`] - traits implemented by the GitHub and Homebrew crates
//! - [`orchestrator`] - the `release` and `delete_release_drafts` entry points
//!
//! # Example
//!
//! ```rust,ignore
//! use nanoscope_release::{Credentials, IncrementKind, ReleaseOrchestrator};
//!
//! let credentials = Credentials::from_env_optional("GITHUB_API_TOKEN");
//! let orchestrator = ReleaseOrchestrator::new(formula_repo, publisher, credentials);
//! let summary = orchestrator.release(Path::new("build/nanoscope.zip"), IncrementKind::Patch)?;
//! println!("released {}", summary.version);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod artifact;
pub mod backends;
pub mod config;
pub mod credentials;
pub mod error;
pub mod orchestrator;
pub mod process;
pub mod version;

// Re-export main types
pub use artifact::{ReleaseAsset, sha256_hex};
pub use backends::{FormulaStore, ReleasePublisher, ReleaseRecord};
pub use config::{FormulaSettings, GitHubSettings, ReleaseConfig};
pub use credentials::Credentials;
pub use error::{Error, Result};
pub use orchestrator::{DryRun, ReleaseOrchestrator, ReleaseSummary, commit_message};
pub use process::{ProcessCommand, ProcessOutput, ProcessRunner, SystemProcessRunner};
pub use version::{IncrementKind, Version};
