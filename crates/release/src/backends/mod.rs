//! Provider traits.
//!
//! The orchestrator only talks to these traits. Provider crates implement
//! them:
//! - `nanoscope-github` - [`ReleasePublisher`] over the GitHub Releases API
//! - `nanoscope-homebrew` - [`FormulaStore`] over a git-backed tap clone
//!
//! # Example
//!
//! ```rust,ignore
//! use nanoscope_release::backends::{FormulaStore, ReleasePublisher};
//! use nanoscope_release::{Credentials, ReleaseOrchestrator, ReleaseConfig};
//!
//! let orchestrator = ReleaseOrchestrator::new(formula_store, publisher, credentials);
//! let summary = orchestrator.release(artifact, IncrementKind::Patch)?;
//! ```

use crate::artifact::ReleaseAsset;
use crate::credentials::Credentials;
use crate::error::Result;
use crate::version::Version;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A release entry as returned by the list endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseRecord {
    /// Numeric release id.
    pub id: u64,
    /// API URL of the release (target of `DELETE`).
    pub url: String,
    /// Tag the release points at.
    #[serde(default)]
    pub tag_name: String,
    /// Whether the release is an unpublished draft.
    #[serde(default)]
    pub draft: bool,
}

/// A release-hosting API.
pub trait ReleasePublisher {
    /// Creates a release for `version` and uploads `artifact` to it.
    ///
    /// Returns the asset's public download URL and the bytes uploaded.
    ///
    /// # Errors
    ///
    /// Returns an error if the artifact cannot be read, the source commit
    /// cannot be resolved, or any request fails.
    fn publish(
        &self,
        credentials: &Credentials,
        artifact: &Path,
        version: &Version,
    ) -> Result<ReleaseAsset>;

    /// Lists every release of the project.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body cannot be parsed.
    fn list_releases(&self, credentials: &Credentials) -> Result<Vec<ReleaseRecord>>;

    /// Deletes the release at `url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    fn delete_release(&self, credentials: &Credentials, url: &str) -> Result<()>;
}

/// A formula kept in a version-controlled tap.
pub trait FormulaStore {
    /// Makes the local copy exist and match the upstream default branch.
    ///
    /// # Errors
    ///
    /// Returns an error if any clone/fetch/reset/checkout/pull step fails.
    fn ensure_clean(&self) -> Result<()>;

    /// Reads the formula's current version.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the `version` field is
    /// missing or malformed.
    fn read_version(&self) -> Result<Version>;

    /// Rewrites the formula's `version`, `url` and `sha256` fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or written.
    fn update(&self, version: &Version, url: &str, sha256: &str) -> Result<()>;

    /// Commits all tracked changes with `message`.
    ///
    /// # Errors
    ///
    /// Returns an error if the commit fails.
    fn commit(&self, message: &str) -> Result<()>;

    /// Pushes the current branch to its remote.
    ///
    /// # Errors
    ///
    /// Returns an error if the push fails.
    fn push(&self) -> Result<()>;
}
