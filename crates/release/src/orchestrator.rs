//! Release orchestrator.
//!
//! Composes a [`FormulaStore`] and a [`ReleasePublisher`] into the two
//! entry points: cutting a release and deleting draft releases. Both run
//! strictly in sequence and stop at the first error; nothing already done
//! is rolled back.

use crate::artifact::sha256_hex;
use crate::backends::{FormulaStore, ReleasePublisher};
use crate::credentials::Credentials;
use crate::error::{Error, Result};
use crate::version::{IncrementKind, Version};
use serde::Serialize;
use std::path::Path;
use tracing::{debug, info};

/// Whether a release run may touch remote state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DryRun {
    /// Publish, commit and push.
    #[default]
    No,
    /// Stop after computing the next version.
    Yes,
}

impl DryRun {
    /// Returns `true` for [`DryRun::Yes`].
    #[must_use]
    pub const fn is_dry_run(self) -> bool {
        matches!(self, Self::Yes)
    }
}

impl From<bool> for DryRun {
    fn from(dry_run: bool) -> Self {
        if dry_run { Self::Yes } else { Self::No }
    }
}

/// Outcome of a release run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReleaseSummary {
    /// Version found in the formula before the run.
    pub previous_version: Version,
    /// Version that was (or would be) released.
    pub version: Version,
    /// Download URL written to the formula; `None` for dry runs.
    pub download_url: Option<String>,
    /// SHA-256 written to the formula; `None` for dry runs.
    pub sha256: Option<String>,
    /// Whether this was a dry run.
    pub dry_run: bool,
}

/// Commit message used when the formula is updated.
#[must_use]
pub fn commit_message(version: &Version) -> String {
    format!("Update version to {version}.")
}

/// Release orchestrator.
pub struct ReleaseOrchestrator<F, P> {
    formula: F,
    publisher: P,
    credentials: Option<Credentials>,
    credentials_source: String,
    dry_run: DryRun,
}

impl<F: FormulaStore, P: ReleasePublisher> ReleaseOrchestrator<F, P> {
    /// Creates a new orchestrator.
    ///
    /// `credentials` may be absent; each entry point checks for them before
    /// doing anything else.
    #[must_use]
    pub fn new(formula: F, publisher: P, credentials: Option<Credentials>) -> Self {
        Self {
            formula,
            publisher,
            credentials,
            credentials_source: crate::credentials::DEFAULT_TOKEN_ENV.to_string(),
            dry_run: DryRun::No,
        }
    }

    /// Names the environment variable reported when credentials are missing.
    #[must_use]
    pub fn with_credentials_source(mut self, env: impl Into<String>) -> Self {
        self.credentials_source = env.into();
        self
    }

    /// Sets dry-run mode.
    #[must_use]
    pub const fn with_dry_run(mut self, dry_run: DryRun) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// The formula store.
    #[must_use]
    pub const fn formula(&self) -> &F {
        &self.formula
    }

    /// The release publisher.
    #[must_use]
    pub const fn publisher(&self) -> &P {
        &self.publisher
    }

    fn require_credentials(&self) -> Result<&Credentials> {
        self.credentials
            .as_ref()
            .ok_or_else(|| Error::missing_credentials(&self.credentials_source))
    }

    /// Cuts a new release.
    ///
    /// Reads the formula version, bumps it by `kind`, publishes `artifact`,
    /// and writes the new version, download URL and checksum back to the
    /// formula before committing and pushing.
    ///
    /// # Errors
    ///
    /// Returns an error if credentials are missing or any step fails.
    pub fn release(&self, artifact: &Path, kind: IncrementKind) -> Result<ReleaseSummary> {
        let credentials = self.require_credentials()?;

        self.formula.ensure_clean()?;

        let previous_version = self.formula.read_version()?;
        let version = previous_version.increment(kind)?;
        info!(
            previous = %previous_version,
            next = %version,
            increment = %kind,
            "Computed release version"
        );

        if self.dry_run.is_dry_run() {
            info!(version = %version, artifact = %artifact.display(), "Would publish release");
            return Ok(ReleaseSummary {
                previous_version,
                version,
                download_url: None,
                sha256: None,
                dry_run: true,
            });
        }

        let asset = self.publisher.publish(credentials, artifact, &version)?;
        let sha256 = sha256_hex(&asset.bytes);
        debug!(
            url = %asset.download_url,
            size = asset.bytes.len(),
            sha256 = %sha256,
            "Published asset"
        );

        self.formula.update(&version, &asset.download_url, &sha256)?;
        self.formula.commit(&commit_message(&version))?;
        self.formula.push()?;

        info!(version = %version, url = %asset.download_url, "Release complete");

        Ok(ReleaseSummary {
            previous_version,
            version,
            download_url: Some(asset.download_url),
            sha256: Some(sha256),
            dry_run: false,
        })
    }

    /// Deletes every draft release.
    ///
    /// Drafts are deleted in listing order. The first failed delete aborts
    /// the remaining ones and is returned.
    ///
    /// # Errors
    ///
    /// Returns an error if credentials are missing, listing fails, or a
    /// delete fails.
    pub fn delete_release_drafts(&self) -> Result<usize> {
        let credentials = self.require_credentials()?;

        let releases = self.publisher.list_releases(credentials)?;
        let drafts: Vec<_> = releases.iter().filter(|r| r.draft).collect();
        info!(
            total = releases.len(),
            drafts = drafts.len(),
            "Listed releases"
        );

        for draft in &drafts {
            info!(id = draft.id, tag = %draft.tag_name, "Deleting draft release");
            self.publisher.delete_release(credentials, &draft.url)?;
        }

        Ok(drafts.len())
    }
}
