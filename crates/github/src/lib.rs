//! GitHub provider for nanoscope releases.
//!
//! This crate provides [`GitHubReleasePublisher`], the [`ReleasePublisher`]
//! used by the release orchestrator. It creates a release for each version,
//! uploads the build artifact as its asset, and lists and deletes releases
//! for draft cleanup.
//!
//! # Features
//!
//! - `release` (default): GitHub Releases publisher over the REST API
//!
//! [`ReleasePublisher`]: nanoscope_release::ReleasePublisher

#![warn(missing_docs)]

#[cfg(feature = "release")]
pub mod release;

// Re-exports for convenience
#[cfg(feature = "release")]
pub use release::{GitHubReleaseConfig, GitHubReleasePublisher};
