//! Homebrew tap provider for nanoscope releases.
//!
//! This crate provides [`FormulaRepository`], the [`FormulaStore`] used by the
//! release orchestrator. It keeps a local clone of the tap in sync with its
//! upstream branch, rewrites the formula's `version`, `url` and `sha256`
//! fields, and commits and pushes the result.
//!
//! # Example
//!
//! ```rust,ignore
//! use nanoscope_homebrew::{FormulaRepository, TapConfig};
//!
//! let config = TapConfig::new("git@github.com:uber/homebrew-nanoscope.git", "/tmp/tap")
//!     .with_branch("master");
//! let repo = FormulaRepository::new(config);
//! repo.ensure_clean()?;
//! ```
//!
//! [`FormulaStore`]: nanoscope_release::FormulaStore

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod formula;
mod repository;

pub use formula::FormulaFields;
pub use repository::{FormulaRepository, TapConfig};
