//! Command-line front end for nanoscope release automation.
//!
//! The `nanoscope-release` binary is a thin wrapper over this library:
//! - [`cli`] - argument parsing, exit codes and error rendering
//! - [`commands`] - wiring configuration into the orchestrator
//! - [`tracing`] - subscriber setup for `--log-level`/`--log-format`

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod cli;
pub mod commands;
pub mod tracing;
