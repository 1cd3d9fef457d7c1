//! Error types for release operations.

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for release operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while cutting a release or cleaning up drafts.
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    /// The API token is missing or empty.
    #[error("Missing credentials: ${env} is not set")]
    #[diagnostic(
        code(nanoscope::release::missing_credentials),
        help("export {env}=<your-github-token>")
    )]
    MissingCredentials {
        /// Name of the environment variable that should hold the token
        env: String,
    },

    /// An external command could not be spawned or exited with a nonzero status.
    #[error("Command failed: {command}{}", .code.map(|c| format!(" (exit code {c})")).unwrap_or_default())]
    #[diagnostic(code(nanoscope::release::command))]
    Command {
        /// The rendered command line
        command: String,
        /// Exit code, if the process ran to completion
        code: Option<i32>,
        /// Trimmed standard error or spawn failure message
        #[help]
        stderr: Option<String>,
    },

    /// An HTTP request failed or returned an unexpected body.
    #[error("HTTP request to {url} failed: {message}")]
    #[diagnostic(
        code(nanoscope::release::http),
        help("Check the token's permissions and that the repository exists")
    )]
    Http {
        /// The requested URL
        url: String,
        /// What went wrong
        message: String,
    },

    /// The formula file is missing a field or holds a malformed value.
    #[error("Invalid formula: {message}")]
    #[diagnostic(
        code(nanoscope::release::formula_parse),
        help("The formula must contain a line like: version \"1.2.3\"")
    )]
    FormulaParse {
        /// The error message
        message: String,
        /// The formula file, when known
        path: Option<PathBuf>,
    },

    /// Failed to parse a version string.
    #[error("Invalid version: {version}")]
    #[diagnostic(
        code(nanoscope::release::invalid_version),
        help("Versions must have exactly three numeric components (e.g., 1.2.3)")
    )]
    InvalidVersion {
        /// The invalid version string
        version: String,
    },

    /// The release artifact could not be read.
    #[error("Artifact error: {message}")]
    #[diagnostic(
        code(nanoscope::release::artifact),
        help("Check that the artifact exists and is readable")
    )]
    Artifact {
        /// The error message
        message: String,
        /// The path that caused the error
        path: Option<PathBuf>,
    },

    /// Configuration error.
    #[error("Release configuration error: {message}")]
    #[diagnostic(code(nanoscope::release::config), help("{help}"))]
    Config {
        /// The error message
        message: String,
        /// Help text for the user
        help: String,
    },

    /// Wrapped I/O error.
    #[error("I/O error: {0}")]
    #[diagnostic(code(nanoscope::release::io))]
    Io(#[from] std::io::Error),

    /// Wrapped JSON error.
    #[error("JSON error: {0}")]
    #[diagnostic(code(nanoscope::release::json))]
    Json(#[from] serde_json::Error),

    /// Wrapped TOML parsing error.
    #[error("TOML parse error: {0}")]
    #[diagnostic(code(nanoscope::release::toml_parse))]
    TomlParse(#[from] toml::de::Error),
}

impl Error {
    /// Create a new missing credentials error.
    #[must_use]
    pub fn missing_credentials(env: impl Into<String>) -> Self {
        Self::MissingCredentials { env: env.into() }
    }

    /// Create a new command error.
    #[must_use]
    pub fn command(command: impl Into<String>, code: Option<i32>, stderr: Option<String>) -> Self {
        Self::Command {
            command: command.into(),
            code,
            stderr,
        }
    }

    /// Create a new HTTP error.
    #[must_use]
    pub fn http(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Http {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create a new formula parse error.
    #[must_use]
    pub fn formula_parse(message: impl Into<String>, path: Option<PathBuf>) -> Self {
        Self::FormulaParse {
            message: message.into(),
            path,
        }
    }

    /// Create a new invalid version error.
    #[must_use]
    pub fn invalid_version(version: impl Into<String>) -> Self {
        Self::InvalidVersion {
            version: version.into(),
        }
    }

    /// Create a new artifact error.
    #[must_use]
    pub fn artifact(message: impl Into<String>, path: Option<PathBuf>) -> Self {
        Self::Artifact {
            message: message.into(),
            path,
        }
    }

    /// Create a new configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            help: help.into(),
        }
    }
}
