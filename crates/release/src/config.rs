//! Release configuration types.
//!
//! Configuration is read from an optional TOML file. Every field has a
//! default, so an empty or absent file describes the standard nanoscope
//! release setup.

use crate::credentials::DEFAULT_TOKEN_ENV;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "nanoscope-release.toml";

/// Complete release configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReleaseConfig {
    /// Environment variable holding the API token.
    pub token_env: String,
    /// Timeout applied to every HTTP request; no timeout when unset.
    pub http_timeout_secs: Option<u64>,
    /// Release-hosting settings.
    pub github: GitHubSettings,
    /// Formula tap settings.
    pub formula: FormulaSettings,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        Self {
            token_env: DEFAULT_TOKEN_ENV.to_string(),
            http_timeout_secs: None,
            github: GitHubSettings::default(),
            formula: FormulaSettings::default(),
        }
    }
}

/// Settings for the GitHub Releases API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GitHubSettings {
    /// Repository owner.
    pub owner: String,
    /// Repository name.
    pub repo: String,
    /// API root, without trailing slash.
    pub api_base_url: String,
    /// Asset file name; `{version}` is substituted.
    pub asset_name: String,
    /// Release body; `{version}` is substituted.
    pub body: String,
    /// Source checkout whose `HEAD` the release tag points at.
    pub source_dir: PathBuf,
}

impl Default for GitHubSettings {
    fn default() -> Self {
        Self {
            owner: "uber".to_string(),
            repo: "nanoscope".to_string(),
            api_base_url: "https://api.github.com".to_string(),
            asset_name: "nanoscope-{version}.zip".to_string(),
            body: "Nanoscope {version}.\n\nInstall or upgrade with Homebrew:\n\n    brew tap uber/nanoscope\n    brew install nanoscope\n".to_string(),
            source_dir: PathBuf::from("."),
        }
    }
}

/// Settings for the Homebrew tap holding the formula.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormulaSettings {
    /// Git remote of the tap repository.
    pub remote: String,
    /// Local clone directory; a leading `~` expands to the home directory.
    pub clone_dir: String,
    /// Formula file, relative to the clone directory.
    pub file: PathBuf,
    /// Default branch of the tap.
    pub branch: String,
}

impl Default for FormulaSettings {
    fn default() -> Self {
        Self {
            remote: "git@github.com:uber/homebrew-nanoscope.git".to_string(),
            clone_dir: "~/.nanoscope/homebrew-tap".to_string(),
            file: PathBuf::from("nanoscope.rb"),
            branch: "master".to_string(),
        }
    }
}

impl FormulaSettings {
    /// The clone directory with `~` expanded.
    ///
    /// # Errors
    ///
    /// Returns an error if the path starts with `~` and no home directory
    /// can be determined.
    pub fn resolved_clone_dir(&self) -> Result<PathBuf> {
        expand_home(&self.clone_dir)
    }
}

impl ReleaseConfig {
    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML for this schema.
    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Loads configuration.
    ///
    /// An explicit path must exist. Without one, [`DEFAULT_CONFIG_FILE`] in
    /// the working directory is used when present, defaults otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit file is missing or any file fails to
    /// parse.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) if !p.exists() => {
                return Err(Error::config(
                    format!("Config file not found: {}", p.display()),
                    "Pass an existing file to --config or omit it to use defaults",
                ));
            }
            Some(p) => p.to_path_buf(),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !default.exists() {
                    return Ok(Self::default());
                }
                default
            }
        };

        let text = std::fs::read_to_string(&path)?;
        Self::from_toml(&text)
    }

    /// HTTP timeout, if configured.
    #[must_use]
    pub fn http_timeout(&self) -> Option<Duration> {
        self.http_timeout_secs.map(Duration::from_secs)
    }
}

/// Expands a leading `~` to the user's home directory.
///
/// # Errors
///
/// Returns an error if expansion is needed and no home directory exists.
pub fn expand_home(path: &str) -> Result<PathBuf> {
    let rest = match path.strip_prefix('~') {
        None => return Ok(PathBuf::from(path)),
        Some(rest) if rest.is_empty() => "",
        Some(rest) => match rest.strip_prefix('/') {
            Some(rest) => rest,
            // "~user/..." is left alone
            None => return Ok(PathBuf::from(path)),
        },
    };

    let home = dirs::home_dir().ok_or_else(|| {
        Error::config(
            "Could not determine the home directory",
            "Set formula.clone_dir to an absolute path",
        )
    })?;

    Ok(if rest.is_empty() { home } else { home.join(rest) })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = ReleaseConfig::default();
        assert_eq!(config.token_env, "GITHUB_API_TOKEN");
        assert!(config.http_timeout().is_none());
        assert_eq!(config.github.owner, "uber");
        assert_eq!(config.github.repo, "nanoscope");
        assert_eq!(config.github.asset_name, "nanoscope-{version}.zip");
        assert_eq!(config.formula.file, PathBuf::from("nanoscope.rb"));
        assert_eq!(config.formula.branch, "master");
    }

    #[test]
    fn test_from_toml_partial() {
        let config = ReleaseConfig::from_toml(
            r#"
token_env = "MY_TOKEN"
http_timeout_secs = 30

[github]
owner = "acme"

[formula]
branch = "main"
clone_dir = "/srv/tap"
"#,
        )
        .unwrap();

        assert_eq!(config.token_env, "MY_TOKEN");
        assert_eq!(config.http_timeout(), Some(Duration::from_secs(30)));
        assert_eq!(config.github.owner, "acme");
        // Unspecified fields keep their defaults
        assert_eq!(config.github.repo, "nanoscope");
        assert_eq!(config.formula.branch, "main");
        assert_eq!(
            config.formula.resolved_clone_dir().unwrap(),
            PathBuf::from("/srv/tap")
        );
    }

    #[test]
    fn test_from_toml_empty() {
        assert_eq!(ReleaseConfig::from_toml("").unwrap(), ReleaseConfig::default());
    }

    #[test]
    fn test_from_toml_invalid() {
        let err = ReleaseConfig::from_toml("token_env = [").unwrap_err();
        assert!(matches!(err, Error::TomlParse(_)));
    }

    #[test]
    fn test_load_explicit_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("release.toml");
        std::fs::write(&path, "[github]\nrepo = \"other\"\n").unwrap();
        let config = ReleaseConfig::load(Some(&path)).unwrap();
        assert_eq!(config.github.repo, "other");
    }

    #[test]
    fn test_load_explicit_missing() {
        let temp = TempDir::new().unwrap();
        let err = ReleaseConfig::load(Some(&temp.path().join("nope.toml"))).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_expand_home() {
        let home = dirs::home_dir().unwrap();
        assert_eq!(expand_home("~").unwrap(), home);
        assert_eq!(
            expand_home("~/.nanoscope/tap").unwrap(),
            home.join(".nanoscope/tap")
        );
        assert_eq!(expand_home("/abs/path").unwrap(), PathBuf::from("/abs/path"));
        assert_eq!(expand_home("~other/x").unwrap(), PathBuf::from("~other/x"));
    }
}
