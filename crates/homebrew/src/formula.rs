//! Homebrew formula field handling.
//!
//! A formula is treated as opaque text except for `key "value"` lines such
//! as `version "1.2.3"`. Only the first occurrence of a key is read or
//! replaced; every other byte of the file is preserved.

use nanoscope_release::error::{Error, Result};
use nanoscope_release::Version;
use regex::{Captures, Regex};
use std::path::Path;

/// Key of the version field.
pub const VERSION_KEY: &str = "version";
/// Key of the download URL field.
pub const URL_KEY: &str = "url";
/// Key of the checksum field.
pub const SHA256_KEY: &str = "sha256";

/// New values for the three release fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormulaFields {
    /// Version string (e.g., "1.2.4")
    pub version: String,
    /// Artifact download URL
    pub url: String,
    /// Lower-case hex SHA-256 of the artifact
    pub sha256: String,
}

impl FormulaFields {
    /// Creates the field set for a release.
    #[must_use]
    pub fn new(version: &Version, url: impl Into<String>, sha256: impl Into<String>) -> Self {
        Self {
            version: version.to_string(),
            url: url.into(),
            sha256: sha256.into(),
        }
    }

    fn entries(&self) -> [(&'static str, &str); 3] {
        [
            (VERSION_KEY, self.version.as_str()),
            (URL_KEY, self.url.as_str()),
            (SHA256_KEY, self.sha256.as_str()),
        ]
    }
}

/// Matches `key "value"` at the start of a line, allowing indentation.
fn field_pattern(key: &str) -> Result<Regex> {
    let pattern = format!(r#"(?m)^([ \t]*{}[ \t]+")([^"\n]*)(")"#, regex::escape(key));
    Regex::new(&pattern)
        .map_err(|e| Error::formula_parse(format!("Invalid field pattern for {key}: {e}"), None))
}

/// Returns the value of the first `key "value"` line.
///
/// # Errors
///
/// Returns an error only if the key cannot be turned into a pattern.
pub fn read_field(content: &str, key: &str) -> Result<Option<String>> {
    let re = field_pattern(key)?;
    Ok(re.captures(content).map(|caps| caps[2].to_string()))
}

/// Replaces the value of the first `key "value"` line.
///
/// Returns the new content and whether a field was found. Content without
/// the key is returned unchanged.
///
/// # Errors
///
/// Returns an error only if the key cannot be turned into a pattern.
pub fn replace_field(content: &str, key: &str, value: &str) -> Result<(String, bool)> {
    let re = field_pattern(key)?;
    if !re.is_match(content) {
        return Ok((content.to_string(), false));
    }
    let replaced = re.replacen(content, 1, |caps: &Captures| {
        format!("{}{}{}", &caps[1], value, &caps[3])
    });
    Ok((replaced.into_owned(), true))
}

/// Applies all three release fields.
///
/// Returns the new content and the keys that were not present.
///
/// # Errors
///
/// Returns an error only if a key cannot be turned into a pattern.
pub fn apply(content: &str, fields: &FormulaFields) -> Result<(String, Vec<&'static str>)> {
    let mut content = content.to_string();
    let mut missing = Vec::new();
    for (key, value) in fields.entries() {
        let (next, found) = replace_field(&content, key, value)?;
        if !found {
            missing.push(key);
        }
        content = next;
    }
    Ok((content, missing))
}

/// Reads and parses the formula's `version` field.
///
/// # Errors
///
/// Returns [`Error::FormulaParse`] if the field is absent or not a
/// `major.minor.patch` version.
pub fn read_version(content: &str, path: Option<&Path>) -> Result<Version> {
    let raw = read_field(content, VERSION_KEY)?.ok_or_else(|| {
        Error::formula_parse(
            "no `version \"...\"` field found",
            path.map(Path::to_path_buf),
        )
    })?;

    raw.parse().map_err(|_| {
        Error::formula_parse(
            format!("version field holds {raw:?}, expected major.minor.patch"),
            path.map(Path::to_path_buf),
        )
    })
}
