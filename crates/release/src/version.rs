//! Version parsing and bumping.
//!
//! Formula versions are plain `major.minor.patch` triples: no `v` prefix,
//! no pre-release identifiers, no build metadata.

use crate::error::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Which component of a version to bump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IncrementKind {
    /// Bug fixes only.
    Patch,
    /// Backwards-compatible features.
    Minor,
    /// Breaking changes.
    Major,
}

impl IncrementKind {
    /// Parse an increment kind from a string (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not `major`, `minor` or `patch`.
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "major" => Ok(Self::Major),
            "minor" => Ok(Self::Minor),
            "patch" => Ok(Self::Patch),
            other => Err(Error::config(
                format!("Unknown increment kind: {other}"),
                "Use one of: major, minor, patch",
            )),
        }
    }
}

impl FromStr for IncrementKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for IncrementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Major => write!(f, "major"),
            Self::Minor => write!(f, "minor"),
            Self::Patch => write!(f, "patch"),
        }
    }
}

/// A `major.minor.patch` version.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Version {
    /// Major version number.
    pub major: u64,
    /// Minor version number.
    pub minor: u64,
    /// Patch version number.
    pub patch: u64,
}

impl Version {
    /// Create a new version.
    #[must_use]
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Apply an increment to this version.
    ///
    /// Major resets minor and patch, minor resets patch.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidVersion`] if the bumped component would
    /// overflow.
    pub fn increment(&self, kind: IncrementKind) -> Result<Self> {
        let bumped = match kind {
            IncrementKind::Major => self.major.checked_add(1).map(|m| Self::new(m, 0, 0)),
            IncrementKind::Minor => self
                .minor
                .checked_add(1)
                .map(|m| Self::new(self.major, m, 0)),
            IncrementKind::Patch => self
                .patch
                .checked_add(1)
                .map(|p| Self::new(self.major, self.minor, p)),
        };
        bumped.ok_or_else(|| Error::invalid_version(format!("{self} (cannot increment {kind})")))
    }

    /// Check if this is the initial development version (0.x.x).
    ///
    /// Releases cut from a 0.x.x version are published as prereleases.
    #[must_use]
    pub const fn is_initial_development(&self) -> bool {
        self.major == 0
    }
}

impl FromStr for Version {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();

        let parts: Vec<&str> = s.split('.').collect();
        if parts.len() != 3 {
            return Err(Error::invalid_version(s));
        }

        let component = |name: &str, part: &str| -> Result<u64> {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(Error::invalid_version(format!(
                    "{s} (invalid {name} component: {part:?})"
                )));
            }
            part.parse()
                .map_err(|_| Error::invalid_version(format!("{s} (invalid {name} component: {part:?})")))
        };

        Ok(Self {
            major: component("major", parts[0])?,
            minor: component("minor", parts[1])?,
            patch: component("patch", parts[2])?,
        })
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_new() {
        let v = Version::new(1, 2, 3);
        assert_eq!(v.major, 1);
        assert_eq!(v.minor, 2);
        assert_eq!(v.patch, 3);
    }

    #[test]
    fn test_version_parse() {
        let v: Version = "1.2.3".parse().unwrap();
        assert_eq!(v, Version::new(1, 2, 3));

        let v: Version = "  0.10.42\n".parse().unwrap();
        assert_eq!(v, Version::new(0, 10, 42));
    }

    #[test]
    fn test_version_parse_invalid() {
        assert!("1.2".parse::<Version>().is_err());
        assert!("1.2.3.4".parse::<Version>().is_err());
        assert!("a.b.c".parse::<Version>().is_err());
        assert!("v1.2.3".parse::<Version>().is_err());
        assert!("1.2.3-beta".parse::<Version>().is_err());
        assert!("1..3".parse::<Version>().is_err());
        assert!("-1.2.3".parse::<Version>().is_err());
        assert!("+1.2.3".parse::<Version>().is_err());
        assert!("1.+2.3".parse::<Version>().is_err());
        assert!("1. 2.3".parse::<Version>().is_err());
        assert!("".parse::<Version>().is_err());
    }

    #[test]
    fn test_version_parse_error_names_component() {
        let err = "1.x.3".parse::<Version>().unwrap_err();
        assert!(err.to_string().contains("minor"));
    }

    #[test]
    fn test_version_display() {
        assert_eq!(Version::new(1, 2, 3).to_string(), "1.2.3");
        assert_eq!(Version::new(0, 0, 0).to_string(), "0.0.0");
    }

    #[test]
    fn test_version_increment() {
        let v = Version::new(1, 2, 3);
        assert_eq!(v.increment(IncrementKind::Major).unwrap(), Version::new(2, 0, 0));
        assert_eq!(v.increment(IncrementKind::Minor).unwrap(), Version::new(1, 3, 0));
        assert_eq!(v.increment(IncrementKind::Patch).unwrap(), Version::new(1, 2, 4));
    }

    #[test]
    fn test_version_increment_overflow() {
        let max: Version = "18446744073709551615.18446744073709551615.18446744073709551615"
            .parse()
            .unwrap();
        for kind in [IncrementKind::Major, IncrementKind::Minor, IncrementKind::Patch] {
            let err = max.increment(kind).unwrap_err();
            assert!(matches!(err, Error::InvalidVersion { .. }), "{kind}: {err:?}");
        }

        // Only the bumped component matters
        let v = Version::new(1, u64::MAX, u64::MAX);
        assert_eq!(v.increment(IncrementKind::Major).unwrap(), Version::new(2, 0, 0));
    }

    #[test]
    fn test_version_increment_leaves_original() {
        let v = Version::new(1, 2, 3);
        let _ = v.increment(IncrementKind::Major).unwrap();
        assert_eq!(v, Version::new(1, 2, 3));
    }

    #[test]
    fn test_version_ordering() {
        assert!(Version::new(2, 0, 0) > Version::new(1, 9, 9));
        assert!(Version::new(1, 1, 0) > Version::new(1, 0, 9));
        assert!(Version::new(1, 0, 1) > Version::new(1, 0, 0));
    }

    #[test]
    fn test_version_is_initial_development() {
        assert!(Version::new(0, 1, 0).is_initial_development());
        assert!(!Version::new(1, 0, 0).is_initial_development());
    }

    #[test]
    fn test_version_serde_as_string() {
        let json = serde_json::to_string(&Version::new(1, 2, 3)).unwrap();
        assert_eq!(json, "\"1.2.3\"");
        let back: Version = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Version::new(1, 2, 3));
        assert!(serde_json::from_str::<Version>("\"1.2\"").is_err());
    }

    #[test]
    fn test_increment_kind_parse() {
        assert_eq!(IncrementKind::parse("major").unwrap(), IncrementKind::Major);
        assert_eq!(IncrementKind::parse("MINOR").unwrap(), IncrementKind::Minor);
        assert_eq!(IncrementKind::parse(" Patch ").unwrap(), IncrementKind::Patch);
        assert!(IncrementKind::parse("none").is_err());
    }

    #[test]
    fn test_increment_kind_display() {
        assert_eq!(IncrementKind::Major.to_string(), "major");
        assert_eq!(IncrementKind::Minor.to_string(), "minor");
        assert_eq!(IncrementKind::Patch.to_string(), "patch");
    }
}
