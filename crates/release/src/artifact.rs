//! Release artifacts and checksums.

use crate::error::{Error, Result};
use sha2::{Digest, Sha256};
use std::path::Path;

/// An uploaded release asset.
///
/// Holds the public download URL together with the exact bytes that were
/// sent, so the checksum written to the formula matches what users download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseAsset {
    /// Public download URL (`browser_download_url`).
    pub download_url: String,
    /// Raw bytes that were uploaded.
    pub bytes: Vec<u8>,
}

impl ReleaseAsset {
    /// Creates a new release asset.
    #[must_use]
    pub fn new(download_url: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            download_url: download_url.into(),
            bytes,
        }
    }

    /// Lower-case hex SHA-256 of the uploaded bytes.
    #[must_use]
    pub fn sha256(&self) -> String {
        sha256_hex(&self.bytes)
    }
}

/// Computes the lower-case hex SHA-256 of a byte slice.
#[must_use]
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Reads an artifact file into memory.
///
/// # Errors
///
/// Returns [`Error::Artifact`] if the file cannot be read.
pub fn read_artifact(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| {
        Error::artifact(
            format!("Failed to read {}: {e}", path.display()),
            Some(path.to_path_buf()),
        )
    })
}

/// Expands `{version}` in an asset name template.
#[must_use]
pub fn asset_name(template: &str, version: &str) -> String {
    template.replace("{version}", version)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_sha256_hex_known_vectors() {
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_release_asset_sha256() {
        let asset = ReleaseAsset::new("https://x/nanoscope-1.2.4.zip", b"abc".to_vec());
        assert_eq!(asset.sha256(), sha256_hex(b"abc"));
        assert_eq!(asset.download_url, "https://x/nanoscope-1.2.4.zip");
    }

    #[test]
    fn test_read_artifact() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nanoscope.zip");
        std::fs::write(&path, b"PK\x03\x04zip").unwrap();
        assert_eq!(read_artifact(&path).unwrap(), b"PK\x03\x04zip");
    }

    #[test]
    fn test_read_artifact_missing() {
        let temp = TempDir::new().unwrap();
        let err = read_artifact(&temp.path().join("missing.zip")).unwrap_err();
        assert!(matches!(err, Error::Artifact { path: Some(_), .. }));
    }

    #[test]
    fn test_asset_name() {
        assert_eq!(
            asset_name("nanoscope-{version}.zip", "1.2.4"),
            "nanoscope-1.2.4.zip"
        );
        assert_eq!(asset_name("static.zip", "1.2.4"), "static.zip");
    }
}
