//! SHA-256 checksum utilities
//!
//! Catalog entries carry checksums as `SHA-256:<hex>`; this module also
//! accepts the lowercase `sha256:<hex>` spelling and produces the latter.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::{Error, Result};

/// Prefix for all checksums produced by this module
const PREFIX: &str = "sha256:";

/// Compute the SHA-256 checksum of a file's contents.
///
/// Returns a string in the canonical format `"sha256:<hex>"`.
pub fn compute_file_checksum(path: &Path) -> Result<String> {
    let mut file = File::open(path).map_err(|e| Error::io(path, e))?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 64 * 1024];
    loop {
        let n = file.read(&mut buf).map_err(|e| Error::io(path, e))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(format!("{}{:x}", PREFIX, hasher.finalize()))
}

/// Compute the SHA-256 checksum of in-memory content.
pub fn compute_bytes_checksum(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    format!("{}{:x}", PREFIX, hasher.finalize())
}

/// Extract the lowercase hex digest from a `SHA-256:<hex>` or `sha256:<hex>` string.
pub fn parse_sha256(checksum: &str) -> Result<String> {
    let trimmed = checksum.trim();
    let (algo, digest) = trimmed
        .split_once(':')
        .ok_or_else(|| Error::UnsupportedChecksum {
            checksum: checksum.to_string(),
        })?;

    let algo = algo.to_ascii_lowercase();
    if algo != "sha-256" && algo != "sha256" {
        return Err(Error::UnsupportedChecksum {
            checksum: checksum.to_string(),
        });
    }
    if digest.len() != 64 || !digest.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(Error::UnsupportedChecksum {
            checksum: checksum.to_string(),
        });
    }
    Ok(digest.to_ascii_lowercase())
}

/// Check that the file at `path` matches `expected`.
pub fn verify_file_checksum(path: &Path, expected: &str) -> Result<bool> {
    let wanted = parse_sha256(expected)?;
    let actual = compute_file_checksum(path)?;
    Ok(actual.strip_prefix(PREFIX) == Some(wanted.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const HELLO: &str = "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9";

    #[test]
    fn bytes_checksum_known_value() {
        assert_eq!(
            compute_bytes_checksum(b"hello world"),
            format!("sha256:{HELLO}")
        );
    }

    #[test]
    fn file_checksum_matches_bytes_checksum() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("archive.tar.gz");
        std::fs::write(&path, "hello world").unwrap();

        assert_eq!(
            compute_file_checksum(&path).unwrap(),
            compute_bytes_checksum(b"hello world")
        );
    }

    #[test]
    fn parse_accepts_catalog_spelling() {
        let upper = format!("SHA-256:{}", HELLO.to_uppercase());
        assert_eq!(parse_sha256(&upper).unwrap(), HELLO);
        assert_eq!(parse_sha256(&format!("sha256:{HELLO}")).unwrap(), HELLO);
    }

    #[test]
    fn parse_rejects_other_algorithms() {
        assert!(parse_sha256("MD5:5eb63bbbe01eeed093cb22bb8f5acdc3").is_err());
        assert!(parse_sha256("no-separator").is_err());
        assert!(parse_sha256("SHA-256:abc").is_err());
    }

    #[test]
    fn verify_detects_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("archive.tar.gz");
        std::fs::write(&path, "hello world").unwrap();

        assert!(verify_file_checksum(&path, &format!("SHA-256:{HELLO}")).unwrap());
        assert!(!verify_file_checksum(&path, &format!("SHA-256:{}", "0".repeat(64))).unwrap());
    }
}
