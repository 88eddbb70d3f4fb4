//! Library identities and concrete releases.

use semver::Version;

use crate::error::Result;
use crate::version::VersionRequirement;

/// A requested library: a name plus the versions that would satisfy it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryIdentity {
    pub name: String,
    pub version_required: VersionRequirement,
}

impl LibraryIdentity {
    pub fn new(name: impl Into<String>, version_required: VersionRequirement) -> Self {
        Self {
            name: name.into(),
            version_required,
        }
    }

    /// Identity accepting the newest release of `name`.
    pub fn latest(name: impl Into<String>) -> Self {
        Self::new(name, VersionRequirement::Latest)
    }

    /// Parse a `(name, version)` pair as carried by requests.
    pub fn parse(name: impl Into<String>, version: &str) -> Result<Self> {
        Ok(Self::new(name, VersionRequirement::parse(version)?))
    }

    /// Parse a `Name@version` reference. Without `@` the latest release is meant.
    ///
    /// The last `@` splits, so names may themselves contain `@`.
    pub fn parse_reference(reference: &str) -> Result<Self> {
        match reference.rsplit_once('@') {
            Some((name, version)) if !name.is_empty() => Self::parse(name.trim(), version),
            _ => Ok(Self::latest(reference.trim())),
        }
    }
}

impl std::fmt::Display for LibraryIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.name, self.version_required)
    }
}

/// A concrete release known to the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryRelease {
    pub name: String,
    pub version: Version,
    pub author: String,
    /// One-line description.
    pub sentence: String,
    /// Where the release archive can be fetched from.
    pub url: String,
    pub archive_file_name: String,
    /// Archive size in bytes, 0 when unknown.
    pub size: u64,
    /// `SHA-256:<hex>`, empty when the catalog has none.
    pub checksum: String,
    pub dependencies: Vec<LibraryIdentity>,
}

impl LibraryRelease {
    /// Identity pinned to exactly this release.
    pub fn identity(&self) -> LibraryIdentity {
        LibraryIdentity::new(self.name.clone(), VersionRequirement::exact(&self.version))
    }
}

impl std::fmt::Display for LibraryRelease {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.name, self.version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::normalize_version;

    #[test]
    fn test_parse_reference_with_version() {
        let id = LibraryIdentity::parse_reference("Servo@1.2").unwrap();
        assert_eq!(id.name, "Servo");
        assert_eq!(
            id.version_required,
            VersionRequirement::exact(&normalize_version("1.2.0").unwrap())
        );
    }

    #[test]
    fn test_parse_reference_without_version() {
        let id = LibraryIdentity::parse_reference("Adafruit GFX Library").unwrap();
        assert_eq!(id.name, "Adafruit GFX Library");
        assert!(id.version_required.is_latest());
    }

    #[test]
    fn test_parse_reference_trailing_at_means_latest() {
        let id = LibraryIdentity::parse_reference("Servo@").unwrap();
        assert_eq!(id.name, "Servo");
        assert!(id.version_required.is_latest());
    }

    #[test]
    fn test_display() {
        let id = LibraryIdentity::parse("Servo", ">=1.0").unwrap();
        assert_eq!(id.to_string(), "Servo@>=1.0");
        assert_eq!(LibraryIdentity::latest("Servo").to_string(), "Servo@latest");
    }
}
