//! Install locations and the directories behind them.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Where a library is installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InstallLocation {
    /// The user's own library directory.
    User,
    /// The directory of libraries bundled with the toolchain.
    Builtin,
    /// Wherever the library already lives if that place is writable, else [`User`](Self::User).
    AnyWritable,
}

impl InstallLocation {
    /// The concrete locations, in lookup order.
    pub const CONCRETE: [InstallLocation; 2] = [InstallLocation::User, InstallLocation::Builtin];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Builtin => "builtin",
            Self::AnyWritable => "any",
        }
    }
}

impl std::fmt::Display for InstallLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InstallLocation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "user" => Ok(Self::User),
            "builtin" | "ide-builtin" => Ok(Self::Builtin),
            "any" | "any-writable" => Ok(Self::AnyWritable),
            _ => Err(Error::InvalidLocation(s.to_string())),
        }
    }
}

/// Directories backing each concrete install location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreLayout {
    pub user: PathBuf,
    pub builtin: PathBuf,
    /// Bundled libraries are normally managed by the toolchain installer.
    pub builtin_writable: bool,
}

impl StoreLayout {
    pub fn new(user: impl Into<PathBuf>, builtin: impl Into<PathBuf>) -> Self {
        Self {
            user: user.into(),
            builtin: builtin.into(),
            builtin_writable: false,
        }
    }

    pub fn with_builtin_writable(mut self, writable: bool) -> Self {
        self.builtin_writable = writable;
        self
    }

    /// Root directory of a concrete location; `None` for [`InstallLocation::AnyWritable`].
    pub fn root(&self, location: InstallLocation) -> Option<&Path> {
        match location {
            InstallLocation::User => Some(&self.user),
            InstallLocation::Builtin => Some(&self.builtin),
            InstallLocation::AnyWritable => None,
        }
    }

    /// The concrete location whose root is the parent of `path`.
    pub fn location_of(&self, path: &Path) -> Option<InstallLocation> {
        let parent = path.parent()?;
        InstallLocation::CONCRETE
            .into_iter()
            .find(|loc| self.root(*loc) == Some(parent))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("user", InstallLocation::User)]
    #[case("Builtin", InstallLocation::Builtin)]
    #[case("ide-builtin", InstallLocation::Builtin)]
    #[case("any", InstallLocation::AnyWritable)]
    fn test_location_from_str(#[case] input: &str, #[case] expected: InstallLocation) {
        assert_eq!(input.parse::<InstallLocation>().unwrap(), expected);
    }

    #[test]
    fn test_location_from_str_invalid() {
        assert!("sketchbook".parse::<InstallLocation>().is_err());
    }

    #[test]
    fn test_location_of() {
        let layout = StoreLayout::new("/home/u/libraries", "/opt/ide/libraries");
        assert_eq!(
            layout.location_of(Path::new("/opt/ide/libraries/Servo")),
            Some(InstallLocation::Builtin)
        );
        assert_eq!(layout.location_of(Path::new("/tmp/Servo")), None);
    }
}
