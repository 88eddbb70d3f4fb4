//! Settings for locating the catalog, the install locations and the
//! download cache.
//!
//! Settings are read from a TOML file; missing keys fall back to
//! directories under the platform data directory:
//!
//! ```toml
//! [directories]
//! user = "~/.local/share/libman/libraries"
//! builtin = "/usr/share/libman/libraries"
//! downloads = "~/.local/share/libman/staging"
//!
//! [library]
//! builtin_writable = false
//! index = "~/.local/share/libman/library_index.json"
//! ```

use std::path::{Path, PathBuf};

use libman_fs::ConfigStore;
use libman_store::StoreLayout;
use serde::{Deserialize, Serialize};

use crate::Result;

/// Environment variable naming the settings file.
pub const CONFIG_ENV: &str = "LIBMAN_CONFIG";

fn data_root() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("libman")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Directories {
    /// The user install location.
    pub user: PathBuf,
    /// The bundled install location.
    pub builtin: PathBuf,
    /// Download cache for release archives.
    pub downloads: PathBuf,
}

impl Default for Directories {
    fn default() -> Self {
        let root = data_root();
        Self {
            user: root.join("libraries"),
            builtin: root.join("builtin"),
            downloads: root.join("staging"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// Allow installing into and removing from the bundled location.
    pub builtin_writable: bool,
    /// The library index file.
    pub index: PathBuf,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            builtin_writable: false,
            index: data_root().join(libman_index::INDEX_FILENAME),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub directories: Directories,
    pub library: LibrarySettings,
}

impl Settings {
    /// Load settings from `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let settings: Settings = ConfigStore::new().load_optional(path)?.unwrap_or_default();
        tracing::debug!(path = %path.display(), "Loaded settings");
        Ok(settings.expanded())
    }

    /// `$LIBMAN_CONFIG` if set, otherwise `<config dir>/libman/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Some(PathBuf::from(path));
        }
        dirs::config_dir().map(|dir| dir.join("libman").join("config.toml"))
    }

    pub fn layout(&self) -> StoreLayout {
        StoreLayout::new(&self.directories.user, &self.directories.builtin)
            .with_builtin_writable(self.library.builtin_writable)
    }

    fn expanded(mut self) -> Self {
        for path in [
            &mut self.directories.user,
            &mut self.directories.builtin,
            &mut self.directories.downloads,
            &mut self.library.index,
        ] {
            *path = expand_home(path);
        }
        self
    }
}

/// Replace a leading `~` with the home directory.
fn expand_home(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}
