//! Directory-per-library store.

use std::fs;
use std::path::{Path, PathBuf};

use libman_fs::{io, is_within, sanitize_name};
use libman_index::LibraryRelease;
use tempfile::TempDir;

use crate::error::{Error, Result};
use crate::extract::{ArchiveExtractor, FileArchiveExtractor};
use crate::git::{GitCloner, RepositoryCloner, split_url_ref};
use crate::installed::InstalledLibrary;
use crate::location::{InstallLocation, StoreLayout};
use crate::metadata::LibraryMetadata;
use crate::store::LibraryStore;

/// Prefix of the staging directories created inside a location root.
const STAGING_PREFIX: &str = ".staging-";

/// [`LibraryStore`] keeping each library in `<location root>/<sanitized name>/`.
///
/// A directory counts as an installed library only when it carries a
/// readable `library.toml`. Installs are unpacked into a staging directory
/// inside the location root and renamed into place, so an interrupted
/// install never leaves a half-populated library directory behind.
pub struct FsLibraryStore {
    layout: StoreLayout,
    extractor: Box<dyn ArchiveExtractor>,
    cloner: Box<dyn RepositoryCloner>,
}

impl FsLibraryStore {
    pub fn new(layout: StoreLayout) -> Self {
        Self {
            layout,
            extractor: Box::new(FileArchiveExtractor),
            cloner: Box::new(GitCloner),
        }
    }

    pub fn with_extractor(mut self, extractor: impl ArchiveExtractor + 'static) -> Self {
        self.extractor = Box::new(extractor);
        self
    }

    pub fn with_cloner(mut self, cloner: impl RepositoryCloner + 'static) -> Self {
        self.cloner = Box::new(cloner);
        self
    }

    pub fn layout(&self) -> &StoreLayout {
        &self.layout
    }

    /// Every library in one concrete location, sorted by name.
    fn scan(&self, location: InstallLocation) -> Result<Vec<InstalledLibrary>> {
        let Some(root) = self.layout.root(location) else {
            return Ok(Vec::new());
        };

        let entries = match fs::read_dir(root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(Error::io(root, e)),
        };

        let mut libraries = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| Error::io(root, e))?.path();
            if !path.is_dir() || is_hidden(&path) {
                continue;
            }

            let metadata = match LibraryMetadata::read(&path) {
                Ok(metadata) => metadata,
                Err(Error::MetadataMissing { .. }) => continue,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Skipping unreadable library");
                    continue;
                }
            };
            let version = match metadata.version() {
                Ok(version) => version,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Skipping library with invalid version");
                    continue;
                }
            };

            libraries.push(InstalledLibrary {
                name: metadata.library.name,
                version,
                location,
                path,
            });
        }

        libraries.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.path.cmp(&b.path)));
        Ok(libraries)
    }

    fn writable_root(&self, location: InstallLocation) -> Result<&Path> {
        match self.layout.root(location) {
            Some(root) if self.is_writable(location) => Ok(root),
            _ => Err(Error::LocationNotWritable { location }),
        }
    }

    fn staging_dir(root: &Path) -> Result<TempDir> {
        fs::create_dir_all(root).map_err(|e| Error::io(root, e))?;
        tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .tempdir_in(root)
            .map_err(|e| Error::io(root, e))
    }

    /// Move a staged library carrying its own metadata into the user location.
    fn install_staged(
        &self,
        content_dir: &Path,
        source: String,
        overwrite: bool,
    ) -> Result<InstalledLibrary> {
        let metadata = LibraryMetadata::read(content_dir)?;
        let version = metadata.version()?;
        let name = metadata.library.name.clone();

        let location = InstallLocation::User;
        let target = self.writable_root(location)?.join(sanitize_name(&name));

        let existing = self.installed(&name, location)?;
        if let (Some(existing), false) = (&existing, overwrite) {
            return Err(Error::AlreadyInstalled {
                name,
                path: existing.path.clone(),
            });
        }
        // The target must be free, or be the directory about to be removed
        let replaced_path = existing.as_ref().map(|lib| lib.path.as_path());
        if target.exists() && replaced_path != Some(target.as_path()) {
            return Err(Error::TargetExists { path: target });
        }

        if let Some(existing) = existing {
            tracing::info!(library = %existing, "Replacing installed library");
            self.uninstall(&existing)?;
        }

        metadata.recorded(source).write(content_dir)?;
        io::move_dir(content_dir, &target)?;

        tracing::info!(library = %name, %version, path = %target.display(), "Library installed");
        Ok(InstalledLibrary {
            name,
            version,
            location,
            path: target,
        })
    }
}

impl std::fmt::Debug for FsLibraryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FsLibraryStore")
            .field("layout", &self.layout)
            .finish_non_exhaustive()
    }
}

impl LibraryStore for FsLibraryStore {
    fn installed(&self, name: &str, location: InstallLocation) -> Result<Option<InstalledLibrary>> {
        if location == InstallLocation::AnyWritable {
            for concrete in InstallLocation::CONCRETE {
                if let Some(found) = self.installed(name, concrete)? {
                    return Ok(Some(found));
                }
            }
            return Ok(None);
        }

        let mut matches: Vec<_> = self
            .scan(location)?
            .into_iter()
            .filter(|lib| lib.name == name)
            .collect();

        match matches.len() {
            0 => Ok(None),
            1 => Ok(matches.pop()),
            _ => Err(Error::MultipleInstalls {
                name: name.to_string(),
                paths: matches.into_iter().map(|lib| lib.path).collect(),
            }),
        }
    }

    fn list_installed(&self) -> Result<Vec<InstalledLibrary>> {
        let mut all = Vec::new();
        for location in InstallLocation::CONCRETE {
            all.extend(self.scan(location)?);
        }
        Ok(all)
    }

    fn is_writable(&self, location: InstallLocation) -> bool {
        match location {
            InstallLocation::User | InstallLocation::AnyWritable => true,
            InstallLocation::Builtin => self.layout.builtin_writable,
        }
    }

    fn target_path(&self, name: &str, location: InstallLocation) -> Result<PathBuf> {
        let location = self.resolve_location(name, location)?;
        let root = self
            .layout
            .root(location)
            .ok_or_else(|| Error::InvalidLocation(location.to_string()))?;
        Ok(root.join(sanitize_name(name)))
    }

    fn install(
        &self,
        release: &LibraryRelease,
        artifact: &Path,
        target: &Path,
    ) -> Result<InstalledLibrary> {
        let location = self
            .layout
            .location_of(target)
            .ok_or_else(|| Error::OutsideStore {
                path: target.to_path_buf(),
            })?;
        let root = self.writable_root(location)?;
        if target.exists() {
            return Err(Error::TargetExists {
                path: target.to_path_buf(),
            });
        }

        let staging = Self::staging_dir(root)?;
        self.extractor.extract(artifact, staging.path())?;
        let library_dir = single_top_level_dir(staging.path())?;

        LibraryMetadata::from_release(release)
            .recorded("catalog")
            .write(&library_dir)?;
        io::move_dir(&library_dir, target)?;

        tracing::debug!(library = %release, path = %target.display(), "Installed release");
        Ok(InstalledLibrary {
            name: release.name.clone(),
            version: release.version.clone(),
            location,
            path: target.to_path_buf(),
        })
    }

    fn uninstall(&self, library: &InstalledLibrary) -> Result<()> {
        let root = self.writable_root(library.location)?;
        if !is_within(root, &library.path) {
            return Err(Error::OutsideStore {
                path: library.path.clone(),
            });
        }
        io::remove_dir(&library.path)?;
        tracing::debug!(library = %library, path = %library.path.display(), "Uninstalled library");
        Ok(())
    }

    fn install_archive(&self, archive: &Path, overwrite: bool) -> Result<InstalledLibrary> {
        let staging = Self::staging_dir(self.writable_root(InstallLocation::User)?)?;
        self.extractor.extract(archive, staging.path())?;
        let content_dir = single_top_level_dir(staging.path())?;

        self.install_staged(
            &content_dir,
            format!("archive:{}", archive.display()),
            overwrite,
        )
    }

    fn install_from_git(&self, url: &str, overwrite: bool) -> Result<InstalledLibrary> {
        let (repo_url, reference) = split_url_ref(url);
        let staging = Self::staging_dir(self.writable_root(InstallLocation::User)?)?;
        let checkout = staging.path().join("checkout");

        self.cloner.clone_into(repo_url, reference, &checkout)?;
        io::remove_dir(&checkout.join(".git"))?;

        self.install_staged(&checkout, format!("git:{url}"), overwrite)
    }
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .is_some_and(|name| name.to_string_lossy().starts_with('.'))
}

/// The library directory inside an unpacked archive.
///
/// Archives normally wrap the library in one top-level directory; otherwise
/// the library sits at the archive root.
fn single_top_level_dir(unpacked: &Path) -> Result<PathBuf> {
    let mut entries = fs::read_dir(unpacked)
        .map_err(|e| Error::io(unpacked, e))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::io(unpacked, e))?;

    if entries.len() == 1 {
        let only = entries.remove(0).path();
        if only.is_dir() {
            return Ok(only);
        }
    }
    Ok(unpacked.to_path_buf())
}
