//! Fetching release archives into the download cache.

use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use libman_fs::checksum::verify_file_checksum;
use libman_fs::sanitize_name;
use libman_index::LibraryRelease;

use crate::progress::{DownloadProgress, DownloadProgressSink};

const CHUNK_SIZE: usize = 32 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    #[error("failed to fetch {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("archive size mismatch: expected {expected} bytes, got {actual}")]
    SizeMismatch { expected: u64, actual: u64 },

    #[error("checksum mismatch for {archive}")]
    ChecksumMismatch { archive: String },

    #[error(transparent)]
    Checksum(#[from] libman_fs::Error),
}

/// A readable resource and its length when the transport knows it.
pub struct Fetched {
    pub reader: Box<dyn Read + Send>,
    pub length: Option<u64>,
}

/// Opens release URLs for reading.
pub trait Transport: Send + Sync {
    fn open(&self, url: &str) -> std::io::Result<Fetched>;
}

/// Transport for `file://` URLs and plain local paths.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileTransport;

impl Transport for FileTransport {
    fn open(&self, url: &str) -> std::io::Result<Fetched> {
        let path = match url.strip_prefix("file://") {
            Some(path) => path,
            None if url.contains("://") => {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::Unsupported,
                    format!("no transport for {url}"),
                ));
            }
            None => url,
        };
        let file = File::open(path)?;
        let length = file.metadata().ok().map(|m| m.len());
        Ok(Fetched {
            reader: Box::new(file),
            length,
        })
    }
}

/// Directory of downloaded release archives.
///
/// An archive already present whose size and checksum match the release is
/// reused without fetching it again.
pub struct DownloadCache {
    dir: PathBuf,
    transport: Box<dyn Transport>,
}

impl DownloadCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            transport: Box::new(FileTransport),
        }
    }

    pub fn with_transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Box::new(transport);
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Where the archive of `release` is cached.
    pub fn archive_path(&self, release: &LibraryRelease) -> PathBuf {
        let file_name = if release.archive_file_name.is_empty() {
            format!("{}-{}.tar.gz", release.name, release.version)
        } else {
            release.archive_file_name.clone()
        };
        self.dir.join("libraries").join(sanitize_name(&file_name))
    }

    /// Whether a verified archive of `release` is already cached.
    pub fn is_cached(&self, release: &LibraryRelease) -> bool {
        let path = self.archive_path(release);
        path.is_file() && verify(release, &path).is_ok()
    }

    /// Make the archive of `release` available locally and return its path.
    pub fn download(
        &self,
        release: &LibraryRelease,
        label: &str,
        progress: &dyn DownloadProgressSink,
    ) -> Result<PathBuf, DownloadError> {
        let path = self.archive_path(release);

        if path.is_file() {
            match verify(release, &path) {
                Ok(()) => {
                    progress.on_download(DownloadProgress::Start {
                        url: release.url.clone(),
                        label: label.to_string(),
                    });
                    progress.on_download(DownloadProgress::End {
                        success: true,
                        message: format!("{label} already downloaded"),
                    });
                    return Ok(path);
                }
                Err(e) => {
                    tracing::debug!(path = %path.display(), error = %e, "Discarding stale cached archive");
                    libman_fs::io::remove_file(&path)?;
                }
            }
        }

        progress.on_download(DownloadProgress::Start {
            url: release.url.clone(),
            label: label.to_string(),
        });
        let result = self.fetch(release, &path, progress);
        progress.on_download(DownloadProgress::End {
            success: result.is_ok(),
            message: match &result {
                Ok(()) => String::new(),
                Err(e) => e.to_string(),
            },
        });
        result.map(|()| path)
    }

    fn fetch(
        &self,
        release: &LibraryRelease,
        path: &Path,
        progress: &dyn DownloadProgressSink,
    ) -> Result<(), DownloadError> {
        let parent = path.parent().unwrap_or(&self.dir);
        std::fs::create_dir_all(parent).map_err(|source| DownloadError::Write {
            path: parent.to_path_buf(),
            source,
        })?;

        let Fetched { mut reader, length } =
            self.transport
                .open(&release.url)
                .map_err(|source| DownloadError::Transport {
                    url: release.url.clone(),
                    source,
                })?;
        let total = length.unwrap_or(release.size);

        let write_err = |source| DownloadError::Write {
            path: path.to_path_buf(),
            source,
        };
        let mut partial = tempfile::NamedTempFile::new_in(parent).map_err(write_err)?;

        let mut buf = vec![0u8; CHUNK_SIZE];
        let mut downloaded = 0u64;
        loop {
            let n = reader
                .read(&mut buf)
                .map_err(|source| DownloadError::Transport {
                    url: release.url.clone(),
                    source,
                })?;
            if n == 0 {
                break;
            }
            partial.write_all(&buf[..n]).map_err(write_err)?;
            downloaded += n as u64;
            progress.on_download(DownloadProgress::Update { downloaded, total });
        }
        partial.flush().map_err(write_err)?;

        verify(release, partial.path())?;
        partial
            .persist(path)
            .map_err(|e| write_err(e.error))?;

        tracing::debug!(library = %release, path = %path.display(), bytes = downloaded, "Downloaded archive");
        Ok(())
    }
}

/// Check size and checksum of an archive against the release. Unknown values
/// (size 0, empty checksum) are not checked.
fn verify(release: &LibraryRelease, path: &Path) -> Result<(), DownloadError> {
    if release.size > 0 {
        let actual = std::fs::metadata(path)
            .map_err(|source| DownloadError::Write {
                path: path.to_path_buf(),
                source,
            })?
            .len();
        if actual != release.size {
            return Err(DownloadError::SizeMismatch {
                expected: release.size,
                actual,
            });
        }
    }
    if !release.checksum.is_empty() && !verify_file_checksum(path, &release.checksum)? {
        return Err(DownloadError::ChecksumMismatch {
            archive: release.archive_file_name.clone(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_transport_accepts_file_urls_and_paths() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Foo-1.0.0.tar.gz");
        std::fs::write(&path, b"archive").unwrap();

        for url in [path.display().to_string(), format!("file://{}", path.display())] {
            let Fetched { mut reader, length } = FileTransport.open(&url).unwrap();
            let mut content = Vec::new();
            reader.read_to_end(&mut content).unwrap();
            assert_eq!(content, b"archive");
            assert_eq!(length, Some(7));
        }
    }

    #[test]
    fn test_file_transport_rejects_remote_urls() {
        let err = FileTransport
            .open("https://downloads.example.com/Foo-1.0.0.tar.gz")
            .err()
            .unwrap();
        assert_eq!(err.kind(), std::io::ErrorKind::Unsupported);
    }

    #[test]
    fn test_archive_path_falls_back_to_name_and_version() {
        let cache = DownloadCache::new("/cache");
        let release = LibraryRelease {
            name: "Adafruit GFX".to_string(),
            version: semver::Version::new(1, 2, 0),
            author: String::new(),
            sentence: String::new(),
            url: String::new(),
            archive_file_name: String::new(),
            size: 0,
            checksum: String::new(),
            dependencies: vec![],
        };
        assert_eq!(
            cache.archive_path(&release),
            PathBuf::from("/cache/libraries/Adafruit_GFX-1.2.0.tar.gz")
        );
    }
}
