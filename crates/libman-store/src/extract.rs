//! Archive extraction.

use std::fs::{self, File};
use std::path::Path;

use flate2::read::GzDecoder;

use crate::error::{Error, Result};

/// Unpacks an archive into a directory.
pub trait ArchiveExtractor: Send + Sync {
    /// Extract `archive` into `dest`, which already exists and is empty.
    fn extract(&self, archive: &Path, dest: &Path) -> Result<()>;
}

/// Extractor choosing the format from the file name: `.zip`, `.tar.gz`,
/// `.tgz` or plain `.tar`.
///
/// Entries that would land outside `dest` are skipped.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileArchiveExtractor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArchiveFormat {
    Zip,
    TarGz,
    Tar,
}

fn format_of(archive: &Path) -> Option<ArchiveFormat> {
    let name = archive.file_name()?.to_string_lossy().to_ascii_lowercase();
    if name.ends_with(".zip") {
        Some(ArchiveFormat::Zip)
    } else if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
        Some(ArchiveFormat::TarGz)
    } else if name.ends_with(".tar") {
        Some(ArchiveFormat::Tar)
    } else {
        None
    }
}

impl ArchiveExtractor for FileArchiveExtractor {
    fn extract(&self, archive: &Path, dest: &Path) -> Result<()> {
        let format = format_of(archive).ok_or_else(|| Error::UnsupportedArchive {
            path: archive.to_path_buf(),
        })?;
        let file = File::open(archive).map_err(|e| Error::io(archive, e))?;

        let extract_error = |message: String| Error::Extract {
            archive: archive.to_path_buf(),
            message,
        };
        match format {
            ArchiveFormat::Zip => unpack_zip(file, dest, extract_error)?,
            ArchiveFormat::TarGz => tar::Archive::new(GzDecoder::new(file))
                .unpack(dest)
                .map_err(|e| extract_error(e.to_string()))?,
            ArchiveFormat::Tar => tar::Archive::new(file)
                .unpack(dest)
                .map_err(|e| extract_error(e.to_string()))?,
        }

        tracing::debug!(archive = %archive.display(), dest = %dest.display(), ?format, "Extracted archive");
        Ok(())
    }
}

/// Unpack a zip archive, confining every entry to `dest`.
fn unpack_zip(file: File, dest: &Path, extract_error: impl Fn(String) -> Error) -> Result<()> {
    let mut zip = zip::ZipArchive::new(file).map_err(|e| extract_error(e.to_string()))?;

    for index in 0..zip.len() {
        let mut entry = zip
            .by_index(index)
            .map_err(|e| extract_error(e.to_string()))?;
        let Some(relative) = entry.enclosed_name() else {
            tracing::warn!(entry = %entry.name(), "Skipping zip entry outside the archive root");
            continue;
        };
        let out = dest.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&out).map_err(|e| Error::io(&out, e))?;
            continue;
        }
        if let Some(parent) = out.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
        let mut target = File::create(&out).map_err(|e| Error::io(&out, e))?;
        std::io::copy(&mut entry, &mut target).map_err(|e| extract_error(e.to_string()))?;
    }
    Ok(())
}
