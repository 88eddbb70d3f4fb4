//! Library archive fixtures.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use flate2::Compression;
use flate2::write::GzEncoder;

/// `library.toml` content for a library.
pub fn library_toml(name: &str, version: &str, depends: &[&str]) -> String {
    let depends = depends
        .iter()
        .map(|d| format!("\"{d}\""))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "[library]\nname = \"{name}\"\nversion = \"{version}\"\nauthor = \"Test Author\"\ndepends = [{depends}]\n"
    )
}

/// Write an archive whose entries are `files`, given as
/// `(path inside archive, content)` pairs.
///
/// A `.zip` path produces a zip archive, anything else a `.tar.gz`.
///
/// # Panics
/// Panics if the archive cannot be written.
pub fn write_archive(path: &Path, files: &[(&str, &str)]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .unwrap_or_else(|e| panic!("write_archive: failed to create {}: {e}", parent.display()));
    }
    let file = File::create(path)
        .unwrap_or_else(|e| panic!("write_archive: failed to create {}: {e}", path.display()));
    if path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("zip")) {
        write_zip(file, path, files);
        return;
    }
    let mut builder = tar::Builder::new(GzEncoder::new(file, Compression::default()));

    for (entry_path, content) in files {
        let mut header = tar::Header::new_gnu();
        header.set_size(content.len() as u64);
        header.set_mode(0o644);
        builder
            .append_data(&mut header, entry_path, content.as_bytes())
            .unwrap_or_else(|e| panic!("write_archive: failed to append {entry_path}: {e}"));
    }

    builder
        .into_inner()
        .and_then(|encoder| encoder.finish())
        .unwrap_or_else(|e| panic!("write_archive: failed to finish {}: {e}", path.display()));
}

fn write_zip(file: File, path: &Path, files: &[(&str, &str)]) {
    let mut writer = zip::ZipWriter::new(file);
    let options = zip::write::SimpleFileOptions::default();
    for (entry_path, content) in files {
        writer
            .start_file(*entry_path, options)
            .unwrap_or_else(|e| panic!("write_archive: failed to start {entry_path}: {e}"));
        writer
            .write_all(content.as_bytes())
            .unwrap_or_else(|e| panic!("write_archive: failed to write {entry_path}: {e}"));
    }
    writer
        .finish()
        .unwrap_or_else(|e| panic!("write_archive: failed to finish {}: {e}", path.display()));
}

/// Write the archive of a library wrapped in a `<name>-<version>/` directory,
/// the way release archives are laid out.
///
/// With `with_metadata` the archive carries its own `library.toml`; catalog
/// release archives usually do not.
pub fn write_library_archive(path: &Path, name: &str, version: &str, with_metadata: bool) {
    let top = format!("{name}-{version}");
    let header_path = format!("{top}/src/{name}.h");
    let header = format!("// {name} {version}\n");
    let metadata_path = format!("{top}/library.toml");
    let metadata = library_toml(name, version, &[]);

    let mut files = vec![(header_path.as_str(), header.as_str())];
    if with_metadata {
        files.push((metadata_path.as_str(), metadata.as_str()));
    }
    write_archive(path, &files);
}
