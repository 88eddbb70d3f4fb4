use libman_index::{Catalog, Error, LibraryIndex, VersionRequirement};
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_load_index_from_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join(libman_index::INDEX_FILENAME);
    fs::write(
        &path,
        r#"{"libraries": [
            {"name": "Servo", "version": "1.2.1", "author": "Arduino",
             "url": "file:///mirror/Servo-1.2.1.tar.gz",
             "archiveFileName": "Servo-1.2.1.tar.gz", "size": 4096,
             "checksum": "SHA-256:aa"}
        ]}"#,
    )
    .unwrap();

    let index = LibraryIndex::load(&path).unwrap();
    let servo = index
        .find_release("Servo", &VersionRequirement::Latest)
        .unwrap();

    assert_eq!(servo.author, "Arduino");
    assert_eq!(servo.archive_file_name, "Servo-1.2.1.tar.gz");
    assert_eq!(servo.size, 4096);
    assert!(servo.dependencies.is_empty());
}

#[test]
fn test_load_malformed_index_fails() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join(libman_index::INDEX_FILENAME);
    fs::write(&path, "{ not json").unwrap();

    let err = LibraryIndex::load(&path).unwrap_err();
    assert!(matches!(err, Error::Load(_)), "got {err:?}");
}

#[test]
fn test_load_missing_index_fails() {
    let temp = TempDir::new().unwrap();
    let err = LibraryIndex::load(&temp.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, Error::Load(libman_fs::Error::Io { .. })));
}
