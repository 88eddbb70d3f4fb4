use std::fs;

use libman_store::{Error, InstallLocation, LibraryMetadata, LibraryStore};
use libman_test_utils::git::{library_repo, release_version, tag_head};
use libman_test_utils::{TestStore, write_archive, write_library_archive};
use pretty_assertions::assert_eq;

fn user_entries(env: &TestStore) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(env.user_dir())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn test_install_archive() {
    let env = TestStore::new();
    let archive = env.archive_dir().join("Servo.tar.gz");
    write_library_archive(&archive, "Servo", "1.2.0", true);

    let installed = env.store().install_archive(&archive, false).unwrap();

    assert_eq!(installed.to_string(), "Servo@1.2.0");
    assert_eq!(installed.location, InstallLocation::User);
    env.assert_installed(InstallLocation::User, "Servo", "1.2.0");
    let record = LibraryMetadata::read(&installed.path)
        .unwrap()
        .install
        .unwrap();
    assert!(record.source.starts_with("archive:"));
    assert_eq!(user_entries(&env), vec!["Servo"]);
}

#[test]
fn test_install_archive_with_library_at_root() {
    let env = TestStore::new();
    let archive = env.archive_dir().join("Flat.tgz");
    let metadata = libman_test_utils::library_toml("Flat", "0.1.0", &[]);
    write_archive(
        &archive,
        &[("library.toml", metadata.as_str()), ("Flat.h", "// flat\n")],
    );

    env.store().install_archive(&archive, false).unwrap();

    env.assert_installed(InstallLocation::User, "Flat", "0.1.0");
    assert!(env.user_dir().join("Flat/Flat.h").is_file());
}

#[test]
fn test_install_archive_conflict_without_overwrite() {
    let env = TestStore::new();
    env.seed(InstallLocation::User, "Servo", "1.0.0");
    let archive = env.archive_dir().join("Servo.tar.gz");
    write_library_archive(&archive, "Servo", "1.2.0", true);

    let err = env.store().install_archive(&archive, false).unwrap_err();

    assert!(matches!(err, Error::AlreadyInstalled { ref name, .. } if name == "Servo"));
    env.assert_installed(InstallLocation::User, "Servo", "1.0.0");
    assert_eq!(user_entries(&env), vec!["Servo"]);
}

#[test]
fn test_install_archive_overwrite_replaces() {
    let env = TestStore::new();
    env.seed(InstallLocation::User, "Servo", "1.0.0");
    let archive = env.archive_dir().join("Servo.tar.gz");
    write_library_archive(&archive, "Servo", "1.2.0", true);

    env.store().install_archive(&archive, true).unwrap();

    env.assert_installed(InstallLocation::User, "Servo", "1.2.0");
}

#[test]
fn test_install_archive_without_metadata_leaves_nothing() {
    let env = TestStore::new();
    let archive = env.archive_dir().join("Bare.tar.gz");
    write_library_archive(&archive, "Bare", "1.0.0", false);

    let err = env.store().install_archive(&archive, false).unwrap_err();

    assert!(matches!(err, Error::MetadataMissing { .. }), "got {err:?}");
    assert!(user_entries(&env).is_empty());
}

#[test]
fn test_install_from_git_default_branch() {
    let env = TestStore::new();
    let repo_dir = env.root().join("remote/Servo");
    fs::create_dir_all(&repo_dir).unwrap();
    library_repo(&repo_dir, "Servo", "1.0.0");

    let url = repo_dir.display().to_string();
    let installed = env.store().install_from_git(&url, false).unwrap();

    assert_eq!(installed.to_string(), "Servo@1.0.0");
    assert!(!installed.path.join(".git").exists());
    assert!(installed.path.join("src/Servo.h").is_file());
    let record = LibraryMetadata::read(&installed.path)
        .unwrap()
        .install
        .unwrap();
    assert_eq!(record.source, format!("git:{url}"));
}

#[test]
fn test_install_from_git_tag() {
    let env = TestStore::new();
    let repo_dir = env.root().join("remote/Servo");
    fs::create_dir_all(&repo_dir).unwrap();
    let repo = library_repo(&repo_dir, "Servo", "1.0.0");
    tag_head(&repo, "v1.0.0");
    release_version(&repo, "Servo", "2.0.0");

    let url = format!("{}#v1.0.0", repo_dir.display());
    env.store().install_from_git(&url, false).unwrap();

    env.assert_installed(InstallLocation::User, "Servo", "1.0.0");
}

#[test]
fn test_install_from_git_bad_url() {
    let env = TestStore::new();
    let err = env
        .store()
        .install_from_git(&env.root().join("missing").display().to_string(), false)
        .unwrap_err();

    assert!(matches!(err, Error::GitClone { .. }));
    assert!(user_entries(&env).is_empty());
}

#[test]
fn test_install_archive_overwrite_keeps_old_library_when_target_occupied() {
    let env = TestStore::new();
    let legacy = env.user_dir().join("ServoLegacy");
    fs::create_dir_all(&legacy).unwrap();
    fs::write(
        legacy.join("library.toml"),
        libman_test_utils::library_toml("Servo", "1.0.0", &[]),
    )
    .unwrap();
    fs::create_dir_all(env.user_dir().join("Servo")).unwrap();
    fs::write(env.user_dir().join("Servo/notes.txt"), "not a library").unwrap();
    let archive = env.archive_dir().join("Servo-1.2.0.tar.gz");
    write_library_archive(&archive, "Servo", "1.2.0", true);

    let err = env.store().install_archive(&archive, true).unwrap_err();

    assert!(matches!(err, Error::TargetExists { .. }), "got {err:?}");
    assert!(legacy.join("library.toml").is_file());
    let installed = env
        .store()
        .installed("Servo", InstallLocation::User)
        .unwrap()
        .unwrap();
    assert_eq!(installed.version.to_string(), "1.0.0");
    assert_eq!(installed.path, legacy);
}

#[test]
fn test_install_zip_archive() {
    let env = TestStore::new();
    let archive = env.archive_dir().join("Servo.zip");
    write_library_archive(&archive, "Servo", "1.2.0", true);

    let installed = env.store().install_archive(&archive, false).unwrap();

    assert_eq!(installed.to_string(), "Servo@1.2.0");
    env.assert_installed(InstallLocation::User, "Servo", "1.2.0");
    assert!(env.user_dir().join("Servo/src/Servo.h").is_file());
    assert_eq!(user_entries(&env), vec!["Servo"]);
}

#[test]
fn test_install_zip_archive_overwrite_replaces() {
    let env = TestStore::new();
    env.seed(InstallLocation::User, "Servo", "1.0.0");
    let archive = env.archive_dir().join("Servo.zip");
    write_library_archive(&archive, "Servo", "1.2.0", true);

    env.store().install_archive(&archive, true).unwrap();

    env.assert_installed(InstallLocation::User, "Servo", "1.2.0");
}
