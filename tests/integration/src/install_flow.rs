//! End-to-end install flow
//!
//! Settings file -> session -> resolved install -> upgrade -> alternate sources,
//! all against real directories and archives.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc;
use std::thread;

use libman_core::{
    CancellationToken, ChannelSink, GitInstallRequest, LibraryInstallRequest, NoopSink, Session,
    Settings, TaskProgress, git_library_install, library_install,
};
use libman_store::InstallLocation;
use libman_test_utils::{CatalogBuilder, TestStore, git};
use pretty_assertions::assert_eq;

fn write_settings(store: &TestStore) -> PathBuf {
    let index = CatalogBuilder::new(&store.archive_dir())
        .release("Foo", "1.0.0", &[])
        .release("Foo", "2.0.0", &[("Bar", "1.0.0"), ("Baz", "")])
        .release("Bar", "1.0.0", &[])
        .release("Bar", "2.0.0", &[])
        .release("Baz", "1.0.0", &[])
        .write_index(&store.root().join("library_index.json"));

    let path = store.root().join("config.toml");
    std::fs::write(
        &path,
        format!(
            "[directories]\nuser = '{}'\nbuiltin = '{}'\ndownloads = '{}'\n\n[library]\nindex = '{}'\n",
            store.user_dir().display(),
            store.builtin_dir().display(),
            store.download_dir().display(),
            index.display()
        ),
    )
    .unwrap();
    path
}

fn open(store: &TestStore) -> Session {
    let settings = Settings::load(&write_settings(store)).unwrap();
    Session::open(&settings).unwrap()
}

fn install(session: &Session, reference: &str, version: &str) -> Vec<TaskProgress> {
    let (tx, rx) = mpsc::channel();
    let request = LibraryInstallRequest::new(reference, version);
    library_install(
        session,
        &request,
        &CancellationToken::new(),
        &NoopSink,
        &ChannelSink(tx),
    )
    .unwrap();
    rx.try_iter().collect()
}

fn completed(events: &[TaskProgress]) -> Vec<String> {
    events
        .iter()
        .filter(|e| e.completed && !e.message.is_empty())
        .map(|e| e.message.clone())
        .collect()
}

#[test]
fn test_install_then_upgrade() {
    let store = TestStore::new();
    let session = open(&store);
    assert!(session.installed_libraries().is_empty());

    let events = install(&session, "Foo", "2.0.0");
    assert_eq!(
        completed(&events),
        vec!["Installed Bar@1.0.0", "Installed Baz@1.0.0", "Installed Foo@2.0.0"]
    );
    assert_eq!(session.installed_libraries().len(), 3);

    let events = install(&session, "Bar", "2.0.0");
    assert!(
        events
            .iter()
            .any(|e| e.message == "Replacing Bar@1.0.0 with Bar@2.0.0")
    );
    store.assert_installed(InstallLocation::User, "Bar", "2.0.0");

    let versions: Vec<String> = session
        .installed_libraries()
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(versions, vec!["Bar@2.0.0", "Baz@1.0.0", "Foo@2.0.0"]);
}

#[test]
fn test_reopened_session_sees_previous_installs() {
    let store = TestStore::new();
    install(&open(&store), "Baz", "");

    let session = open(&store);
    let events = install(&session, "Baz", "latest");
    assert_eq!(completed(&events), vec!["Already installed Baz@1.0.0"]);
}

#[test]
fn test_concurrent_installs_are_serialized() {
    let store = TestStore::new();
    let session = Arc::new(open(&store));

    let handles: Vec<_> = ["Foo", "Bar"]
        .into_iter()
        .map(|name| {
            let session = Arc::clone(&session);
            thread::spawn(move || {
                let request = LibraryInstallRequest::new(name, "1.0.0");
                library_install(
                    &session,
                    &request,
                    &CancellationToken::new(),
                    &NoopSink,
                    &NoopSink,
                )
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap().unwrap();
    }
    store.assert_installed(InstallLocation::User, "Foo", "1.0.0");
    store.assert_installed(InstallLocation::User, "Bar", "1.0.0");
}

#[test]
fn test_git_install_then_catalog_sees_it() {
    let store = TestStore::new();
    let session = open(&store);
    let repo_dir = tempfile::tempdir().unwrap();
    git::library_repo(repo_dir.path(), "Baz", "1.0.0");

    let request = GitInstallRequest {
        url: repo_dir.path().to_string_lossy().into_owned(),
        overwrite: false,
    };
    git_library_install(&session, &request, &NoopSink).unwrap();
    session.reinitialize().unwrap();

    let events = install(&session, "Baz", "1.0.0");
    assert_eq!(completed(&events), vec!["Already installed Baz@1.0.0"]);
}
