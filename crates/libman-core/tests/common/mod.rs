#![allow(dead_code)]

use std::cell::RefCell;

use libman_core::{
    DownloadCache, DownloadProgress, DownloadProgressSink, Session, TaskProgress, TaskProgressSink,
};
use libman_index::{LibraryIdentity, LibraryIndex, LibraryRelease, normalize_version};
use libman_store::LibraryStore;
use libman_test_utils::{CallLog, CatalogBuilder, RecordingStore, TestStore};

/// Records both progress channels, in order.
#[derive(Default)]
pub struct Recorder {
    pub tasks: RefCell<Vec<TaskProgress>>,
    pub downloads: RefCell<Vec<DownloadProgress>>,
}

impl TaskProgressSink for Recorder {
    fn on_task(&self, progress: TaskProgress) {
        self.tasks.borrow_mut().push(progress);
    }
}

impl DownloadProgressSink for Recorder {
    fn on_download(&self, progress: DownloadProgress) {
        self.downloads.borrow_mut().push(progress);
    }
}

impl Recorder {
    /// Messages of completed task events.
    pub fn completed(&self) -> Vec<String> {
        self.tasks
            .borrow()
            .iter()
            .filter(|t| t.completed && !t.message.is_empty())
            .map(|t| t.message.clone())
            .collect()
    }

    /// Names of started tasks and intermediate messages.
    pub fn task_lines(&self) -> Vec<String> {
        self.tasks
            .borrow()
            .iter()
            .filter_map(|t| {
                if !t.name.is_empty() {
                    Some(t.name.clone())
                } else if !t.message.is_empty() {
                    Some(t.message.clone())
                } else {
                    None
                }
            })
            .collect()
    }

    /// Labels of started downloads.
    pub fn download_labels(&self) -> Vec<String> {
        self.downloads
            .borrow()
            .iter()
            .filter_map(|d| match d {
                DownloadProgress::Start { label, .. } => Some(label.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn download_ends(&self) -> Vec<(bool, String)> {
        self.downloads
            .borrow()
            .iter()
            .filter_map(|d| match d {
                DownloadProgress::End { success, message } => Some((*success, message.clone())),
                _ => None,
            })
            .collect()
    }
}

/// Foo@1.0.0, Foo@2.0.0 -> {Bar@1.0.0, Baz@latest}, Bar@1.0.0, Bar@2.0.0, Baz@1.0.0
pub fn example_catalog(env: &TestStore) -> CatalogBuilder {
    CatalogBuilder::new(&env.archive_dir())
        .release("Foo", "1.0.0", &[])
        .release("Foo", "2.0.0", &[("Bar", "1.0.0"), ("Baz", "")])
        .release("Bar", "1.0.0", &[])
        .release("Bar", "2.0.0", &[])
        .release("Baz", "1.0.0", &[])
}

/// Session over `env` with a recording store.
pub fn session_with<S: LibraryStore + 'static>(
    env: &TestStore,
    catalog: CatalogBuilder,
    store: RecordingStore<S>,
) -> (Session, CallLog) {
    let log = store.log();
    let session = Session::new(catalog.build(), store, DownloadCache::new(env.download_dir()));
    (session, log)
}

pub fn session(env: &TestStore, catalog: CatalogBuilder) -> (Session, CallLog) {
    session_with(env, catalog, RecordingStore::new(env.store()))
}

/// A release without an archive, for resolution-only tests.
pub fn release(name: &str, version: &str, deps: &[(&str, &str)]) -> LibraryRelease {
    LibraryRelease {
        name: name.to_string(),
        version: normalize_version(version).unwrap(),
        author: String::new(),
        sentence: String::new(),
        url: String::new(),
        archive_file_name: String::new(),
        size: 0,
        checksum: String::new(),
        dependencies: deps
            .iter()
            .map(|(dep, req)| LibraryIdentity::parse(*dep, req).unwrap())
            .collect(),
    }
}

pub fn index(releases: Vec<LibraryRelease>) -> LibraryIndex {
    let mut index = LibraryIndex::new();
    for release in releases {
        index.add_release(release);
    }
    index
}
