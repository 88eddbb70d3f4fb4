//! Library repository fixtures.
//!
//! Repositories are created with `git2` only, so tests do not need a `git`
//! binary on `PATH`.

use std::fs;
use std::path::Path;

use crate::archive::library_toml;

/// Initialise a repository at `path` holding one library and a single commit.
///
/// # Panics
/// Panics if any git operation fails.
pub fn library_repo(path: &Path, name: &str, version: &str) -> git2::Repository {
    let repo = git2::Repository::init(path).unwrap_or_else(|e| {
        panic!(
            "library_repo: failed to init repository at {}: {e}",
            path.display()
        )
    });
    write_library_files(path, name, version);
    commit_all(&repo, &format!("Release {version}"));
    repo
}

/// Rewrite the library files for `version` and commit them.
pub fn release_version(repo: &git2::Repository, name: &str, version: &str) {
    let workdir = repo
        .workdir()
        .unwrap_or_else(|| panic!("release_version: repository is bare"));
    write_library_files(workdir, name, version);
    commit_all(repo, &format!("Release {version}"));
}

/// Tag the current `HEAD` commit.
pub fn tag_head(repo: &git2::Repository, tag: &str) {
    let head = repo
        .head()
        .and_then(|h| h.peel(git2::ObjectType::Commit))
        .unwrap_or_else(|e| panic!("tag_head: no HEAD commit: {e}"));
    repo.tag_lightweight(tag, &head, false)
        .unwrap_or_else(|e| panic!("tag_head: failed to create tag {tag}: {e}"));
}

/// Stage every file in the working tree and commit on `HEAD`.
pub fn commit_all(repo: &git2::Repository, message: &str) -> git2::Oid {
    let mut index = repo
        .index()
        .unwrap_or_else(|e| panic!("commit_all: no index: {e}"));
    index
        .add_all(["*"].iter(), git2::IndexAddOption::DEFAULT, None)
        .unwrap_or_else(|e| panic!("commit_all: failed to stage files: {e}"));
    index
        .write()
        .unwrap_or_else(|e| panic!("commit_all: failed to write index: {e}"));
    let tree_id = index
        .write_tree()
        .unwrap_or_else(|e| panic!("commit_all: failed to write tree: {e}"));
    let tree = repo
        .find_tree(tree_id)
        .unwrap_or_else(|e| panic!("commit_all: tree missing: {e}"));

    let signature = git2::Signature::now("Test User", "test@test.com")
        .unwrap_or_else(|e| panic!("commit_all: bad signature: {e}"));
    let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
    let parents: Vec<&git2::Commit> = parent.iter().collect();

    repo.commit(
        Some("HEAD"),
        &signature,
        &signature,
        message,
        &tree,
        &parents,
    )
    .unwrap_or_else(|e| panic!("commit_all: commit failed: {e}"))
}

fn write_library_files(dir: &Path, name: &str, version: &str) {
    fs::write(dir.join("library.toml"), library_toml(name, version, &[]))
        .unwrap_or_else(|e| panic!("failed to write library.toml: {e}"));
    fs::create_dir_all(dir.join("src")).unwrap_or_else(|e| panic!("failed to create src: {e}"));
    fs::write(
        dir.join("src").join(format!("{name}.h")),
        format!("// {name} {version}\n"),
    )
    .unwrap_or_else(|e| panic!("failed to write header: {e}"));
}
