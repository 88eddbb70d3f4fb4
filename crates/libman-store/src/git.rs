//! Version-control checkout for library installs

use std::path::Path;

use git2::build::RepoBuilder;

use crate::error::{Error, Result};

/// Checks a repository out into a directory.
pub trait RepositoryCloner: Send + Sync {
    /// Clone `url` into `dest` (which must not exist) and check out `reference`
    /// when given, otherwise the default branch.
    fn clone_into(&self, url: &str, reference: Option<&str>, dest: &Path) -> Result<()>;
}

/// Split `https://host/repo.git#v1.0` into the URL and the optional ref.
pub fn split_url_ref(url: &str) -> (&str, Option<&str>) {
    match url.rsplit_once('#') {
        Some((base, reference)) if !reference.is_empty() => (base, Some(reference)),
        Some((base, _)) => (base, None),
        None => (url, None),
    }
}

/// [`RepositoryCloner`] backed by libgit2.
#[derive(Debug, Default, Clone, Copy)]
pub struct GitCloner;

impl RepositoryCloner for GitCloner {
    fn clone_into(&self, url: &str, reference: Option<&str>, dest: &Path) -> Result<()> {
        let clone_err = |message: String| Error::GitClone {
            url: url.to_string(),
            message,
        };

        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| clone_err(format!("Failed to create directory: {e}")))?;
        }

        let repo = RepoBuilder::new()
            .clone(url, dest)
            .map_err(|e| clone_err(e.message().to_string()))?;

        if let Some(reference) = reference {
            let (object, git_ref) = repo
                .revparse_ext(reference)
                .map_err(|e| clone_err(format!("Ref {reference} not found: {e}")))?;

            repo.checkout_tree(
                &object,
                Some(git2::build::CheckoutBuilder::default().force()),
            )
            .map_err(|e| clone_err(format!("Failed to checkout {reference}: {e}")))?;

            let head = match git_ref.as_ref().and_then(|r| r.name()) {
                Some(ref_name) => repo.set_head(ref_name),
                None => repo.set_head_detached(object.id()),
            };
            head.map_err(|e| clone_err(format!("Failed to set HEAD: {e}")))?;
        }

        tracing::debug!(url, reference, dest = %dest.display(), "Cloned library repository");
        Ok(())
    }
}
