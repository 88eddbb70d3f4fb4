//! Install planning.
//!
//! Planning decides what happens to every library of a closure before
//! anything is downloaded or touched on disk. It performs no mutation.

use std::path::PathBuf;

use libman_index::{Catalog, LibraryIdentity, LibraryRelease};
use libman_store::{InstallLocation, InstalledLibrary, LibraryStore};
use semver::Version;

use crate::error::{Error, Result};
use crate::progress::{TaskProgress, TaskProgressSink};
use crate::resolver::DependencyClosure;

/// What will happen to one library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryInstallPlan {
    pub name: String,
    pub version: Version,
    pub release: LibraryRelease,
    /// Directory the release is installed into.
    pub target_path: PathBuf,
    /// The installed version this release replaces.
    pub replaced_library: Option<InstalledLibrary>,
    /// The exact release is already installed; nothing to do.
    pub up_to_date: bool,
    /// Concrete location, never [`InstallLocation::AnyWritable`].
    pub location: InstallLocation,
}

/// Plan the install of one library.
pub fn plan_install(
    catalog: &dyn Catalog,
    store: &dyn LibraryStore,
    identity: &LibraryIdentity,
    location: InstallLocation,
    no_overwrite: bool,
) -> Result<LibraryInstallPlan> {
    let release = catalog.find_release(&identity.name, &identity.version_required)?;

    let location = store.resolve_location(&release.name, location)?;
    if !store.is_writable(location) {
        return Err(Error::LocationNotWritable { location });
    }

    let installed = store.installed(&release.name, location)?;
    let target_path = store.target_path(&release.name, location)?;

    let mut plan = LibraryInstallPlan {
        name: release.name.clone(),
        version: release.version.clone(),
        release: release.clone(),
        target_path,
        replaced_library: None,
        up_to_date: false,
        location,
    };

    match installed {
        Some(lib) if lib.version == release.version => plan.up_to_date = true,
        Some(lib) => {
            if no_overwrite {
                return Err(Error::AlreadyInstalled {
                    library: release.name.clone(),
                    installed: lib.version,
                    requested: release.version.clone(),
                });
            }
            if lib.path != plan.target_path && plan.target_path.exists() {
                return Err(Error::TargetOccupied {
                    path: plan.target_path,
                });
            }
            plan.replaced_library = Some(lib);
        }
        None if plan.target_path.exists() => {
            return Err(Error::TargetOccupied {
                path: plan.target_path,
            });
        }
        None => {}
    }

    tracing::debug!(
        library = %release,
        location = %plan.location,
        up_to_date = plan.up_to_date,
        replaces = ?plan.replaced_library.as_ref().map(ToString::to_string),
        "Planned install"
    );
    Ok(plan)
}

/// Plan every library of `closure`, in install order.
///
/// Each library already installed at the exact version is reported with a
/// completed "Already installed" task event as soon as it is planned. The
/// first planning failure aborts the whole batch.
pub fn plan_closure(
    catalog: &dyn Catalog,
    store: &dyn LibraryStore,
    closure: &DependencyClosure,
    location: InstallLocation,
    no_overwrite: bool,
    task_progress: &dyn TaskProgressSink,
) -> Result<Vec<LibraryInstallPlan>> {
    let mut plans = Vec::with_capacity(closure.len());
    for identity in closure.install_order() {
        let plan = plan_install(catalog, store, identity, location, no_overwrite)?;
        if plan.up_to_date {
            task_progress.on_task(TaskProgress::completed(format!(
                "Already installed {}",
                plan.release
            )));
        }
        plans.push(plan);
    }
    Ok(plans)
}
