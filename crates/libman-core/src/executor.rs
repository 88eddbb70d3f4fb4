//! Resolved library installs.

use libman_index::LibraryIdentity;
use libman_store::InstallLocation;
use tokio_util::sync::CancellationToken;

use crate::error::{Error, InstallStep, Result};
use crate::planner::{LibraryInstallPlan, plan_closure};
use crate::progress::{DownloadProgressSink, TaskProgress, TaskProgressSink};
use crate::resolver::{ResolveOptions, resolve_dependencies};
use crate::session::Session;

/// Install a library from the catalog, with its dependencies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryInstallRequest {
    pub name: String,
    /// Version requirement; empty or `latest` for the newest release.
    pub version: String,
    pub location: InstallLocation,
    /// Install the requested library alone.
    pub no_deps: bool,
    /// Refuse to replace installed versions.
    pub no_overwrite: bool,
}

impl LibraryInstallRequest {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            location: InstallLocation::User,
            no_deps: false,
            no_overwrite: false,
        }
    }

    pub fn with_location(mut self, location: InstallLocation) -> Self {
        self.location = location;
        self
    }

    pub fn with_no_deps(mut self, no_deps: bool) -> Self {
        self.no_deps = no_deps;
        self
    }

    pub fn with_no_overwrite(mut self, no_overwrite: bool) -> Self {
        self.no_overwrite = no_overwrite;
        self
    }

    pub fn identity(&self) -> Result<LibraryIdentity> {
        Ok(LibraryIdentity::parse(self.name.as_str(), &self.version)?)
    }
}

/// Why a library is part of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallReason {
    /// The requested library, not installed before.
    Install,
    /// The requested library, replacing another version.
    Upgrade,
    /// Pulled in as a dependency.
    Depends,
}

impl InstallReason {
    pub fn of(plan: &LibraryInstallPlan, root: &str) -> Self {
        if plan.name != root {
            Self::Depends
        } else if plan.replaced_library.is_some() {
            Self::Upgrade
        } else {
            Self::Install
        }
    }

    /// Tag shown in progress labels and log fields. Requests that name the
    /// bundled location carry a `-builtin` suffix; an `AnyWritable` request
    /// landing there does not.
    pub fn tag(self, location: InstallLocation) -> String {
        let base = match self {
            Self::Install => "install",
            Self::Upgrade => "upgrade",
            Self::Depends => return "depends".to_string(),
        };
        if location == InstallLocation::Builtin {
            format!("{base}-builtin")
        } else {
            base.to_string()
        }
    }
}

/// Resolve, plan and install a library and its dependencies.
///
/// Nothing is downloaded or changed on disk unless every library of the
/// batch was planned successfully. Libraries are then installed one at a
/// time, dependencies first; the batch stops at the first failure, leaving
/// libraries completed before it installed. The session's installed view is
/// refreshed after the batch whether it succeeded or not.
pub fn library_install(
    session: &Session,
    request: &LibraryInstallRequest,
    cancel: &CancellationToken,
    download_progress: &dyn DownloadProgressSink,
    task_progress: &dyn TaskProgressSink,
) -> Result<()> {
    let _guard = session.lock();

    let identity = request.identity()?;
    let options = ResolveOptions {
        location: request.location,
        no_deps: request.no_deps,
        no_overwrite: request.no_overwrite,
    };
    let closure = resolve_dependencies(session.catalog(), session.store(), &identity, &options)?;
    let plans = plan_closure(
        session.catalog(),
        session.store(),
        &closure,
        request.location,
        request.no_overwrite,
        task_progress,
    )?;

    let outcome = plans
        .iter()
        .filter(|plan| !plan.up_to_date)
        .try_for_each(|plan| {
            let reason = InstallReason::of(plan, closure.root());
            let tag = reason.tag(request.location);
            install_one(session, plan, &tag, cancel, download_progress, task_progress)
        });

    match (outcome, session.reinitialize()) {
        (Ok(()), Ok(())) => Ok(()),
        (Ok(()), Err(refresh)) => Err(Error::SessionRefresh {
            source: Box::new(refresh),
        }),
        (Err(e), refreshed) => {
            if let Err(refresh) = refreshed {
                tracing::warn!(error = %refresh, "Failed to refresh installed libraries");
            }
            Err(e)
        }
    }
}

fn install_one(
    session: &Session,
    plan: &LibraryInstallPlan,
    tag: &str,
    cancel: &CancellationToken,
    download_progress: &dyn DownloadProgressSink,
    task_progress: &dyn TaskProgressSink,
) -> Result<()> {
    let release = &plan.release;

    if cancel.is_cancelled() {
        return Err(Error::Cancelled);
    }
    task_progress.on_task(TaskProgress::started(format!("Downloading {release}")));
    let label = format!("{release} ({tag})");
    let archive = session
        .downloads()
        .download(release, &label, download_progress)
        .map_err(|e| Error::install_failed(release, InstallStep::Download, e))?;
    task_progress.on_task(TaskProgress {
        completed: true,
        ..TaskProgress::default()
    });

    if cancel.is_cancelled() {
        return Err(Error::Cancelled);
    }
    task_progress.on_task(TaskProgress::started(format!("Installing {release}")));
    tracing::info!(library = %release, reason = %tag, "Installing library");

    if let Some(replaced) = &plan.replaced_library {
        task_progress.on_task(TaskProgress::message(format!(
            "Replacing {replaced} with {release}"
        )));
        session
            .store()
            .uninstall(replaced)
            .map_err(|e| Error::install_failed(release, InstallStep::RemoveOld, e))?;
    }
    session
        .store()
        .install(release, &archive, &plan.target_path)
        .map_err(|e| Error::install_failed(release, InstallStep::Install, e))?;

    task_progress.on_task(TaskProgress::completed(format!("Installed {release}")));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(InstallReason::Install, InstallLocation::User, "install")]
    #[case(InstallReason::Upgrade, InstallLocation::User, "upgrade")]
    #[case(InstallReason::Install, InstallLocation::Builtin, "install-builtin")]
    #[case(InstallReason::Upgrade, InstallLocation::Builtin, "upgrade-builtin")]
    #[case(InstallReason::Depends, InstallLocation::Builtin, "depends")]
    fn test_reason_tag(
        #[case] reason: InstallReason,
        #[case] location: InstallLocation,
        #[case] expected: &str,
    ) {
        assert_eq!(reason.tag(location), expected);
    }

    #[test]
    fn test_request_identity() {
        let request = LibraryInstallRequest::new("Foo", " latest ");
        assert!(request.identity().unwrap().version_required.is_latest());
        assert!(LibraryInstallRequest::new("Foo", ">=x").identity().is_err());
    }
}
