//! Install command implementation

use colored::Colorize;
use libman_core::{
    ArchiveInstallRequest, CancellationToken, GitInstallRequest, LibraryInstallRequest, Settings,
    archive_library_install, git_library_install, library_install,
};
use libman_index::LibraryIdentity;
use libman_store::InstallLocation;

use super::progress::TerminalProgress;
use super::{open_session, open_uncataloged_session};
use crate::cli::InstallArgs;
use crate::error::Result;

/// Run the install command.
///
/// Library references are installed one after the other; the first failing
/// reference aborts the command.
pub fn run_install(settings: &Settings, args: InstallArgs, verbose: bool) -> Result<()> {
    let progress = TerminalProgress { verbose };

    if let Some(path) = args.zip_path {
        let session = open_uncataloged_session(settings)?;
        let request = ArchiveInstallRequest {
            path,
            overwrite: args.overwrite,
        };
        archive_library_install(&session, &request, &progress)?;
        return Ok(());
    }

    if let Some(url) = args.git_url {
        let session = open_uncataloged_session(settings)?;
        let request = GitInstallRequest {
            url,
            overwrite: args.overwrite,
        };
        git_library_install(&session, &request, &progress)?;
        return Ok(());
    }

    if args.overwrite {
        eprintln!(
            "{} --overwrite only applies to --zip-path and --git-url installs",
            "warning:".yellow().bold()
        );
    }

    let session = open_session(settings)?;
    let location = InstallLocation::from(args.location);
    let cancel = CancellationToken::new();

    for reference in &args.libraries {
        let identity = LibraryIdentity::parse_reference(reference)?;
        let request =
            LibraryInstallRequest::new(identity.name, identity.version_required.to_string())
                .with_location(location)
                .with_no_deps(args.no_deps)
                .with_no_overwrite(args.no_overwrite);
        tracing::debug!(library = %reference, %location, "Installing");
        library_install(&session, &request, &cancel, &progress, &progress)?;
    }

    Ok(())
}
