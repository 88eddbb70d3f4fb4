//! Deps command implementation

use colored::Colorize;
use libman_core::{ResolveOptions, Settings, resolve_dependencies};
use libman_index::LibraryIdentity;

use super::open_session;
use crate::cli::DepsArgs;
use crate::error::Result;

/// Print the dependency closure of a library in install order, marking
/// what is already installed.
///
/// `--location` and `--no-overwrite` resolve the way `install` would with
/// the same flags.
pub fn run_deps(settings: &Settings, args: &DepsArgs) -> Result<()> {
    let session = open_session(settings)?;
    let identity = LibraryIdentity::parse_reference(&args.library)?;
    let options = ResolveOptions {
        location: args.location.into(),
        no_deps: false,
        no_overwrite: args.no_overwrite,
    };
    let closure = resolve_dependencies(session.catalog(), session.store(), &identity, &options)?;

    let installed = session.installed_libraries();

    for entry in closure.install_order() {
        let release = session
            .catalog()
            .find_release(&entry.name, &entry.version_required)?;
        let current = installed.iter().find(|lib| lib.name == release.name);

        let status = match current {
            Some(lib) if lib.version == release.version => "installed".green().to_string(),
            Some(lib) => format!("{} installed", lib.version).yellow().to_string(),
            None => "missing".red().to_string(),
        };
        println!("{} {}", release.to_string().cyan(), status);
    }

    Ok(())
}
