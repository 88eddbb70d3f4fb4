//! List command implementation

use colored::Colorize;
use libman_core::Settings;
use libman_store::{FsLibraryStore, LibraryStore};

use crate::error::Result;

/// Print every installed library, user libraries first.
pub fn run_list(settings: &Settings) -> Result<()> {
    let store = FsLibraryStore::new(settings.layout());
    let libraries = store.list_installed()?;

    if libraries.is_empty() {
        println!("{}", "No libraries installed.".dimmed());
        return Ok(());
    }

    for library in libraries {
        println!(
            "{} {} {}",
            library.name.cyan().bold(),
            library.version.to_string().green(),
            format!("({}, {})", library.location, library.path.display()).dimmed()
        );
    }

    Ok(())
}
