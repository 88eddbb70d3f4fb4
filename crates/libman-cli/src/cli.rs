//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use libman_store::InstallLocation;

/// libman - dependency-aware library manager
#[derive(Parser, Debug)]
#[command(name = "libman")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Settings file (defaults to <config dir>/libman/config.toml)
    #[arg(long, global = true, env = "LIBMAN_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Install libraries
    ///
    /// Examples:
    ///   libman install Servo                 # Latest release and its dependencies
    ///   libman install "Adafruit GFX@1.2"    # A specific version
    ///   libman install --zip-path ./Foo.tar.gz
    ///   libman install --git-url https://example.com/Foo.git#v1.0
    Install(InstallArgs),

    /// List installed libraries
    List,

    /// Show the libraries an install would need, without installing
    Deps(DepsArgs),
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct InstallArgs {
    /// Library references, NAME or NAME@VERSION
    #[arg(required_unless_present_any = ["zip_path", "git_url"])]
    pub libraries: Vec<String>,

    /// Where to install
    #[arg(long, value_enum, default_value_t = LocationArg::User)]
    pub location: LocationArg,

    /// Do not install dependencies
    #[arg(long)]
    pub no_deps: bool,

    /// Do not replace installed versions
    #[arg(long)]
    pub no_overwrite: bool,

    /// Install from a local archive instead of the catalog
    #[arg(long, conflicts_with_all = ["libraries", "git_url"])]
    pub zip_path: Option<PathBuf>,

    /// Install from a git repository; append #REF for a tag or branch
    #[arg(long, conflicts_with = "libraries")]
    pub git_url: Option<String>,

    /// Replace a library of the same name (archive and git installs)
    #[arg(long)]
    pub overwrite: bool,
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct DepsArgs {
    /// Library reference, NAME or NAME@VERSION
    pub library: String,

    /// Location the install would target
    #[arg(long, value_enum, default_value_t = LocationArg::User)]
    pub location: LocationArg,

    /// Prefer installed versions of dependencies
    #[arg(long)]
    pub no_overwrite: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationArg {
    User,
    Builtin,
    Any,
}

impl From<LocationArg> for InstallLocation {
    fn from(arg: LocationArg) -> Self {
        match arg {
            LocationArg::User => InstallLocation::User,
            LocationArg::Builtin => InstallLocation::Builtin,
            LocationArg::Any => InstallLocation::AnyWritable,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_install_with_options() {
        let cli = Cli::parse_from([
            "libman",
            "install",
            "Servo@1.2",
            "Stepper",
            "--location",
            "any",
            "--no-overwrite",
        ]);
        match cli.command {
            Commands::Install(args) => {
                assert_eq!(args.libraries, vec!["Servo@1.2", "Stepper"]);
                assert_eq!(InstallLocation::from(args.location), InstallLocation::AnyWritable);
                assert!(args.no_overwrite);
                assert!(!args.no_deps);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parse_zip_install() {
        let cli = Cli::parse_from(["libman", "install", "--zip-path", "Foo.tar.gz", "--overwrite"]);
        match cli.command {
            Commands::Install(args) => {
                assert!(args.libraries.is_empty());
                assert_eq!(args.zip_path, Some(PathBuf::from("Foo.tar.gz")));
                assert!(args.overwrite);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parse_deps_with_install_flags() {
        let cli = Cli::parse_from(["libman", "deps", "Foo", "--location", "builtin", "--no-overwrite"]);
        match cli.command {
            Commands::Deps(args) => {
                assert_eq!(args.library, "Foo");
                assert_eq!(InstallLocation::from(args.location), InstallLocation::Builtin);
                assert!(args.no_overwrite);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn zip_path_conflicts_with_names() {
        let result = Cli::try_parse_from(["libman", "install", "Servo", "--zip-path", "Foo.tar.gz"]);
        assert!(result.is_err());
    }

    #[test]
    fn install_requires_something() {
        assert!(Cli::try_parse_from(["libman", "install"]).is_err());
    }
}
