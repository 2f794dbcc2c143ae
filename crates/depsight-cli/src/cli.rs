//! CLI argument definitions for depsight.
//!
//! Uses `clap` derive macros to define the command surface. Each command
//! corresponds to a handler in the [`super::commands`] module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use depsight_core::config::{ColorChoice, VersionSchemeKind};

#[derive(Parser, Debug)]
#[command(
    name = "depsight",
    version,
    about = "Explain where a dependency comes from",
    long_about = "depsight reads the resolution snapshot of a build and explains, for one \
                  dependency of one configuration, which versions were selected, who \
                  requested them and why resolution failed."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show where a dependency comes from and which version was selected
    Insight {
        /// Resolution snapshot (TOML, or JSON with a .json extension)
        #[arg(long, default_value = "resolution.toml")]
        snapshot: PathBuf,
        /// Configuration to look the dependency up in
        #[arg(long)]
        configuration: Option<String>,
        /// Dependency to show, e.g. `org.slf4j:slf4j-api`
        #[arg(long)]
        dependency: Option<String>,
        /// When to use colours: auto, always, never
        #[arg(long)]
        color: Option<ColorChoice>,
        /// Version semantics: maven, semver
        #[arg(long)]
        version_scheme: Option<VersionSchemeKind>,
    },
}

pub fn parse() -> Cli {
    Cli::parse()
}
