//! Command dispatch and handler modules.

mod insight;

use miette::Result;

use crate::cli::{Cli, Command};

/// Route a parsed CLI invocation to the appropriate command handler.
pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Insight {
            snapshot,
            configuration,
            dependency,
            color,
            version_scheme,
        } => insight::exec(snapshot, configuration, dependency, color, version_scheme),
    }
}
