//! Resolution failures, per component and for a whole configuration.

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use depsight_core::identifier::{ComponentSelector, ModuleVersionIdentifier};

/// A single component could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic, Serialize, Deserialize)]
#[error("Could not resolve {selector}: {message}")]
pub struct ModuleResolveFailure {
    pub selector: ComponentSelector,
    pub message: String,
}

impl ModuleResolveFailure {
    pub fn new(selector: ComponentSelector, message: impl Into<String>) -> Self {
        Self {
            selector,
            message: message.into(),
        }
    }
}

/// The cause of a configuration-wide resolution failure.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ResolutionFailure {
    /// Groups of module versions that could not be reconciled.
    #[error("{}", conflicts_message(.conflicts))]
    #[diagnostic(help("Add a constraint or a resolution rule to pick one version"))]
    VersionConflict {
        conflicts: Vec<Vec<ModuleVersionIdentifier>>,
    },

    /// The persisted lock state no longer matches the resolution.
    #[error("Dependency lock state is out of date")]
    #[diagnostic(help("Refresh the dependency locks"))]
    LockOutOfDate { errors: Vec<String> },

    #[error(transparent)]
    Module(ModuleResolveFailure),

    #[error("{message}")]
    Other { message: String },
}

fn conflicts_message(conflicts: &[Vec<ModuleVersionIdentifier>]) -> String {
    let mut message = String::from("Conflict(s) found for the following module(s):");
    for group in conflicts {
        let ids: Vec<String> = group.iter().map(|id| id.to_string()).collect();
        message.push_str(&format!("\n  - {}", ids.join(" and ")));
    }
    message
}

/// Resolving a configuration failed; wraps the cause with the configuration name.
#[derive(Debug, Clone, Error, Diagnostic)]
#[error("Could not resolve all dependencies for configuration '{configuration}'.")]
pub struct ResolveError {
    pub configuration: String,
    #[source]
    pub cause: ResolutionFailure,
}

impl ResolveError {
    pub fn new(configuration: impl Into<String>, cause: ResolutionFailure) -> Self {
        Self {
            configuration: configuration.into(),
            cause,
        }
    }
}
