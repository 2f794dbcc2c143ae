//! Explain configuration-wide resolution failures that have a known shape.

use depsight_core::attributes::AttributeSet;
use depsight_core::identifier::{ComponentSelector, ModuleVersionIdentifier};
use depsight_resolver::failure::{ResolutionFailure, ResolveError};
use depsight_resolver::graph::DependencyResult;
use depsight_resolver::outcome::ResolveOutcome;
use depsight_util::term::{StyledOutput, TextStyle};

use crate::spec::DependencySpec;

/// A failure the report knows how to explain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureExplanation {
    /// Conflict groups touching the queried dependency. May be empty when no
    /// group matched.
    VersionConflict(Vec<Vec<ModuleVersionIdentifier>>),
    StaleLock(Vec<String>),
}

/// Classify the cause of `error`. Causes without an explanation come back
/// unchanged as `Err`.
pub fn classify(
    error: &ResolveError,
    spec: &dyn DependencySpec,
) -> Result<FailureExplanation, ResolutionFailure> {
    match &error.cause {
        ResolutionFailure::VersionConflict { conflicts } => {
            let matching = conflicts
                .iter()
                .filter(|group| group.iter().any(|id| matches_spec(id, spec)))
                .cloned()
                .collect();
            Ok(FailureExplanation::VersionConflict(matching))
        }
        ResolutionFailure::LockOutOfDate { errors } => {
            Ok(FailureExplanation::StaleLock(errors.clone()))
        }
        other => Err(other.clone()),
    }
}

/// Evaluate the dependency spec against a stand-in edge requesting exactly `id`.
fn matches_spec(id: &ModuleVersionIdentifier, spec: &dyn DependencySpec) -> bool {
    let requested = ComponentSelector::from(id);
    let outcome = ResolveOutcome::new();
    let attributes = AttributeSet::new();
    spec.is_satisfied_by(&DependencyResult {
        requested: &requested,
        from: None,
        outcome: &outcome,
        variant: None,
        attributes: &attributes,
    })
}

impl FailureExplanation {
    pub fn render(&self, out: &mut StyledOutput) {
        match self {
            Self::VersionConflict(groups) => {
                for group in groups {
                    out.text(
                        "There were conflicts between the following modules which fail resolution, see below for details:",
                    )
                    .println();
                    for id in group {
                        out.text("   - ").styled(TextStyle::Error, id.to_string()).println();
                    }
                    out.println();
                }
            }
            Self::StaleLock(errors) => {
                out.text("The dependency locks are out-of-date:").println();
                for error in errors {
                    out.text(format!("   - {error}")).println();
                }
                out.println();
            }
        }
    }
}
