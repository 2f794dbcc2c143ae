//! Predicates selecting the dependency edges a report is about.

use depsight_resolver::graph::DependencyResult;
use depsight_util::errors::InsightError;

/// Decides whether a dependency edge belongs in the report.
pub trait DependencySpec {
    fn is_satisfied_by(&self, dependency: &DependencyResult<'_>) -> bool;
}

impl<F> DependencySpec for F
where
    F: Fn(&DependencyResult<'_>) -> bool,
{
    fn is_satisfied_by(&self, dependency: &DependencyResult<'_>) -> bool {
        self(dependency)
    }
}

/// The `--dependency` notation: a fragment of `group:name:version`.
///
/// Matches when the requested selector contains it, or when the selected
/// module version of a resolved or rejected edge does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyNotation {
    notation: String,
}

impl DependencyNotation {
    pub fn parse(notation: &str) -> miette::Result<Self> {
        let notation = notation.trim();
        if notation.is_empty() {
            return Err(InsightError::InvalidUserData {
                message: "the dependency notation must not be empty".into(),
            }
            .into());
        }
        Ok(Self {
            notation: notation.to_string(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.notation
    }
}

impl DependencySpec for DependencyNotation {
    fn is_satisfied_by(&self, dependency: &DependencyResult<'_>) -> bool {
        if dependency.requested.to_string().contains(&self.notation) {
            return true;
        }
        dependency
            .outcome
            .module_version()
            .is_ok_and(|selected| selected.to_string().contains(&self.notation))
    }
}
