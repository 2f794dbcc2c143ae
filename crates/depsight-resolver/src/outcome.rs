//! Per-component resolution outcome.
//!
//! Every node of a dependency graph carries a [`ResolveOutcome`] that moves
//! from `Unresolved` to exactly one of `Resolved`, `Rejected` or `Failed`.
//! The graph builder is the only writer; reports read the outcome once the
//! whole graph is finished. Each `mark_*` call replaces the complete state, so
//! a cell reused across attempts never leaks identity, metadata or failure
//! from a previous one.

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use depsight_core::identifier::{ComponentIdentifier, ModuleVersionIdentifier};

use crate::failure::ModuleResolveFailure;

/// Full metadata of a resolved component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentMetadata {
    pub id: ComponentIdentifier,
    pub module_version: ModuleVersionIdentifier,
    /// Publication status, e.g. `release` or `integration`.
    pub status: Option<String>,
}

/// A candidate version excluded by a rejection rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectedVersion {
    pub version: String,
    pub reason: String,
}

impl RejectedVersion {
    pub fn new(version: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            reason: reason.into(),
        }
    }
}

/// Where an outcome stands.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OutcomeState {
    #[default]
    Unresolved,
    Resolved {
        id: ComponentIdentifier,
        module_version: ModuleVersionIdentifier,
        metadata: Option<ComponentMetadata>,
    },
    /// Resolvable, but excluded by a rejection rule. The identity stays usable.
    Rejected {
        id: ComponentIdentifier,
        module_version: ModuleVersionIdentifier,
    },
    Failed(ModuleResolveFailure),
}

/// Reading an outcome that carries no identity.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum OutcomeError {
    /// The graph builder has not produced a result yet.
    #[error("Not resolved.")]
    NotResolved,

    /// The stored failure, surfaced unchanged.
    #[error(transparent)]
    Failed(ModuleResolveFailure),
}

/// Result cell for one component under resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolveOutcome {
    state: OutcomeState,
    unmatched: Vec<String>,
    rejections: Vec<RejectedVersion>,
}

impl ResolveOutcome {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &OutcomeState {
        &self.state
    }

    /// `true` once any of the `mark_*` transitions happened.
    pub fn has_result(&self) -> bool {
        !matches!(self.state, OutcomeState::Unresolved)
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self.state, OutcomeState::Rejected { .. })
    }

    pub fn failure(&self) -> Option<&ModuleResolveFailure> {
        match &self.state {
            OutcomeState::Failed(cause) => Some(cause),
            _ => None,
        }
    }

    pub fn mark_resolved(&mut self, id: ComponentIdentifier, module_version: ModuleVersionIdentifier) {
        self.state = OutcomeState::Resolved {
            id,
            module_version,
            metadata: None,
        };
    }

    /// Resolve from metadata; its identity is used as-is.
    pub fn mark_resolved_with_metadata(&mut self, metadata: ComponentMetadata) {
        self.state = OutcomeState::Resolved {
            id: metadata.id.clone(),
            module_version: metadata.module_version.clone(),
            metadata: Some(metadata),
        };
    }

    pub fn mark_rejected(&mut self, id: ComponentIdentifier, module_version: ModuleVersionIdentifier) {
        self.state = OutcomeState::Rejected { id, module_version };
    }

    pub fn mark_failed(&mut self, cause: ModuleResolveFailure) {
        self.state = OutcomeState::Failed(cause);
    }

    /// Attach metadata to a resolved outcome. Identity and module version are
    /// taken from the metadata when they disagree.
    pub fn attach_metadata(&mut self, metadata: ComponentMetadata) -> Result<(), OutcomeError> {
        if let OutcomeState::Failed(cause) = &self.state {
            return Err(OutcomeError::Failed(cause.clone()));
        }
        if !matches!(self.state, OutcomeState::Resolved { .. }) {
            return Err(OutcomeError::NotResolved);
        }
        self.mark_resolved_with_metadata(metadata);
        Ok(())
    }

    /// Replace the versions that were considered but did not match a selector.
    pub fn record_unmatched(&mut self, versions: impl IntoIterator<Item = String>) {
        self.unmatched = versions.into_iter().collect();
    }

    /// Replace the versions excluded by rejection rules.
    pub fn record_rejections(&mut self, rejections: impl IntoIterator<Item = RejectedVersion>) {
        self.rejections = rejections.into_iter().collect();
    }

    pub fn unmatched_versions(&self) -> &[String] {
        &self.unmatched
    }

    pub fn rejected_versions(&self) -> &[RejectedVersion] {
        &self.rejections
    }

    pub fn id(&self) -> Result<&ComponentIdentifier, OutcomeError> {
        match &self.state {
            OutcomeState::Resolved { id, .. } | OutcomeState::Rejected { id, .. } => Ok(id),
            OutcomeState::Failed(cause) => Err(OutcomeError::Failed(cause.clone())),
            OutcomeState::Unresolved => Err(OutcomeError::NotResolved),
        }
    }

    pub fn module_version(&self) -> Result<&ModuleVersionIdentifier, OutcomeError> {
        match &self.state {
            OutcomeState::Resolved { module_version, .. }
            | OutcomeState::Rejected { module_version, .. } => Ok(module_version),
            OutcomeState::Failed(cause) => Err(OutcomeError::Failed(cause.clone())),
            OutcomeState::Unresolved => Err(OutcomeError::NotResolved),
        }
    }

    /// Metadata, when it was attached. Rejected outcomes never carry any.
    pub fn metadata(&self) -> Result<Option<&ComponentMetadata>, OutcomeError> {
        match &self.state {
            OutcomeState::Resolved { metadata, .. } => Ok(metadata.as_ref()),
            OutcomeState::Rejected { .. } => Ok(None),
            OutcomeState::Failed(cause) => Err(OutcomeError::Failed(cause.clone())),
            OutcomeState::Unresolved => Err(OutcomeError::NotResolved),
        }
    }
}
