//! The report tree: one [`RenderableDependency`] per line of output.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use depsight_core::attributes::AttributeSet;
use depsight_resolver::graph::ResolvedVariant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolutionState {
    Resolved,
    Failed,
    Unresolved,
}

/// A nested detail printed below a node, e.g. a list of candidate versions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub description: String,
    pub children: Vec<Section>,
}

impl Section {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<Section>) -> Self {
        self.children = children;
        self
    }
}

/// Structural identity of a subtree: name, state and the children's
/// signatures. Descriptions and details do not take part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signature(u64);

impl Signature {
    fn of(name: &str, state: ResolutionState, children: &[RenderableDependency]) -> Self {
        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        state.hash(&mut hasher);
        children.len().hash(&mut hasher);
        for child in children {
            child.signature.hash(&mut hasher);
        }
        Self(hasher.finish())
    }
}

/// A node of the report tree. Built once by the reporter, never mutated after.
///
/// The signature is computed when the node is built, from the signatures of
/// its children, so identity checks never walk the subtree again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderableDependency {
    name: String,
    pub description: Option<String>,
    state: ResolutionState,
    pub variant: Option<ResolvedVariant>,
    /// Attributes declared by the edges this node was built from.
    pub requested_attributes: AttributeSet,
    pub extra_details: Vec<Section>,
    children: Vec<RenderableDependency>,
    /// Does not stand for a real component (the configuration as a requester).
    pub synthetic: bool,
    /// Children were listed earlier in the report and are not repeated here.
    omitted: bool,
    signature: Signature,
}

impl RenderableDependency {
    pub fn new(name: impl Into<String>, state: ResolutionState) -> Self {
        let name = name.into();
        let signature = Signature::of(&name, state, &[]);
        Self {
            name,
            description: None,
            state,
            variant: None,
            requested_attributes: AttributeSet::new(),
            extra_details: Vec::new(),
            children: Vec::new(),
            synthetic: false,
            omitted: false,
            signature,
        }
    }

    pub fn synthetic(name: impl Into<String>) -> Self {
        Self {
            synthetic: true,
            ..Self::new(name, ResolutionState::Resolved)
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_variant(mut self, variant: Option<ResolvedVariant>) -> Self {
        self.variant = variant;
        self
    }

    pub fn with_requested_attributes(mut self, attributes: AttributeSet) -> Self {
        self.requested_attributes = attributes;
        self
    }

    pub fn with_extra_details(mut self, details: Vec<Section>) -> Self {
        self.extra_details = details;
        self
    }

    pub fn with_children(mut self, children: Vec<RenderableDependency>) -> Self {
        self.signature = Signature::of(&self.name, self.state, &children);
        self.children = children;
        self.omitted = false;
        self
    }

    /// Stand in for a subtree already listed under `listed`: no children of
    /// its own, same identity.
    pub fn listed_previously(mut self, listed: Signature) -> Self {
        self.children = Vec::new();
        self.omitted = true;
        self.signature = listed;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> ResolutionState {
        self.state
    }

    pub fn children(&self) -> &[RenderableDependency] {
        &self.children
    }

    pub fn signature(&self) -> Signature {
        self.signature
    }

    pub fn is_omitted(&self) -> bool {
        self.omitted
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty() && !self.omitted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(requester: &str) -> RenderableDependency {
        RenderableDependency::new(requester, ResolutionState::Resolved)
            .with_children(vec![RenderableDependency::synthetic("runtimeClasspath")])
    }

    #[test]
    fn signature_ignores_description() {
        let a = chain("org:app:1.0").with_description("requested lib:core:1.0");
        let b = chain("org:app:1.0").with_description("requested lib:util:2.0");
        assert_eq!(a.signature(), b.signature());
    }

    #[test]
    fn signature_covers_state_and_children() {
        let resolved = chain("org:app:1.0");
        let failed = RenderableDependency::new("org:app:1.0", ResolutionState::Failed)
            .with_children(vec![RenderableDependency::synthetic("runtimeClasspath")]);
        assert_ne!(resolved.signature(), failed.signature());

        let leaf = RenderableDependency::new("org:app:1.0", ResolutionState::Resolved);
        assert_ne!(resolved.signature(), leaf.signature());

        let deeper = RenderableDependency::new("org:app:1.0", ResolutionState::Resolved)
            .with_children(vec![chain("org:web:1.0")]);
        assert_ne!(resolved.signature(), deeper.signature());
    }

    #[test]
    fn listed_previously_keeps_identity_without_children() {
        let full = chain("org:app:1.0");
        let stub = RenderableDependency::new("org:app:1.0", ResolutionState::Resolved)
            .with_description("requested org:app:1.0")
            .listed_previously(full.signature());
        assert_eq!(stub.signature(), full.signature());
        assert!(stub.children().is_empty());
        assert!(stub.is_omitted());
        assert!(!stub.is_leaf());
    }

    #[test]
    fn synthetic_nodes_are_resolved_leaves() {
        let node = RenderableDependency::synthetic("compileClasspath");
        assert!(node.synthetic);
        assert!(node.is_leaf());
        assert_eq!(node.state(), ResolutionState::Resolved);
    }
}
