//! The resolved dependency graph of one configuration.
//!
//! Nodes are components carrying their [`ResolveOutcome`]; edges are declared
//! dependencies. A dedicated root node stands for the configuration itself, so
//! edges leaving it have no requester.

use std::collections::HashMap;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};

use depsight_core::attributes::AttributeSet;
use depsight_core::identifier::{ComponentIdentifier, ComponentSelector};

use crate::outcome::ResolveOutcome;

/// The variant of a component that was selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedVariant {
    #[serde(rename = "name")]
    pub display_name: String,
    #[serde(default)]
    pub attributes: AttributeSet,
}

impl ResolvedVariant {
    pub fn new(display_name: impl Into<String>, attributes: AttributeSet) -> Self {
        Self {
            display_name: display_name.into(),
            attributes,
        }
    }
}

/// A component in the graph.
#[derive(Debug, Clone, Default)]
pub struct ComponentNode {
    pub outcome: ResolveOutcome,
    pub variant: Option<ResolvedVariant>,
}

/// A declared dependency between two nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyEdge {
    pub requested: ComponentSelector,
    pub attributes: AttributeSet,
}

impl DependencyEdge {
    pub fn new(requested: ComponentSelector) -> Self {
        Self {
            requested,
            attributes: AttributeSet::new(),
        }
    }

    pub fn with_attributes(mut self, attributes: AttributeSet) -> Self {
        self.attributes = attributes;
        self
    }
}

/// Read-only view of one dependency edge, as reports consume it.
#[derive(Debug, Clone, Copy)]
pub struct DependencyResult<'a> {
    pub requested: &'a ComponentSelector,
    /// The requesting component; `None` for configuration-level edges.
    pub from: Option<&'a ComponentIdentifier>,
    pub outcome: &'a ResolveOutcome,
    pub variant: Option<&'a ResolvedVariant>,
    pub attributes: &'a AttributeSet,
}

/// A resolved dependency graph backed by petgraph.
#[derive(Debug)]
pub struct ResolutionGraph {
    configuration: String,
    graph: DiGraph<ComponentNode, DependencyEdge>,
    /// Lookup from component reference to node index.
    index: HashMap<String, NodeIndex>,
    root: NodeIndex,
}

impl ResolutionGraph {
    pub fn new(configuration: impl Into<String>) -> Self {
        let mut graph = DiGraph::new();
        let root = graph.add_node(ComponentNode::default());
        Self {
            configuration: configuration.into(),
            graph,
            index: HashMap::new(),
            root,
        }
    }

    pub fn configuration(&self) -> &str {
        &self.configuration
    }

    /// The node standing for the configuration.
    pub fn root(&self) -> NodeIndex {
        self.root
    }

    /// Add or retrieve a component. If the reference already exists, returns
    /// the existing index and leaves the node untouched.
    pub fn add_node(&mut self, reference: impl Into<String>, node: ComponentNode) -> NodeIndex {
        let reference = reference.into();
        if let Some(&idx) = self.index.get(&reference) {
            return idx;
        }
        let idx = self.graph.add_node(node);
        self.index.insert(reference, idx);
        idx
    }

    /// Add a dependency edge. The same request for the same target is kept once.
    pub fn add_edge(&mut self, from: NodeIndex, to: NodeIndex, edge: DependencyEdge) {
        let duplicate = self
            .graph
            .edges(from)
            .any(|e| e.target() == to && e.weight().requested == edge.requested);
        if !duplicate {
            self.graph.add_edge(from, to, edge);
        }
    }

    pub fn find(&self, reference: &str) -> Option<NodeIndex> {
        self.index.get(reference).copied()
    }

    pub fn node(&self, idx: NodeIndex) -> &ComponentNode {
        &self.graph[idx]
    }

    /// Every dependency edge of the graph, in insertion order.
    ///
    /// Edges declared by a component without an identity (failed or never
    /// resolved) are left out: they have no requester to name, and reporting
    /// them as configuration-level requests would misattribute them.
    pub fn all_dependencies(&self) -> Vec<DependencyResult<'_>> {
        self.graph
            .edge_references()
            .filter_map(|e| {
                let target = &self.graph[e.target()];
                let from = if e.source() == self.root {
                    None
                } else {
                    match self.graph[e.source()].outcome.id() {
                        Ok(id) => Some(id),
                        Err(_) => {
                            tracing::debug!(
                                "skipping '{}': requester has no resolved identity",
                                e.weight().requested
                            );
                            return None;
                        }
                    }
                };
                Some(DependencyResult {
                    requested: &e.weight().requested,
                    from,
                    outcome: &target.outcome,
                    variant: target.variant.as_ref(),
                    attributes: &e.weight().attributes,
                })
            })
            .collect()
    }

    /// Number of components (excluding the root).
    pub fn len(&self) -> usize {
        self.graph.node_count().saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
