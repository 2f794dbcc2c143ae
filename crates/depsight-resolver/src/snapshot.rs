//! Resolution snapshots handed over by the graph builder.
//!
//! A snapshot holds, per configuration, every component with its final
//! outcome, every declared dependency edge, and the optional failure of the
//! configuration as a whole. Snapshots are TOML, or JSON when the file has a
//! `.json` extension.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use depsight_core::attributes::AttributeSet;
use depsight_core::identifier::{ComponentIdentifier, ComponentSelector, ModuleVersionIdentifier};
use depsight_util::errors::InsightError;

use crate::failure::{ModuleResolveFailure, ResolutionFailure};
use crate::graph::{ComponentNode, DependencyEdge, ResolutionGraph, ResolvedVariant};
use crate::outcome::{ComponentMetadata, RejectedVersion, ResolveOutcome};

/// A complete snapshot file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub configurations: BTreeMap<String, ConfigurationSnapshot>,
}

/// `[configurations.<name>]`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigurationSnapshot {
    /// Attributes requested by the configuration itself.
    #[serde(default)]
    pub attributes: AttributeSet,
    #[serde(default)]
    pub components: Vec<ComponentSnapshot>,
    #[serde(default)]
    pub dependencies: Vec<DependencySnapshot>,
    /// Set when resolving the configuration as a whole failed.
    #[serde(default)]
    pub failure: Option<ResolutionFailure>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentState {
    Resolved,
    Rejected,
    Failed,
    #[default]
    Unresolved,
}

/// `[[configurations.<name>.components]]`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentSnapshot {
    #[serde(rename = "ref")]
    pub reference: String,
    #[serde(default)]
    pub state: ComponentState,
    #[serde(default)]
    pub module: Option<ModuleVersionIdentifier>,
    /// Project path; the component identity is the project instead of the module.
    #[serde(default)]
    pub project: Option<String>,
    /// Publication status; attaches component metadata when present.
    #[serde(default)]
    pub status: Option<String>,
    /// What could not be resolved, for failed components.
    #[serde(default)]
    pub selector: Option<ComponentSelector>,
    #[serde(default)]
    pub failure: Option<String>,
    #[serde(default)]
    pub unmatched: Vec<String>,
    #[serde(default)]
    pub rejected: Vec<RejectedVersion>,
    #[serde(default)]
    pub variant: Option<ResolvedVariant>,
}

/// `[[configurations.<name>.dependencies]]`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DependencySnapshot {
    /// Requesting component ref; omitted for configuration-level dependencies.
    #[serde(default)]
    pub from: Option<String>,
    pub requested: ComponentSelector,
    pub target: String,
    #[serde(default)]
    pub attributes: AttributeSet,
}

fn snapshot_error(message: impl Into<String>) -> miette::Report {
    InsightError::Snapshot {
        message: message.into(),
    }
    .into()
}

impl Snapshot {
    /// Load a snapshot file, picking the format from its extension.
    pub fn from_path(path: &Path) -> miette::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            snapshot_error(format!("Failed to read {}: {e}", path.display()))
        })?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let parsed: Result<Self, String> = if is_json {
            serde_json::from_str(&content).map_err(|e| e.to_string())
        } else {
            toml::from_str(&content).map_err(|e| e.to_string())
        };
        parsed.map_err(|e| snapshot_error(format!("Failed to parse {}: {e}", path.display())))
    }

    pub fn from_toml(content: &str) -> miette::Result<Self> {
        toml::from_str(content).map_err(|e| snapshot_error(e.to_string()))
    }

    pub fn configuration(&self, name: &str) -> Option<&ConfigurationSnapshot> {
        self.configurations.get(name)
    }

    pub fn configuration_names(&self) -> impl Iterator<Item = &str> {
        self.configurations.keys().map(|k| k.as_str())
    }
}

impl ConfigurationSnapshot {
    /// Replay the snapshot into a graph, driving every outcome through its
    /// state transitions.
    pub fn build_graph(&self, configuration: &str) -> miette::Result<ResolutionGraph> {
        let mut graph = ResolutionGraph::new(configuration);

        for component in &self.components {
            if graph.find(&component.reference).is_some() {
                return Err(snapshot_error(format!(
                    "duplicate component ref `{}` in configuration '{configuration}'",
                    component.reference
                )));
            }
            let node = ComponentNode {
                outcome: component.replay()?,
                variant: component.variant.clone(),
            };
            tracing::debug!(
                "snapshot component `{}`: {:?}",
                component.reference,
                component.state
            );
            graph.add_node(component.reference.clone(), node);
        }

        for dependency in &self.dependencies {
            let from = match &dependency.from {
                Some(reference) => lookup(&graph, reference, configuration)?,
                None => graph.root(),
            };
            let to = lookup(&graph, &dependency.target, configuration)?;
            let edge = DependencyEdge::new(dependency.requested.clone())
                .with_attributes(dependency.attributes.clone());
            graph.add_edge(from, to, edge);
        }

        tracing::debug!(
            "built graph for '{configuration}': {} components, {} dependencies",
            graph.len(),
            self.dependencies.len()
        );
        Ok(graph)
    }
}

fn lookup(
    graph: &ResolutionGraph,
    reference: &str,
    configuration: &str,
) -> miette::Result<petgraph::graph::NodeIndex> {
    graph.find(reference).ok_or_else(|| {
        snapshot_error(format!(
            "unknown component ref `{reference}` in configuration '{configuration}'"
        ))
    })
}

impl ComponentSnapshot {
    fn identity(&self) -> miette::Result<(ComponentIdentifier, ModuleVersionIdentifier)> {
        let module = self.module.clone().ok_or_else(|| {
            snapshot_error(format!(
                "component `{}` is {:?} but has no `module`",
                self.reference, self.state
            ))
        })?;
        let id = match &self.project {
            Some(path) => ComponentIdentifier::project(path.clone()),
            None => ComponentIdentifier::from(module.clone()),
        };
        Ok((id, module))
    }

    fn replay(&self) -> miette::Result<ResolveOutcome> {
        let mut outcome = ResolveOutcome::new();
        match self.state {
            ComponentState::Resolved => {
                let (id, module_version) = self.identity()?;
                match &self.status {
                    Some(status) => outcome.mark_resolved_with_metadata(ComponentMetadata {
                        id,
                        module_version,
                        status: Some(status.clone()),
                    }),
                    None => outcome.mark_resolved(id, module_version),
                }
            }
            ComponentState::Rejected => {
                let (id, module_version) = self.identity()?;
                outcome.mark_rejected(id, module_version);
            }
            ComponentState::Failed => {
                let selector = self
                    .selector
                    .clone()
                    .or_else(|| self.module.as_ref().map(ComponentSelector::from))
                    .ok_or_else(|| {
                        snapshot_error(format!(
                            "failed component `{}` needs a `selector` or a `module`",
                            self.reference
                        ))
                    })?;
                let message = self.failure.as_deref().unwrap_or("Could not resolve component.");
                outcome.mark_failed(ModuleResolveFailure::new(selector, message));
            }
            ComponentState::Unresolved => {}
        }
        outcome.record_unmatched(self.unmatched.iter().cloned());
        outcome.record_rejections(self.rejected.iter().cloned());
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::OutcomeState;

    const SNAPSHOT: &str = r#"
[configurations.runtimeClasspath]
attributes = { "org.gradle.usage" = "java-runtime" }

[[configurations.runtimeClasspath.components]]
ref = "app"
state = "resolved"
module = "org:app:1.0"
project = ":app"

[[configurations.runtimeClasspath.components]]
ref = "core"
state = "resolved"
module = "lib:core:2.0"
status = "release"
unmatched = ["1.5"]
variant = { name = "runtime", attributes = { os = "linux" } }

[[configurations.runtimeClasspath.components]]
ref = "missing"
state = "failed"
selector = "lib:missing:3.0"
failure = "not found"

[[configurations.runtimeClasspath.dependencies]]
requested = "org:app:1.0"
target = "app"

[[configurations.runtimeClasspath.dependencies]]
from = "app"
requested = "lib:core:2.+"
target = "core"

[[configurations.runtimeClasspath.dependencies]]
from = "app"
requested = "lib:missing:3.0"
target = "missing"
"#;

    #[test]
    fn replays_component_states() {
        let snapshot = Snapshot::from_toml(SNAPSHOT).unwrap();
        let config = snapshot.configuration("runtimeClasspath").unwrap();
        let graph = config.build_graph("runtimeClasspath").unwrap();
        assert_eq!(graph.len(), 3);

        let app = graph.node(graph.find("app").unwrap());
        assert_eq!(app.outcome.id().unwrap().to_string(), "project :app");

        let core = graph.node(graph.find("core").unwrap());
        let status = core.outcome.metadata().unwrap().and_then(|m| m.status.clone());
        assert_eq!(status.as_deref(), Some("release"));
        assert_eq!(core.outcome.unmatched_versions(), ["1.5"]);
        assert_eq!(core.variant.as_ref().unwrap().display_name, "runtime");

        let missing = graph.node(graph.find("missing").unwrap());
        assert!(matches!(missing.outcome.state(), OutcomeState::Failed(_)));
    }

    #[test]
    fn requesters_come_from_component_identity() {
        let snapshot = Snapshot::from_toml(SNAPSHOT).unwrap();
        let graph = snapshot.configurations["runtimeClasspath"]
            .build_graph("runtimeClasspath")
            .unwrap();
        let deps = graph.all_dependencies();
        assert_eq!(deps.len(), 3);
        assert!(deps[0].from.is_none());
        assert_eq!(deps[1].from.unwrap().to_string(), "project :app");
    }

    #[test]
    fn unknown_target_is_an_error() {
        let snapshot = Snapshot::from_toml(
            r#"
[[configurations.compile.dependencies]]
requested = "lib:core:1.0"
target = "nowhere"
"#,
        )
        .unwrap();
        let err = snapshot.configurations["compile"]
            .build_graph("compile")
            .unwrap_err();
        assert!(err.to_string().contains("unknown component ref `nowhere`"));
    }

    #[test]
    fn resolved_without_module_is_an_error() {
        let snapshot = Snapshot::from_toml(
            r#"
[[configurations.compile.components]]
ref = "core"
state = "resolved"
"#,
        )
        .unwrap();
        let err = snapshot.configurations["compile"]
            .build_graph("compile")
            .unwrap_err();
        assert!(err.to_string().contains("has no `module`"));
    }
}
