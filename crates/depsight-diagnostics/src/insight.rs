//! Group matching dependency edges into the insight report tree.
//!
//! Roots are the versions a module ended up at, newest first. Below each root
//! hang the components that requested it, and below those their own
//! requesters, down to the configuration itself. Each requester is expanded
//! once per report; later occurrences refer back to the first listing.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, HashSet};

use depsight_core::attributes::AttributeSet;
use depsight_core::identifier::{ComponentIdentifier, ModuleIdentifier, ModuleVersionIdentifier};
use depsight_resolver::failure::ModuleResolveFailure;
use depsight_resolver::graph::{DependencyResult, ResolutionGraph};
use depsight_resolver::ordering::VersionOrder;
use depsight_resolver::outcome::OutcomeState;

use crate::renderable::{RenderableDependency, ResolutionState, Section, Signature};
use crate::spec::DependencySpec;

pub const CONFLICT_RESOLUTION: &str = "by conflict resolution";
pub const REJECTED_BY_RULE: &str = "Rejected by a version rejection rule";

/// What a group of edges ended up as.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum BucketKey {
    Selected(String),
    Failed(String),
    Unresolved(String),
}

impl BucketKey {
    fn of(edge: &DependencyResult<'_>) -> Self {
        match edge.outcome.state() {
            OutcomeState::Resolved { module_version, .. }
            | OutcomeState::Rejected { module_version, .. } => {
                Self::Selected(module_version.version.clone())
            }
            OutcomeState::Failed(failure) => Self::Failed(failure.to_string()),
            OutcomeState::Unresolved => Self::Unresolved(edge.requested.version.clone()),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Self::Selected(_) => 0,
            Self::Failed(_) => 1,
            Self::Unresolved(_) => 2,
        }
    }
}

/// Builds the report for one configuration.
pub struct InsightReporter<'a> {
    ordering: &'a dyn VersionOrder,
    configuration: String,
}

impl<'a> InsightReporter<'a> {
    pub fn new(ordering: &'a dyn VersionOrder, configuration: impl Into<String>) -> Self {
        Self {
            ordering,
            configuration: configuration.into(),
        }
    }

    /// Every edge of the graph accepted by `spec`, in graph order.
    pub fn select_dependencies<'g>(
        graph: &'g ResolutionGraph,
        spec: &dyn DependencySpec,
    ) -> Vec<DependencyResult<'g>> {
        graph
            .all_dependencies()
            .into_iter()
            .filter(|edge| spec.is_satisfied_by(edge))
            .collect()
    }

    /// Select and prepare in one go. An empty result means nothing matched.
    pub fn generate_report(
        &self,
        graph: &ResolutionGraph,
        spec: &dyn DependencySpec,
    ) -> Vec<RenderableDependency> {
        let all = graph.all_dependencies();
        let selected = Self::select_dependencies(graph, spec);
        tracing::debug!(
            "{} of {} dependencies in '{}' match",
            selected.len(),
            all.len(),
            self.configuration
        );
        self.prepare(&selected, &all)
    }

    /// Group `selected` edges into report roots. `all` is the complete edge
    /// list, used to walk from each requester back to the configuration.
    pub fn prepare(
        &self,
        selected: &[DependencyResult<'_>],
        all: &[DependencyResult<'_>],
    ) -> Vec<RenderableDependency> {
        let mut modules: BTreeMap<String, HashMap<BucketKey, Vec<DependencyResult<'_>>>> =
            BTreeMap::new();
        for edge in selected {
            modules
                .entry(module_of(edge).to_string())
                .or_default()
                .entry(BucketKey::of(edge))
                .or_default()
                .push(*edge);
        }

        let requesters = RequesterIndex::new(all);
        let mut expansion = Expansion::default();
        let mut roots = Vec::new();
        for buckets in modules.into_values() {
            let mut buckets: Vec<_> = buckets.into_iter().collect();
            buckets.sort_by(|(a, _), (b, _)| self.compare_buckets(a, b));
            for (key, edges) in buckets {
                roots.push(self.root_for(&key, edges, &requesters, &mut expansion));
            }
        }
        roots
    }

    fn compare_buckets(&self, a: &BucketKey, b: &BucketKey) -> Ordering {
        match (a, b) {
            (BucketKey::Selected(a), BucketKey::Selected(b)) => {
                self.ordering.compare(b, a).then_with(|| a.cmp(b))
            }
            (BucketKey::Failed(a), BucketKey::Failed(b)) => a.cmp(b),
            (BucketKey::Unresolved(a), BucketKey::Unresolved(b)) => {
                self.ordering.compare_selectors(a, b).then_with(|| a.cmp(b))
            }
            _ => a.rank().cmp(&b.rank()),
        }
    }

    fn root_for(
        &self,
        key: &BucketKey,
        mut edges: Vec<DependencyResult<'_>>,
        requesters: &RequesterIndex<'_>,
        expansion: &mut Expansion,
    ) -> RenderableDependency {
        edges.sort_by(|a, b| self.compare_edges(a, b));
        edges.dedup_by(|a, b| same_request(a, b));

        // Every edge of a bucket shares its state; the first one speaks for all.
        let head = edges[0];
        let selected = head.outcome.module_version().ok();
        let (name, state) = match (key, selected) {
            (BucketKey::Selected(_), Some(selected)) => {
                (selected.to_string(), ResolutionState::Resolved)
            }
            (BucketKey::Failed(_), _) => (
                head.outcome
                    .failure()
                    .map(|f| f.selector.to_string())
                    .unwrap_or_else(|| head.requested.to_string()),
                ResolutionState::Failed,
            ),
            _ => (head.requested.to_string(), ResolutionState::Unresolved),
        };

        let mut requested_attributes = AttributeSet::new();
        for edge in &edges {
            requested_attributes = requested_attributes.concat(edge.attributes);
        }

        let children = edges
            .iter()
            .map(|edge| self.requester_node(edge, requesters, expansion))
            .collect();

        let mut root = RenderableDependency::new(name, state)
            .with_variant(edges.iter().find_map(|e| e.variant.cloned()))
            .with_requested_attributes(requested_attributes)
            .with_extra_details(self.extra_details(&edges))
            .with_children(children);
        if let Some(selected) = selected {
            let conflict = edges
                .iter()
                .any(|e| !self.ordering.accepts(&e.requested.version, &selected.version));
            if conflict {
                root = root.with_description(CONFLICT_RESOLUTION);
            }
        }
        root
    }

    /// A node for whoever declared `edge`, expanded to its own requesters the
    /// first time that requester shows up in the report.
    fn requester_node(
        &self,
        edge: &DependencyResult<'_>,
        requesters: &RequesterIndex<'_>,
        expansion: &mut Expansion,
    ) -> RenderableDependency {
        let description = describe_request(edge);
        let Some(from) = edge.from else {
            return RenderableDependency::synthetic(self.configuration.clone())
                .with_description(description);
        };

        let node = RenderableDependency::new(from.to_string(), ResolutionState::Resolved)
            .with_description(description);
        if expansion.path.contains(from) {
            // Cycle: stop at the repeated component.
            return node;
        }
        if let Some(&listed) = expansion.listed.get(from) {
            return node.listed_previously(listed);
        }

        expansion.path.insert(from.clone());
        let mut parents = requesters.of(from);
        parents.sort_by(|a, b| self.compare_edges(a, b));
        parents.dedup_by(|a, b| same_request(a, b));
        let children = parents
            .iter()
            .map(|parent| self.requester_node(parent, requesters, expansion))
            .collect();
        expansion.path.remove(from);

        let node = node.with_children(children);
        if !node.is_leaf() {
            expansion.listed.insert(from.clone(), node.signature());
        }
        node
    }

    fn compare_edges(&self, a: &DependencyResult<'_>, b: &DependencyResult<'_>) -> Ordering {
        self.requester_name(a)
            .cmp(&self.requester_name(b))
            .then_with(|| {
                self.ordering
                    .compare_selectors(&a.requested.version, &b.requested.version)
            })
            .then_with(|| a.requested.to_string().cmp(&b.requested.to_string()))
    }

    fn requester_name(&self, edge: &DependencyResult<'_>) -> String {
        edge.from
            .map(|id| id.to_string())
            .unwrap_or_else(|| self.configuration.clone())
    }

    fn extra_details(&self, edges: &[DependencyResult<'_>]) -> Vec<Section> {
        let mut details = Vec::new();
        if edges.iter().any(|e| e.outcome.is_rejected()) {
            details.push(Section::new(REJECTED_BY_RULE));
        }

        let mut failures: Vec<&ModuleResolveFailure> = Vec::new();
        let mut unmatched: Vec<&str> = Vec::new();
        let mut rejected: Vec<String> = Vec::new();
        for edge in edges {
            if let Some(failure) = edge.outcome.failure() {
                if !failures.contains(&failure) {
                    failures.push(failure);
                }
            }
            for version in edge.outcome.unmatched_versions() {
                if !unmatched.contains(&version.as_str()) {
                    unmatched.push(version);
                }
            }
            for rejection in edge.outcome.rejected_versions() {
                let line = format!("{} ({})", rejection.version, rejection.reason);
                if !rejected.contains(&line) {
                    rejected.push(line);
                }
            }
        }

        if !failures.is_empty() {
            details.push(Section::new("Failures").with_children(
                failures.iter().map(|f| Section::new(f.to_string())).collect(),
            ));
        }
        if !unmatched.is_empty() {
            details.push(Section::new("Unmatched candidate versions").with_children(
                unmatched.iter().map(|v| Section::new(*v)).collect(),
            ));
        }
        if !rejected.is_empty() {
            details.push(
                Section::new("Rejected candidate versions")
                    .with_children(rejected.into_iter().map(Section::new).collect()),
            );
        }
        details
    }
}

/// Requester expansion state shared by every root of one report.
#[derive(Default)]
struct Expansion {
    /// Components on the chain currently being expanded.
    path: HashSet<ComponentIdentifier>,
    /// Components already expanded, with the signature of that listing.
    listed: HashMap<ComponentIdentifier, Signature>,
}

/// Edges keyed by the identity of the component they point at.
struct RequesterIndex<'g> {
    by_target: HashMap<ComponentIdentifier, Vec<DependencyResult<'g>>>,
}

impl<'g> RequesterIndex<'g> {
    fn new(all: &[DependencyResult<'g>]) -> Self {
        let mut by_target: HashMap<ComponentIdentifier, Vec<DependencyResult<'g>>> =
            HashMap::new();
        for edge in all {
            if let Ok(id) = edge.outcome.id() {
                by_target.entry(id.clone()).or_default().push(*edge);
            }
        }
        Self { by_target }
    }

    fn of(&self, id: &ComponentIdentifier) -> Vec<DependencyResult<'g>> {
        self.by_target.get(id).cloned().unwrap_or_default()
    }
}

fn module_of(edge: &DependencyResult<'_>) -> ModuleIdentifier {
    edge.outcome
        .module_version()
        .map(ModuleVersionIdentifier::module)
        .unwrap_or_else(|_| edge.requested.module())
}

fn same_request(a: &DependencyResult<'_>, b: &DependencyResult<'_>) -> bool {
    a.from == b.from && a.requested == b.requested
}

/// `requested <selector>`, plus ` -> <version>` when something else was selected.
fn describe_request(edge: &DependencyResult<'_>) -> String {
    let mut description = format!("requested {}", edge.requested);
    if let Ok(selected) = edge.outcome.module_version() {
        if selected.version != edge.requested.version {
            description.push_str(&format!(" -> {}", selected.version));
        }
    }
    description
}

#[cfg(test)]
mod tests {
    use super::*;
    use depsight_core::identifier::ComponentSelector;
    use depsight_resolver::graph::{ComponentNode, DependencyEdge, ResolvedVariant};
    use depsight_resolver::ordering::MavenOrdering;
    use depsight_resolver::outcome::{RejectedVersion, ResolveOutcome};

    use crate::spec::DependencyNotation;

    fn resolved(notation: &str) -> ComponentNode {
        let mvi = ModuleVersionIdentifier::parse(notation).unwrap();
        let mut outcome = ResolveOutcome::new();
        outcome.mark_resolved(ComponentIdentifier::from(mvi.clone()), mvi);
        ComponentNode {
            outcome,
            variant: None,
        }
    }

    fn edge(notation: &str) -> DependencyEdge {
        DependencyEdge::new(ComponentSelector::parse(notation).unwrap())
    }

    /// runtimeClasspath -> org:a:1.0 -> lib:core:1.0
    /// runtimeClasspath -> org:b:1.0 -> lib:core:2.0
    fn two_versions() -> ResolutionGraph {
        let mut g = ResolutionGraph::new("runtimeClasspath");
        let root = g.root();
        let a = g.add_node("a", resolved("org:a:1.0"));
        let b = g.add_node("b", resolved("org:b:1.0"));
        let core1 = g.add_node("core1", resolved("lib:core:1.0"));
        let core2 = g.add_node("core2", resolved("lib:core:2.0"));
        g.add_edge(root, a, edge("org:a:1.0"));
        g.add_edge(root, b, edge("org:b:1.0"));
        g.add_edge(a, core1, edge("lib:core:1.0"));
        g.add_edge(b, core2, edge("lib:core:2.0"));
        g
    }

    fn report(graph: &ResolutionGraph, notation: &str) -> Vec<RenderableDependency> {
        let ordering = MavenOrdering::maven();
        let reporter = InsightReporter::new(&ordering, graph.configuration());
        reporter.generate_report(graph, &DependencyNotation::parse(notation).unwrap())
    }

    #[test]
    fn one_root_per_version_newest_first() {
        let roots = report(&two_versions(), "lib:core");
        let names: Vec<&str> = roots.iter().map(|r| r.name()).collect();
        assert_eq!(names, ["lib:core:2.0", "lib:core:1.0"]);

        assert_eq!(roots[0].children().len(), 1);
        assert_eq!(roots[0].children()[0].name(), "org:b:1.0");
        assert_eq!(roots[1].children()[0].name(), "org:a:1.0");

        let configuration = &roots[0].children()[0].children()[0];
        assert_eq!(configuration.name(), "runtimeClasspath");
        assert!(configuration.synthetic);
        assert!(configuration.is_leaf());
    }

    #[test]
    fn rejected_outcome_is_resolved_and_flagged() {
        let mut g = ResolutionGraph::new("runtimeClasspath");
        let root = g.root();
        let mvi = ModuleVersionIdentifier::parse("lib:core:1.5").unwrap();
        let mut outcome = ResolveOutcome::new();
        outcome.mark_rejected(ComponentIdentifier::from(mvi.clone()), mvi);
        let core = g.add_node(
            "core",
            ComponentNode {
                outcome,
                variant: None,
            },
        );
        g.add_edge(root, core, edge("lib:core:1.5"));

        let roots = report(&g, "lib:core");
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].state(), ResolutionState::Resolved);
        assert_eq!(roots[0].extra_details[0].description, REJECTED_BY_RULE);
    }

    #[test]
    fn plain_resolution_has_no_rejection_flag() {
        let roots = report(&two_versions(), "lib:core:2.0");
        assert!(roots[0].extra_details.is_empty());
        assert!(roots[0].description.is_none());
    }

    #[test]
    fn no_match_yields_empty_report() {
        assert!(report(&two_versions(), "does-not-exist").is_empty());
    }

    #[test]
    fn output_does_not_depend_on_input_order() {
        let graph = two_versions();
        let ordering = MavenOrdering::maven();
        let reporter = InsightReporter::new(&ordering, "runtimeClasspath");
        let all = graph.all_dependencies();
        let spec = DependencyNotation::parse("org").unwrap();
        let mut selected = InsightReporter::select_dependencies(&graph, &spec);
        let forward = reporter.prepare(&selected, &all);
        selected.reverse();
        let mut shuffled_all = all.clone();
        shuffled_all.reverse();
        assert_eq!(reporter.prepare(&selected, &shuffled_all), forward);
    }

    #[test]
    fn conflict_resolution_is_described() {
        let mut g = ResolutionGraph::new("runtimeClasspath");
        let root = g.root();
        let a = g.add_node("a", resolved("org:a:1.0"));
        let core = g.add_node("core", resolved("lib:core:2.0"));
        g.add_edge(root, a, edge("org:a:1.0"));
        g.add_edge(a, core, edge("lib:core:1.0"));
        g.add_edge(root, core, edge("lib:core:2.0"));

        let roots = report(&g, "lib:core");
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].description.as_deref(), Some(CONFLICT_RESOLUTION));
        let descriptions: Vec<_> = roots[0]
            .children()
            .iter()
            .map(|c| (c.name(), c.description.as_deref().unwrap_or("")))
            .collect();
        assert_eq!(
            descriptions,
            [
                ("org:a:1.0", "requested lib:core:1.0 -> 2.0"),
                ("runtimeClasspath", "requested lib:core:2.0"),
            ]
        );
    }

    #[test]
    fn dynamic_selectors_do_not_count_as_conflicts() {
        let mut g = ResolutionGraph::new("runtimeClasspath");
        let root = g.root();
        let core = g.add_node("core", resolved("lib:core:2.3"));
        g.add_edge(root, core, edge("lib:core:2.+"));
        let roots = report(&g, "lib:core");
        assert!(roots[0].description.is_none());
    }

    #[test]
    fn failed_and_unresolved_buckets_follow_selected_versions() {
        let mut g = ResolutionGraph::new("runtimeClasspath");
        let root = g.root();
        let core = g.add_node("core", resolved("lib:core:1.0"));
        let mut failed = ComponentNode::default();
        failed.outcome.mark_failed(ModuleResolveFailure::new(
            ComponentSelector::new("lib", "core", "9.0"),
            "not found",
        ));
        let failed = g.add_node("failed", failed);
        let pending = g.add_node("pending", ComponentNode::default());
        g.add_edge(root, pending, edge("lib:core:latest.release"));
        g.add_edge(root, failed, edge("lib:core:9.0"));
        g.add_edge(root, core, edge("lib:core:1.0"));

        let roots = report(&g, "lib:core");
        let shape: Vec<_> = roots.iter().map(|r| (r.name(), r.state())).collect();
        assert_eq!(
            shape,
            [
                ("lib:core:1.0", ResolutionState::Resolved),
                ("lib:core:9.0", ResolutionState::Failed),
                ("lib:core:latest.release", ResolutionState::Unresolved),
            ]
        );
        assert_eq!(roots[1].extra_details[0].description, "Failures");
        assert_eq!(
            roots[1].extra_details[0].children[0].description,
            "Could not resolve lib:core:9.0: not found"
        );
    }

    #[test]
    fn candidate_lists_show_regardless_of_state() {
        let mut g = ResolutionGraph::new("runtimeClasspath");
        let root = g.root();
        let mut node = resolved("lib:core:2.0");
        node.outcome.record_unmatched(vec!["1.0".to_string()]);
        node.outcome
            .record_rejections(vec![RejectedVersion::new("2.0", "blocked by policy")]);
        node.variant = Some(ResolvedVariant::new("runtime", AttributeSet::new()));
        let core = g.add_node("core", node);
        g.add_edge(
            root,
            core,
            edge("lib:core:2.0").with_attributes(AttributeSet::new().with("flavor", "debug")),
        );

        let roots = report(&g, "lib:core");
        let sections: Vec<&str> = roots[0]
            .extra_details
            .iter()
            .map(|s| s.description.as_str())
            .collect();
        assert_eq!(
            sections,
            ["Unmatched candidate versions", "Rejected candidate versions"]
        );
        assert_eq!(
            roots[0].extra_details[1].children[0].description,
            "2.0 (blocked by policy)"
        );
        assert_eq!(roots[0].variant.as_ref().unwrap().display_name, "runtime");
        assert!(roots[0].requested_attributes.contains("flavor"));
    }

    #[test]
    fn requester_cycles_terminate() {
        let mut g = ResolutionGraph::new("runtimeClasspath");
        let root = g.root();
        let a = g.add_node("a", resolved("org:a:1.0"));
        let b = g.add_node("b", resolved("org:b:1.0"));
        g.add_edge(root, a, edge("org:a:1.0"));
        g.add_edge(a, b, edge("org:b:1.0"));
        g.add_edge(b, a, edge("org:a:1.0"));

        let roots = report(&g, "org:b");
        assert_eq!(roots.len(), 1);
        let a_node = &roots[0].children()[0];
        assert_eq!(a_node.name(), "org:a:1.0");
        let names: Vec<&str> = a_node.children().iter().map(|c| c.name()).collect();
        assert_eq!(names, ["org:b:1.0", "runtimeClasspath"]);
        let repeated = &a_node.children()[0].children()[0];
        assert_eq!(repeated.name(), "org:a:1.0");
        assert!(repeated.is_leaf());
    }

    #[test]
    fn shared_requester_is_expanded_once() {
        let mut g = ResolutionGraph::new("runtimeClasspath");
        let root = g.root();
        let app = g.add_node("app", resolved("org:app:1.0"));
        let core = g.add_node("core", resolved("lib:core:1.0"));
        let util = g.add_node("util", resolved("lib:util:1.0"));
        g.add_edge(root, app, edge("org:app:1.0"));
        g.add_edge(app, core, edge("lib:core:1.0"));
        g.add_edge(app, util, edge("lib:util:1.0"));

        let roots = report(&g, "lib:");
        let first = &roots[0].children()[0];
        let second = &roots[1].children()[0];
        assert_eq!(first.name(), "org:app:1.0");
        assert_eq!(first.children()[0].name(), "runtimeClasspath");
        assert_eq!(second.name(), "org:app:1.0");
        assert!(second.is_omitted());
        assert!(second.children().is_empty());
        assert_eq!(second.signature(), first.signature());
        assert_eq!(second.description.as_deref(), Some("requested lib:util:1.0"));
    }

    /// `layers` rows of `org:aN`/`org:bN`, each requested by both components
    /// of the row before, with `lib:target` requested by the last row.
    fn layered_diamonds(layers: usize) -> ResolutionGraph {
        let mut g = ResolutionGraph::new("runtimeClasspath");
        let mut previous = vec![g.root()];
        for layer in 0..layers {
            let mut current = Vec::new();
            for side in ["a", "b"] {
                let notation = format!("org:{side}{layer}:1.0");
                let idx = g.add_node(notation.clone(), resolved(&notation));
                for &from in &previous {
                    g.add_edge(from, idx, edge(&notation));
                }
                current.push(idx);
            }
            previous = current;
        }
        let target = g.add_node("target", resolved("lib:target:1.0"));
        for &from in &previous {
            g.add_edge(from, target, edge("lib:target:1.0"));
        }
        g
    }

    fn tree_size(node: &RenderableDependency) -> usize {
        1 + node.children().iter().map(tree_size).sum::<usize>()
    }

    #[test]
    fn fan_in_grows_the_tree_linearly() {
        for layers in [1, 2, 3, 10, 40] {
            let roots = report(&layered_diamonds(layers), "lib:target");
            assert_eq!(roots.len(), 1);
            // Root, its two requesters, then every component's requesters once.
            assert_eq!(tree_size(&roots[0]), 4 * layers + 1, "layers={layers}");
        }
    }

    #[test]
    fn fan_in_renders_each_chain_once() {
        let roots = report(&layered_diamonds(30), "lib:target");
        let text = crate::renderer::GraphRenderer::new(Default::default())
            .render(&roots)
            .into_string();
        assert_eq!(text.matches("runtimeClasspath").count(), 2);
        assert_eq!(text.matches(" (*)").count(), 2 * 29);
        assert!(text.contains("(*) - dependencies omitted (listed previously)"));
    }
}
