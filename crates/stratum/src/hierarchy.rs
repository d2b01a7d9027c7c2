//! Hierarchy reconstruction from parent references and containment edges.
//!
//! Two signals can declare that one node contains another: an explicit parent
//! reference on the child, or a containment-tagged edge from parent to child.
//! The explicit reference wins when they disagree. The merged parent map is
//! then materialized as an arena tree with synthetic grouping nodes so that
//! the partition stage always recurses from a single root.

use indexmap::IndexMap;
use log::{debug, trace};
use petgraph::{
    graph::{DiGraph, NodeIndex},
    visit::DfsPostOrder,
};

use stratum_core::{
    diagnostic::{Diagnostic, DiagnosticKind, Diagnostics},
    identifier::Id,
};

use crate::model::ValidatedGraph;

/// A member of the hierarchy arena.
///
/// Only `Real` members correspond to input nodes; the virtual variants exist
/// so the tree always has a single root and so parentless leaves sharing a
/// layer can be partitioned together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Member {
    /// An input node, referenced by its position in the validated node list.
    Real(usize),
    /// The synthetic root wrapping multiple top-level subtrees.
    Root,
    /// A synthetic group collecting parentless leaves of one layer,
    /// referenced by layer index.
    LayerGroup(usize),
}

/// The reconstructed containment tree.
pub(crate) struct Hierarchy {
    tree: DiGraph<Member, ()>,
    root: NodeIndex,
}

/// Derives the effective parent of every node.
///
/// Explicit parent references are copied as-is. Containment edges fill the
/// gaps: an edge `a -contains-> b` makes `a` the parent of `b` unless `b`
/// already has a different explicit parent, in which case a
/// `conflicting_parent_signal` warning is recorded and the explicit reference
/// is kept. Self-containment is ignored.
pub(crate) fn resolve_parents(
    graph: &ValidatedGraph,
    diagnostics: &mut Diagnostics,
) -> IndexMap<Id, Id> {
    let mut parents: IndexMap<Id, Id> = graph
        .nodes
        .iter()
        .filter_map(|node| node.parent.map(|parent| (node.id, parent)))
        .collect();

    for edge in graph.edges.iter().filter(|e| e.containment) {
        if edge.source == edge.target {
            continue;
        }
        match parents.get(&edge.target) {
            Some(&existing) if existing != edge.source => {
                diagnostics.push(Diagnostic::warning(
                    DiagnosticKind::ConflictingParentSignal,
                    format!(
                        "edge '{}' names '{}' as parent of '{}', but the node declares \
                         parent '{existing}'; the declared parent wins",
                        edge.id, edge.source, edge.target
                    ),
                ));
            }
            Some(_) => {}
            None => {
                parents.insert(edge.target, edge.source);
            }
        }
    }

    debug!(parents_len = parents.len(); "Parent relation resolved");
    parents
}

impl Hierarchy {
    /// Builds the arena tree from the resolved parent map.
    ///
    /// Nodes with a parent attach beneath it; the remaining nodes become
    /// top-level subtrees. When the parent map is empty (no hierarchy signal
    /// anywhere), nodes are instead grouped per layer under synthetic
    /// [`Member::LayerGroup`] containers. When more than one top-level
    /// subtree remains, all of them hang off a synthetic [`Member::Root`]; a
    /// single top-level subtree is used as the root directly.
    ///
    /// The parent map must be acyclic; run cycle breaking first.
    pub(crate) fn build(graph: &ValidatedGraph, parents: &IndexMap<Id, Id>) -> Self {
        let mut tree = DiGraph::new();

        let indices: Vec<NodeIndex> = graph
            .nodes
            .iter()
            .enumerate()
            .map(|(pos, _)| tree.add_node(Member::Real(pos)))
            .collect();

        let mut layer_groups: IndexMap<usize, NodeIndex> = IndexMap::new();
        let mut top_level: Vec<NodeIndex> = Vec::new();
        let group_by_layer = parents.is_empty();

        for (pos, node) in graph.nodes.iter().enumerate() {
            if let Some(parent_pos) = parents
                .get(&node.id)
                .and_then(|parent| graph.node_index.get(parent))
            {
                tree.add_edge(indices[*parent_pos], indices[pos], ());
                continue;
            }

            if group_by_layer {
                let group = *layer_groups.entry(node.layer).or_insert_with(|| {
                    let group = tree.add_node(Member::LayerGroup(node.layer));
                    top_level.push(group);
                    group
                });
                tree.add_edge(group, indices[pos], ());
            } else {
                top_level.push(indices[pos]);
            }
        }

        let root = match top_level.as_slice() {
            [single] => *single,
            _ => {
                let root = tree.add_node(Member::Root);
                for &subtree in &top_level {
                    tree.add_edge(root, subtree, ());
                }
                root
            }
        };

        trace!(
            members = tree.node_count(),
            top_level = top_level.len();
            "Hierarchy arena built",
        );
        Self { tree, root }
    }

    pub(crate) fn root(&self) -> NodeIndex {
        self.root
    }

    pub(crate) fn member(&self, index: NodeIndex) -> Member {
        self.tree[index]
    }

    /// Children of a member, in the insertion order of the input node list.
    pub(crate) fn children(&self, index: NodeIndex) -> Vec<NodeIndex> {
        // petgraph yields neighbors in reverse insertion order.
        let mut children: Vec<NodeIndex> = self.tree.neighbors(index).collect();
        children.reverse();
        children
    }

    pub(crate) fn is_leaf(&self, index: NodeIndex) -> bool {
        self.tree.neighbors(index).next().is_none()
    }

    /// Visits every member bottom-up, so aggregates over children are
    /// complete before their parent is visited.
    pub(crate) fn post_order(&self) -> Vec<NodeIndex> {
        let mut dfs = DfsPostOrder::new(&self.tree, self.root);
        let mut order = Vec::with_capacity(self.tree.node_count());
        while let Some(index) = dfs.next(&self.tree) {
            order.push(index);
        }
        order
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::{
        config::LayoutConfig,
        model::{GraphEdge, GraphLayer, GraphNode},
        validate::Validator,
    };

    fn validated(nodes: Vec<GraphNode>, edges: Vec<GraphEdge>) -> ValidatedGraph {
        let config = LayoutConfig::default();
        let layers = vec![GraphLayer::new("l0"), GraphLayer::new("l1")];
        let (graph, diags) = Validator::run(&nodes, &edges, &layers, &config);
        assert!(!diags.has_errors());
        graph
    }

    #[test]
    fn test_explicit_parent_resolved() {
        let graph = validated(
            vec![GraphNode::new("a"), GraphNode::new("b").with_parent("a")],
            vec![],
        );
        let mut diags = Diagnostics::new();
        let parents = resolve_parents(&graph, &mut diags);

        assert_eq!(parents.get(&Id::new("b")), Some(&Id::new("a")));
        assert!(diags.is_empty());
    }

    #[test]
    fn test_containment_edge_fills_gap() {
        let graph = validated(
            vec![GraphNode::new("a"), GraphNode::new("b")],
            vec![GraphEdge::new("a", "b").with_id("e0").with_relation("contains")],
        );
        let mut diags = Diagnostics::new();
        let parents = resolve_parents(&graph, &mut diags);

        assert_eq!(parents.get(&Id::new("b")), Some(&Id::new("a")));
    }

    #[test]
    fn test_explicit_parent_wins_over_edge() {
        let graph = validated(
            vec![
                GraphNode::new("a"),
                GraphNode::new("c"),
                GraphNode::new("b").with_parent("a"),
            ],
            vec![GraphEdge::new("c", "b").with_id("e0").with_relation("contains")],
        );
        let mut diags = Diagnostics::new();
        let parents = resolve_parents(&graph, &mut diags);

        assert_eq!(parents.get(&Id::new("b")), Some(&Id::new("a")));
        let codes: Vec<_> = diags.iter().map(|d| d.kind().as_code()).collect();
        assert_eq!(codes, vec!["conflicting_parent_signal"]);
    }

    #[test]
    fn test_agreeing_signals_do_not_warn() {
        let graph = validated(
            vec![GraphNode::new("a"), GraphNode::new("b").with_parent("a")],
            vec![GraphEdge::new("a", "b").with_id("e0").with_relation("contains")],
        );
        let mut diags = Diagnostics::new();
        resolve_parents(&graph, &mut diags);

        assert!(diags.is_empty());
    }

    #[test]
    fn test_non_containment_edge_contributes_nothing() {
        let graph = validated(
            vec![GraphNode::new("a"), GraphNode::new("b")],
            vec![GraphEdge::new("a", "b").with_id("e0").with_relation("calls")],
        );
        let mut diags = Diagnostics::new();
        let parents = resolve_parents(&graph, &mut diags);

        assert!(parents.is_empty());
    }

    #[test]
    fn test_single_partition_root_is_used_directly() {
        let graph = validated(
            vec![GraphNode::new("root"), GraphNode::new("leaf").with_parent("root")],
            vec![],
        );
        let mut diags = Diagnostics::new();
        let parents = resolve_parents(&graph, &mut diags);
        let hierarchy = Hierarchy::build(&graph, &parents);

        assert_eq!(hierarchy.member(hierarchy.root()), Member::Real(0));
        let children = hierarchy.children(hierarchy.root());
        assert_eq!(children.len(), 1);
        assert_eq!(hierarchy.member(children[0]), Member::Real(1));
    }

    #[test]
    fn test_parentless_leaves_grouped_by_layer() {
        let graph = validated(
            vec![
                GraphNode::new("a").with_layer("l0"),
                GraphNode::new("b").with_layer("l1"),
                GraphNode::new("c").with_layer("l0"),
            ],
            vec![],
        );
        let hierarchy = Hierarchy::build(&graph, &IndexMap::new());

        assert_eq!(hierarchy.member(hierarchy.root()), Member::Root);
        let groups = hierarchy.children(hierarchy.root());
        assert_eq!(groups.len(), 2);
        assert_eq!(hierarchy.member(groups[0]), Member::LayerGroup(0));
        assert_eq!(hierarchy.member(groups[1]), Member::LayerGroup(1));

        let first_group = hierarchy.children(groups[0]);
        let ids: Vec<_> = first_group
            .iter()
            .map(|&idx| match hierarchy.member(idx) {
                Member::Real(pos) => graph.nodes[pos].id.resolve(),
                other => panic!("unexpected member {other:?}"),
            })
            .collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn test_children_preserve_insertion_order() {
        let graph = validated(
            vec![
                GraphNode::new("root"),
                GraphNode::new("x").with_parent("root"),
                GraphNode::new("y").with_parent("root"),
                GraphNode::new("z").with_parent("root"),
            ],
            vec![],
        );
        let mut diags = Diagnostics::new();
        let parents = resolve_parents(&graph, &mut diags);
        let hierarchy = Hierarchy::build(&graph, &parents);

        let labels: Vec<_> = hierarchy
            .children(hierarchy.root())
            .iter()
            .map(|&idx| match hierarchy.member(idx) {
                Member::Real(pos) => graph.nodes[pos].id.resolve(),
                other => panic!("unexpected member {other:?}"),
            })
            .collect();
        assert_eq!(labels, vec!["x", "y", "z"]);
    }

    #[test]
    fn test_post_order_visits_children_first() {
        let graph = validated(
            vec![GraphNode::new("root"), GraphNode::new("leaf").with_parent("root")],
            vec![],
        );
        let mut diags = Diagnostics::new();
        let parents = resolve_parents(&graph, &mut diags);
        let hierarchy = Hierarchy::build(&graph, &parents);

        let order = hierarchy.post_order();
        assert_eq!(order.len(), 2);
        assert_eq!(hierarchy.member(order[0]), Member::Real(1));
        assert_eq!(hierarchy.member(order[1]), Member::Real(0));
    }

    #[test]
    fn test_layer_grouping_only_without_hierarchy_signal() {
        // One explicit parent disables the per-layer grouping fallback; the
        // unrelated node becomes a top-level subtree instead.
        let graph = validated(
            vec![
                GraphNode::new("root"),
                GraphNode::new("leaf").with_parent("root"),
                GraphNode::new("loner"),
            ],
            vec![],
        );
        let mut diags = Diagnostics::new();
        let parents = resolve_parents(&graph, &mut diags);
        let hierarchy = Hierarchy::build(&graph, &parents);

        assert_eq!(hierarchy.member(hierarchy.root()), Member::Root);
        let top: Vec<Member> = hierarchy
            .children(hierarchy.root())
            .iter()
            .map(|&idx| hierarchy.member(idx))
            .collect();
        assert_eq!(top, vec![Member::Real(0), Member::Real(2)]);
    }
}
