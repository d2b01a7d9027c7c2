//! Vertical stratification and camera bounds.
//!
//! Lifts planar footprints into 3D. The vertical axis is `y`: a leaf sits at
//! the altitude of its layer, a containing node spans the altitude range of
//! its descendants. Horizontal placement comes entirely from the partition
//! stage, so moving a node between layers never changes its footprint.

use std::collections::HashMap;

use log::debug;
use petgraph::graph::NodeIndex;

use stratum_core::geometry::{BoundingBox, Point3, Rect, Size3};

use crate::{
    config::LayoutConfig,
    hierarchy::{Hierarchy, Member},
    model::{PositionedNode, ValidatedGraph},
};

/// Vertical extent of a leaf box, as a fraction of the layer spacing.
pub(crate) const LEAF_HEIGHT_FACTOR: f64 = 0.2;

/// Extra vertical slack on a containing volume beyond its descendants'
/// layer range, as a fraction of the layer spacing.
pub(crate) const PARTITION_HEIGHT_SLACK: f64 = 0.5;

/// Lifts every real hierarchy member into 3D, in deterministic pre-order.
pub(crate) fn stratify(
    hierarchy: &Hierarchy,
    graph: &ValidatedGraph,
    footprints: &HashMap<NodeIndex, Rect>,
    config: &LayoutConfig,
) -> Vec<PositionedNode> {
    let ranges = layer_ranges(hierarchy, graph);

    let mut positioned = Vec::with_capacity(graph.nodes.len());
    let mut stack = vec![hierarchy.root()];
    while let Some(index) = stack.pop() {
        if let Member::Real(pos) = hierarchy.member(index) {
            if let Some(&footprint) = footprints.get(&index) {
                positioned.push(position_node(
                    hierarchy, graph, pos, index, footprint, &ranges, config,
                ));
            }
        }
        // Children are pushed reversed so the stack pops them in order.
        for child in hierarchy.children(index).into_iter().rev() {
            stack.push(child);
        }
    }

    debug!(positioned = positioned.len(); "Stratification finished");
    positioned
}

fn position_node(
    hierarchy: &Hierarchy,
    graph: &ValidatedGraph,
    pos: usize,
    index: NodeIndex,
    footprint: Rect,
    ranges: &HashMap<NodeIndex, (usize, usize)>,
    config: &LayoutConfig,
) -> PositionedNode {
    let node = &graph.nodes[pos];
    let layer = &graph.layers[node.layer];
    let spacing = config.layer_spacing;
    let (cx, cz) = footprint.center();

    let is_leaf = hierarchy.is_leaf(index);
    let (altitude, height) = if is_leaf {
        (node.layer as f64 * spacing, LEAF_HEIGHT_FACTOR * spacing)
    } else {
        let (lo, hi) = ranges.get(&index).copied().unwrap_or((node.layer, node.layer));
        let altitude = (lo + hi) as f64 / 2.0 * spacing;
        let height = (hi - lo) as f64 * spacing + PARTITION_HEIGHT_SLACK * spacing;
        (altitude, height)
    };

    PositionedNode {
        id: node.id,
        label: node.label.clone(),
        center: Point3::new(cx, altitude, cz),
        size: Size3::new(footprint.width(), height, footprint.height()),
        layer: layer.id,
        background: layer.background.clone(),
        text_color: layer.text.clone(),
        is_partition: !is_leaf || node.partition_hint,
        weight: node.weight,
    }
}

/// Minimum and maximum layer index among each member's real descendants,
/// inclusive of the member's own layer for real containing nodes.
fn layer_ranges(
    hierarchy: &Hierarchy,
    graph: &ValidatedGraph,
) -> HashMap<NodeIndex, (usize, usize)> {
    let mut ranges: HashMap<NodeIndex, (usize, usize)> = HashMap::new();
    for index in hierarchy.post_order() {
        let range = if hierarchy.is_leaf(index) {
            match hierarchy.member(index) {
                Member::Real(pos) => {
                    let layer = graph.nodes[pos].layer;
                    (layer, layer)
                }
                _ => (0, 0),
            }
        } else {
            // A real containing node contributes its own layer to the span;
            // virtual containers have no layer of their own.
            let seed = match hierarchy.member(index) {
                Member::Real(pos) => {
                    let layer = graph.nodes[pos].layer;
                    (layer, layer)
                }
                _ => (usize::MAX, 0),
            };
            hierarchy
                .children(index)
                .iter()
                .filter_map(|child| ranges.get(child))
                .fold(seed, |(lo, hi), &(child_lo, child_hi)| {
                    (lo.min(child_lo), hi.max(child_hi))
                })
        };
        ranges.insert(index, range);
    }
    ranges
}

/// Folds all positioned boxes into one camera bounding volume.
///
/// An empty layout yields the zero box rather than an error, so hosts can
/// always frame a camera without special-casing failure.
pub(crate) fn compute_bounds(nodes: &[PositionedNode]) -> BoundingBox {
    nodes
        .iter()
        .fold(None, |bounds: Option<BoundingBox>, node| {
            let own = BoundingBox::from_box(node.center, node.size);
            Some(match bounds {
                Some(bounds) => bounds.merge(own),
                None => own,
            })
        })
        .unwrap_or_else(BoundingBox::zero)
}
