//! Area-proportional planar partitioning.
//!
//! Every hierarchy member receives a rectangular footprint on the ground
//! plane whose area is proportional to its aggregated weight within its
//! siblings. Footprints are produced by the squarified treemap algorithm
//! (Bruls, Huizing, van Wijk), which keeps aspect ratios close to 1 so leaf
//! boxes stay readable instead of degenerating into slivers.

use std::collections::HashMap;

use log::debug;
use petgraph::graph::NodeIndex;

use stratum_core::geometry::Rect;

use crate::{
    config::LayoutConfig,
    hierarchy::{Hierarchy, Member},
    model::ValidatedGraph,
};

/// Leaf footprints shrink by this factor inside a containing partition so
/// the parent volume stays visible around them.
pub(crate) const LEAF_SHRINK_FACTOR: f64 = 0.85;

/// Computes the planar footprint of every hierarchy member.
///
/// The canvas is a square of the configured size centered on the origin.
/// Child cells are inset by the partition padding, and leaves directly inside
/// a containing node additionally shrink by [`LEAF_SHRINK_FACTOR`].
pub(crate) fn partition(
    hierarchy: &Hierarchy,
    graph: &ValidatedGraph,
    config: &LayoutConfig,
) -> HashMap<NodeIndex, Rect> {
    let values = member_values(hierarchy, graph);

    let half = config.canvas_size / 2.0;
    let canvas = Rect::new(-half, -half, half, half);

    let mut partitioner = Partitioner {
        hierarchy,
        config,
        values,
        footprints: HashMap::new(),
    };
    partitioner.subdivide(hierarchy.root(), canvas, true);

    debug!(
        footprints = partitioner.footprints.len(),
        canvas_size = config.canvas_size;
        "Planar partitioning finished",
    );
    partitioner.footprints
}

/// Aggregates weights bottom-up: a leaf carries its own weight, an interior
/// member the sum of its children.
fn member_values(hierarchy: &Hierarchy, graph: &ValidatedGraph) -> HashMap<NodeIndex, f64> {
    let mut values = HashMap::new();
    for index in hierarchy.post_order() {
        let value = if hierarchy.is_leaf(index) {
            match hierarchy.member(index) {
                Member::Real(pos) => graph.nodes[pos].weight,
                _ => 0.0,
            }
        } else {
            hierarchy
                .children(index)
                .iter()
                .map(|child| values.get(child).copied().unwrap_or(0.0))
                .sum()
        };
        values.insert(index, value);
    }
    values
}

struct Partitioner<'a> {
    hierarchy: &'a Hierarchy,
    config: &'a LayoutConfig,
    values: HashMap<NodeIndex, f64>,
    footprints: HashMap<NodeIndex, Rect>,
}

impl Partitioner<'_> {
    fn subdivide(&mut self, index: NodeIndex, rect: Rect, is_root: bool) {
        self.footprints.insert(index, rect);

        let children = self.hierarchy.children(index);
        if children.is_empty() {
            return;
        }

        let mut inner = rect;
        if is_root {
            inner = inner.inset(self.config.partition_padding);
        }
        if matches!(self.hierarchy.member(index), Member::Real(_)) {
            // Headroom for the containing node's own label.
            inner = inner.inset_top(self.config.label_padding);
        }

        // Larger members first keeps the squarified rows well-balanced.
        // The sort is stable, so equal weights retain input order.
        let mut ordered: Vec<(NodeIndex, f64)> = children
            .iter()
            .map(|&child| (child, self.values.get(&child).copied().unwrap_or(0.0)))
            .collect();
        ordered.sort_by(|a, b| b.1.total_cmp(&a.1));

        let total: f64 = ordered.iter().map(|(_, value)| value).sum();
        let areas: Vec<f64> = if total > 0.0 {
            ordered
                .iter()
                .map(|(_, value)| value / total * inner.area())
                .collect()
        } else {
            vec![inner.area() / ordered.len() as f64; ordered.len()]
        };

        let cells = squarify(&areas, inner);
        let parent_is_container = matches!(self.hierarchy.member(index), Member::Real(_));

        for ((child, _), cell) in ordered.into_iter().zip(cells) {
            let mut cell = cell.inset(self.config.partition_padding);
            if self.hierarchy.is_leaf(child) {
                if parent_is_container {
                    cell = cell.scale_about_center(LEAF_SHRINK_FACTOR);
                }
                self.footprints.insert(child, cell);
            } else {
                self.subdivide(child, cell, false);
            }
        }
    }
}

/// Tiles `rect` with one cell per entry of `areas`, in order.
///
/// Areas are expected in descending order and must sum to the rectangle's
/// area. Rows are laid along the shorter side of the remaining space; the
/// last cell of each row and the last row itself absorb floating-point
/// remainders so the tiling is exact.
fn squarify(areas: &[f64], rect: Rect) -> Vec<Rect> {
    let count = areas.len();
    let mut cells = vec![Rect::default(); count];
    let mut remaining = rect;
    let mut start = 0;

    while start < count {
        let side = remaining.width().min(remaining.height());

        // Grow the row while doing so improves its worst aspect ratio.
        let mut end = start + 1;
        let mut sum = areas[start];
        let mut lo = areas[start];
        let mut hi = areas[start];
        while end < count {
            let area = areas[end];
            let grown = worst_aspect(lo.min(area), hi.max(area), sum + area, side);
            if grown > worst_aspect(lo, hi, sum, side) {
                break;
            }
            sum += area;
            lo = lo.min(area);
            hi = hi.max(area);
            end += 1;
        }

        let is_last_row = end == count;
        if remaining.width() >= remaining.height() {
            // Vertical row on the left edge.
            let thickness = if is_last_row {
                remaining.width()
            } else {
                ratio(sum, side)
            };
            let x1 = remaining.min_x() + thickness;
            let mut y = remaining.min_y();
            for (offset, &area) in areas[start..end].iter().enumerate() {
                let y1 = if start + offset == end - 1 {
                    remaining.max_y()
                } else {
                    y + ratio(area, sum) * side
                };
                cells[start + offset] = Rect::new(remaining.min_x(), y, x1, y1);
                y = y1;
            }
            remaining = Rect::new(x1, remaining.min_y(), remaining.max_x(), remaining.max_y());
        } else {
            // Horizontal row on the bottom edge.
            let thickness = if is_last_row {
                remaining.height()
            } else {
                ratio(sum, side)
            };
            let y1 = remaining.min_y() + thickness;
            let mut x = remaining.min_x();
            for (offset, &area) in areas[start..end].iter().enumerate() {
                let x1 = if start + offset == end - 1 {
                    remaining.max_x()
                } else {
                    x + ratio(area, sum) * side
                };
                cells[start + offset] = Rect::new(x, remaining.min_y(), x1, y1);
                x = x1;
            }
            remaining = Rect::new(remaining.min_x(), y1, remaining.max_x(), remaining.max_y());
        }

        start = end;
    }

    cells
}

/// Worst aspect ratio among a row's cells, per the squarified treemap paper.
fn worst_aspect(lo: f64, hi: f64, sum: f64, side: f64) -> f64 {
    if lo <= 0.0 || sum <= 0.0 || side <= 0.0 {
        return f64::INFINITY;
    }
    let side_sq = side * side;
    let sum_sq = sum * sum;
    (side_sq * hi / sum_sq).max(sum_sq / (side_sq * lo))
}

/// Division that treats a degenerate denominator as zero instead of NaN.
fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;
    use indexmap::IndexMap;
    use proptest::prelude::*;

    use super::*;
    use crate::{
        hierarchy::resolve_parents,
        model::{GraphLayer, GraphNode},
        validate::Validator,
    };
    use stratum_core::diagnostic::Diagnostics;

    fn layout_fixture(
        nodes: Vec<GraphNode>,
        config: &LayoutConfig,
    ) -> (ValidatedGraph, Hierarchy, HashMap<NodeIndex, Rect>) {
        let layers = vec![GraphLayer::new("l0")];
        let (graph, diags) = Validator::run(&nodes, &[], &layers, config);
        assert!(!diags.has_errors());
        let mut diags = Diagnostics::new();
        let parents = resolve_parents(&graph, &mut diags);
        let hierarchy = Hierarchy::build(&graph, &parents);
        let footprints = partition(&hierarchy, &graph, config);
        (graph, hierarchy, footprints)
    }

    fn leaf_rects(
        hierarchy: &Hierarchy,
        footprints: &HashMap<NodeIndex, Rect>,
    ) -> Vec<Rect> {
        hierarchy
            .post_order()
            .into_iter()
            .filter(|&idx| {
                hierarchy.is_leaf(idx) && matches!(hierarchy.member(idx), Member::Real(_))
            })
            .map(|idx| footprints[&idx])
            .collect()
    }

    #[test]
    fn test_squarify_single_area_fills_rect() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        let cells = squarify(&[100.0], rect);

        assert_eq!(cells, vec![rect]);
    }

    #[test]
    fn test_squarify_equal_areas_tile_exactly() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        let cells = squarify(&[25.0; 4], rect);

        let total: f64 = cells.iter().map(|c| c.area()).sum();
        assert_approx_eq!(f64, total, 100.0, epsilon = 1e-9);
        for cell in &cells {
            assert!(rect.contains(*cell));
        }
        for (i, a) in cells.iter().enumerate() {
            for b in &cells[i + 1..] {
                assert!(!a.intersects(*b));
            }
        }
    }

    #[test]
    fn test_squarify_keeps_aspect_ratios_reasonable() {
        // The classic example from the squarified treemap paper.
        let rect = Rect::new(0.0, 0.0, 6.0, 4.0);
        let cells = squarify(&[6.0, 6.0, 4.0, 3.0, 2.0, 2.0, 1.0], rect);

        for cell in &cells {
            let aspect = (cell.width() / cell.height()).max(cell.height() / cell.width());
            assert!(aspect <= 4.0 + 1e-9, "aspect {aspect} too extreme");
        }
    }

    #[test]
    fn test_squarify_preserves_area_proportions() {
        let rect = Rect::new(0.0, 0.0, 12.0, 8.0);
        let areas = [48.0, 24.0, 12.0, 12.0];
        let cells = squarify(&areas, rect);

        for (cell, &expected) in cells.iter().zip(&areas) {
            assert_approx_eq!(f64, cell.area(), expected, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_partition_flat_leaves_share_canvas() {
        let config = LayoutConfig {
            canvas_size: 200.0,
            partition_padding: 0.0,
            ..LayoutConfig::default()
        };
        let (_, hierarchy, footprints) = layout_fixture(
            vec![
                GraphNode::new("a"),
                GraphNode::new("b"),
                GraphNode::new("c"),
            ],
            &config,
        );

        let rects = leaf_rects(&hierarchy, &footprints);
        assert_eq!(rects.len(), 3);

        let total: f64 = rects.iter().map(|r| r.area()).sum();
        assert_approx_eq!(f64, total, 200.0 * 200.0, epsilon = 1e-6);
        for (i, a) in rects.iter().enumerate() {
            for b in &rects[i + 1..] {
                assert!(!a.intersects(*b));
            }
        }
    }

    #[test]
    fn test_partition_weight_drives_area() {
        let config = LayoutConfig {
            partition_padding: 0.0,
            ..LayoutConfig::default()
        };
        let (graph, hierarchy, footprints) = layout_fixture(
            vec![
                GraphNode::new("heavy").with_weight(3.0),
                GraphNode::new("light").with_weight(1.0),
            ],
            &config,
        );

        let heavy = hierarchy
            .post_order()
            .into_iter()
            .find(|&idx| match hierarchy.member(idx) {
                Member::Real(pos) => graph.nodes[pos].id == "heavy",
                _ => false,
            })
            .unwrap();
        let light = hierarchy
            .post_order()
            .into_iter()
            .find(|&idx| match hierarchy.member(idx) {
                Member::Real(pos) => graph.nodes[pos].id == "light",
                _ => false,
            })
            .unwrap();

        let ratio = footprints[&heavy].area() / footprints[&light].area();
        assert_approx_eq!(f64, ratio, 3.0, epsilon = 1e-6);
    }

    #[test]
    fn test_leaf_inside_container_shrinks() {
        let config = LayoutConfig {
            canvas_size: 100.0,
            partition_padding: 0.0,
            label_padding: 0.0,
            ..LayoutConfig::default()
        };
        let (_, hierarchy, footprints) = layout_fixture(
            vec![GraphNode::new("box"), GraphNode::new("leaf").with_parent("box")],
            &config,
        );

        let rects = leaf_rects(&hierarchy, &footprints);
        assert_eq!(rects.len(), 1);
        let expected = 100.0 * 100.0 * LEAF_SHRINK_FACTOR * LEAF_SHRINK_FACTOR;
        assert_approx_eq!(f64, rects[0].area(), expected, epsilon = 1e-6);
    }

    #[test]
    fn test_children_stay_inside_parent_footprint() {
        let config = LayoutConfig::default();
        let (_, hierarchy, footprints) = layout_fixture(
            vec![
                GraphNode::new("platform"),
                GraphNode::new("api").with_parent("platform").with_weight(2.0),
                GraphNode::new("db").with_parent("platform"),
            ],
            &config,
        );

        let parent = footprints[&hierarchy.root()];
        for rect in leaf_rects(&hierarchy, &footprints) {
            assert!(parent.contains(rect));
        }
    }

    #[test]
    fn test_empty_hierarchy_yields_root_only() {
        let graph = ValidatedGraph::default();
        let hierarchy = Hierarchy::build(&graph, &IndexMap::new());
        let config = LayoutConfig::default();
        let footprints = partition(&hierarchy, &graph, &config);

        assert_eq!(footprints.len(), 1);
    }

    proptest! {
        #[test]
        fn squarify_conserves_total_area(
            areas in proptest::collection::vec(0.1..100.0f64, 1..12),
        ) {
            let mut sorted = areas.clone();
            sorted.sort_by(|a, b| b.total_cmp(a));
            let total: f64 = sorted.iter().sum();
            // Scale so the areas exactly tile a 50x50 square.
            let scale = 2500.0 / total;
            let scaled: Vec<f64> = sorted.iter().map(|a| a * scale).collect();

            let rect = Rect::new(0.0, 0.0, 50.0, 50.0);
            let cells = squarify(&scaled, rect);
            let covered: f64 = cells.iter().map(|c| c.area()).sum();

            prop_assert!((covered - 2500.0).abs() < 1e-6);
            for cell in &cells {
                prop_assert!(rect.contains(*cell));
            }
        }
    }
}
