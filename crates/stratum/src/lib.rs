//! Stratum - A layout engine that turns labelled graphs into layered 3D
//! treemap scenes.
//!
//! Nodes are grouped by containment, given area-proportional footprints on a
//! ground plane, and lifted onto vertical strata by layer. Malformed input
//! never panics or aborts the pass; anomalies surface as typed diagnostics on
//! the result.

pub mod config;

mod cycles;
mod error;
mod hierarchy;
mod layout;
mod model;
mod validate;

pub use stratum_core::{color, diagnostic, geometry, identifier};

pub use error::StratumError;
pub use model::{GraphEdge, GraphLayer, GraphNode, LayoutResult, PositionedNode};

use log::{debug, info};

use config::LayoutConfig;
use hierarchy::Hierarchy;
use validate::Validator;

/// The graph-to-scene layout engine.
///
/// Runs the full pipeline: input sanitization, hierarchy reconstruction,
/// cycle breaking, planar partitioning, vertical stratification, and camera
/// bounds. The engine is stateless between calls; the same input and
/// configuration always produce the same result.
///
/// # Examples
///
/// ```
/// use stratum::{GraphLayer, GraphNode, LayoutEngine};
///
/// let nodes = vec![
///     GraphNode::new("platform").with_layer("services"),
///     GraphNode::new("billing").with_layer("services").with_parent("platform"),
/// ];
/// let layers = vec![GraphLayer::new("services").with_name("Services")];
///
/// let engine = LayoutEngine::default();
/// let result = engine.layout(&nodes, &[], &layers);
///
/// assert!(result.is_valid());
/// assert_eq!(result.nodes.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct LayoutEngine {
    config: LayoutConfig,
}

impl LayoutEngine {
    /// Creates an engine with the given configuration.
    ///
    /// The configuration is normalized up front, so out-of-range values fall
    /// back to their defaults instead of corrupting the geometry.
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            config: config.normalized(),
        }
    }

    /// Returns the effective (normalized) configuration.
    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Runs one layout pass over the given graph.
    ///
    /// Never fails: fatal problems (an empty or oversized graph) produce a
    /// result with error diagnostics, no positioned nodes, and a zero
    /// bounding box. Check [`LayoutResult::is_valid`] before using the nodes.
    pub fn layout(
        &self,
        nodes: &[GraphNode],
        edges: &[GraphEdge],
        layers: &[GraphLayer],
    ) -> LayoutResult {
        info!(
            nodes_len = nodes.len(),
            edges_len = edges.len(),
            layers_len = layers.len();
            "Starting layout pass",
        );

        let (graph, mut diagnostics) = Validator::run(nodes, edges, layers, &self.config);
        if diagnostics.has_errors() {
            info!(errors = diagnostics.errors().count(); "Layout aborted by validation");
            return LayoutResult::invalid(diagnostics);
        }

        let parents = hierarchy::resolve_parents(&graph, &mut diagnostics);
        let parents = cycles::break_cycles(parents, &mut diagnostics);

        let hierarchy = Hierarchy::build(&graph, &parents);
        debug!("Hierarchy reconstructed");

        let footprints = layout::partition(&hierarchy, &graph, &self.config);
        let positioned = layout::stratify(&hierarchy, &graph, &footprints, &self.config);
        let bounding_box = layout::compute_bounds(&positioned);

        info!(
            positioned = positioned.len(),
            warnings = diagnostics.warnings().count();
            "Layout pass finished",
        );

        LayoutResult {
            nodes: positioned,
            bounding_box,
            diagnostics,
        }
    }
}
