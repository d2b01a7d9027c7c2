//! Input sanitization with typed diagnostics.
//!
//! The validator is the only pipeline stage allowed to raise errors. Every
//! other anomaly receives a deterministic fallback and a warning, so partial
//! or sloppy graphs remain renderable. Once a record passes through here it
//! is never mutated again; downstream stages derive new structures instead.
//!
//! ## Rules applied
//!
//! - **Layers**: an empty list synthesizes one default layer; missing ids,
//!   names, and colors get positional defaults from a built-in palette
//! - **Nodes**: an empty list is fatal; missing ids are generated (error,
//!   processing continues); unknown layers fall back to the first layer;
//!   invalid weights reset to 1; duplicate ids drop the later node
//! - **Edges**: missing ids are generated; edges with a dangling endpoint
//!   are dropped; invalid weights reset to 1
//! - **Ceiling**: node counts above the configured maximum are fatal

use indexmap::IndexMap;
use log::debug;

use stratum_core::{
    color::Color,
    diagnostic::{Diagnostic, DiagnosticKind, Diagnostics},
    identifier::Id,
};

use crate::{
    config::LayoutConfig,
    model::{
        ATTR_BELONGS_TO, ATTR_IS_PARTITION, ATTR_PARENT_ID, ATTR_RELATION, CONTAINMENT_RELATIONS,
        GraphEdge, GraphLayer, GraphNode, ValidatedEdge, ValidatedGraph, ValidatedLayer,
        ValidatedNode,
    },
};

/// Background/text color pairs assigned to layers missing colors,
/// cycled by layer index.
const LAYER_PALETTE: [(&str, &str); 6] = [
    ("#4e79a7", "#ffffff"),
    ("#f28e2b", "#1f1f1f"),
    ("#59a14f", "#ffffff"),
    ("#e15759", "#ffffff"),
    ("#76b7b2", "#1f1f1f"),
    ("#edc948", "#1f1f1f"),
];

/// Sanitizes raw input records into a [`ValidatedGraph`].
pub(crate) struct Validator<'a> {
    config: &'a LayoutConfig,
    diagnostics: Diagnostics,
}

impl<'a> Validator<'a> {
    /// Runs the full validation pass.
    ///
    /// Always returns a graph, even when errors were recorded; callers must
    /// check the diagnostics for errors before using it.
    pub(crate) fn run(
        nodes: &[GraphNode],
        edges: &[GraphEdge],
        layers: &[GraphLayer],
        config: &'a LayoutConfig,
    ) -> (ValidatedGraph, Diagnostics) {
        let mut validator = Self {
            config,
            diagnostics: Diagnostics::new(),
        };

        let layers = validator.validate_layers(layers);
        let (nodes, node_index) = validator.validate_nodes(nodes, &layers);
        if nodes.is_empty() {
            // Fatal: the node pass recorded an error. Skip the edge pass so
            // every edge does not also warn as orphaned.
            let graph = ValidatedGraph {
                layers,
                ..ValidatedGraph::default()
            };
            return (graph, validator.diagnostics);
        }
        let nodes = validator.resolve_parent_refs(nodes, &node_index);
        let edges = validator.validate_edges(edges, &node_index);

        debug!(
            nodes_len = nodes.len(),
            edges_len = edges.len(),
            layers_len = layers.len(),
            diagnostics_len = validator.diagnostics.len();
            "Validation finished",
        );

        let graph = ValidatedGraph {
            nodes,
            edges,
            layers,
            node_index,
        };
        (graph, validator.diagnostics)
    }

    fn warn(&mut self, kind: DiagnosticKind, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic::warning(kind, message));
    }

    fn error(&mut self, kind: DiagnosticKind, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic::error(kind, message));
    }

    fn validate_layers(&mut self, layers: &[GraphLayer]) -> Vec<ValidatedLayer> {
        if layers.is_empty() {
            self.warn(
                DiagnosticKind::DefaultLayerCreated,
                "no layers defined; a single default layer was created",
            );
            return vec![self.default_layer(0)];
        }

        layers
            .iter()
            .enumerate()
            .map(|(index, layer)| self.validate_layer(index, layer))
            .collect()
    }

    fn default_layer(&self, index: usize) -> ValidatedLayer {
        let (background, text) = LAYER_PALETTE[index % LAYER_PALETTE.len()];
        ValidatedLayer {
            id: Id::new(&format!("layer-{index}")),
            background: Color::parse(background).expect("palette colors are valid"),
            text: Color::parse(text).expect("palette colors are valid"),
        }
    }

    fn validate_layer(&mut self, index: usize, layer: &GraphLayer) -> ValidatedLayer {
        let mut missing = Vec::new();

        let id = match layer.id.as_deref() {
            Some(id) if !id.is_empty() => Id::new(id),
            _ => {
                missing.push("id");
                Id::new(&format!("layer-{index}"))
            }
        };

        if !matches!(&layer.name, Some(name) if !name.is_empty()) {
            missing.push("name");
        }

        let (palette_bg, palette_text) = LAYER_PALETTE[index % LAYER_PALETTE.len()];
        let background = self.validate_color(&layer.background_color, palette_bg, index, &mut missing);
        let text = self.validate_color(&layer.text_color, palette_text, index, &mut missing);

        if !missing.is_empty() {
            self.warn(
                DiagnosticKind::MissingLayerField,
                format!(
                    "layer {index} is missing {}; positional defaults assigned",
                    missing.join(", ")
                ),
            );
        }

        ValidatedLayer {
            id,
            background,
            text,
        }
    }

    fn validate_color(
        &mut self,
        value: &Option<String>,
        fallback: &str,
        layer_index: usize,
        missing: &mut Vec<&'static str>,
    ) -> Color {
        match value.as_deref() {
            Some(raw) => match Color::parse(raw) {
                Ok(color) => color,
                Err(err) => {
                    self.warn(
                        DiagnosticKind::InvalidColor,
                        format!("layer {layer_index}: {err}; palette default used"),
                    );
                    Color::parse(fallback).expect("palette colors are valid")
                }
            },
            None => {
                missing.push("colors");
                Color::parse(fallback).expect("palette colors are valid")
            }
        }
    }

    fn validate_nodes(
        &mut self,
        nodes: &[GraphNode],
        layers: &[ValidatedLayer],
    ) -> (Vec<ValidatedNode>, IndexMap<Id, usize>) {
        if nodes.is_empty() {
            self.error(
                DiagnosticKind::EmptyGraph,
                "graph contains no nodes; layout cannot proceed",
            );
            return (Vec::new(), IndexMap::new());
        }

        if nodes.len() > self.config.max_nodes {
            self.error(
                DiagnosticKind::GraphTooLarge,
                format!(
                    "graph has {} nodes, exceeding the configured maximum of {}",
                    nodes.len(),
                    self.config.max_nodes
                ),
            );
            return (Vec::new(), IndexMap::new());
        }

        let layer_index: IndexMap<Id, usize> = layers
            .iter()
            .enumerate()
            .map(|(index, layer)| (layer.id, index))
            .collect();

        let mut validated = Vec::with_capacity(nodes.len());
        let mut node_index = IndexMap::with_capacity(nodes.len());

        for (position, node) in nodes.iter().enumerate() {
            let id = match node.id.as_deref() {
                Some(id) if !id.is_empty() => Id::new(id),
                _ => {
                    let generated = format!("node-{position}");
                    self.error(
                        DiagnosticKind::MissingNodeId,
                        format!("node {position} has no id; generated '{generated}'"),
                    );
                    Id::new(&generated)
                }
            };

            if node_index.contains_key(&id) {
                self.warn(
                    DiagnosticKind::DuplicateNodeId,
                    format!("node id '{id}' is already taken; later node dropped"),
                );
                continue;
            }

            let label = match &node.label {
                Some(label) if !label.is_empty() => label.clone(),
                _ => id.to_string(),
            };

            let layer = match node.layer.as_deref() {
                Some(layer_ref) => match layer_index.get(&Id::new(layer_ref)) {
                    Some(&index) => index,
                    None => {
                        self.warn(
                            DiagnosticKind::UnknownLayer,
                            format!(
                                "node '{id}' references unknown layer '{layer_ref}'; \
                                 reassigned to the first layer"
                            ),
                        );
                        0
                    }
                },
                // An absent layer reference is not an anomaly; the first
                // layer is the documented default.
                None => 0,
            };

            let (weight, weight_provided) = self.validate_weight(node.weight, "node", id);

            let parent = node
                .parent
                .clone()
                .or_else(|| node.attributes.get(ATTR_PARENT_ID).cloned())
                .or_else(|| node.attributes.get(ATTR_BELONGS_TO).cloned());

            let partition_hint = node.partition_hint
                || node
                    .attributes
                    .get(ATTR_IS_PARTITION)
                    .is_some_and(|v| v == "true");

            node_index.insert(id, validated.len());
            validated.push(ValidatedNode {
                id,
                label,
                layer,
                weight,
                weight_provided,
                // Holds the raw reference for now; checked against the full
                // node set in resolve_parent_refs.
                parent: parent.as_deref().map(Id::new),
                partition_hint,
            });
        }

        (validated, node_index)
    }

    /// Clears parent references that do not name an existing node.
    fn resolve_parent_refs(
        &mut self,
        mut nodes: Vec<ValidatedNode>,
        node_index: &IndexMap<Id, usize>,
    ) -> Vec<ValidatedNode> {
        for node in &mut nodes {
            if let Some(parent) = node.parent {
                if !node_index.contains_key(&parent) {
                    self.diagnostics.push(Diagnostic::warning(
                        DiagnosticKind::UnknownParent,
                        format!(
                            "node '{}' declares unknown parent '{parent}'; treated as a root",
                            node.id
                        ),
                    ));
                    node.parent = None;
                }
            }
        }
        nodes
    }

    fn validate_edges(
        &mut self,
        edges: &[GraphEdge],
        node_index: &IndexMap<Id, usize>,
    ) -> Vec<ValidatedEdge> {
        let mut validated = Vec::with_capacity(edges.len());

        for (position, edge) in edges.iter().enumerate() {
            let id = match edge.id.as_deref() {
                Some(id) if !id.is_empty() => Id::new(id),
                _ => {
                    let generated = format!("edge-{position}");
                    self.warn(
                        DiagnosticKind::MissingEdgeId,
                        format!("edge {position} has no id; generated '{generated}'"),
                    );
                    Id::new(&generated)
                }
            };

            let source = Id::new(&edge.source);
            let target = Id::new(&edge.target);
            if !node_index.contains_key(&source) || !node_index.contains_key(&target) {
                self.warn(
                    DiagnosticKind::OrphanedEdge,
                    format!(
                        "edge '{id}' references missing node(s) '{}' -> '{}'; edge dropped",
                        edge.source, edge.target
                    ),
                );
                continue;
            }

            // Edge weights only matter for the invalid-weight warning; the
            // layout itself never reads them.
            self.validate_weight(edge.weight, "edge", id);

            let relation = edge
                .relation
                .clone()
                .or_else(|| edge.attributes.get(ATTR_RELATION).cloned());
            let containment = relation.as_deref().is_some_and(|tag| {
                CONTAINMENT_RELATIONS
                    .iter()
                    .any(|known| tag.eq_ignore_ascii_case(known))
            });

            validated.push(ValidatedEdge {
                id,
                source,
                target,
                containment,
            });
        }

        validated
    }

    /// Returns the effective weight and whether it was validly provided.
    ///
    /// An absent weight is not an anomaly and produces no diagnostic; an
    /// invalid one is reset to 1 with a warning.
    fn validate_weight(&mut self, weight: Option<f64>, entity: &str, id: Id) -> (f64, bool) {
        match weight {
            None => (1.0, false),
            Some(w) if w.is_finite() && w > 0.0 => (w, true),
            Some(w) => {
                self.warn(
                    DiagnosticKind::InvalidWeight,
                    format!("{entity} '{id}' has invalid weight {w}; reset to 1"),
                );
                (1.0, false)
            }
        }
    }
}
