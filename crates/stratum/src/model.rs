//! Input and output records for the layout pipeline.
//!
//! The raw [`GraphNode`]/[`GraphEdge`]/[`GraphLayer`] records mirror whatever
//! an external graph source supplies: every field may be absent or malformed,
//! and the validator assigns deterministic fallbacks. The validated records
//! are the immutable product of that pass; downstream stages never mutate
//! them, they only derive new structures.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use stratum_core::{
    color::Color,
    diagnostic::Diagnostics,
    geometry::{BoundingBox, Point3, Size3},
    identifier::Id,
};

/// Attribute key carrying a legacy parent reference.
pub(crate) const ATTR_PARENT_ID: &str = "parent_id";
/// Alternative attribute key carrying a legacy parent reference.
pub(crate) const ATTR_BELONGS_TO: &str = "belongs_to";
/// Attribute key carrying a legacy partition hint.
pub(crate) const ATTR_IS_PARTITION: &str = "is_partition";
/// Attribute key carrying a legacy relation tag on edges.
pub(crate) const ATTR_RELATION: &str = "relation";

/// Relation tags that mark an edge as a containment signal.
pub(crate) const CONTAINMENT_RELATIONS: [&str; 4] = ["contains", "parent_of", "has", "includes"];

/// A raw graph node as supplied by an external source.
///
/// Only the identifier is conceptually required; everything else has a
/// deterministic fallback. The typed `parent` and `partition_hint` fields are
/// the preferred way to express hierarchy; the free-form `attributes` map is
/// still consulted for the legacy `parent_id`/`belongs_to`/`is_partition`
/// keys and is otherwise passed through untouched as display metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    /// Unique identifier. Auto-generated (with an error diagnostic) if absent.
    #[serde(default)]
    pub id: Option<String>,

    /// Display label; defaults to the identifier.
    #[serde(default)]
    pub label: Option<String>,

    /// Layer reference; reassigned to the first layer if unknown.
    #[serde(default, alias = "layer_id")]
    pub layer: Option<String>,

    /// Relative weight driving the planar footprint; defaults to 1.
    #[serde(default)]
    pub weight: Option<f64>,

    /// Identifier of the parent node, if this node is contained in another.
    #[serde(default, alias = "parent_id", alias = "belongs_to")]
    pub parent: Option<String>,

    /// Marks the node as a container even when it has no children.
    #[serde(default, alias = "is_partition")]
    pub partition_hint: bool,

    /// Residual display metadata, passed through untouched.
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

impl GraphNode {
    /// Creates a node with the given identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    /// Sets the display label (builder style).
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Sets the layer reference (builder style).
    pub fn with_layer(mut self, layer: impl Into<String>) -> Self {
        self.layer = Some(layer.into());
        self
    }

    /// Sets the weight (builder style).
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    /// Sets the parent reference (builder style).
    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Sets the partition hint (builder style).
    pub fn with_partition_hint(mut self, hint: bool) -> Self {
        self.partition_hint = hint;
        self
    }

    /// Adds a free-form attribute (builder style).
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

/// A raw graph edge as supplied by an external source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    /// Unique identifier. Auto-generated (with a warning) if absent.
    #[serde(default)]
    pub id: Option<String>,

    /// Identifier of the source node. Edges with an unknown source are dropped.
    pub source: String,

    /// Identifier of the target node. Edges with an unknown target are dropped.
    pub target: String,

    /// Optional weight; same validation rules as node weights.
    #[serde(default)]
    pub weight: Option<f64>,

    /// Semantic relation tag; `contains`, `parent_of`, `has`, and `includes`
    /// contribute hierarchy when a node has no explicit parent.
    #[serde(default)]
    pub relation: Option<String>,

    /// Residual display metadata, passed through untouched.
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

impl GraphEdge {
    /// Creates an edge between the given node identifiers.
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            id: None,
            source: source.into(),
            target: target.into(),
            weight: None,
            relation: None,
            attributes: BTreeMap::new(),
        }
    }

    /// Sets the identifier (builder style).
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Sets the relation tag (builder style).
    pub fn with_relation(mut self, relation: impl Into<String>) -> Self {
        self.relation = Some(relation.into());
        self
    }

    /// Sets the weight (builder style).
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    /// Adds a free-form attribute (builder style).
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

/// A raw layer definition as supplied by an external source.
///
/// The sequence of layers in the input determines the vertical stratification
/// order: the first layer sits at the bottom stratum.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphLayer {
    /// Unique identifier. Auto-assigned `layer-{index}` if absent.
    #[serde(default)]
    pub id: Option<String>,

    /// Display name. Defaults to `Layer {index}`.
    #[serde(default)]
    pub name: Option<String>,

    /// Background color as a CSS color string.
    #[serde(default)]
    pub background_color: Option<String>,

    /// Text color as a CSS color string.
    #[serde(default)]
    pub text_color: Option<String>,
}

impl GraphLayer {
    /// Creates a layer with the given identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    /// Sets the display name (builder style).
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the background color (builder style).
    pub fn with_background_color(mut self, color: impl Into<String>) -> Self {
        self.background_color = Some(color.into());
        self
    }

    /// Sets the text color (builder style).
    pub fn with_text_color(mut self, color: impl Into<String>) -> Self {
        self.text_color = Some(color.into());
        self
    }
}

/// A node that survived validation. Immutable for the rest of the pass.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ValidatedNode {
    pub(crate) id: Id,
    pub(crate) label: String,
    /// Index into the validated layer list.
    pub(crate) layer: usize,
    pub(crate) weight: f64,
    /// Distinguishes an explicit small weight from the default fallback.
    pub(crate) weight_provided: bool,
    pub(crate) parent: Option<Id>,
    pub(crate) partition_hint: bool,
}

/// An edge that survived validation: both endpoints resolve to known nodes.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ValidatedEdge {
    pub(crate) id: Id,
    pub(crate) source: Id,
    pub(crate) target: Id,
    /// True when the relation tag marks this edge as a hierarchy signal.
    pub(crate) containment: bool,
}

/// A layer that survived validation, with resolved colors.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ValidatedLayer {
    pub(crate) id: Id,
    pub(crate) background: Color,
    pub(crate) text: Color,
}

/// The sanitized graph produced by the validator.
#[derive(Debug, Clone, Default)]
pub(crate) struct ValidatedGraph {
    pub(crate) nodes: Vec<ValidatedNode>,
    pub(crate) edges: Vec<ValidatedEdge>,
    /// Ordered by input sequence; the position is the stratification index.
    pub(crate) layers: Vec<ValidatedLayer>,
    /// Maps node ids to their position in `nodes`, in insertion order.
    pub(crate) node_index: IndexMap<Id, usize>,
}

/// A node with its final 3D placement, ready for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionedNode {
    /// The validated node identifier.
    pub id: Id,

    /// The display label.
    pub label: String,

    /// Center of the node's box; `y` is the vertical (stratification) axis.
    pub center: Point3,

    /// Extents of the node's box; `height` is the vertical extent.
    pub size: Size3,

    /// Identifier of the node's resolved layer.
    pub layer: Id,

    /// Resolved background color, inherited from the layer.
    pub background: Color,

    /// Resolved text color, inherited from the layer.
    pub text_color: Color,

    /// True when the node is rendered as a containing volume.
    pub is_partition: bool,

    /// The effective (validated) weight.
    pub weight: f64,
}

/// The complete result of one layout pass.
///
/// When `diagnostics` contains errors, `nodes` is empty and `bounding_box`
/// is the zero box; callers must check [`LayoutResult::is_valid`] before
/// trusting the positioned nodes.
#[derive(Debug, Clone, Serialize)]
pub struct LayoutResult {
    /// Positioned nodes in deterministic pre-order.
    pub nodes: Vec<PositionedNode>,

    /// The minimal axis-aligned volume enclosing all positioned nodes.
    pub bounding_box: BoundingBox,

    /// All diagnostics recorded during the pass, in pipeline order.
    pub diagnostics: Diagnostics,
}

impl LayoutResult {
    /// Builds the empty result for a failed pass.
    pub(crate) fn invalid(diagnostics: Diagnostics) -> Self {
        Self {
            nodes: Vec::new(),
            bounding_box: BoundingBox::zero(),
            diagnostics,
        }
    }

    /// Returns `true` when the pass produced a usable layout.
    pub fn is_valid(&self) -> bool {
        !self.diagnostics.has_errors()
    }

    /// Returns the warning messages, for hosts that only want strings.
    pub fn warning_messages(&self) -> Vec<String> {
        self.diagnostics
            .warnings()
            .map(|d| d.message().to_owned())
            .collect()
    }

    /// Returns the error messages, for hosts that only want strings.
    pub fn error_messages(&self) -> Vec<String> {
        self.diagnostics
            .errors()
            .map(|d| d.message().to_owned())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_builder() {
        let node = GraphNode::new("api")
            .with_label("API Gateway")
            .with_layer("services")
            .with_weight(2.5)
            .with_parent("platform")
            .with_partition_hint(true)
            .with_attribute("team", "core");

        assert_eq!(node.id.as_deref(), Some("api"));
        assert_eq!(node.label.as_deref(), Some("API Gateway"));
        assert_eq!(node.layer.as_deref(), Some("services"));
        assert_eq!(node.weight, Some(2.5));
        assert_eq!(node.parent.as_deref(), Some("platform"));
        assert!(node.partition_hint);
        assert_eq!(node.attributes.get("team").map(String::as_str), Some("core"));
    }

    #[test]
    fn test_edge_builder() {
        let edge = GraphEdge::new("a", "b").with_id("e1").with_relation("contains");

        assert_eq!(edge.id.as_deref(), Some("e1"));
        assert_eq!(edge.source, "a");
        assert_eq!(edge.target, "b");
        assert_eq!(edge.relation.as_deref(), Some("contains"));
    }

    #[test]
    fn test_node_deserializes_legacy_parent_alias() {
        let node: GraphNode =
            serde_json::from_str(r#"{"id": "svc", "belongs_to": "platform"}"#).unwrap();
        assert_eq!(node.parent.as_deref(), Some("platform"));
    }

    #[test]
    fn test_layout_result_invalid_is_empty() {
        use stratum_core::diagnostic::{Diagnostic, DiagnosticKind, Diagnostics};

        let mut diags = Diagnostics::new();
        diags.push(Diagnostic::error(DiagnosticKind::EmptyGraph, "no nodes"));

        let result = LayoutResult::invalid(diags);
        assert!(!result.is_valid());
        assert!(result.nodes.is_empty());
        assert!(result.bounding_box.is_zero());
        assert_eq!(result.error_messages(), vec!["no nodes".to_owned()]);
    }
}
