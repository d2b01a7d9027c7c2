//! Diagnostics collected while sanitizing and laying out a graph.
//!
//! A layout pass never panics on malformed input; every anomaly becomes a
//! [`Diagnostic`] with a [`Severity`] and a typed [`DiagnosticKind`].
//! Diagnostics are returned as part of the result value so callers decide
//! whether to log them, surface them in an editor, or ignore them.

use std::fmt;

use serde::Serialize;

/// The severity level of a diagnostic.
///
/// Severity determines how the diagnostic should be handled:
/// - [`Severity::Error`] indicates a fatal issue for the current layout pass
/// - [`Severity::Warning`] indicates a recovered anomaly with a deterministic
///   fallback already applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Severity {
    /// A fatal problem; the layout pass produces no positioned nodes.
    Error,

    /// A non-fatal anomaly; processing continued with a fallback value.
    Warning,
}

impl Severity {
    /// Returns `true` if this is an error severity.
    pub fn is_error(&self) -> bool {
        matches!(self, Severity::Error)
    }

    /// Returns `true` if this is a warning severity.
    pub fn is_warning(&self) -> bool {
        matches!(self, Severity::Warning)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// Typed tags for every anomaly the pipeline can report.
///
/// The stable snake_case code (see [`DiagnosticKind::as_code`]) is part of the
/// public contract so hosts can match on it without string-scraping messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DiagnosticKind {
    /// The node list was empty; layout cannot proceed.
    EmptyGraph,
    /// The node count exceeded the configured ceiling.
    GraphTooLarge,
    /// A node arrived without an identifier; one was generated.
    MissingNodeId,
    /// A node reused an identifier already taken; the later node was dropped.
    DuplicateNodeId,
    /// A node referenced a layer that does not exist; reassigned to the first layer.
    UnknownLayer,
    /// A node or edge weight was non-finite or not positive; reset to 1.
    InvalidWeight,
    /// An edge arrived without an identifier; one was generated.
    MissingEdgeId,
    /// An edge endpoint referenced a missing node; the edge was dropped.
    OrphanedEdge,
    /// The layer list was empty; a single default layer was synthesized.
    DefaultLayerCreated,
    /// A layer was missing its id or name; a positional default was assigned.
    MissingLayerField,
    /// A color string failed to parse; a palette default was used.
    InvalidColor,
    /// A node declared a parent that does not exist; the reference was cleared.
    UnknownParent,
    /// Multiple parent signals disagreed; the higher-precedence one was kept.
    ConflictingParentSignal,
    /// The derived parent relation contained a cycle.
    HierarchyCycle,
}

impl DiagnosticKind {
    /// Returns the stable snake_case code for this kind.
    pub fn as_code(&self) -> &'static str {
        match self {
            DiagnosticKind::EmptyGraph => "empty_graph",
            DiagnosticKind::GraphTooLarge => "graph_too_large",
            DiagnosticKind::MissingNodeId => "missing_node_id",
            DiagnosticKind::DuplicateNodeId => "duplicate_node_id",
            DiagnosticKind::UnknownLayer => "unknown_layer",
            DiagnosticKind::InvalidWeight => "invalid_weight",
            DiagnosticKind::MissingEdgeId => "missing_edge_id",
            DiagnosticKind::OrphanedEdge => "orphaned_edge",
            DiagnosticKind::DefaultLayerCreated => "default_layer_created",
            DiagnosticKind::MissingLayerField => "missing_layer_field",
            DiagnosticKind::InvalidColor => "invalid_color",
            DiagnosticKind::UnknownParent => "unknown_parent",
            DiagnosticKind::ConflictingParentSignal => "conflicting_parent_signal",
            DiagnosticKind::HierarchyCycle => "hierarchy_cycle",
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_code())
    }
}

/// A single structured diagnostic: severity, typed kind, human-readable message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    severity: Severity,
    kind: DiagnosticKind,
    message: String,
}

impl Diagnostic {
    /// Creates an error diagnostic.
    pub fn error(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            kind,
            message: message.into(),
        }
    }

    /// Creates a warning diagnostic.
    pub fn warning(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            kind,
            message: message.into(),
        }
    }

    /// Returns the severity of this diagnostic.
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Returns the typed kind of this diagnostic.
    pub fn kind(&self) -> DiagnosticKind {
        self.kind
    }

    /// Returns the human-readable message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]: {}", self.severity, self.kind, self.message)
    }
}

/// An ordered collection of diagnostics from one layout pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a diagnostic.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        log::debug!(
            severity:% = diagnostic.severity(),
            code = diagnostic.kind().as_code();
            "diagnostic recorded",
        );
        self.items.push(diagnostic);
    }

    /// Appends all diagnostics from `other`, preserving order.
    pub fn extend(&mut self, other: Diagnostics) {
        self.items.extend(other.items);
    }

    /// Returns `true` if any recorded diagnostic is an error.
    pub fn has_errors(&self) -> bool {
        self.items.iter().any(|d| d.severity().is_error())
    }

    /// Iterates over error diagnostics only.
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter().filter(|d| d.severity().is_error())
    }

    /// Iterates over warning diagnostics only.
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter().filter(|d| d.severity().is_warning())
    }

    /// Iterates over all diagnostics in recording order.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    /// Returns the total number of diagnostics.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if no diagnostics were recorded.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}
