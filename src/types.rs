//! Core data types for hierscope
//!
//! This module contains the fundamental data structures used throughout
//! the crate for representing timing records and the graph derived from them.
//!
//! # Main Types
//!
//! - [`RawRecord`] - One row of the timing export (two paths plus metrics)
//! - [`HierarchyNode`] - A module in the hierarchy, identified by its full path
//! - [`Edge`] - A directed connection between two modules with its metrics
//! - [`GraphElement`] - Tagged node-or-edge entry handed to the renderer
//! - [`TreeEntry`] - One entry of the navigable hierarchy forest
//! - [`ViewMode`] - Which metric drives the edge styling
//!
//! # Units
//!
//! `wns` and `tns` are slack values in nanoseconds. Negative slack is a timing
//! violation; zero or positive slack is "no violation".

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Separator between hierarchy path segments
pub const PATH_SEPARATOR: char = '/';

/// The only `direction` value with a defined meaning
pub const DIRECTION_TO: &str = "to";

/// One row of the timing/connectivity export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RawRecord {
    /// Hierarchical path of the reporting module
    pub hier: String,
    /// Hierarchical path of the module on the other end.
    ///
    /// The triple `n` matches the column name produced by the timing tools.
    pub connnecting_hier: String,
    /// Number of connections between the two modules
    pub connections: u64,
    /// Worst negative slack (ns)
    pub wns: f64,
    /// Total negative slack (ns)
    pub tns: f64,
    /// Direction of the connection relative to `hier`; only `"to"` is meaningful
    pub direction: String,
}

impl RawRecord {
    /// Create a record with zero metrics and an empty direction
    pub fn new(hier: impl Into<String>, connnecting_hier: impl Into<String>) -> Self {
        Self {
            hier: hier.into(),
            connnecting_hier: connnecting_hier.into(),
            ..Default::default()
        }
    }

    /// Set the connection count
    pub fn with_connections(mut self, connections: u64) -> Self {
        self.connections = connections;
        self
    }

    /// Set worst and total negative slack
    pub fn with_slack(mut self, wns: f64, tns: f64) -> Self {
        self.wns = wns;
        self.tns = tns;
        self
    }

    /// Set the direction string
    pub fn with_direction(mut self, direction: impl Into<String>) -> Self {
        self.direction = direction.into();
        self
    }

    /// Both endpoint paths are present (non-blank)
    pub fn has_endpoints(&self) -> bool {
        !self.hier.trim().is_empty() && !self.connnecting_hier.trim().is_empty()
    }

    /// Whether the record runs from `hier` to `connnecting_hier`
    pub fn points_forward(&self) -> bool {
        self.direction == DIRECTION_TO
    }

    /// Value of the given metric for this record
    pub fn metric(&self, mode: ViewMode) -> f64 {
        match mode {
            ViewMode::Wns => self.wns,
            ViewMode::Tns => self.tns,
            ViewMode::Connections => self.connections as f64,
        }
    }
}

/// A module in the hierarchy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchyNode {
    /// Full slash-joined path, unique per build
    pub id: String,
    /// Last path segment
    pub label: String,
    /// Id of the enclosing module (None for top-level modules)
    #[serde(rename = "parent", skip_serializing_if = "Option::is_none", default)]
    pub parent_id: Option<String>,
}

impl HierarchyNode {
    pub fn new(id: impl Into<String>, label: impl Into<String>, parent_id: Option<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            parent_id,
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// A directed connection between two modules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// Derived from the resolved endpoints, e.g. `"top/a->top/b"`
    pub id: String,
    /// Source node id
    pub source: String,
    /// Target node id
    pub target: String,
    /// Number of connections
    pub connections: u64,
    /// Worst negative slack (ns)
    pub wns: f64,
    /// Total negative slack (ns)
    pub tns: f64,
    /// One endpoint is a strict ancestor of the other
    pub internal: bool,
    /// `wns < 0`
    pub violation: bool,
}

impl Edge {
    /// Value of the given metric on this edge
    pub fn metric(&self, mode: ViewMode) -> f64 {
        match mode {
            ViewMode::Wns => self.wns,
            ViewMode::Tns => self.tns,
            ViewMode::Connections => self.connections as f64,
        }
    }
}

/// Node or edge entry in the combined element list.
///
/// The variant is decided once when the model is built so consumers never
/// have to probe for `source`/`target` fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "group", content = "data")]
pub enum GraphElement {
    #[serde(rename = "nodes")]
    Node(HierarchyNode),
    #[serde(rename = "edges")]
    Edge(Edge),
}

impl GraphElement {
    /// Id of the wrapped node or edge
    pub fn id(&self) -> &str {
        match self {
            GraphElement::Node(node) => &node.id,
            GraphElement::Edge(edge) => &edge.id,
        }
    }

    pub fn as_node(&self) -> Option<&HierarchyNode> {
        match self {
            GraphElement::Node(node) => Some(node),
            GraphElement::Edge(_) => None,
        }
    }

    pub fn as_edge(&self) -> Option<&Edge> {
        match self {
            GraphElement::Edge(edge) => Some(edge),
            GraphElement::Node(_) => None,
        }
    }
}

/// One entry of the hierarchy forest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeEntry {
    /// Node id
    pub key: String,
    /// Node label
    pub title: String,
    /// Child entries in node insertion order
    pub children: Vec<TreeEntry>,
}

impl TreeEntry {
    pub fn leaf(key: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
            children: Vec::new(),
        }
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Depth-first search for the entry with the given key
    pub fn find(&self, key: &str) -> Option<&TreeEntry> {
        if self.key == key {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(key))
    }

    /// Keys of every entry below this one, depth-first pre-order
    pub fn descendant_keys(&self) -> Vec<&str> {
        let mut keys = Vec::new();
        self.collect_descendants(&mut keys);
        keys
    }

    fn collect_descendants<'a>(&'a self, out: &mut Vec<&'a str>) {
        for child in &self.children {
            out.push(&child.key);
            child.collect_descendants(out);
        }
    }

    /// Number of levels in this subtree (1 for a leaf)
    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(TreeEntry::depth).max().unwrap_or(0)
    }

    /// Total number of entries in this subtree, including itself
    pub fn len(&self) -> usize {
        1 + self.children.iter().map(TreeEntry::len).sum::<usize>()
    }
}

/// Metric selected for edge color, width and label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// Worst negative slack
    #[default]
    Wns,
    /// Total negative slack
    Tns,
    /// Connection count
    Connections,
}

impl ViewMode {
    /// Get all view modes
    pub fn all() -> &'static [ViewMode] {
        &[ViewMode::Wns, ViewMode::Tns, ViewMode::Connections]
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            ViewMode::Wns => "WNS",
            ViewMode::Tns => "TNS",
            ViewMode::Connections => "Conn",
        }
    }

    /// Field name as used in records and edge data
    pub fn field_name(&self) -> &'static str {
        match self {
            ViewMode::Wns => "wns",
            ViewMode::Tns => "tns",
            ViewMode::Connections => "connections",
        }
    }

    /// Slack modes split edges into violating and non-violating groups
    pub fn is_slack(&self) -> bool {
        matches!(self, ViewMode::Wns | ViewMode::Tns)
    }
}

impl std::fmt::Display for ViewMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.field_name())
    }
}

impl FromStr for ViewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "wns" => Ok(ViewMode::Wns),
            "tns" => Ok(ViewMode::Tns),
            "connections" | "conn" => Ok(ViewMode::Connections),
            other => Err(format!(
                "unknown view mode '{}', expected one of: wns, tns, connections",
                other
            )),
        }
    }
}
