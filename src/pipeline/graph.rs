//! Compound graph model built from timing records.
//!
//! Every record contributes its two endpoint paths. Each path is decomposed
//! and every missing level is materialized as a node, so edges always land on
//! existing nodes and every parent id resolves:
//!
//! ```text
//! hier = top/a, connnecting_hier = top/b, direction = to
//!
//! top              (node)
//! +-- top/a        (node, parent = top)
//! +-- top/b        (node, parent = top)
//! top/a -> top/b   (edge)
//! ```
//!
//! Nodes are stored in a flat `Vec` in first-seen order with a `HashMap`
//! index for O(1) id lookup.

use crate::pipeline::path::HierPath;
use crate::types::{Edge, GraphElement, HierarchyNode, RawRecord, DIRECTION_TO};
use serde::Serialize;
use std::collections::HashMap;

/// Deduplicated nodes and directional edges for one record set.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GraphModel {
    nodes: Vec<HierarchyNode>,
    edges: Vec<Edge>,
    #[serde(skip)]
    node_index: HashMap<String, usize>,
    #[serde(skip)]
    edge_index: HashMap<String, usize>,
    /// Records dropped because an endpoint path was blank
    skipped_records: usize,
}

impl GraphModel {
    /// Build the model for `records` in one pass.
    pub fn from_records(records: &[RawRecord]) -> Self {
        let mut builder = GraphModelBuilder::new();
        for record in records {
            builder.add_record(record);
        }
        builder.build()
    }

    pub fn nodes(&self) -> &[HierarchyNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    pub fn skipped_records(&self) -> usize {
        self.skipped_records
    }

    /// Look up a node by id (O(1) HashMap).
    pub fn node(&self, id: &str) -> Option<&HierarchyNode> {
        self.node_index.get(id).map(|&i| &self.nodes[i])
    }

    /// Look up an edge by id (O(1) HashMap).
    pub fn edge(&self, id: &str) -> Option<&Edge> {
        self.edge_index.get(id).map(|&i| &self.edges[i])
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.node_index.contains_key(id)
    }

    /// Direct children of `id`, in insertion order.
    pub fn children(&self, id: &str) -> impl Iterator<Item = &HierarchyNode> {
        let id = id.to_string();
        self.nodes
            .iter()
            .filter(move |n| n.parent_id.as_deref() == Some(id.as_str()))
    }

    /// Nodes that have at least one child.
    pub fn compound_nodes(&self) -> impl Iterator<Item = &HierarchyNode> {
        self.nodes
            .iter()
            .filter(move |n| self.children(&n.id).next().is_some())
    }

    /// Edges with `id` as source or target.
    pub fn incident_edges<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges
            .iter()
            .filter(move |e| e.source == id || e.target == id)
    }

    /// Combined element list for the renderer: all nodes, then all edges.
    pub fn elements(&self) -> Vec<GraphElement> {
        self.nodes
            .iter()
            .cloned()
            .map(GraphElement::Node)
            .chain(self.edges.iter().cloned().map(GraphElement::Edge))
            .collect()
    }
}

/// Incremental builder behind [`GraphModel::from_records`].
#[derive(Debug, Default)]
pub struct GraphModelBuilder {
    model: GraphModel,
    /// Occurrences per resolved `source->target` pair, for unique edge ids
    pair_counts: HashMap<String, usize>,
    /// Directions that are neither "to" nor "from"
    unrecognized_directions: usize,
}

impl GraphModelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one record. Records with a blank endpoint are counted and skipped.
    pub fn add_record(&mut self, record: &RawRecord) {
        let (Some(hier), Some(connecting)) = (
            HierPath::parse(&record.hier),
            HierPath::parse(&record.connnecting_hier),
        ) else {
            self.model.skipped_records += 1;
            return;
        };

        let hier_id = self.materialize(&hier);
        let connecting_id = self.materialize(&connecting);

        if record.direction != DIRECTION_TO && record.direction != "from" {
            self.unrecognized_directions += 1;
        }

        let (source, target) = if record.points_forward() {
            (hier_id, connecting_id)
        } else {
            (connecting_id, hier_id)
        };

        let internal = hier.is_ancestor_of(&connecting) || connecting.is_ancestor_of(&hier);
        let id = self.next_edge_id(&source, &target);

        let edge = Edge {
            id: id.clone(),
            source,
            target,
            connections: record.connections,
            wns: record.wns,
            tns: record.tns,
            internal,
            violation: record.wns < 0.0,
        };
        self.model.edge_index.insert(id, self.model.edges.len());
        self.model.edges.push(edge);
    }

    /// Finish the build.
    pub fn build(self) -> GraphModel {
        if self.unrecognized_directions > 0 {
            tracing::debug!(
                "{} record(s) had a direction other than \"to\"/\"from\"; treated as reversed",
                self.unrecognized_directions
            );
        }
        tracing::debug!(
            nodes = self.model.nodes.len(),
            edges = self.model.edges.len(),
            skipped = self.model.skipped_records,
            "Built graph model"
        );
        self.model
    }

    /// Create every missing level of `path`; returns the leaf id.
    fn materialize(&mut self, path: &HierPath) -> String {
        let ids = path.ids();
        for (i, id) in ids.iter().enumerate() {
            if self.model.node_index.contains_key(id) {
                continue;
            }
            let parent_id = if i > 0 { Some(ids[i - 1].clone()) } else { None };
            let node = HierarchyNode::new(id.clone(), path.segments()[i].clone(), parent_id);
            self.model.node_index.insert(id.clone(), self.model.nodes.len());
            self.model.nodes.push(node);
        }
        ids.last().cloned().unwrap_or_default()
    }

    /// `source->target`, with `#n` appended for the n-th repeat of a pair.
    ///
    /// Paths may themselves contain `#` or `->`, so a candidate already used
    /// by another edge is skipped.
    fn next_edge_id(&mut self, source: &str, target: &str) -> String {
        let base = format!("{}->{}", source, target);
        let seen = self.pair_counts.entry(base.clone()).or_insert(0);
        loop {
            let id = if *seen == 0 {
                base.clone()
            } else {
                format!("{}#{}", base, seen)
            };
            *seen += 1;
            if !self.model.edge_index.contains_key(&id) {
                return id;
            }
        }
    }
}
