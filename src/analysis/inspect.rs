//! Details for a selected node or edge.
//!
//! A node report ranks the raw records that name the node directly three
//! ways: worst tns, worst wns and most connections. Records come from the
//! full record set rather than the filtered one, so the panel still shows
//! why a module matters after a filter hides its edges.

use crate::error::{HierScopeError, Result};
use crate::pipeline::GraphModel;
use crate::types::{Edge, HierarchyNode, RawRecord};
use serde::Serialize;
use std::cmp::Ordering;

/// Rows per ranking in a node report
pub const TOP_RECORDS: usize = 3;

/// Worst records touching one node, ranked per metric
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeReport {
    pub node: HierarchyNode,
    /// Up to [`TOP_RECORDS`] records, lowest tns first
    pub worst_tns: Vec<RawRecord>,
    /// Up to [`TOP_RECORDS`] records, lowest wns first
    pub worst_wns: Vec<RawRecord>,
    /// Up to [`TOP_RECORDS`] records, highest connection count first
    pub most_connections: Vec<RawRecord>,
    /// All records naming the node, before truncation
    pub total_records: usize,
}

/// Endpoints and metrics of one edge
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeReport {
    pub edge: Edge,
    pub source_label: String,
    pub target_label: String,
}

/// Result of inspecting an id
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Inspection {
    Node(NodeReport),
    Edge(EdgeReport),
}

/// Inspect `id` in `model`; node rows are drawn from `records`.
pub fn inspect(model: &GraphModel, records: &[RawRecord], id: &str) -> Result<Inspection> {
    if let Some(node) = model.node(id) {
        return Ok(Inspection::Node(node_report(node, records)));
    }
    if let Some(edge) = model.edge(id) {
        let label = |node_id: &str| {
            model
                .node(node_id)
                .map(|n| n.label.clone())
                .unwrap_or_else(|| node_id.to_string())
        };
        return Ok(Inspection::Edge(EdgeReport {
            source_label: label(&edge.source),
            target_label: label(&edge.target),
            edge: edge.clone(),
        }));
    }
    Err(HierScopeError::UnknownElement(id.to_string()))
}

/// Rankings over records whose `hier` or `connnecting_hier` equals the node id.
pub fn node_report(node: &HierarchyNode, records: &[RawRecord]) -> NodeReport {
    let matching: Vec<&RawRecord> = records
        .iter()
        .filter(|r| r.hier == node.id || r.connnecting_hier == node.id)
        .collect();

    NodeReport {
        node: node.clone(),
        worst_tns: top_by(&matching, |a, b| a.tns.total_cmp(&b.tns)),
        worst_wns: top_by(&matching, |a, b| a.wns.total_cmp(&b.wns)),
        most_connections: top_by(&matching, |a, b| b.connections.cmp(&a.connections)),
        total_records: matching.len(),
    }
}

/// First [`TOP_RECORDS`] under a stable sort, so ties keep record order.
fn top_by<F>(records: &[&RawRecord], compare: F) -> Vec<RawRecord>
where
    F: Fn(&RawRecord, &RawRecord) -> Ordering,
{
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| compare(a, b));
    sorted.into_iter().take(TOP_RECORDS).cloned().collect()
}
