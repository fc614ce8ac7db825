//! Record-to-graph pipeline.
//!
//! Every stage is a pure function of its inputs. A run takes the complete
//! record set plus a filter configuration and produces one immutable
//! [`Snapshot`]:
//!
//! ```text
//!                ┌──► [Stats] ─────────────────────────────► global_stats
//! [records] ─────┤
//!                └──► [Filter] ──► filtered ─┬──► [Stats] ──► filtered_stats
//!                                            └──► [GraphModel] ──► [Tree]
//! ```
//!
//! # Design
//!
//! - **No incremental updates**: each trigger builds a brand-new snapshot.
//! - **Shared, never mutated**: snapshots are handed out as `Arc<Snapshot>`.
//! - **Revisioned**: the revision lets consumers drop stale results.

pub mod filter;
pub mod graph;
pub mod path;
pub mod stats;
pub mod tree;

pub use filter::FilterConfig;
pub use graph::{GraphModel, GraphModelBuilder};
pub use path::{decompose, is_ancestor, is_internal_pair, HierPath};
pub use stats::{Stats, StatsAccumulator};

use crate::types::{RawRecord, TreeEntry};
use serde::Serialize;

/// Result of one pipeline run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Snapshot {
    /// Monotonic counter assigned by the session; 0 for the empty snapshot
    pub revision: u64,
    /// Filter that produced this snapshot
    pub filter: FilterConfig,
    /// Nodes and edges of the filtered records
    pub model: GraphModel,
    /// Navigation forest over `model`'s nodes
    pub tree: Vec<TreeEntry>,
    /// Bounds over every loaded record
    pub global_stats: Stats,
    /// Bounds over the filtered records
    pub filtered_stats: Stats,
    /// Number of loaded records
    pub record_count: usize,
    /// Number of records that passed the filter
    pub filtered_count: usize,
}

impl Snapshot {
    /// Run every stage over `records`.
    pub fn build(records: &[RawRecord], filter: &FilterConfig, revision: u64) -> Self {
        let global_stats = Stats::compute(records);
        let filtered = filter.apply(records);
        let filtered_stats = Stats::compute(&filtered);
        let model = GraphModel::from_records(&filtered);
        let tree = tree::project(model.nodes());

        tracing::debug!(
            revision,
            records = records.len(),
            filtered = filtered.len(),
            nodes = model.node_count(),
            edges = model.edge_count(),
            "Built snapshot"
        );

        Self {
            revision,
            filter: *filter,
            model,
            tree,
            global_stats,
            filtered_stats,
            record_count: records.len(),
            filtered_count: filtered.len(),
        }
    }

    /// Nothing loaded yet.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.model.is_empty()
    }

    /// Records the graph builder dropped for a blank endpoint
    pub fn skipped_records(&self) -> usize {
        self.model.skipped_records()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_stages() {
        let records = vec![
            RawRecord::new("top/a", "top/b")
                .with_connections(5)
                .with_slack(-2.5, -10.0)
                .with_direction("to"),
            RawRecord::new("top/c", "top/b").with_connections(40).with_slack(0.5, 0.0),
        ];
        let snapshot = Snapshot::build(&records, &FilterConfig::default(), 1);

        assert_eq!(snapshot.revision, 1);
        assert_eq!(snapshot.record_count, 2);
        assert_eq!(snapshot.filtered_count, 1);
        assert_eq!(snapshot.global_stats.max_connections, 40);
        assert_eq!(snapshot.filtered_stats.max_connections, 5);
        assert_eq!(snapshot.filtered_stats.min_wns, -2.5);
        assert_eq!(snapshot.model.node_count(), 3);
        assert_eq!(snapshot.tree.len(), 1);
    }

    #[test]
    fn test_empty_filtered_set_is_valid() {
        let records = vec![RawRecord::new("a", "b").with_slack(1.0, 1.0)];
        let snapshot = Snapshot::build(&records, &FilterConfig::default(), 3);

        assert!(snapshot.is_empty());
        assert!(snapshot.tree.is_empty());
        assert_eq!(snapshot.filtered_stats, Stats::default());
        assert_eq!(snapshot.global_stats.min_wns, 0.0);
    }

    #[test]
    fn test_empty_snapshot() {
        let snapshot = Snapshot::empty();
        assert_eq!(snapshot.revision, 0);
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.skipped_records(), 0);
    }
}
