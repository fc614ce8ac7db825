//! Active record set and view state
//!
//! A [`Session`] owns the loaded records, the current filter and visual
//! mapping, and the snapshot built from them. Every change that affects the
//! graph produces a new [`Snapshot`] with a higher revision and swaps it in
//! whole; nothing is patched in place.
//!
//! # Features
//!
//! - Load records from a file or memory (filters reset to defaults)
//! - Apply filters, switch view mode, apply a saved [`ViewConfig`]
//! - Domains follow the filtered statistics unless pinned
//! - Search, inspect and isolate against the current snapshot
//! - Hand rebuilds to a [`SnapshotWorker`] and accept results by revision
//!
//! # Main Types
//!
//! - [`Session`] - Records, configuration and the current snapshot
//! - [`SnapshotWorker`] / [`SnapshotHandle`] - Off-thread recomputation

pub mod worker;

pub use worker::{SnapshotHandle, SnapshotRequest, SnapshotWorker, WorkerCommand, WorkerMessage};

use crate::analysis::{self, Inspection, Neighborhood, NodeSearch, SearchMode};
use crate::config::ViewConfig;
use crate::error::Result;
use crate::io::{self, LoadWarning};
use crate::pipeline::{FilterConfig, Snapshot};
use crate::style::{MappingConfig, RenderDocument};
use crate::types::{HierarchyNode, RawRecord, ViewMode};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Records, configuration and the snapshot derived from them
#[derive(Debug, Clone)]
pub struct Session {
    records: Arc<Vec<RawRecord>>,
    source: Option<PathBuf>,
    load_warnings: Vec<LoadWarning>,
    filter: FilterConfig,
    mapping: MappingConfig,
    /// Derive domains from filtered stats on every rebuild
    auto_domain: bool,
    snapshot: Arc<Snapshot>,
    revision: u64,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            records: Arc::new(Vec::new()),
            source: None,
            load_warnings: Vec::new(),
            filter: FilterConfig::default(),
            mapping: MappingConfig::default(),
            auto_domain: true,
            snapshot: Arc::new(Snapshot::empty()),
            revision: 0,
        }
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Session over in-memory records with default settings.
    pub fn from_records(records: Vec<RawRecord>) -> Self {
        let mut session = Self::new();
        session.load_records(records);
        session
    }

    /// Session over a timing export on disk.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let report = io::load_path(path)?;
        let mut session = Self::new();
        session.load_warnings = report.warnings;
        session.source = Some(path.to_path_buf());
        session.load_records(report.records);
        Ok(session)
    }

    /// Replace the record set. Filters go back to their defaults and a new
    /// snapshot is built.
    pub fn load_records(&mut self, records: Vec<RawRecord>) -> Arc<Snapshot> {
        tracing::info!("Session loaded {} record(s)", records.len());
        self.records = Arc::new(records);
        self.filter = FilterConfig::default();
        self.rebuild()
    }

    pub fn records(&self) -> &[RawRecord] {
        &self.records
    }

    /// Shared handle to the record set, for handing to a worker
    pub fn records_arc(&self) -> Arc<Vec<RawRecord>> {
        Arc::clone(&self.records)
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn load_warnings(&self) -> &[LoadWarning] {
        &self.load_warnings
    }

    pub fn filter(&self) -> &FilterConfig {
        &self.filter
    }

    pub fn mapping(&self) -> &MappingConfig {
        &self.mapping
    }

    pub fn snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(&self.snapshot)
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Apply new filter bounds and rebuild.
    pub fn apply_filters(&mut self, filter: FilterConfig) -> Arc<Snapshot> {
        self.filter = filter;
        self.rebuild()
    }

    /// Change one filter setting by name, as typed by the user. Nothing is
    /// rebuilt until [`Session::apply_filters`] or [`Session::refresh`].
    pub fn set_filter_value(&mut self, key: &str, value: &str) -> bool {
        let known = self.filter.set(key, value);
        if !known {
            tracing::warn!("Unknown filter setting '{}'", key);
        }
        known
    }

    /// Rebuild with the current filter.
    pub fn refresh(&mut self) -> Arc<Snapshot> {
        self.rebuild()
    }

    /// Switch the metric driving the edge channels.
    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.mapping.view_mode = mode;
        if self.auto_domain {
            self.mapping.apply_auto_domain(&self.snapshot.filtered_stats);
        }
    }

    /// Replace the mapping and pin its domains.
    pub fn set_mapping(&mut self, mapping: MappingConfig) {
        self.mapping = mapping;
        self.auto_domain = false;
    }

    /// Derive domains from filtered stats again after [`Session::set_mapping`].
    pub fn enable_auto_domain(&mut self) {
        self.auto_domain = true;
        self.mapping.apply_auto_domain(&self.snapshot.filtered_stats);
    }

    /// Apply a saved view: mapping first, then the filter.
    pub fn apply_view_config(&mut self, view: &ViewConfig) -> Arc<Snapshot> {
        tracing::debug!("Applying view config '{}'", view.name);
        self.mapping = view.mapping;
        self.auto_domain = view.auto_domain;
        self.apply_filters(view.filter)
    }

    /// Current settings as a saveable view.
    pub fn view_config(&self, name: impl Into<String>) -> ViewConfig {
        let mut view = ViewConfig::new(name)
            .with_filter(self.filter)
            .with_mapping(self.mapping);
        view.auto_domain = self.auto_domain;
        view
    }

    /// Styled document for the current snapshot.
    pub fn render(&self) -> RenderDocument {
        RenderDocument::build(&self.snapshot, &self.mapping)
    }

    /// Search node labels in the current snapshot.
    pub fn search(&self, query: &str, mode: SearchMode) -> Result<Vec<&HierarchyNode>> {
        Ok(NodeSearch::new(query, mode)?.run(&self.snapshot.model))
    }

    /// Inspect a node or edge of the current snapshot. Node rows come from the
    /// full record set.
    pub fn inspect(&self, id: &str) -> Result<Inspection> {
        analysis::inspect(&self.snapshot.model, &self.records, id)
    }

    /// Ids to keep visible when isolating `id`.
    pub fn isolate(&self, id: &str) -> Result<Neighborhood> {
        analysis::neighborhood(&self.snapshot.model, id)
    }

    /// Prepare a rebuild of the current state for a [`SnapshotWorker`].
    pub fn rebuild_request(&mut self) -> SnapshotRequest {
        self.revision += 1;
        SnapshotRequest {
            revision: self.revision,
            records: self.records_arc(),
            filter: self.filter,
        }
    }

    /// Install a snapshot built elsewhere. Returns false, and keeps the
    /// current snapshot, if `snapshot` is not newer.
    pub fn accept(&mut self, snapshot: Arc<Snapshot>) -> bool {
        if snapshot.revision <= self.snapshot.revision {
            tracing::debug!(
                "Ignoring snapshot revision {} (current {})",
                snapshot.revision,
                self.snapshot.revision
            );
            return false;
        }
        self.revision = self.revision.max(snapshot.revision);
        self.install(snapshot);
        true
    }

    fn rebuild(&mut self) -> Arc<Snapshot> {
        self.revision += 1;
        let snapshot = Arc::new(Snapshot::build(&self.records, &self.filter, self.revision));
        self.install(Arc::clone(&snapshot));
        snapshot
    }

    fn install(&mut self, snapshot: Arc<Snapshot>) {
        if self.auto_domain {
            self.mapping.apply_auto_domain(&snapshot.filtered_stats);
        }
        self.snapshot = snapshot;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::Domain;

    fn records() -> Vec<RawRecord> {
        vec![
            RawRecord::new("top/a", "top/b")
                .with_connections(5)
                .with_slack(-2.5, -10.0)
                .with_direction("to"),
            RawRecord::new("top/a", "top/a/child")
                .with_connections(1)
                .with_slack(-0.5, -1.0)
                .with_direction("from"),
            RawRecord::new("top/c", "top/d").with_connections(8).with_slack(1.0, 0.0),
        ]
    }

    #[test]
    fn test_load_builds_snapshot_with_defaults() {
        let session = Session::from_records(records());
        let snapshot = session.snapshot();

        assert_eq!(snapshot.revision, 1);
        assert_eq!(snapshot.record_count, 3);
        // Positive slack fails the default max_wns of 0
        assert_eq!(snapshot.filtered_count, 2);
        assert_eq!(session.mapping().gradient_domain, Domain::new(-2.5, 0.0));
    }

    #[test]
    fn test_load_resets_filters() {
        let mut session = Session::from_records(records());
        session.apply_filters(FilterConfig::default().with_exclude_internal(true));
        assert!(session.filter().exclude_internal);

        session.load_records(records());
        assert_eq!(*session.filter(), FilterConfig::default());
        assert_eq!(session.revision(), 3);
    }

    #[test]
    fn test_filters_drive_auto_domain() {
        let mut session = Session::from_records(records());
        session.set_view_mode(ViewMode::Connections);
        assert_eq!(session.mapping().width_domain, Domain::new(5.0, 0.0));

        session.apply_filters(FilterConfig::default().with_max_wns(-1.0));
        assert_eq!(session.snapshot().filtered_count, 1);
        assert_eq!(session.mapping().width_domain, Domain::new(5.0, 0.0));

        session.set_view_mode(ViewMode::Tns);
        assert_eq!(session.mapping().gradient_domain, Domain::new(-10.0, 0.0));
    }

    #[test]
    fn test_pinned_mapping_survives_rebuild() {
        let mut session = Session::from_records(records());
        session.set_mapping(MappingConfig::new(ViewMode::Wns).with_domain(-100.0, 0.0));
        session.refresh();
        assert_eq!(session.mapping().gradient_domain, Domain::new(-100.0, 0.0));

        session.enable_auto_domain();
        assert_eq!(session.mapping().gradient_domain, Domain::new(-2.5, 0.0));
    }

    #[test]
    fn test_set_filter_value_is_deferred() {
        let mut session = Session::from_records(records());
        assert!(session.set_filter_value("min_connections", "3"));
        assert!(!session.set_filter_value("bogus", "1"));
        assert_eq!(session.snapshot().filtered_count, 2);

        session.refresh();
        assert_eq!(session.snapshot().filtered_count, 1);
    }

    #[test]
    fn test_view_config_round_trip() {
        let mut session = Session::from_records(records());
        session.apply_filters(FilterConfig::default().with_exclude_internal(true));
        let view = session.view_config("saved");

        let mut other = Session::from_records(records());
        other.apply_view_config(&view);
        assert_eq!(other.filter(), session.filter());
        assert_eq!(other.snapshot().filtered_count, 1);
    }

    #[test]
    fn test_accept_ignores_stale() {
        let mut session = Session::from_records(records());
        let request = session.rebuild_request();
        let built = Arc::new(Snapshot::build(&request.records, &request.filter, request.revision));
        assert!(session.accept(Arc::clone(&built)));
        assert_eq!(session.snapshot().revision, 2);

        let stale = Arc::new(Snapshot::build(&request.records, &request.filter, 1));
        assert!(!session.accept(stale));
        assert_eq!(session.snapshot().revision, 2);
    }

    #[test]
    fn test_queries_use_current_snapshot() {
        let session = Session::from_records(records());
        let hits = session.search("child", SearchMode::Substring).unwrap();
        assert_eq!(hits.len(), 1);

        assert!(session.isolate("top/a").unwrap().contains("top/a->top/b"));
        // top/c only appears in a filtered-out record
        assert!(session.inspect("top/c").is_err());
    }
}
