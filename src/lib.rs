//! # hierscope: hierarchical timing-graph core
//!
//! Turns a flat timing/connectivity export (one row per pair of hierarchical
//! module paths, with connection counts and slack metrics) into a compound
//! graph, a navigable hierarchy, summary statistics and per-edge styling for an
//! external renderer.
//!
//! ## Architecture
//!
//! - **IO**: Delimited-text loading into [`RawRecord`]s
//! - **Pipeline**: Pure stages from records to an immutable [`Snapshot`]
//! - **Style**: Metric-to-color/width mapping and the [`RenderDocument`]
//! - **Analysis**: Label search, inspection and neighborhood isolation
//! - **Session**: Active state, last-write-wins rebuilds over crossbeam channels
//! - **Config**: Saved view configurations and persisted application state
//!
//! ```text
//! CSV ──> io ──> RawRecord[] ──> pipeline::Snapshot ──> style::RenderDocument
//!                                      │
//!                                      └──> analysis (search / inspect / isolate)
//! ```
//!
//! ## Configuration
//!
//! Application state (recent files, last view config) is stored in the
//! platform-appropriate data directory under `dev.hierscope`.
//!
//! ## Example
//!
//! ```ignore
//! use hierscope::{FilterConfig, Session, ViewMode};
//!
//! let mut session = Session::open("timing.csv")?;
//! session.apply_filters(FilterConfig::default().with_exclude_internal(true));
//! session.set_view_mode(ViewMode::Tns);
//!
//! let doc = session.render();
//! println!("{}", serde_json::to_string_pretty(&doc)?);
//! ```

pub mod analysis;
pub mod config;
pub mod error;
pub mod io;
pub mod pipeline;
pub mod session;
pub mod style;
pub mod types;

// Re-export commonly used types
pub use config::{AppState, ViewConfig};
pub use error::{HierScopeError, Result, ResultExt};
pub use pipeline::{FilterConfig, GraphModel, Snapshot, Stats};
pub use session::{Session, SnapshotHandle, SnapshotWorker};
pub use style::{MappingConfig, RenderDocument};
pub use types::{Edge, GraphElement, HierarchyNode, RawRecord, TreeEntry, ViewMode};
