//! Queries over a built graph model
//!
//! This module provides the lookups the navigation side needs:
//! - Label search (substring or regex)
//! - Inspection of a node or edge
//! - Neighborhood isolation

pub mod inspect;
pub mod isolate;
pub mod search;

pub use inspect::{inspect, EdgeReport, Inspection, NodeReport};
pub use isolate::{neighborhood, Neighborhood};
pub use search::{NodeSearch, SearchMode, DEFAULT_SEARCH_LIMIT};
