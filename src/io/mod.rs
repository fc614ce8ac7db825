//! Input for the pipeline.
//!
//! # Main Types
//!
//! - [`LoadReport`] - Parsed [`RawRecord`](crate::types::RawRecord)s with any tolerated cell problems
//! - [`LoadWarning`] - One numeric cell that was replaced or clamped

pub mod loader;

pub use loader::{detect_delimiter, load_path, load_reader, load_str, LoadIssue, LoadReport, LoadWarning};
