//! Error handling for hierscope
//!
//! This module defines custom error types and a Result alias for use
//! throughout the crate.
//!
//! Data-quality problems inside a record set (blank paths, odd direction
//! values, out-of-range metrics) are tolerated by the pipeline and never
//! surface here. Errors are reserved for inputs the crate cannot work with at
//! all: unreadable files, missing required columns, broken config files.

use thiserror::Error;

/// Main error type for hierscope operations
#[derive(Error, Debug)]
pub enum HierScopeError {
    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Errors raised by the delimited-text reader
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The header row lacks a column the loader cannot do without
    #[error("Missing required column '{0}'")]
    MissingColumn(String),

    /// Errors related to configuration loading/saving
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A search pattern that does not compile
    #[error("Invalid search pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// A lookup by id that matched nothing in the current model
    #[error("Unknown node or edge '{0}'")]
    UnknownElement(String),

    /// Errors related to channel communication
    #[error("Channel error: {0}")]
    Channel(String),

    /// Generic errors with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<HierScopeError>,
    },
}

impl HierScopeError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        HierScopeError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

impl From<serde_json::Error> for HierScopeError {
    fn from(err: serde_json::Error) -> Self {
        HierScopeError::Serialization(err.to_string())
    }
}

/// Result type alias for hierscope operations
pub type Result<T> = std::result::Result<T, HierScopeError>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error result
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context lazily to an error result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<HierScopeError>,
{
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.into().with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.into().with_context(f()))
    }
}
