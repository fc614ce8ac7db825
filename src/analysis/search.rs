//! Node search by label.

use crate::error::Result;
use crate::pipeline::GraphModel;
use crate::types::HierarchyNode;
use regex::{Regex, RegexBuilder};

/// Maximum number of hits returned by default
pub const DEFAULT_SEARCH_LIMIT: usize = 10;

/// How the query text is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchMode {
    /// Case-insensitive substring
    #[default]
    Substring,
    /// Case-insensitive regular expression
    Regex,
}

/// A compiled label query
#[derive(Debug, Clone)]
pub struct NodeSearch {
    matcher: Matcher,
    limit: usize,
}

#[derive(Debug, Clone)]
enum Matcher {
    /// Lowercased needle; empty matches nothing
    Substring(String),
    Regex(Regex),
}

impl NodeSearch {
    /// Compile `query`. Fails only for an invalid regular expression.
    pub fn new(query: &str, mode: SearchMode) -> Result<Self> {
        let matcher = match mode {
            SearchMode::Substring => Matcher::Substring(query.trim().to_lowercase()),
            SearchMode::Regex => {
                Matcher::Regex(RegexBuilder::new(query).case_insensitive(true).build()?)
            }
        };
        Ok(Self {
            matcher,
            limit: DEFAULT_SEARCH_LIMIT,
        })
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn is_match(&self, label: &str) -> bool {
        match &self.matcher {
            Matcher::Substring(needle) => {
                !needle.is_empty() && label.to_lowercase().contains(needle.as_str())
            }
            Matcher::Regex(re) => re.is_match(label),
        }
    }

    /// Matching nodes in model order, at most `limit`.
    pub fn run<'a>(&self, model: &'a GraphModel) -> Vec<&'a HierarchyNode> {
        let hits: Vec<_> = model
            .nodes()
            .iter()
            .filter(|node| self.is_match(&node.label))
            .take(self.limit)
            .collect();
        tracing::debug!("Search matched {} node(s)", hits.len());
        hits
    }
}
