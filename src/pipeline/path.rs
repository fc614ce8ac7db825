//! Hierarchical path decomposition.
//!
//! A path such as `top/cpu/alu` names a module together with all of its
//! enclosing modules. Decomposing it yields the cumulative id of every level:
//!
//! ```text
//! "top/cpu/alu"  ──►  ["top", "top/cpu", "top/cpu/alu"]
//! ```
//!
//! Segments are trimmed; nothing else is normalized. Doubled separators
//! produce empty segments that are kept as-is.
//!
//! Ancestry is decided on the split segments, never on raw string prefixes,
//! so `top/ab` is not an ancestor of `top/abc`.

use crate::types::PATH_SEPARATOR;

/// A hierarchical path split into trimmed segments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HierPath {
    segments: Vec<String>,
}

impl HierPath {
    /// Split `raw` into trimmed segments.
    ///
    /// Returns `None` for blank input so callers can skip the record.
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.trim().is_empty() {
            return None;
        }
        let segments = raw
            .split(PATH_SEPARATOR)
            .map(|s| s.trim().to_string())
            .collect();
        Some(Self { segments })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Number of levels (1 for a top-level module)
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Last segment
    pub fn leaf(&self) -> &str {
        self.segments.last().map(String::as_str).unwrap_or("")
    }

    /// Full id of this path
    pub fn id(&self) -> String {
        self.segments.join("/")
    }

    /// Cumulative ids from root to leaf
    pub fn ids(&self) -> Vec<String> {
        let mut ids = Vec::with_capacity(self.segments.len());
        let mut current = String::new();
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                current.push(PATH_SEPARATOR);
            }
            current.push_str(segment);
            ids.push(current.clone());
        }
        ids
    }

    /// True iff `other` lies strictly below `self`
    pub fn is_ancestor_of(&self, other: &HierPath) -> bool {
        other.segments.len() > self.segments.len()
            && other.segments[..self.segments.len()] == self.segments[..]
    }
}

/// Cumulative ids of `raw` from root to leaf; empty for blank input.
pub fn decompose(raw: &str) -> Vec<String> {
    HierPath::parse(raw).map(|p| p.ids()).unwrap_or_default()
}

/// True iff `ancestor` is a strict ancestor of `descendant`.
pub fn is_ancestor(ancestor: &str, descendant: &str) -> bool {
    match (HierPath::parse(ancestor), HierPath::parse(descendant)) {
        (Some(a), Some(d)) => a.is_ancestor_of(&d),
        _ => false,
    }
}

/// True iff one path is a strict ancestor of the other.
///
/// Blank paths are never part of an internal pair.
pub fn is_internal_pair(a: &str, b: &str) -> bool {
    match (HierPath::parse(a), HierPath::parse(b)) {
        (Some(a), Some(b)) => a.is_ancestor_of(&b) || b.is_ancestor_of(&a),
        _ => false,
    }
}
