//! Record filter.
//!
//! A record passes when all of the following hold:
//!
//! - `connections >= min_connections`
//! - `wns <= max_wns`
//! - `tns <= max_tns`
//! - internal pairs are allowed, or the record is not an internal pair
//!
//! The defaults (`0, 0, 0, false`) keep every record with a violation or zero
//! slack and drop records with positive slack. Bounds typed into the UI arrive
//! as text; anything that is not a finite number falls back to 0 rather than
//! meaning "no constraint".
//!
//! Filtering keeps input order and never deduplicates.

use crate::pipeline::path::is_internal_pair;
use crate::types::RawRecord;
use serde::{Deserialize, Deserializer, Serialize};

/// Filter bounds applied to raw records before the graph is built
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct FilterConfig {
    /// Minimum connection count
    #[serde(default, deserialize_with = "lenient_bound")]
    pub min_connections: f64,

    /// Maximum worst negative slack (ns)
    #[serde(default, deserialize_with = "lenient_bound")]
    pub max_wns: f64,

    /// Maximum total negative slack (ns)
    #[serde(default, deserialize_with = "lenient_bound")]
    pub max_tns: f64,

    /// Drop records whose endpoints are ancestor and descendant
    #[serde(default)]
    pub exclude_internal: bool,
}

impl FilterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from the raw text of the filter inputs.
    pub fn from_inputs(min_connections: &str, max_wns: &str, max_tns: &str, exclude_internal: bool) -> Self {
        Self {
            min_connections: parse_bound(min_connections),
            max_wns: parse_bound(max_wns),
            max_tns: parse_bound(max_tns),
            exclude_internal,
        }
    }

    pub fn with_min_connections(mut self, value: f64) -> Self {
        self.min_connections = sanitize(value);
        self
    }

    pub fn with_max_wns(mut self, value: f64) -> Self {
        self.max_wns = sanitize(value);
        self
    }

    pub fn with_max_tns(mut self, value: f64) -> Self {
        self.max_tns = sanitize(value);
        self
    }

    pub fn with_exclude_internal(mut self, exclude: bool) -> Self {
        self.exclude_internal = exclude;
        self
    }

    /// Apply a single named setting from text input.
    ///
    /// Recognized keys: `min_connections`, `max_wns`, `max_tns`,
    /// `exclude_internal`, and `clear` (restore defaults). Returns false for
    /// unknown keys.
    pub fn set(&mut self, key: &str, value: &str) -> bool {
        match key {
            "min_connections" => self.min_connections = parse_bound(value),
            "max_wns" => self.max_wns = parse_bound(value),
            "max_tns" => self.max_tns = parse_bound(value),
            "exclude_internal" => {
                self.exclude_internal = matches!(
                    value.trim().to_ascii_lowercase().as_str(),
                    "true" | "1" | "yes" | "on"
                )
            }
            "clear" => *self = Self::default(),
            _ => return false,
        }
        true
    }

    /// Check if a record passes every bound.
    pub fn matches(&self, record: &RawRecord) -> bool {
        let pass_connections = record.connections as f64 >= self.min_connections;
        let pass_wns = record.wns <= self.max_wns;
        let pass_tns = record.tns <= self.max_tns;
        let pass_internal =
            !self.exclude_internal || !is_internal_pair(&record.hier, &record.connnecting_hier);

        pass_connections && pass_wns && pass_tns && pass_internal
    }

    /// Records that pass, in input order.
    pub fn apply(&self, records: &[RawRecord]) -> Vec<RawRecord> {
        let filtered: Vec<RawRecord> = records
            .iter()
            .filter(|r| self.matches(r))
            .cloned()
            .collect();
        tracing::debug!(
            kept = filtered.len(),
            total = records.len(),
            "Applied record filter"
        );
        filtered
    }
}

/// Parse a bound typed by the user; blank or non-numeric text becomes 0.
pub fn parse_bound(text: &str) -> f64 {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    trimmed.parse::<f64>().map(sanitize).unwrap_or(0.0)
}

fn sanitize(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Accept numbers or numeric strings; anything else becomes 0.
fn lenient_bound<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoundInput {
        Number(f64),
        Text(String),
        Other(serde::de::IgnoredAny),
    }

    Ok(match BoundInput::deserialize(deserializer)? {
        BoundInput::Number(n) => sanitize(n),
        BoundInput::Text(s) => parse_bound(&s),
        BoundInput::Other(_) => 0.0,
    })
}
