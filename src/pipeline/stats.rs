//! Summary bounds over a record set.
//!
//! Two independent summaries are taken on every filter cycle: one over the
//! complete upload (bounds shown next to the filter inputs) and one over the
//! filtered set (default domains for the visual mapping).
//!
//! All three bounds are floored at zero. Non-negative slack means "no
//! violation", so a set without violations reports a minimum of 0 rather than
//! its smallest positive slack.

use crate::types::RawRecord;
use serde::{Deserialize, Serialize};

/// Bounds over a record set
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Stats {
    /// Largest connection count, never below 0
    pub max_connections: u64,
    /// Most negative WNS, or 0
    pub min_wns: f64,
    /// Most negative TNS, or 0
    pub min_tns: f64,
}

impl Stats {
    /// Summarize `records`. Empty input gives all zeros.
    pub fn compute(records: &[RawRecord]) -> Self {
        let mut acc = StatsAccumulator::new();
        for record in records {
            acc.push(record);
        }
        acc.finish()
    }

    /// True when at least one record violates timing
    pub fn has_violations(&self) -> bool {
        self.min_wns < 0.0 || self.min_tns < 0.0
    }
}

/// Running min/max tracker behind [`Stats::compute`].
#[derive(Debug, Clone)]
pub struct StatsAccumulator {
    count: usize,
    max_connections: u64,
    min_wns: f64,
    min_tns: f64,
}

impl Default for StatsAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl StatsAccumulator {
    pub fn new() -> Self {
        Self {
            count: 0,
            max_connections: 0,
            min_wns: f64::INFINITY,
            min_tns: f64::INFINITY,
        }
    }

    #[inline]
    pub fn push(&mut self, record: &RawRecord) {
        self.count += 1;
        self.max_connections = self.max_connections.max(record.connections);
        self.min_wns = self.min_wns.min(record.wns);
        self.min_tns = self.min_tns.min(record.tns);
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Final bounds; the infinite starting minima never leak out.
    pub fn finish(&self) -> Stats {
        if self.count == 0 {
            return Stats::default();
        }
        Stats {
            max_connections: self.max_connections,
            min_wns: floor_at_zero(self.min_wns),
            min_tns: floor_at_zero(self.min_tns),
        }
    }
}

fn floor_at_zero(min: f64) -> f64 {
    if min.is_finite() && min < 0.0 {
        min
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_all_zero() {
        let stats = Stats::compute(&[]);
        assert_eq!(stats, Stats::default());
        assert_eq!(stats.max_connections, 0);
        assert_eq!(stats.min_wns, 0.0);
        assert_eq!(stats.min_tns, 0.0);
    }

    #[test]
    fn test_bounds() {
        let records = vec![
            RawRecord::new("a", "b").with_connections(3).with_slack(-1.5, -4.0),
            RawRecord::new("a", "c").with_connections(12).with_slack(0.2, 0.0),
            RawRecord::new("b", "c").with_connections(7).with_slack(-0.3, -9.5),
        ];
        let stats = Stats::compute(&records);
        assert_eq!(stats.max_connections, 12);
        assert_eq!(stats.min_wns, -1.5);
        assert_eq!(stats.min_tns, -9.5);
        assert!(stats.has_violations());
    }

    #[test]
    fn test_positive_slack_floors_to_zero() {
        let records = vec![
            RawRecord::new("a", "b").with_slack(0.5, 2.0),
            RawRecord::new("a", "c").with_slack(1.25, 3.0),
        ];
        let stats = Stats::compute(&records);
        assert_eq!(stats.min_wns, 0.0);
        assert_eq!(stats.min_tns, 0.0);
        assert!(!stats.has_violations());
    }

    #[test]
    fn test_accumulator_counts() {
        let mut acc = StatsAccumulator::new();
        assert_eq!(acc.finish(), Stats::default());
        acc.push(&RawRecord::new("a", "b").with_connections(2));
        assert_eq!(acc.count(), 1);
        assert_eq!(acc.finish().max_connections, 2);
    }
}
