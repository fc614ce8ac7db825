//! Delimited-text loader for timing exports.
//!
//! The first line is the header row. Recognized columns:
//!
//! | column             | type             | required |
//! |--------------------|------------------|----------|
//! | `hier`             | path             | yes      |
//! | `connnecting_hier` | path             | yes      |
//! | `connections`      | integer >= 0     | no       |
//! | `wns`              | decimal (ns)     | no       |
//! | `tns`              | decimal (ns)     | no       |
//! | `direction`        | string           | no       |
//!
//! Other columns are ignored. The delimiter is picked from the header line
//! (`,` tab `;` `|`, whichever occurs most; comma on a tie). Cells are kept
//! verbatim apart from numeric parsing; path trimming happens later during
//! decomposition.
//!
//! Bad numeric cells do not fail the load: they become 0 and are reported as
//! [`LoadWarning`]s.

use crate::error::{HierScopeError, Result, ResultExt};
use crate::types::RawRecord;
use serde::Serialize;
use std::io::Read;
use std::path::Path;

/// Candidate delimiters, in tie-break order
pub const DELIMITERS: [u8; 4] = [b',', b'\t', b';', b'|'];

const COL_HIER: &str = "hier";
const COL_CONNECTING: &str = "connnecting_hier";
const COL_CONNECTIONS: &str = "connections";
const COL_WNS: &str = "wns";
const COL_TNS: &str = "tns";
const COL_DIRECTION: &str = "direction";

/// What was wrong with a numeric cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadIssue {
    /// Not a finite number; replaced by 0
    NotANumber,
    /// Negative connection count; clamped to 0
    NegativeCount,
    /// Fractional connection count; rounded down
    FractionalCount,
}

/// A tolerated problem in one cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadWarning {
    /// 1-based line number in the input
    pub line: u64,
    pub column: &'static str,
    pub value: String,
    pub issue: LoadIssue,
}

/// Parsed records plus everything worth telling the user about the load
#[derive(Debug, Clone, Default, Serialize)]
pub struct LoadReport {
    pub records: Vec<RawRecord>,
    /// Detected delimiter, as a character
    pub delimiter: char,
    pub warnings: Vec<LoadWarning>,
}

impl LoadReport {
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Column positions resolved from the header row
#[derive(Debug, Clone, Copy)]
struct ColumnMap {
    hier: usize,
    connecting: usize,
    connections: Option<usize>,
    wns: Option<usize>,
    tns: Option<usize>,
    direction: Option<usize>,
}

impl ColumnMap {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self> {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);
        let required =
            |name: &str| find(name).ok_or_else(|| HierScopeError::MissingColumn(name.to_string()));

        Ok(Self {
            hier: required(COL_HIER)?,
            connecting: required(COL_CONNECTING)?,
            connections: find(COL_CONNECTIONS),
            wns: find(COL_WNS),
            tns: find(COL_TNS),
            direction: find(COL_DIRECTION),
        })
    }
}

/// Load a timing export from disk.
pub fn load_path(path: impl AsRef<Path>) -> Result<LoadReport> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let report = load_str(&text).with_context(|| format!("Failed to parse {}", path.display()))?;
    tracing::info!(
        "Loaded {} record(s) from {:?} ({} warning(s))",
        report.records.len(),
        path,
        report.warnings.len()
    );
    Ok(report)
}

/// Load a timing export from any reader.
pub fn load_reader<R: Read>(mut reader: R) -> Result<LoadReport> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    load_str(&text)
}

/// Load a timing export held in memory.
pub fn load_str(text: &str) -> Result<LoadReport> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let header_line = text.lines().find(|l| !l.trim().is_empty()).unwrap_or("");
    let delimiter = detect_delimiter(header_line);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    let columns = ColumnMap::from_headers(&headers)?;

    let mut report = LoadReport {
        delimiter: delimiter as char,
        ..Default::default()
    };

    for result in reader.records() {
        let row = result?;
        if row.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        let line = row.position().map(|p| p.line()).unwrap_or(0);
        let record = parse_row(&row, &columns, line, &mut report.warnings);
        report.records.push(record);
    }

    if report.has_warnings() {
        tracing::warn!(
            "{} numeric cell(s) could not be used as-is and were replaced",
            report.warnings.len()
        );
    }
    Ok(report)
}

/// Pick the delimiter that occurs most often in the header line.
pub fn detect_delimiter(header_line: &str) -> u8 {
    let mut best = DELIMITERS[0];
    let mut best_count = 0;
    for &candidate in &DELIMITERS {
        let count = header_line.bytes().filter(|&b| b == candidate).count();
        if count > best_count {
            best = candidate;
            best_count = count;
        }
    }
    best
}

fn parse_row(
    row: &csv::StringRecord,
    columns: &ColumnMap,
    line: u64,
    warnings: &mut Vec<LoadWarning>,
) -> RawRecord {
    let cell = |idx: Option<usize>| idx.and_then(|i| row.get(i)).unwrap_or("");

    let mut warn = |column: &'static str, value: &str, issue: LoadIssue| {
        tracing::debug!("Line {}: {} = {:?} ({:?})", line, column, value, issue);
        warnings.push(LoadWarning {
            line,
            column,
            value: value.to_string(),
            issue,
        });
    };

    let connections = parse_count(cell(columns.connections), |v, issue| {
        warn(COL_CONNECTIONS, v, issue)
    });
    let wns = parse_slack(cell(columns.wns), |v, issue| warn(COL_WNS, v, issue));
    let tns = parse_slack(cell(columns.tns), |v, issue| warn(COL_TNS, v, issue));

    RawRecord {
        hier: cell(Some(columns.hier)).to_string(),
        connnecting_hier: cell(Some(columns.connecting)).to_string(),
        connections,
        wns,
        tns,
        direction: cell(columns.direction).to_string(),
    }
}

fn parse_count(raw: &str, mut warn: impl FnMut(&str, LoadIssue)) -> u64 {
    let text = raw.trim();
    if text.is_empty() {
        return 0;
    }
    if let Ok(n) = text.parse::<u64>() {
        return n;
    }
    match text.parse::<f64>() {
        Ok(v) if v.is_finite() && v < 0.0 => {
            warn(raw, LoadIssue::NegativeCount);
            0
        }
        Ok(v) if v.is_finite() => {
            if v.fract() != 0.0 {
                warn(raw, LoadIssue::FractionalCount);
            }
            v.floor() as u64
        }
        _ => {
            warn(raw, LoadIssue::NotANumber);
            0
        }
    }
}

fn parse_slack(raw: &str, mut warn: impl FnMut(&str, LoadIssue)) -> f64 {
    let text = raw.trim();
    if text.is_empty() {
        return 0.0;
    }
    match text.parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => {
            warn(raw, LoadIssue::NotANumber);
            0.0
        }
    }
}
