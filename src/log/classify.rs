//! Line classification heuristics for log and measurement files
//!
//! LTSpice log files have no grammar. Lines are told apart by their prefix
//! and, for the tabular measurement blocks, by whether the first tab-
//! separated token parses as an integer (a data row's step index) or not
//! (a header row). Those heuristics are load-bearing for compatibility and
//! live here in one function so they can be tested apart from the stateful
//! accumulation in the parser.

use crate::constants::{MEASUREMENT_MARKER, STEP_MARKER};

/// What a single line of a log or measurement file is
#[derive(Debug, Clone, PartialEq)]
pub enum LineKind<'a> {
    /// A `.step` declaration; carries the text after the marker
    StepDecl(&'a str),
    /// A `Measurement:` section marker; carries the text after the marker,
    /// leading space included
    SectionMarker(&'a str),
    /// A tabular data row; carries the tokens after the discarded integer
    /// step-index token
    DataRow(Vec<&'a str>),
    /// A tab-separated line whose first token is not an integer, which in
    /// a measurement block is the header row
    HeaderCandidate(Vec<&'a str>),
    /// Anything else; in phase one these may still be stepless measurements
    Other,
}

/// Classify one line, trailing carriage return already stripped
pub fn classify_line(line: &str) -> LineKind<'_> {
    if let Some(rest) = line.strip_prefix(STEP_MARKER) {
        return LineKind::StepDecl(rest);
    }
    if let Some(rest) = line.strip_prefix(MEASUREMENT_MARKER) {
        return LineKind::SectionMarker(rest);
    }

    let tokens: Vec<&str> = line.split('\t').collect();
    if tokens.len() >= 2 {
        if tokens[0].trim().parse::<i64>().is_ok() {
            return LineKind::DataRow(tokens[1..].to_vec());
        }
        return LineKind::HeaderCandidate(tokens);
    }
    LineKind::Other
}
