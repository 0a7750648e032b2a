//! Core log file parser
//!
//! A single forward pass in two phases. Phase one collects `.step`
//! declarations and, while no step has been seen, stepless scalar
//! measurements. The first `Measurement:` marker switches to phase two,
//! which accumulates the tabular per-step measurement blocks.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, info, trace};

use super::classify::{LineKind, classify_line};
use super::tables::ColumnTable;
use crate::constants::{AT_SUFFIX, FROM_SUFFIX, LOG_ENCODING_MARKER, TO_SUFFIX};
use crate::encoding::{FileEncoding, detect_encoding, read_to_string};
use crate::value::{CoercedValue, try_convert_value, try_convert_values};
use crate::Result;

/// Stepless measurement line, e.g.
/// `vout_rms: RMS(v(out))=1.41109 FROM 0 TO 0.001` (interval),
/// `vout1m: v(out)=-0.0186257 at 0.001` (point) or
/// `gain: vout_rms/vin_rms=1.99809` (plain parameter)
static STEPLESS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?P<name>\w+):\s+.*=(?P<value>[\d\.E+\-\(\)dB,°]+)(( FROM (?P<from>[\d\.E+-]*) TO (?P<to>[\d\.E+-]*))|( at (?P<at>[\d\.E+-]*)))?",
    )
    .unwrap()
});

/// Parsed model of one LTSpice log or measurement file
///
/// Owns the step table (parameter name to the sequence of values it takes
/// across sweep steps) and the measurement table (column name to the
/// sequence of values across steps). Both keep their insertion order, which
/// is the order columns appear in the exported TSV.
#[derive(Debug)]
pub struct LogReader {
    path: PathBuf,
    encoding: FileEncoding,
    pub(crate) steps: ColumnTable,
    pub(crate) measures: ColumnTable,
    pub(crate) step_count: usize,
    measure_count: usize,
}

impl LogReader {
    /// Parse a log file, steps and measurements
    pub fn parse(path: &Path) -> Result<Self> {
        Self::parse_inner(path, true, None)
    }

    /// Parse only the `.step` declarations, returning as soon as the first
    /// measurement section is reached
    pub fn parse_steps_only(path: &Path) -> Result<Self> {
        Self::parse_inner(path, false, None)
    }

    /// Parse a measurement file whose step definitions live in another file
    ///
    /// Used for .mout files: the sibling .log file supplies the step table,
    /// which is copied into the new model before parsing begins.
    pub fn parse_with_steps(path: &Path, step_table: &ColumnTable) -> Result<Self> {
        Self::parse_inner(path, true, Some(step_table))
    }

    fn parse_inner(path: &Path, read_measures: bool, seed: Option<&ColumnTable>) -> Result<Self> {
        let encoding = detect_encoding(path, Some(LOG_ENCODING_MARKER))?;
        let content = read_to_string(path, encoding)?;
        info!("Processing log file: {}", path.display());

        let mut reader = LogReader {
            path: path.to_path_buf(),
            encoding,
            steps: seed.cloned().unwrap_or_default(),
            measures: ColumnTable::new(),
            step_count: seed.map(ColumnTable::row_count).unwrap_or(0),
            measure_count: 0,
        };

        let lines: Vec<&str> = content.lines().collect();

        // Phase one: steps and stepless measurements
        let mut section_start = None;
        for (idx, line) in lines.iter().enumerate() {
            match classify_line(line) {
                LineKind::StepDecl(rest) => reader.read_step_line(rest),
                LineKind::SectionMarker(_) => {
                    if !read_measures {
                        debug!("Steps-only read, stopping at first measurement section");
                        return Ok(reader);
                    }
                    section_start = Some(idx);
                    break;
                }
                _ => {
                    // Stepless scalar measurements only exist in unstepped
                    // simulations
                    if reader.step_count == 0 {
                        reader.read_stepless_measurement(line);
                    }
                }
            }
        }

        // Phase two: tabular measurement blocks
        if let Some(start) = section_start {
            reader.read_measurement_blocks(&lines[start..]);
        }

        info!(
            "Identified {} steps, read {} measurement rows",
            reader.step_count, reader.measure_count
        );
        Ok(reader)
    }

    /// One `.step` line: count the step and append each `key=value` token
    fn read_step_line(&mut self, rest: &str) {
        self.step_count += 1;
        for token in rest.split_whitespace() {
            if let Some((name, value)) = token.split_once('=') {
                self.steps.push(name, try_convert_value(value));
            }
        }
    }

    /// One candidate stepless measurement line
    ///
    /// A match stores one to three single-element columns: the value, plus
    /// either interval bounds (`<name>_FROM`/`<name>_TO`) or a time point
    /// (`<name>_at`).
    fn read_stepless_measurement(&mut self, line: &str) {
        let Some(caps) = STEPLESS_RE.captures(line) else {
            trace!("-> {}", line);
            return;
        };

        let name = &caps["name"];
        let value = try_convert_value(&caps["value"]);

        let group = |g: &str| {
            caps.name(g)
                .map(|m| m.as_str())
                .filter(|s| !s.is_empty())
        };

        if let Some(from) = group("from") {
            self.measures.insert_column(name.to_string(), vec![value]);
            self.measures.insert_column(
                format!("{}{}", name, FROM_SUFFIX),
                vec![try_convert_value(from)],
            );
            self.measures.insert_column(
                format!("{}{}", name, TO_SUFFIX),
                vec![try_convert_value(&caps["to"])],
            );
        } else if let Some(at) = group("at") {
            self.measures.insert_column(name.to_string(), vec![value]);
            self.measures.insert_column(
                format!("{}{}", name, AT_SUFFIX),
                vec![try_convert_value(at)],
            );
        } else {
            self.measures.insert_column(name.to_string(), vec![value]);
        }
    }

    /// Phase two: accumulate and commit `Measurement:` blocks
    ///
    /// `lines` starts at the first section marker. Each block is committed
    /// when the next marker or the end of the file is reached.
    fn read_measurement_blocks(&mut self, lines: &[&str]) {
        let mut block_name: Option<String> = None;
        let mut headers: Vec<String> = Vec::new();
        let mut rows: Vec<Vec<CoercedValue>> = Vec::new();

        for line in lines {
            match classify_line(line) {
                LineKind::SectionMarker(rest) => {
                    // The marker must be followed by a space and the block
                    // name; a bare "Measurement:xxx" line is noise
                    let Some(name) = rest.strip_prefix(' ') else {
                        trace!("-> {}", line);
                        continue;
                    };
                    if block_name.take().is_some() {
                        if !rows.is_empty() {
                            self.commit_block(&headers, &rows);
                        }
                        headers.clear();
                        rows.clear();
                    }
                    debug!("Reading measurement {}", name);
                    block_name = Some(name.to_string());
                }
                LineKind::DataRow(tokens) => {
                    rows.push(try_convert_values(tokens));
                    self.measure_count += 1;
                }
                LineKind::HeaderCandidate(tokens) => {
                    let Some(name) = &block_name else {
                        trace!("-> {}", line);
                        continue;
                    };
                    headers = derive_block_headers(name, &tokens);
                    rows.clear();
                }
                LineKind::StepDecl(_) | LineKind::Other => trace!("-> {}", line),
            }
        }

        // Commit whatever block is still open at end of file
        if !rows.is_empty() {
            self.commit_block(&headers, &rows);
        }
    }

    /// Write one column per header, taking that position's value across all
    /// accumulated rows in order
    fn commit_block(&mut self, headers: &[String], rows: &[Vec<CoercedValue>]) {
        debug!(
            "Storing measurement block with {} columns, {} rows",
            headers.len(),
            rows.len()
        );
        for (position, title) in headers.iter().enumerate() {
            // A short row pads with empty text instead of aborting the block
            let column = rows
                .iter()
                .map(|row| {
                    row.get(position)
                        .cloned()
                        .unwrap_or_else(|| CoercedValue::Text(String::new()))
                })
                .collect();
            self.measures.insert_column(title.clone(), column);
        }
    }

    /// Path of the parsed file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Encoding detected on the parsed file, reused for export
    pub fn encoding(&self) -> FileEncoding {
        self.encoding
    }

    /// The step table
    pub fn steps(&self) -> &ColumnTable {
        &self.steps
    }

    /// The measurement table
    pub fn measures(&self) -> &ColumnTable {
        &self.measures
    }

    /// Number of sweep steps, seed included
    pub fn step_count(&self) -> usize {
        self.step_count
    }

    /// Number of tabular measurement rows read (diagnostic total)
    pub fn measure_count(&self) -> usize {
        self.measure_count
    }
}

/// Column headers of one measurement block
///
/// The block name replaces the measured expression; token 1 is the literal
/// "step" heading of the discarded index column. `FROM`/`at` directly after
/// it, and `TO` one further, are qualified with the block name so interval
/// columns from different blocks cannot collide.
fn derive_block_headers(name: &str, tokens: &[&str]) -> Vec<String> {
    let mut headers = vec![name.to_string()];
    for (position, token) in tokens.iter().enumerate().skip(2) {
        let header = match (position, *token) {
            (2, "FROM") => format!("{}{}", name, FROM_SUFFIX),
            (2, "at") => format!("{}{}", name, AT_SUFFIX),
            (3, "TO") => format!("{}{}", name, TO_SUFFIX),
            _ => token.to_string(),
        };
        headers.push(header);
    }
    headers
}
