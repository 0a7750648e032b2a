//! Complex column splitting and TSV export
//!
//! The export writes one header line and one row per measurement index:
//! the 1-based row number, the step parameter values (only when steps were
//! declared) and every measurement column's value, tab separated, in the
//! encoding detected on the input file.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use tracing::{debug, info, warn};

use super::parser::LogReader;
use crate::constants::{MAG_SUFFIX, PH_SUFFIX};
use crate::value::CoercedValue;
use crate::Result;

/// How the export treats the target file
///
/// Appending is used when collecting several batch runs into one table;
/// every line, header included, is then prefixed with an extra cell.
#[derive(Debug, Clone, PartialEq)]
pub enum ExportMode {
    /// Truncate and write
    Write,
    /// Append, prefixing every data row with `<prefix>\t`
    Append { prefix: String },
}

impl LogReader {
    /// Split polar complex measurement columns into real columns
    ///
    /// Every measurement column whose first element is complex is replaced
    /// by two columns, `<name>_mag` and `<name>_ph`, appended after the
    /// remaining columns. The complex column itself is removed so the
    /// exported row shape stays deterministic. Rows of such a column that
    /// are not complex (text fallbacks) are carried over verbatim.
    pub fn split_complex_columns(&mut self) {
        let complex_columns: Vec<String> = self
            .measures
            .iter()
            .filter(|(_, values)| matches!(values.first(), Some(CoercedValue::Complex(_))))
            .map(|(name, _)| name.to_string())
            .collect();

        for name in complex_columns {
            let Some(values) = self.measures.remove(&name) else {
                continue;
            };
            debug!("Splitting complex column {}", name);
            let mut mags = Vec::with_capacity(values.len());
            let mut phases = Vec::with_capacity(values.len());
            for value in values {
                match value {
                    CoercedValue::Complex(c) => {
                        mags.push(CoercedValue::Real(c.mag));
                        phases.push(CoercedValue::Real(c.ph));
                    }
                    other => {
                        mags.push(other.clone());
                        phases.push(other);
                    }
                }
            }
            self.measures
                .insert_column(format!("{}{}", name, MAG_SUFFIX), mags);
            self.measures
                .insert_column(format!("{}{}", name, PH_SUFFIX), phases);
        }
    }

    /// Export the model as a tab separated table
    ///
    /// The header line is written once per call, also when appending - the
    /// caller owns deduplication across batch runs. An empty measurement
    /// table is reported and leaves the target untouched.
    pub fn export(&self, path: &Path, mode: ExportMode) -> Result<()> {
        if self.measures.is_empty() {
            warn!(
                "Empty data set, exiting without writing {}",
                path.display()
            );
            return Ok(());
        }

        let mut out = String::new();

        if let ExportMode::Append { .. } = mode {
            out.push_str("user info\t");
        }
        let step_names: Vec<&str> = self.steps.names().collect();
        let measure_names: Vec<&str> = self.measures.names().collect();
        out.push_str(&format!(
            "step\t{}\t{}\n",
            step_names.join("\t"),
            measure_names.join("\t")
        ));

        for index in 0..self.measures.row_count() {
            if let ExportMode::Append { prefix } = &mode {
                out.push_str(prefix);
                out.push('\t');
            }
            out.push_str(&(index + 1).to_string());

            if self.step_count > 0 {
                for name in &step_names {
                    out.push('\t');
                    push_cell(&mut out, self.steps.get(name), index);
                }
            }
            for name in &measure_names {
                out.push('\t');
                push_cell(&mut out, self.measures.get(name), index);
            }
            out.push('\n');
        }

        match &mode {
            ExportMode::Write => {
                fs::write(path, self.encoding().encode(&out, true))?;
            }
            ExportMode::Append { .. } => {
                let mut file = OpenOptions::new().create(true).append(true).open(path)?;
                file.write_all(&self.encoding().encode(&out, false))?;
            }
        }

        info!(
            "Exported {} rows to {}",
            self.measures.row_count(),
            path.display()
        );
        Ok(())
    }
}

/// One cell; a column shorter than the row count yields an empty cell
fn push_cell(out: &mut String, column: Option<&[CoercedValue]>, index: usize) {
    if let Some(value) = column.and_then(|values| values.get(index)) {
        out.push_str(&value.to_string());
    }
}
