//! Reformatting of "Export data as text" waveform files
//!
//! A stepped export stacks the runs one after another, separated by
//! `Step Information: Ton=400m (Run: 2/2)` lines. [`reformat_export`]
//! flattens that into a single table with the run number and the step
//! parameters as leading columns, ready for pivot-table use.
//! [`ExportData`] loads the same file into memory instead.

use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{info, trace};

use crate::constants::STEP_INFO_MARKER;
use crate::encoding::{FileEncoding, detect_encoding, read_to_string};
use crate::log::ColumnTable;
use crate::value::try_convert_value;
use crate::Result;

/// Run delimiter: `Step Information: <k=v ...> (Run: <n>/<total>)`
static STEP_INFO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Step Information: ([\w=\d\. -]+) +\(Run: (\d*)/\d*\)$").unwrap());

/// Rewrite a step-segmented export file as one flat table
///
/// The first line is the original header. Each delimiter line updates the
/// current run number and parameter values; the first one also emits the
/// combined header `Run\t<param names>\t<original header>`. Every other
/// line is emitted as `<run>\t<param values>\t<line>`.
///
/// A line that starts like a delimiter but fails the pattern is ignored and
/// the previous run context stays in effect for the following data lines.
/// That can mis-tag data in a malformed file; the behavior is kept because
/// downstream consumers rely on it.
///
/// Returns the number of data lines written.
pub fn reformat_export(export_file: &Path, tabular_file: &Path) -> Result<usize> {
    let encoding = detect_encoding(export_file, None)?;
    let content = read_to_string(export_file, encoding)?;
    info!("Reformatting export file: {}", export_file.display());

    let mut lines = content.lines();
    let headers = lines.next().unwrap_or_default();

    let mut out = String::new();
    let mut go_header = true;
    let mut run_no = "0".to_string();
    let mut param_values = String::new();
    let mut data_lines = 0usize;

    for line in lines {
        if line.starts_with(STEP_INFO_MARKER) {
            let Some(caps) = STEP_INFO_RE.captures(line) else {
                trace!("Malformed delimiter kept out of the output: {}", line);
                continue;
            };
            let step = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
            run_no = caps.get(2).map(|m| m.as_str()).unwrap_or_default().to_string();

            let values: Vec<&str> = step
                .split_whitespace()
                .map(|param| param.split_once('=').map(|(_, v)| v).unwrap_or(""))
                .collect();
            param_values = values.join("\t");

            if go_header {
                let keys: Vec<&str> = step
                    .split_whitespace()
                    .map(|param| param.split_once('=').map(|(k, _)| k).unwrap_or(param))
                    .collect();
                out.push_str(&format!("Run\t{}\t{}\n", keys.join("\t"), headers));
                go_header = false;
            }
        } else {
            out.push_str(&format!("{}\t{}\t{}\n", run_no, param_values, line));
            data_lines += 1;
        }
    }

    fs::write(tabular_file, encoding.encode(&out, true))?;
    info!(
        "Wrote {} data lines to {}",
        data_lines,
        tabular_file.display()
    );
    Ok(data_lines)
}

/// In-memory form of a stepped export file
///
/// One coerced column per original header, plus a `runno` column and one
/// column per step parameter carrying the run context of each data row.
#[derive(Debug)]
pub struct ExportData {
    encoding: FileEncoding,
    headers: Vec<String>,
    dataset: ColumnTable,
}

impl ExportData {
    /// Load an export file
    pub fn read(path: &Path) -> Result<Self> {
        let encoding = detect_encoding(path, None)?;
        let content = read_to_string(path, encoding)?;
        info!("Reading export file: {}", path.display());

        let mut lines = content.lines();
        let headers: Vec<String> = lines
            .next()
            .unwrap_or_default()
            .split('\t')
            .map(str::to_string)
            .collect();

        let mut dataset = ColumnTable::new();
        // Run context applied to every data row until the next delimiter
        let mut context: Vec<(String, String)> = Vec::new();

        for line in lines {
            if line.starts_with(STEP_INFO_MARKER) {
                let Some(caps) = STEP_INFO_RE.captures(line) else {
                    trace!("-> {}", line);
                    continue;
                };
                context.clear();
                context.push((
                    "runno".to_string(),
                    caps.get(2).map(|m| m.as_str()).unwrap_or_default().to_string(),
                ));
                let step = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
                for param in step.split_whitespace() {
                    if let Some((key, value)) = param.split_once('=') {
                        context.push((key.to_string(), value.to_string()));
                    }
                }
            } else {
                for (key, value) in &context {
                    dataset.push(key, try_convert_value(value));
                }
                for (header, token) in headers.iter().zip(line.split('\t')) {
                    dataset.push(header, try_convert_value(token));
                }
            }
        }

        Ok(ExportData {
            encoding,
            headers,
            dataset,
        })
    }

    /// Original header names, in file order
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// All columns, run context included
    pub fn dataset(&self) -> &ColumnTable {
        &self.dataset
    }

    /// Encoding detected on the input
    pub fn encoding(&self) -> FileEncoding {
        self.encoding
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::CoercedValue;
    use std::io::Write;
    use tempfile::tempdir;

    const STEPPED_EXPORT: &str = "time\tV(out)\n\
        Step Information: Ton=100m  (Run: 1/2)\n\
        0\t0.1\n\
        0.001\t0.2\n\
        Step Information: Ton=400m  (Run: 2/2)\n\
        0\t0.3\n\
        0.001\t0.4\n";

    fn write_export(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_reformat_stepped_export() {
        let dir = tempdir().unwrap();
        let input = write_export(dir.path(), "wave.txt", STEPPED_EXPORT);
        let output = dir.path().join("wave.tsv");

        let written = reformat_export(&input, &output).unwrap();
        assert_eq!(written, 4);

        let text = std::fs::read_to_string(&output).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Run\tTon\ttime\tV(out)");
        assert_eq!(lines[1], "1\t100m\t0\t0.1");
        assert_eq!(lines[2], "1\t100m\t0.001\t0.2");
        assert_eq!(lines[3], "2\t400m\t0\t0.3");
        assert_eq!(lines[4], "2\t400m\t0.001\t0.4");
    }

    #[test]
    fn test_malformed_delimiter_carries_context_forward() {
        let content = "time\tV(out)\n\
            Step Information: Ton=100m  (Run: 1/2)\n\
            0\t0.1\n\
            Step Information: broken line\n\
            0.001\t0.2\n";
        let dir = tempdir().unwrap();
        let input = write_export(dir.path(), "wave.txt", content);
        let output = dir.path().join("wave.tsv");

        reformat_export(&input, &output).unwrap();

        let text = std::fs::read_to_string(&output).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        // The broken delimiter is dropped and run 1 stays in effect
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[2], "1\t100m\t0.001\t0.2");
    }

    #[test]
    fn test_unstepped_export_gets_run_zero() {
        let content = "time\tV(out)\n0\t0.1\n0.001\t0.2\n";
        let dir = tempdir().unwrap();
        let input = write_export(dir.path(), "wave.txt", content);
        let output = dir.path().join("wave.tsv");

        reformat_export(&input, &output).unwrap();

        let text = std::fs::read_to_string(&output).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        // No delimiter means no combined header and an empty parameter cell
        assert_eq!(lines[0], "0\t\t0\t0.1");
        assert_eq!(lines[1], "0\t\t0.001\t0.2");
    }

    #[test]
    fn test_export_data_read() {
        let dir = tempdir().unwrap();
        let input = write_export(dir.path(), "wave.txt", STEPPED_EXPORT);

        let data = ExportData::read(&input).unwrap();
        assert_eq!(data.headers(), &["time".to_string(), "V(out)".to_string()]);

        let runno = data.dataset().get("runno").unwrap();
        assert_eq!(
            runno,
            &[
                CoercedValue::Int(1),
                CoercedValue::Int(1),
                CoercedValue::Int(2),
                CoercedValue::Int(2),
            ]
        );
        let ton = data.dataset().get("Ton").unwrap();
        assert_eq!(ton[0], CoercedValue::Text("100m".to_string()));

        let vout = data.dataset().get("V(out)").unwrap();
        assert_eq!(vout[3], CoercedValue::Real(0.4));
    }
}
