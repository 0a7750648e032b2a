//! Command execution for the LTSpice steps processor CLI
//!
//! Resolves the input file (falling back to the newest processable file in
//! the working directory), derives the output filename from the input
//! extension and dispatches to the matching conversion pipeline.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use colored::Colorize;
use tracing::debug;

use crate::cli::args::{Args, has_supported_extension};
use crate::constants::OUTPUT_EXTENSIONS;
use crate::error::LtstepsError;
use crate::log::{ExportMode, LogReader};
use crate::reformat::reformat_export;
use crate::Result;

/// What one invocation processed
#[derive(Debug)]
pub struct RunSummary {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Sweep steps identified (.log and .mout inputs)
    pub steps: usize,
    /// Measurement or data rows written
    pub rows: usize,
}

/// Main command runner
pub fn run(args: Args) -> Result<RunSummary> {
    setup_logging(&args);

    let input = match &args.input {
        Some(path) => path.clone(),
        None => find_newest_input(Path::new("."))?,
    };
    let output = match &args.output {
        Some(path) => path.clone(),
        None => derive_output_path(&input)?,
    };

    if args.show_summary() {
        println!("{} {}", "Processing file".green().bold(), input.display());
        println!("{} {}", "Creating file".green().bold(), output.display());
    }

    let extension = input
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default();

    let summary = match extension {
        "txt" => {
            let rows = reformat_export(&input, &output)?;
            RunSummary {
                input,
                output,
                steps: 0,
                rows,
            }
        }
        "log" => {
            let mut reader = LogReader::parse(&input)?;
            if !args.keep_complex {
                reader.split_complex_columns();
            }
            reader.export(&output, ExportMode::Write)?;
            RunSummary {
                steps: reader.step_count(),
                rows: reader.measures().row_count(),
                input,
                output,
            }
        }
        "mout" => {
            // The sibling log file carries the .step definitions the
            // measurement script output lacks
            let log_file = input.with_extension("log");
            let mut reader = if log_file.exists() {
                debug!("Seeding step table from {}", log_file.display());
                let steps = LogReader::parse_steps_only(&log_file)?;
                LogReader::parse_with_steps(&input, steps.steps())?
            } else {
                LogReader::parse(&input)?
            };
            if !args.keep_complex {
                reader.split_complex_columns();
            }
            reader.export(&output, ExportMode::Write)?;
            RunSummary {
                steps: reader.step_count(),
                rows: reader.measures().row_count(),
                input,
                output,
            }
        }
        _ => {
            return Err(LtstepsError::UnsupportedExtension {
                path: input.clone(),
            });
        }
    };

    if args.show_summary() {
        println!(
            "{} {} steps, {} rows",
            "Done:".green().bold(),
            summary.steps,
            summary.rows
        );
    }
    Ok(summary)
}

/// Set up structured logging to stderr
pub fn setup_logging(args: &Args) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("ltsteps_processor={}", log_level)));

    if args.quiet {
        // Minimal logging for quiet mode
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init();
    } else {
        // Standard logging with timestamps
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

/// Newest file in `dir` with a supported extension, by modification time
pub fn find_newest_input(dir: &Path) -> Result<PathBuf> {
    let mut newest: Option<(SystemTime, PathBuf)> = None;

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() || !has_supported_extension(&path) {
            continue;
        }
        let modified = entry.metadata()?.modified()?;
        if newest.as_ref().is_none_or(|(time, _)| modified > *time) {
            newest = Some((modified, path));
        }
    }

    newest
        .map(|(_, path)| path)
        .ok_or_else(|| LtstepsError::NoInputFound {
            path: dir.to_path_buf(),
        })
}

/// Output path with the extension mapped from the input's
pub fn derive_output_path(input: &Path) -> Result<PathBuf> {
    let extension = input
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default();

    OUTPUT_EXTENSIONS
        .iter()
        .find(|(from, _)| *from == extension)
        .map(|(_, to)| input.with_extension(to))
        .ok_or_else(|| LtstepsError::UnsupportedExtension {
            path: input.to_path_buf(),
        })
}
