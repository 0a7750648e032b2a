//! Command-line argument definitions for the LTSpice steps processor
//!
//! This module defines the CLI interface using the clap derive API.

use crate::constants::SUPPORTED_EXTENSIONS;
use crate::error::LtstepsError;
use crate::Result;
use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for the LTSpice steps processor
///
/// Converts LTSpice simulation output (.log), exported waveform data (.txt)
/// and measurement script output (.mout) into tab separated tables.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "ltsteps-processor",
    version,
    about = "Convert LTSpice step and measurement output to spreadsheet-ready TSV",
    long_about = "Processes the text files LTSpice produces during simulation and aligns \
                  their data for use in a spreadsheet tool. Log files (.log) yield the \
                  .step and .meas information as a .tlog table; exported waveform data \
                  (.txt) is flattened with the run number and step parameters as columns \
                  into a .tsv table; measurement script output (.mout) becomes a .tmout \
                  table, joined with the step definitions of its sibling .log file when \
                  one exists."
)]
pub struct Args {
    /// Input file to process
    ///
    /// Must end in .log, .txt or .mout. When omitted, the newest file with
    /// one of those extensions in the current directory is processed.
    #[arg(value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Output file
    ///
    /// Defaults to the input filename with the extension replaced:
    /// .log -> .tlog, .txt -> .tsv, .mout -> .tmout
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Keep complex measurement columns in polar form
    ///
    /// By default every complex column is split into <name>_mag and
    /// <name>_ph real columns before export.
    #[arg(long = "keep-complex", help = "Do not split complex columns before export")]
    pub keep_complex: bool,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Suppress output (quiet mode)
    ///
    /// Only show errors. Overrides verbose settings.
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

impl Args {
    /// Validate the arguments for consistency
    pub fn validate(&self) -> Result<()> {
        if let Some(input) = &self.input {
            if !input.exists() {
                return Err(LtstepsError::configuration(format!(
                    "Input file does not exist: {}",
                    input.display()
                )));
            }
            if !has_supported_extension(input) {
                return Err(LtstepsError::UnsupportedExtension {
                    path: input.clone(),
                });
            }
        }
        Ok(())
    }

    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Check if the human-readable summary should be printed
    pub fn show_summary(&self) -> bool {
        !self.quiet
    }
}

/// Whether a path carries one of the supported input extensions
pub fn has_supported_extension(path: &std::path::Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext))
}
