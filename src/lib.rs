//! LTSpice Steps Processor Library
//!
//! A Rust library for processing the text files LTSpice produces during
//! simulation and aligning their data for use in a spreadsheet tool.
//!
//! This library provides tools for:
//! - Parsing .log files for .step sweep definitions and .meas results
//! - Parsing .mout measurement script output, joined with sibling log steps
//! - Flattening stepped .txt waveform exports into a single table
//! - Querying parsed models by step parameter conditions
//! - Exporting everything as tab separated values in the input's encoding

pub mod constants;
pub mod encoding;
pub mod error;
pub mod reformat;
pub mod value;

// Core log parsing and data model
pub mod log;

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use encoding::{FileEncoding, detect_encoding};
pub use error::{LtstepsError, Result};
pub use log::{ColumnTable, ExportMode, LogReader};
pub use reformat::{ExportData, reformat_export};
pub use value::{CoercedValue, PolarComplex, try_convert_value, try_convert_values};
