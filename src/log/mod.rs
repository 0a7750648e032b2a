//! LTSpice log and measurement file parsing
//!
//! This module turns a `.log` or `.mout` file into an in-memory model of
//! step definitions and measurements that can be queried by name and
//! exported as a tab separated table.
//!
//! ## Architecture
//!
//! The parser is organized into logical components:
//! - [`classify`] - Line classification heuristics, kept in one place
//! - [`tables`] - Insertion-ordered column storage
//! - [`parser`] - The two-phase forward pass over the file
//! - [`query`] - Read-only accessors over the parsed model
//! - [`export`] - Complex column splitting and TSV export
//!
//! ## Usage
//!
//! ```no_run
//! use ltsteps_processor::log::{ExportMode, LogReader};
//!
//! # fn example() -> ltsteps_processor::Result<()> {
//! let mut reader = LogReader::parse(std::path::Path::new("batch.log"))?;
//! reader.split_complex_columns();
//! reader.export(std::path::Path::new("batch.tlog"), ExportMode::Write)?;
//! # Ok(())
//! # }
//! ```

pub mod classify;
pub mod export;
pub mod parser;
pub mod query;
pub mod tables;

#[cfg(test)]
pub mod tests;

// Re-export main types for easy access
pub use classify::LineKind;
pub use export::ExportMode;
pub use parser::LogReader;
pub use tables::ColumnTable;
