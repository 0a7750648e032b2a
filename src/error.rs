//! Error handling for LTSpice output processing.
//!
//! Provides error types with context for file access, encoding detection
//! and dataset queries. Parse-level token failures are never errors: a token
//! that fails every coercion is kept as text and processing continues.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LtstepsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported extension in filename: {path} (expected .log, .txt or .mout)")]
    UnsupportedExtension { path: PathBuf },

    #[error("No .log, .txt or .mout file found in: {path}")]
    NoInputFound { path: PathBuf },

    #[error("Undecodable input file: {path} - {reason}")]
    Encoding { path: PathBuf, reason: String },

    #[error("'{name}' is not a valid step variable or measurement name")]
    NameNotFound { name: String },

    #[error("Step {step} is out of range for measurement '{name}' ({len} values)")]
    StepOutOfRange {
        name: String,
        step: usize,
        len: usize,
    },

    #[error("Measurement '{name}' is stepped, a step number must be provided")]
    AmbiguousStep { name: String },

    #[error("Invalid complex value format: '{token}'")]
    ComplexFormat { token: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl LtstepsError {
    /// Create a lookup error for an unknown step variable or measurement
    pub fn name_not_found(name: impl Into<String>) -> Self {
        Self::NameNotFound { name: name.into() }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an encoding error with context
    pub fn encoding(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Encoding {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, LtstepsError>;
