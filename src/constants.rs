//! Application constants for the LTSpice steps processor
//!
//! This module contains the marker literals recognized in LTSpice output
//! files, the supported file extensions and the derived column name suffixes
//! used throughout the application.

// =============================================================================
// Line markers
// =============================================================================

/// Prefix of a parameter sweep declaration in a .log file
pub const STEP_MARKER: &str = ".step";

/// Prefix of a measurement section in .log and .mout files
pub const MEASUREMENT_MARKER: &str = "Measurement:";

/// Prefix of a run delimiter in an exported .txt file
pub const STEP_INFO_MARKER: &str = "Step Information:";

/// First token of an LTSpice log file, used to disambiguate its encoding
pub const LOG_ENCODING_MARKER: &str = "Circuit:";

// =============================================================================
// File extensions
// =============================================================================

/// Input extensions this tool understands
pub const SUPPORTED_EXTENSIONS: &[&str] = &["log", "txt", "mout"];

/// Input extension to output extension mapping
pub const OUTPUT_EXTENSIONS: &[(&str, &str)] = &[
    ("log", "tlog"),
    ("txt", "tsv"),
    ("mout", "tmout"),
];

// =============================================================================
// Derived column names
// =============================================================================

/// Suffix for the lower bound of an interval measurement
pub const FROM_SUFFIX: &str = "_FROM";

/// Suffix for the upper bound of an interval measurement
pub const TO_SUFFIX: &str = "_TO";

/// Suffix for the time point of a point measurement
pub const AT_SUFFIX: &str = "_at";

/// Suffix for the magnitude column produced by the complex split
pub const MAG_SUFFIX: &str = "_mag";

/// Suffix for the phase column produced by the complex split
pub const PH_SUFFIX: &str = "_ph";
