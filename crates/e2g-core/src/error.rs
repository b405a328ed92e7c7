//! Error handling for e2g
//!
//! Provides the error types of the conversion pipeline:
//! - Conversion errors (stream level, terminal for the whole conversion)
//! - Conversion warnings (line level, recovered in place)
//!
//! All error types use `thiserror` for ergonomic error handling.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Conversion error type
///
/// Any of these stops the conversion. No output file is written for an
/// input failure or a strict-mode violation.
#[derive(Error, Debug)]
pub enum ConversionError {
    /// The input file is missing or unreadable
    #[error("Failed to open input file {}: {source}", path.display())]
    InputOpen {
        /// The input path.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The input stream failed part way through
    #[error("Failed to read input file {} after line {line_number}: {source}", path.display())]
    InputRead {
        /// The input path.
        path: PathBuf,
        /// Last line successfully read before the failure.
        line_number: u64,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The output file could not be written
    #[error("Failed to write output file {}: {source}", path.display())]
    OutputWrite {
        /// The output path.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Strict mode is enabled and some lines were only recovered
    #[error("Strict mode: {count} line(s) could not be converted cleanly")]
    StrictViolation {
        /// Number of recorded warnings.
        count: usize,
    },
}

impl ConversionError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::InputOpen { .. } | Self::InputRead { .. } => 1,
            Self::OutputWrite { .. } => 2,
            Self::StrictViolation { .. } => 3,
        }
    }
}

/// Result type alias for conversion operations.
pub type ConversionResult<T> = Result<T, ConversionError>;

/// Kind of a recovered line-level anomaly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// Leading code letter is not handled
    UnrecognizedCode,
    /// M-code value is not handled or not numeric
    UnknownMCode,
    /// A numeric field has no digits, or a coordinate pair is not X then Y
    MalformedNumericField,
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnrecognizedCode => write!(f, "unrecognized code"),
            Self::UnknownMCode => write!(f, "unknown M-code"),
            Self::MalformedNumericField => write!(f, "malformed numeric field"),
        }
    }
}

/// A line that was converted to a diagnostic comment instead of G-code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionWarning {
    /// 1-based input line number.
    pub line_number: u64,
    /// What went wrong.
    pub kind: WarningKind,
    /// The trimmed input line.
    pub line: String,
}

impl fmt::Display for ConversionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {} `{}`", self.line_number, self.kind, self.line)
    }
}
