//! Error types for cleansight.

use std::fmt;

/// All errors produced by cleansight operations.
///
/// Only [`Structural`](PipelineError::Structural) and
/// [`EmptyDataset`](PipelineError::EmptyDataset) are surfaced by the two
/// public entry points; everything else originates at the table/loader
/// boundary. Anomalies confined to a single column (unparseable values,
/// degenerate distributions) never become errors — they degrade into
/// skipped columns or `None` cells in the output.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineError {
    /// Table shape invariant violated (fatal, aborts the pipeline).
    Structural { message: String },
    /// No rows available for the insight phase.
    EmptyDataset,
    /// CSV parsing failed.
    CsvParse { line: usize, message: String },
    /// Column length does not match the table's row count.
    LengthMismatch { expected: usize, actual: usize },
    /// Column name already present in the table.
    DuplicateColumn { name: String },
    /// I/O error during file reading.
    Io(String),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Structural { message } => {
                write!(f, "structural invariant violated: {message}")
            }
            Self::EmptyDataset => write!(f, "dataset has no rows"),
            Self::CsvParse { line, message } => {
                write!(f, "CSV parse error at line {line}: {message}")
            }
            Self::LengthMismatch { expected, actual } => {
                write!(f, "expected column of length {expected}, got {actual}")
            }
            Self::DuplicateColumn { name } => {
                write!(f, "column '{name}' already exists")
            }
            Self::Io(msg) => write!(f, "I/O error: {msg}"),
        }
    }
}

impl std::error::Error for PipelineError {}

impl From<std::io::Error> for PipelineError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}
