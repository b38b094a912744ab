//! Custom error types for the timetally application
//!
//! This module provides structured error handling using thiserror,
//! replacing generic anyhow errors with specific, actionable error types.

use thiserror::Error;

/// Main error type for the timetally application
#[derive(Error, Debug)]
pub enum TallyError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Time-sheet structure errors
    #[error("Sheet error: {0}")]
    Sheet(#[from] SheetError),

    /// Activity-code decode errors
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV read/write errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for the application boundary
    #[error("{0}")]
    Other(String),
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration file: {0}")]
    LoadFailed(String),

    #[error("Failed to save configuration file: {0}")]
    SaveFailed(String),

    #[error("Failed to create config directory: {0}")]
    DirectoryCreationFailed(String),

    #[error("Invalid max activity letter '{0}'. Must be an uppercase ASCII letter")]
    InvalidMaxLetter(char),
}

/// Structural problems with the time sheet as a whole.
///
/// These are always fatal: any aggregation built on a sheet that mixes
/// years or misspells a month name would be meaningless.
#[derive(Error, Debug)]
pub enum SheetError {
    #[error(
        "More than one year included in time sheet. Offending line(s): {}",
        format_lines(.rows)
    )]
    YearConflict { rows: Vec<usize> },

    #[error("Unknown month name '{name}' on line {row}")]
    UnknownMonth { name: String, row: usize },

    #[error("Invalid character '{ch}' found on line {row}, column 3")]
    ActivitySyntax { ch: char, row: usize },

    #[error("Timestamp on line {row} does not start with a 4-digit year")]
    BadTimestamp { row: usize },

    #[error("Time sheet contains no data rows")]
    EmptySheet,
}

/// Activity-code decode errors, carrying the offending character.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DecodeError {
    #[error("invalid character '{0}' in activity code")]
    InvalidCharacter(char),
}

fn format_lines(rows: &[usize]) -> String {
    rows.iter()
        .map(|r| r.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type alias for the timetally application
pub type Result<T> = std::result::Result<T, TallyError>;

// Conversion from anyhow::Error for the application boundary
impl From<anyhow::Error> for TallyError {
    fn from(err: anyhow::Error) -> Self {
        TallyError::Other(err.to_string())
    }
}
