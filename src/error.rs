//! Error types for the coincidence sorting and list-mode export pipeline

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type used throughout the crate
pub type Result<T> = std::result::Result<T, LxePetError>;

/// Errors that abort a run
#[derive(Error, Debug)]
pub enum LxePetError {
    /// Configuration variant that maps to no known scanner
    #[error("unrecognized configuration variant: '{0}'")]
    UnknownConfigVariant(String),

    /// Configuration option outside `original | fine | super_fine`
    #[error("unrecognized configuration option: '{0}' (expected original, fine or super_fine)")]
    UnknownConfigOption(String),

    /// The lookup table holds no elements
    #[error("lookup table is empty: at least one detector element is required")]
    EmptyLookupTable,

    /// Parameter outside its valid range
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// I/O failure on a specific file
    #[error("failed to access '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// LUT byte length is not a whole number of 6-float records
    #[error("malformed lookup table '{}': {len} bytes is not a multiple of 24 (6 x f32)", .path.display())]
    MalformedLookupTable { path: PathBuf, len: usize },

    /// List-mode data byte length is not a whole number of 12-byte records
    #[error("malformed list-mode data: {len} bytes is not a multiple of 12")]
    MalformedListModeData { len: usize },

    /// A header line that does not follow `Key: Value`
    #[error("malformed header line {line}: '{content}'")]
    MalformedHeader { line: usize, content: String },

    /// A required header key is absent
    #[error("header is missing required key '{0}'")]
    MissingHeaderKey(String),

    /// Table column absent, null or of the wrong type
    #[error("invalid column '{column}': {reason}")]
    InvalidColumn { column: String, reason: String },

    /// Input filename does not encode material and source distance
    #[error("filename does not follow pattern 'coincidence_<material>_src<dist>cm.csv': {0}")]
    InvalidFilename(String),

    /// No candidate input file
    #[error("no files found matching pattern '{pattern}' in {}", .dir.display())]
    NoInputFound { pattern: String, dir: PathBuf },

    /// More than one candidate input file
    #[error("expected exactly one input file, but found {}: {}", .candidates.len(), .candidates.join(", "))]
    AmbiguousInput { candidates: Vec<String> },

    /// Failure inside Polars while reading or writing a table
    #[error("table error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    /// Failure reading a JSON run configuration
    #[error("invalid run configuration: {0}")]
    Json(#[from] serde_json::Error),
}

impl LxePetError {
    /// Wrap an I/O error with the path it occurred on
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
