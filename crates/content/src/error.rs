//! Error types for the content crate.

use thiserror::Error;

/// Errors that can occur while reading or interpreting content lists
#[derive(Error, Debug)]
pub enum ContentError {
    /// File could not be found or opened
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The document was not valid JSON for the requested content shape
    #[error("Parse error in {file}: {source}")]
    ParseError {
        file: String,
        #[source]
        source: serde_json::Error,
    },

    /// A content type tag that no filter knows about
    #[error("Unsupported content type: {0}")]
    UnsupportedContentType(String),

    /// A data field had an invalid value
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, ContentError>;
