//! Error types for building a filter context.

use content::ContentError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PreferencesError {
    /// The browsing level carries bits outside the known rating flags
    #[error("Invalid browsing level: {0:#b}")]
    InvalidBrowsingLevel(u32),

    /// The preferences document could not be read
    #[error(transparent)]
    Content(#[from] ContentError),
}

pub type Result<T> = std::result::Result<T, PreferencesError>;
