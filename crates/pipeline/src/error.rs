//! Errors a filter run can report.
//!
//! Both variants are caller mistakes: data never produces them. Items a
//! viewer should not see are dropped, not reported.

use content::ContentType;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    /// The list handed over is not the shape the caller asked to filter
    #[error("Expected a list of {expected} but got {found}")]
    ContentTypeMismatch {
        expected: ContentType,
        found: ContentType,
    },

    /// No filter is registered for the content type
    #[error("Unhandled hidden preferences filter type: {0}")]
    UnsupportedContentType(ContentType),
}

pub type Result<T> = std::result::Result<T, FilterError>;
