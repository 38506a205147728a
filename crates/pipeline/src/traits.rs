//! Core traits for the visibility pipeline.
//!
//! One `Filter` exists per content type. The pipeline looks the filter up by
//! the list's `ContentType` and hands it the whole list plus an immutable
//! snapshot of the viewer's preferences.

use crate::error::Result;
use content::{ContentList, ContentType};
use preferences::FilterContext;

/// Per-call switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterOptions {
    /// Reveal items the viewer hid themselves (moderation review). Owner and
    /// tag hiding still apply.
    pub show_hidden: bool,
    /// Skip filtering entirely.
    pub disabled: bool,
}

impl FilterOptions {
    pub fn show_hidden() -> Self {
        Self {
            show_hidden: true,
            disabled: false,
        }
    }

    pub fn disabled() -> Self {
        Self {
            show_hidden: false,
            disabled: true,
        }
    }
}

/// Visibility rules for one content type.
///
/// ## Design Note
/// - `Send + Sync` so a pipeline can be shared across request tasks
/// - Filters take ownership of the list and return the narrowed list, so
///   surviving items move through without cloning
pub trait Filter: Send + Sync {
    /// Returns the name of this filter (for logging/debugging)
    fn name(&self) -> &str;

    /// The list shape this filter accepts.
    fn content_type(&self) -> ContentType;

    /// Drop what the viewer must not see and prune nested images.
    ///
    /// # Returns
    /// * `Ok(ContentList)` - The visible items, same variant as the input
    /// * `Err` - If `items` is not this filter's content type
    fn apply(
        &self,
        items: ContentList,
        context: &FilterContext,
        options: &FilterOptions,
    ) -> Result<ContentList>;
}
