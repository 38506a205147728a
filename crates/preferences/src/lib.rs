//! # Preferences Crate
//!
//! What a viewer has hidden, and who the viewer is.
//!
//! ## Components
//!
//! - **types**: `HiddenSet`, `HiddenRegistries`, `ViewerContext` and the
//!   `FilterContext` snapshot filters run against
//! - **context**: building a `FilterContext` from a preferences document
//!
//! ## Example Usage
//!
//! ```ignore
//! use preferences::load_filter_context;
//!
//! let ctx = load_filter_context(Path::new("prefs.json"))?;
//! if ctx.registries.hidden_tags.contains(7) { /* ... */ }
//! ```

pub mod context;
pub mod error;
pub mod types;

pub use context::{
    DEFAULT_BROWSING_LEVEL, PreferencesDocument, ViewerDocument, build_filter_context,
    load_filter_context,
};
pub use error::{PreferencesError, Result};
pub use types::{FilterContext, HiddenKind, HiddenRegistries, HiddenSet, ViewerContext};
