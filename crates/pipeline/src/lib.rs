//! Visibility filtering for content lists.
//!
//! This crate provides:
//! - Filter trait and one implementation per content type
//! - VisibilityPipeline, the lookup table that dispatches a list to its filter
//!
//! ## Architecture
//! A caller hands over a typed list and a `FilterContext` snapshot:
//! 1. The pipeline short-circuits disabled, absent and still-loading input
//! 2. The filter for the list's type drops items the viewer must not see
//! 3. Container types prune their nested images and drop emptied containers
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::{FilterOptions, VisibilityPipeline};
//!
//! let pipeline = VisibilityPipeline::standard();
//! let outcome = pipeline.apply(ContentType::Posts, Some(posts), &context, FilterOptions::default())?;
//! render(outcome.items);
//! ```

pub mod error;
pub mod filter_pipeline;
pub mod filters;
pub mod traits;

// Re-export main types
pub use error::FilterError;
pub use filter_pipeline::{FilterOutcome, VisibilityPipeline};
pub use traits::{Filter, FilterOptions};
