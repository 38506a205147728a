//! The VisibilityPipeline dispatches a list to the filter for its type.
//!
//! Filters are registered with the builder pattern, one per content type.
//! `VisibilityPipeline::standard()` registers the filter for every type.

use crate::error::{FilterError, Result};
use crate::filters::{
    ArticleFilter, BountyFilter, CollectionFilter, ImageFilter, ModelFilter, PostFilter,
    UserFilter,
};
use crate::traits::{Filter, FilterOptions};
use content::{ContentList, ContentType};
use preferences::FilterContext;
use std::collections::HashMap;
use tracing::{debug, instrument, warn};

/// Result of one pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterOutcome {
    /// Visible items, same variant as the request.
    pub items: ContentList,
    /// How many input items were removed.
    pub hidden_count: usize,
    /// Registries were still loading; `items` is empty until they are ready.
    pub loading_preferences: bool,
}

/// Lookup table from content type to its filter.
///
/// ## Usage
/// ```ignore
/// let pipeline = VisibilityPipeline::standard();
/// let outcome = pipeline.apply(ContentType::Models, Some(list), &context, FilterOptions::default())?;
/// println!("{} hidden", outcome.hidden_count);
/// ```
pub struct VisibilityPipeline {
    filters: HashMap<ContentType, Box<dyn Filter>>,
}

impl VisibilityPipeline {
    /// Create a pipeline with no filters registered.
    pub fn new() -> Self {
        Self {
            filters: HashMap::new(),
        }
    }

    /// A pipeline with the filter for every content type.
    pub fn standard() -> Self {
        Self::new()
            .register(ModelFilter)
            .register(ImageFilter)
            .register(ArticleFilter)
            .register(UserFilter)
            .register(CollectionFilter)
            .register(BountyFilter)
            .register(PostFilter)
    }

    /// Register a filter under its content type (builder pattern).
    ///
    /// A later registration for the same type replaces the earlier one.
    pub fn register(mut self, filter: impl Filter + 'static) -> Self {
        self.filters.insert(filter.content_type(), Box::new(filter));
        self
    }

    pub fn supports(&self, content_type: ContentType) -> bool {
        self.filters.contains_key(&content_type)
    }

    /// Filter `items` for the viewer described by `context`.
    ///
    /// ## Algorithm
    /// 1. `disabled`: hand the input back untouched
    /// 2. No input: empty list
    /// 3. Registries still loading: empty list, everything counted as hidden
    /// 4. Otherwise run the filter registered for `content_type`
    ///
    /// # Returns
    /// * `Ok(FilterOutcome)` - Visible items and the hidden count
    /// * `Err` - `items` is not a `content_type` list, or no filter is
    ///   registered for `content_type`
    #[instrument(skip(self, items, context))]
    pub fn apply(
        &self,
        content_type: ContentType,
        items: Option<ContentList>,
        context: &FilterContext,
        options: FilterOptions,
    ) -> Result<FilterOutcome> {
        let loading = context.registries.loading;

        if let Some(list) = &items {
            if list.content_type() != content_type {
                return Err(FilterError::ContentTypeMismatch {
                    expected: content_type,
                    found: list.content_type(),
                });
            }
        }

        if options.disabled {
            return Ok(FilterOutcome {
                items: items.unwrap_or_else(|| ContentList::empty(content_type)),
                hidden_count: 0,
                loading_preferences: loading,
            });
        }

        let Some(items) = items else {
            return Ok(FilterOutcome {
                items: ContentList::empty(content_type),
                hidden_count: 0,
                loading_preferences: loading,
            });
        };

        let input_count = items.len();

        if loading {
            warn!(
                "Hidden preferences still loading, withholding {} {}",
                input_count, content_type
            );
            return Ok(FilterOutcome {
                items: ContentList::empty(content_type),
                hidden_count: input_count,
                loading_preferences: true,
            });
        }

        let filter = self
            .filters
            .get(&content_type)
            .ok_or(FilterError::UnsupportedContentType(content_type))?;

        debug!(
            "Applying filter: {} (input count: {})",
            filter.name(),
            input_count
        );
        let visible = filter.apply(items, context, &options)?;
        debug!(
            "Filter applied: {} (output count: {})",
            filter.name(),
            visible.len()
        );

        Ok(FilterOutcome {
            hidden_count: input_count.saturating_sub(visible.len()),
            items: visible,
            loading_preferences: false,
        })
    }
}

impl Default for VisibilityPipeline {
    fn default() -> Self {
        Self::standard()
    }
}
