//! Visibility rules for standalone image lists.

use super::rules::{Gate, rating_gate};
use crate::error::{FilterError, Result};
use crate::traits::{Filter, FilterOptions};
use content::{ContentList, ContentType, Image};
use preferences::FilterContext;

/// Same item rules as models, keyed on `hidden_images` and the image's
/// `tagIds`. Images have nothing nested to prune.
pub struct ImageFilter;

impl ImageFilter {
    fn is_visible(image: &Image, ctx: &FilterContext, options: &FilterOptions) -> bool {
        let owner = image.owner_id();
        match rating_gate(owner, image.nsfw_level, ctx) {
            Gate::Visible => return true,
            Gate::Hidden => return false,
            Gate::Continue => {}
        }

        let registries = &ctx.registries;
        if registries.is_user_hidden(owner) {
            return false;
        }
        if registries.hidden_images.contains(image.id) && !options.show_hidden {
            return false;
        }
        !registries.any_tag_hidden(&image.tag_ids)
    }
}

impl Filter for ImageFilter {
    fn name(&self) -> &str {
        "ImageFilter"
    }

    fn content_type(&self) -> ContentType {
        ContentType::Images
    }

    fn apply(
        &self,
        items: ContentList,
        context: &FilterContext,
        options: &FilterOptions,
    ) -> Result<ContentList> {
        match items {
            ContentList::Images(images) => Ok(ContentList::Images(
                images
                    .into_iter()
                    .filter(|image| Self::is_visible(image, context, options))
                    .collect(),
            )),
            other => Err(FilterError::ContentTypeMismatch {
                expected: ContentType::Images,
                found: other.content_type(),
            }),
        }
    }
}
