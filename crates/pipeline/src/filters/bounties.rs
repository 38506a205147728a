//! Visibility rules for bounty lists.

use super::rules::{prune_images, sfw_owner_exempt};
use crate::error::{FilterError, Result};
use crate::traits::{Filter, FilterOptions};
use content::{Bounty, ContentList, ContentType};
use preferences::FilterContext;

/// ## Algorithm
/// 1. Viewer's own bounty outside safe-only mode -> visible
/// 2. Owner is hidden -> hidden
/// 3. Any of its images is hidden by id -> hidden
/// 4. Any bounty tag is hidden -> hidden
///
/// Then prune images by id and tag and drop the bounty if none remain.
/// A bounty without images is always dropped.
pub struct BountyFilter;

impl BountyFilter {
    fn is_visible(bounty: &Bounty, ctx: &FilterContext) -> bool {
        let owner = Some(bounty.user.id);
        if sfw_owner_exempt(owner, ctx) {
            return true;
        }

        let registries = &ctx.registries;
        if registries.is_user_hidden(owner) {
            return false;
        }
        if bounty
            .images
            .iter()
            .any(|image| registries.hidden_images.contains(image.id))
        {
            return false;
        }
        !registries.any_tag_hidden(&bounty.tags)
    }
}

impl Filter for BountyFilter {
    fn name(&self) -> &str {
        "BountyFilter"
    }

    fn content_type(&self) -> ContentType {
        ContentType::Bounties
    }

    fn apply(
        &self,
        items: ContentList,
        context: &FilterContext,
        _options: &FilterOptions,
    ) -> Result<ContentList> {
        match items {
            ContentList::Bounties(bounties) => Ok(ContentList::Bounties(
                bounties
                    .into_iter()
                    .filter(|bounty| Self::is_visible(bounty, context))
                    .filter_map(|mut bounty| {
                        bounty.images = prune_images(bounty.images, &context.registries, false);
                        (!bounty.images.is_empty()).then_some(bounty)
                    })
                    .collect(),
            )),
            other => Err(FilterError::ContentTypeMismatch {
                expected: ContentType::Bounties,
                found: other.content_type(),
            }),
        }
    }
}
