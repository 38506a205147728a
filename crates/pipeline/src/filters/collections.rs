//! Visibility rules for collection lists.

use super::rules::{image_hidden, prune_images, sfw_owner_exempt};
use crate::error::{FilterError, Result};
use crate::traits::{Filter, FilterOptions};
use content::{Collection, ContentList, ContentType};
use preferences::FilterContext;

/// ## Algorithm
/// 1. Viewer's own collection outside safe-only mode -> visible
/// 2. Owner is hidden -> hidden
/// 3. Representative image is hidden, or carries a hidden tag -> hidden
///
/// Then prune `images` by id and tag and drop the collection if none
/// remain; this runs for owner-exempt collections too.
pub struct CollectionFilter;

impl CollectionFilter {
    fn is_visible(collection: &Collection, ctx: &FilterContext) -> bool {
        let owner = collection.owner_id();
        if sfw_owner_exempt(owner, ctx) {
            return true;
        }
        if ctx.registries.is_user_hidden(owner) {
            return false;
        }
        match &collection.image {
            Some(image) => !image_hidden(image, &ctx.registries),
            None => true,
        }
    }
}

impl Filter for CollectionFilter {
    fn name(&self) -> &str {
        "CollectionFilter"
    }

    fn content_type(&self) -> ContentType {
        ContentType::Collections
    }

    fn apply(
        &self,
        items: ContentList,
        context: &FilterContext,
        _options: &FilterOptions,
    ) -> Result<ContentList> {
        match items {
            ContentList::Collections(collections) => Ok(ContentList::Collections(
                collections
                    .into_iter()
                    .filter(|collection| Self::is_visible(collection, context))
                    .filter_map(|mut collection| {
                        collection.images =
                            prune_images(collection.images, &context.registries, false);
                        (!collection.images.is_empty()).then_some(collection)
                    })
                    .collect(),
            )),
            other => Err(FilterError::ContentTypeMismatch {
                expected: ContentType::Collections,
                found: other.content_type(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use content::{NestedImage, NsfwLevel, OwnerRef};
    use preferences::{HiddenRegistries, ViewerContext};

    fn run(collections: Vec<Collection>, ctx: &FilterContext) -> Vec<Collection> {
        match CollectionFilter
            .apply(ContentList::Collections(collections), ctx, &FilterOptions::default())
            .unwrap()
        {
            ContentList::Collections(collections) => collections,
            other => panic!("unexpected list {:?}", other.content_type()),
        }
    }

    fn image(id: u32) -> NestedImage {
        NestedImage::new(id, NsfwLevel::PG)
    }

    #[test]
    fn test_hidden_representative_image_excludes() {
        let mut registries = HiddenRegistries::new();
        registries.hidden_images.hide(9);
        let ctx = FilterContext::new(registries, ViewerContext::anonymous(NsfwLevel::PG));

        let collections = vec![Collection::new(1, 2, NsfwLevel::PG).with_image(image(9))];
        assert!(run(collections, &ctx).is_empty());
    }

    #[test]
    fn test_representative_image_tag() {
        let mut registries = HiddenRegistries::new();
        registries.hidden_tags.hide(4);
        let ctx = FilterContext::new(registries, ViewerContext::anonymous(NsfwLevel::PG));

        let collections = vec![
            Collection::new(1, 2, NsfwLevel::PG)
                .with_image(image(9).with_tags([4]))
                .with_images([image(10)]),
            Collection::new(2, 2, NsfwLevel::PG)
                .with_image(image(11).with_tags([5]))
                .with_images([image(12)]),
        ];

        let filtered = run(collections, &ctx);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, 2);
    }

    #[test]
    fn test_pruning_and_drop() {
        let mut registries = HiddenRegistries::new();
        registries.hidden_images.hide(20);
        let ctx = FilterContext::new(registries, ViewerContext::anonymous(NsfwLevel::PG));

        let collections = vec![
            Collection::new(1, 2, NsfwLevel::PG).with_images([image(20), image(21)]),
            Collection::new(2, 2, NsfwLevel::PG).with_images([image(20)]),
            Collection::new(3, 2, NsfwLevel::PG),
        ];

        let filtered = run(collections, &ctx);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, 1);
        assert_eq!(filtered[0].images, vec![image(21)]);
    }

    #[test]
    fn test_owner_via_user_ref() {
        let mut registries = HiddenRegistries::new();
        registries.hidden_users.hide(6);
        let ctx = FilterContext::new(registries, ViewerContext::anonymous(NsfwLevel::PG));

        let collection = Collection {
            id: 1,
            user: Some(OwnerRef { id: 6 }),
            images: vec![image(1)],
            ..Default::default()
        };

        assert!(run(vec![collection], &ctx).is_empty());
    }

    #[test]
    fn test_owner_exempt_still_pruned() {
        let mut registries = HiddenRegistries::new();
        registries.hidden_images.hide(9);
        registries.hidden_images.hide(20);
        let ctx = FilterContext::new(registries, ViewerContext::new(2, NsfwLevel::ALL));

        let collections = vec![Collection::new(1, 2, NsfwLevel::X)
            .with_image(image(9))
            .with_images([image(20), image(21)])];

        let filtered = run(collections, &ctx);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].images, vec![image(21)]);
    }
}
