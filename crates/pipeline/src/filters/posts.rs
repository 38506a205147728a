//! Visibility rules for post lists.
//!
//! Posts differ from the other containers in two ways: only `Scanned`
//! images survive pruning, and a post that arrives without an `images`
//! field is kept as-is rather than treated as empty. The representative
//! `image` is checked by the item rules but does not have to survive
//! pruning.

use super::rules::{image_hidden, prune_images, sfw_owner_exempt};
use crate::error::{FilterError, Result};
use crate::traits::{Filter, FilterOptions};
use content::{ContentList, ContentType, Post};
use preferences::FilterContext;

pub struct PostFilter;

impl PostFilter {
    fn is_visible(post: &Post, ctx: &FilterContext) -> bool {
        let owner = Some(post.user.id);
        if sfw_owner_exempt(owner, ctx) {
            return true;
        }
        if ctx.registries.is_user_hidden(owner) {
            return false;
        }
        match &post.image {
            Some(image) => !image_hidden(image, &ctx.registries),
            None => true,
        }
    }

    fn prune(mut post: Post, ctx: &FilterContext) -> Option<Post> {
        let Some(images) = post.images.take() else {
            return Some(post);
        };
        let images = prune_images(images, &ctx.registries, true);
        if images.is_empty() {
            return None;
        }
        post.images = Some(images);
        Some(post)
    }
}

impl Filter for PostFilter {
    fn name(&self) -> &str {
        "PostFilter"
    }

    fn content_type(&self) -> ContentType {
        ContentType::Posts
    }

    fn apply(
        &self,
        items: ContentList,
        context: &FilterContext,
        _options: &FilterOptions,
    ) -> Result<ContentList> {
        match items {
            ContentList::Posts(posts) => Ok(ContentList::Posts(
                posts
                    .into_iter()
                    .filter(|post| Self::is_visible(post, context))
                    .filter_map(|post| Self::prune(post, context))
                    .collect(),
            )),
            other => Err(FilterError::ContentTypeMismatch {
                expected: ContentType::Posts,
                found: other.content_type(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use content::{IngestionStatus, NestedImage, NsfwLevel};
    use preferences::{HiddenRegistries, ViewerContext};

    fn run(posts: Vec<Post>, ctx: &FilterContext) -> Vec<Post> {
        match PostFilter
            .apply(ContentList::Posts(posts), ctx, &FilterOptions::default())
            .unwrap()
        {
            ContentList::Posts(posts) => posts,
            other => panic!("unexpected list {:?}", other.content_type()),
        }
    }

    fn anonymous(registries: HiddenRegistries) -> FilterContext {
        FilterContext::new(registries, ViewerContext::anonymous(NsfwLevel::PG))
    }

    #[test]
    fn test_only_scanned_images_survive() {
        let ctx = anonymous(HiddenRegistries::new());
        let posts = vec![Post::new(1, 9, NsfwLevel::NONE).with_images([
            NestedImage::new(1, NsfwLevel::NONE).with_ingestion(IngestionStatus::Pending),
            NestedImage::new(2, NsfwLevel::NONE).with_ingestion(IngestionStatus::Scanned),
        ])];

        let filtered = run(posts, &ctx);
        assert_eq!(filtered.len(), 1);
        let images = filtered[0].images.as_ref().unwrap();
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].id, 2);
    }

    #[test]
    fn test_absent_images_kept_empty_images_dropped() {
        let ctx = anonymous(HiddenRegistries::new());
        let posts = vec![
            Post::new(1, 9, NsfwLevel::PG),
            Post::new(2, 9, NsfwLevel::PG).with_images(Vec::new()),
        ];

        let filtered = run(posts, &ctx);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, Some(1));
        assert!(filtered[0].images.is_none());
    }

    #[test]
    fn test_representative_image_checked_but_not_pruned() {
        let mut registries = HiddenRegistries::new();
        registries.hidden_images.hide(50);
        registries.hidden_tags.hide(8);
        let ctx = anonymous(registries);

        let blocked = NestedImage::new(60, NsfwLevel::PG).with_ingestion(IngestionStatus::Blocked);
        let posts = vec![
            Post::new(1, 9, NsfwLevel::PG).with_image(NestedImage::new(50, NsfwLevel::PG)),
            Post::new(2, 9, NsfwLevel::PG)
                .with_image(NestedImage::new(51, NsfwLevel::PG).with_tags([8])),
            // Representative image would fail the scan requirement; it stays
            Post::new(3, 9, NsfwLevel::PG)
                .with_image(blocked.clone())
                .with_images([NestedImage::new(61, NsfwLevel::PG)]),
        ];

        let filtered = run(posts, &ctx);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, Some(3));
        assert_eq!(filtered[0].image, Some(blocked));
    }

    #[test]
    fn test_hidden_author_and_owner_exemption() {
        let mut registries = HiddenRegistries::new();
        registries.hidden_users.hide(9);
        let posts = || vec![Post::new(1, 9, NsfwLevel::PG)];

        assert!(run(posts(), &anonymous(registries.clone())).is_empty());

        let ctx = FilterContext::new(registries, ViewerContext::new(9, NsfwLevel::ALL));
        assert_eq!(run(posts(), &ctx).len(), 1);
    }

    #[test]
    fn test_nested_images_pruned_by_id_and_tag() {
        let mut registries = HiddenRegistries::new();
        registries.hidden_images.hide(1);
        registries.hidden_tags.hide(3);
        let ctx = anonymous(registries);

        let posts = vec![Post::new(1, 9, NsfwLevel::PG).with_images([
            NestedImage::new(1, NsfwLevel::PG),
            NestedImage::new(2, NsfwLevel::PG).with_tags([3]),
        ])];

        assert!(run(posts, &ctx).is_empty());
    }
}
