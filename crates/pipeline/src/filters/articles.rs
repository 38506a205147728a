//! Visibility rules for article lists.

use super::rules::{image_hidden, sfw_owner_exempt};
use crate::error::{FilterError, Result};
use crate::traits::{Filter, FilterOptions};
use content::{Article, ContentList, ContentType};
use preferences::FilterContext;

/// ## Algorithm
/// 1. Viewer's own article outside safe-only mode -> visible
/// 2. Author is hidden -> hidden
/// 3. Any article tag is hidden -> hidden
/// 4. Cover image is hidden, or carries a hidden tag -> hidden
///
/// Articles have no rating overlap check and no self-hidden registry.
pub struct ArticleFilter;

impl ArticleFilter {
    fn is_visible(article: &Article, ctx: &FilterContext) -> bool {
        let owner = article.user.map(|u| u.id);
        if sfw_owner_exempt(owner, ctx) {
            return true;
        }

        let registries = &ctx.registries;
        if registries.is_user_hidden(owner) {
            return false;
        }
        if article.tags.iter().any(|tag| registries.hidden_tags.contains(tag.id)) {
            return false;
        }
        match &article.cover_image {
            Some(cover) => !image_hidden(cover, registries),
            None => true,
        }
    }
}

impl Filter for ArticleFilter {
    fn name(&self) -> &str {
        "ArticleFilter"
    }

    fn content_type(&self) -> ContentType {
        ContentType::Articles
    }

    fn apply(
        &self,
        items: ContentList,
        context: &FilterContext,
        _options: &FilterOptions,
    ) -> Result<ContentList> {
        match items {
            ContentList::Articles(articles) => Ok(ContentList::Articles(
                articles
                    .into_iter()
                    .filter(|article| Self::is_visible(article, context))
                    .collect(),
            )),
            other => Err(FilterError::ContentTypeMismatch {
                expected: ContentType::Articles,
                found: other.content_type(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use content::{ModelImage, NsfwLevel};
    use preferences::{HiddenRegistries, ViewerContext};

    fn run(articles: Vec<Article>, ctx: &FilterContext) -> Vec<u32> {
        match ArticleFilter
            .apply(ContentList::Articles(articles), ctx, &FilterOptions::default())
            .unwrap()
        {
            ContentList::Articles(articles) => articles.iter().map(|a| a.id).collect(),
            other => panic!("unexpected list {:?}", other.content_type()),
        }
    }

    fn registries() -> HiddenRegistries {
        let mut registries = HiddenRegistries::new();
        registries.hidden_users.hide(3);
        registries.hidden_images.hide(100);
        registries.hidden_tags.hide(7);
        registries
    }

    #[test]
    fn test_article_rules() {
        let ctx = FilterContext::new(registries(), ViewerContext::new(1, NsfwLevel::PG));

        let articles = vec![
            Article::new(1, 3, NsfwLevel::PG),
            Article::new(2, 9, NsfwLevel::PG).with_tags([7]),
            Article::new(3, 9, NsfwLevel::PG).with_cover(ModelImage::new(100, NsfwLevel::PG)),
            Article::new(4, 9, NsfwLevel::PG)
                .with_cover(ModelImage::new(101, NsfwLevel::PG).with_tags([7])),
            Article::new(5, 9, NsfwLevel::PG)
                .with_tags([8])
                .with_cover(ModelImage::new(102, NsfwLevel::PG)),
            // No rating check: an X article from an unhidden author passes
            Article::new(6, 9, NsfwLevel::X),
        ];

        assert_eq!(run(articles, &ctx), vec![5, 6]);
    }

    #[test]
    fn test_owner_exempt_unless_sfw() {
        let mut registries = registries();
        registries.hidden_users.hide(1);
        let articles = || vec![Article::new(1, 1, NsfwLevel::R).with_tags([7])];

        let ctx = FilterContext::new(registries.clone(), ViewerContext::new(1, NsfwLevel::ALL));
        assert_eq!(run(articles(), &ctx), vec![1]);

        registries.is_sfw = true;
        let ctx = FilterContext::new(registries, ViewerContext::new(1, NsfwLevel::PG));
        assert!(run(articles(), &ctx).is_empty());
    }

    #[test]
    fn test_authorless_article() {
        let ctx = FilterContext::new(registries(), ViewerContext::anonymous(NsfwLevel::PG));
        let article = Article {
            id: 1,
            ..Default::default()
        };
        assert_eq!(run(vec![article], &ctx), vec![1]);
    }
}
