//! Visibility rules for model lists.
//!
//! A model is worth nothing on a card without its images, so a model whose
//! images are all pruned is dropped even when the model itself passed.

use super::rules::{Gate, prune_images, rating_gate};
use crate::error::{FilterError, Result};
use crate::traits::{Filter, FilterOptions};
use content::{ContentList, ContentType, Model};
use preferences::FilterContext;

/// ## Algorithm
/// For each model, stopping at the first decisive rule:
/// 1. Owner or moderator and unrated -> visible
/// 2. Rating does not overlap the browsing level -> hidden
/// 3. Owner is hidden -> hidden
/// 4. Model is hidden and `show_hidden` is off -> hidden
/// 5. Any model tag is hidden -> hidden
///
/// Then prune images by id and tag; drop the model if none remain.
pub struct ModelFilter;

impl ModelFilter {
    fn is_visible(model: &Model, ctx: &FilterContext, options: &FilterOptions) -> bool {
        let owner = Some(model.user.id);
        match rating_gate(owner, model.nsfw_level, ctx) {
            Gate::Visible => return true,
            Gate::Hidden => return false,
            Gate::Continue => {}
        }

        let registries = &ctx.registries;
        if registries.is_user_hidden(owner) {
            return false;
        }
        if registries.hidden_models.contains(model.id) && !options.show_hidden {
            return false;
        }
        !registries.any_tag_hidden(&model.tags)
    }

    fn filter(models: Vec<Model>, ctx: &FilterContext, options: &FilterOptions) -> Vec<Model> {
        models
            .into_iter()
            .filter(|model| Self::is_visible(model, ctx, options))
            .filter_map(|mut model| {
                model.images = prune_images(model.images, &ctx.registries, false);
                (!model.images.is_empty()).then_some(model)
            })
            .collect()
    }
}

impl Filter for ModelFilter {
    fn name(&self) -> &str {
        "ModelFilter"
    }

    fn content_type(&self) -> ContentType {
        ContentType::Models
    }

    fn apply(
        &self,
        items: ContentList,
        context: &FilterContext,
        options: &FilterOptions,
    ) -> Result<ContentList> {
        match items {
            ContentList::Models(models) => {
                Ok(ContentList::Models(Self::filter(models, context, options)))
            }
            other => Err(FilterError::ContentTypeMismatch {
                expected: ContentType::Models,
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

    fn model(id: u32, owner: u32, level: NsfwLevel) -> Model {
        Model::new(id, owner, level).with_images([ModelImage::new(id * 10, level)])
    }

    fn run(models: Vec<Model>, ctx: &FilterContext, options: FilterOptions) -> Vec<Model> {
        match ModelFilter.apply(ContentList::Models(models), ctx, &options).unwrap() {
            ContentList::Models(models) => models,
            other => panic!("unexpected list {:?}", other.content_type()),
        }
    }

    #[test]
    fn test_owner_unrated_overrides_self_hidden() {
        let mut registries = HiddenRegistries::new();
        registries.hidden_models.hide(1);
        let ctx = FilterContext::new(registries, ViewerContext::new(5, NsfwLevel::PG));

        let models = vec![Model::new(1, 5, NsfwLevel::NONE)
            .with_images([ModelImage::new(10, NsfwLevel::NONE)])];

        let filtered = run(models, &ctx, FilterOptions::default());
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, 1);
    }

    #[test]
    fn test_rating_outside_range() {
        let ctx = FilterContext::new(HiddenRegistries::new(), ViewerContext::new(1, NsfwLevel::SFW));
        let models = vec![
            model(1, 2, NsfwLevel::PG13),
            model(2, 2, NsfwLevel::X),
            // Owner's own rated model still needs an overlap
            model(3, 1, NsfwLevel::R),
        ];

        let filtered = run(models, &ctx, FilterOptions::default());
        let ids: Vec<_> = filtered.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn test_hidden_owner_model_and_tag() {
        let mut registries = HiddenRegistries::new();
        registries.hidden_users.hide(7);
        registries.hidden_models.hide(2);
        registries.hidden_tags.hide(99);
        let ctx = FilterContext::new(registries, ViewerContext::anonymous(NsfwLevel::PG));

        let models = vec![
            model(1, 7, NsfwLevel::PG),
            model(2, 8, NsfwLevel::PG),
            model(3, 8, NsfwLevel::PG).with_tags([99]),
            model(4, 8, NsfwLevel::PG).with_tags([98]),
        ];

        let filtered = run(models, &ctx, FilterOptions::default());
        let ids: Vec<_> = filtered.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![4]);
    }

    #[test]
    fn test_show_hidden_only_reveals_self_hidden() {
        let mut registries = HiddenRegistries::new();
        registries.hidden_users.hide(7);
        registries.hidden_models.hide(2);
        registries.hidden_tags.hide(99);
        let ctx = FilterContext::new(registries, ViewerContext::anonymous(NsfwLevel::PG));

        let models = vec![
            model(1, 7, NsfwLevel::PG),
            model(2, 8, NsfwLevel::PG),
            model(3, 8, NsfwLevel::PG).with_tags([99]),
        ];

        let filtered = run(models, &ctx, FilterOptions::show_hidden());
        let ids: Vec<_> = filtered.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![2]);
    }

    #[test]
    fn test_images_pruned_and_empty_model_dropped() {
        let mut registries = HiddenRegistries::new();
        registries.hidden_images.hide(10);
        registries.hidden_tags.hide(5);
        let ctx = FilterContext::new(registries, ViewerContext::anonymous(NsfwLevel::PG));

        let models = vec![
            Model::new(1, 2, NsfwLevel::PG).with_images([
                ModelImage::new(10, NsfwLevel::PG),
                ModelImage::new(11, NsfwLevel::PG).with_tags([5]),
                ModelImage::new(12, NsfwLevel::PG),
            ]),
            Model::new(2, 2, NsfwLevel::PG).with_images([ModelImage::new(10, NsfwLevel::PG)]),
            Model::new(3, 2, NsfwLevel::PG),
        ];

        let filtered = run(models, &ctx, FilterOptions::default());
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, 1);
        assert_eq!(filtered[0].images.len(), 1);
        assert_eq!(filtered[0].images[0].id, 12);
    }

    #[test]
    fn test_exempt_model_still_loses_hidden_images() {
        let mut registries = HiddenRegistries::new();
        registries.hidden_images.hide(10);
        let ctx = FilterContext::new(registries, ViewerContext::new(5, NsfwLevel::PG));

        let models = vec![Model::new(1, 5, NsfwLevel::NONE)
            .with_images([ModelImage::new(10, NsfwLevel::NONE)])];

        assert!(run(models, &ctx, FilterOptions::default()).is_empty());
    }

    #[test]
    fn test_wrong_list_type() {
        let ctx = FilterContext::default();
        let err = ModelFilter
            .apply(ContentList::empty(ContentType::Posts), &ctx, &FilterOptions::default())
            .unwrap_err();

        assert_eq!(
            err,
            FilterError::ContentTypeMismatch {
                expected: ContentType::Models,
                found: ContentType::Posts,
            }
        );
    }
}
