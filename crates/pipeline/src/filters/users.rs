//! Visibility rules for user lists.

use super::rules::sfw_owner_exempt;
use crate::error::{FilterError, Result};
use crate::traits::{Filter, FilterOptions};
use content::{ContentList, ContentType, User};
use preferences::FilterContext;

/// Drops hidden users. The viewer always sees themselves outside safe-only
/// mode, even when they appear in their own hidden list.
pub struct UserFilter;

impl Filter for UserFilter {
    fn name(&self) -> &str {
        "UserFilter"
    }

    fn content_type(&self) -> ContentType {
        ContentType::Users
    }

    fn apply(
        &self,
        items: ContentList,
        context: &FilterContext,
        _options: &FilterOptions,
    ) -> Result<ContentList> {
        match items {
            ContentList::Users(users) => Ok(ContentList::Users(
                users
                    .into_iter()
                    .filter(|user| {
                        sfw_owner_exempt(Some(user.id), context)
                            || !context.registries.hidden_users.contains(user.id)
                    })
                    .collect(),
            )),
            other => Err(FilterError::ContentTypeMismatch {
                expected: ContentType::Users,
                found: other.content_type(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use content::NsfwLevel;
    use preferences::{HiddenRegistries, ViewerContext};

    #[test]
    fn test_user_filter() {
        let mut registries = HiddenRegistries::new();
        registries.hidden_users.hide(2);
        registries.hidden_users.hide(5);
        let ctx = FilterContext::new(registries, ViewerContext::new(5, NsfwLevel::SFW));

        let users = ContentList::Users(vec![User::new(1), User::new(2), User::new(5)]);
        let ContentList::Users(users) = UserFilter.apply(users, &ctx, &FilterOptions::default()).unwrap()
        else {
            panic!("expected users");
        };

        let ids: Vec<_> = users.iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![1, 5]);
    }

    #[test]
    fn test_self_hidden_in_sfw_mode() {
        let mut registries = HiddenRegistries::new();
        registries.hidden_users.hide(5);
        registries.is_sfw = true;
        let ctx = FilterContext::new(registries, ViewerContext::new(5, NsfwLevel::PG));

        let users = ContentList::Users(vec![User::new(5)]);
        let out = UserFilter.apply(users, &ctx, &FilterOptions::default()).unwrap();
        assert!(out.is_empty());
    }
}
