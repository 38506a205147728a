//! Hidden-preference registries and the viewer they apply to.

use content::{BrowsingLevel, NsfwLevel, TagId, UserId};
use std::collections::HashMap;

/// Set of hidden entity ids.
///
/// Stored as id -> flag so an entry can be switched off without being
/// forgotten; an id counts as hidden only while its flag is `true`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HiddenSet {
    entries: HashMap<u32, bool>,
}

impl HiddenSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: u32) -> bool {
        self.entries.get(&id).copied().unwrap_or(false)
    }

    /// True when any of `ids` is hidden.
    pub fn contains_any(&self, ids: &[u32]) -> bool {
        ids.iter().any(|&id| self.contains(id))
    }

    pub fn set(&mut self, id: u32, hidden: bool) {
        self.entries.insert(id, hidden);
    }

    pub fn hide(&mut self, id: u32) {
        self.set(id, true);
    }

    pub fn unhide(&mut self, id: u32) {
        self.set(id, false);
    }

    /// Number of ids currently hidden.
    pub fn len(&self) -> usize {
        self.entries.values().filter(|&&hidden| hidden).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Hidden ids, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.entries
            .iter()
            .filter(|(_, hidden)| **hidden)
            .map(|(id, _)| *id)
    }
}

impl FromIterator<u32> for HiddenSet {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|id| (id, true)).collect(),
        }
    }
}

impl Extend<u32> for HiddenSet {
    fn extend<I: IntoIterator<Item = u32>>(&mut self, iter: I) {
        for id in iter {
            self.hide(id);
        }
    }
}

/// Which registry an id belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HiddenKind {
    User,
    Model,
    Image,
    Tag,
}

/// Everything the viewer (or moderation) chose to hide.
///
/// Owned by whoever loads preferences; filters only ever read a snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HiddenRegistries {
    pub hidden_users: HiddenSet,
    pub hidden_models: HiddenSet,
    pub hidden_images: HiddenSet,
    pub hidden_tags: HiddenSet,
    /// Viewer is restricted to safe content.
    pub is_sfw: bool,
    /// Registries are still being fetched and must not be trusted yet.
    pub loading: bool,
}

impl HiddenRegistries {
    /// Empty registries, marked ready.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty registries that are still loading.
    pub fn loading() -> Self {
        Self {
            loading: true,
            ..Self::default()
        }
    }

    pub fn registry(&self, kind: HiddenKind) -> &HiddenSet {
        match kind {
            HiddenKind::User => &self.hidden_users,
            HiddenKind::Model => &self.hidden_models,
            HiddenKind::Image => &self.hidden_images,
            HiddenKind::Tag => &self.hidden_tags,
        }
    }

    pub fn registry_mut(&mut self, kind: HiddenKind) -> &mut HiddenSet {
        match kind {
            HiddenKind::User => &mut self.hidden_users,
            HiddenKind::Model => &mut self.hidden_models,
            HiddenKind::Image => &mut self.hidden_images,
            HiddenKind::Tag => &mut self.hidden_tags,
        }
    }

    /// An owner counts as hidden only when there is one.
    pub fn is_user_hidden(&self, user_id: Option<UserId>) -> bool {
        user_id.is_some_and(|id| self.hidden_users.contains(id))
    }

    pub fn any_tag_hidden(&self, tags: &[TagId]) -> bool {
        self.hidden_tags.contains_any(tags)
    }
}

/// Who is looking, and what ratings they may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewerContext {
    pub user_id: Option<UserId>,
    pub is_moderator: bool,
    pub browsing_level: BrowsingLevel,
}

impl ViewerContext {
    /// A signed-in, non-moderator viewer.
    pub fn new(user_id: UserId, browsing_level: BrowsingLevel) -> Self {
        Self {
            user_id: Some(user_id),
            is_moderator: false,
            browsing_level,
        }
    }

    pub fn anonymous(browsing_level: BrowsingLevel) -> Self {
        Self {
            user_id: None,
            is_moderator: false,
            browsing_level,
        }
    }

    pub fn with_moderator(mut self, is_moderator: bool) -> Self {
        self.is_moderator = is_moderator;
        self
    }

    /// True when the viewer is signed in and is `owner`.
    pub fn owns(&self, owner: Option<UserId>) -> bool {
        matches!((self.user_id, owner), (Some(viewer), Some(owner)) if viewer == owner)
    }
}

impl Default for ViewerContext {
    fn default() -> Self {
        Self::anonymous(NsfwLevel::PG)
    }
}

/// Immutable snapshot handed to a filter run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterContext {
    pub registries: HiddenRegistries,
    pub viewer: ViewerContext,
}

impl FilterContext {
    pub fn new(registries: HiddenRegistries, viewer: ViewerContext) -> Self {
        Self { registries, viewer }
    }
}
