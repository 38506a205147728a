//! Core domain types for content lists.
//!
//! Every list the catalog renders is one of seven shapes. The shapes share
//! an `nsfwLevel` rating and an owner reference, and several carry tag ids
//! and nested images. Field names follow the JSON the catalog produces
//! (camelCase); fields this crate does not interpret are kept in `extra`
//! so a filtered list serializes back with everything it came in with.

use crate::error::ContentError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::ops::BitOr;
use std::str::FromStr;

// =============================================================================
// Type Aliases
// =============================================================================

pub type UserId = u32;
pub type ModelId = u32;
pub type ImageId = u32;
pub type ArticleId = u32;
pub type CollectionId = u32;
pub type BountyId = u32;
pub type PostId = u32;
pub type TagId = u32;

// =============================================================================
// Ratings
// =============================================================================

/// Maturity rating stored as bit flags.
///
/// An item carries the flag of its classification (or `0` when it has not
/// been classified yet). A viewer's browsing level is the union of the flags
/// they are allowed to see, and an item is in range when the two overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NsfwLevel(u32);

/// A viewer's permitted rating range uses the same flag space.
pub type BrowsingLevel = NsfwLevel;

impl NsfwLevel {
    /// Unrated; the minimum level.
    pub const NONE: NsfwLevel = NsfwLevel(0);
    pub const PG: NsfwLevel = NsfwLevel(1);
    pub const PG13: NsfwLevel = NsfwLevel(2);
    pub const R: NsfwLevel = NsfwLevel(4);
    pub const X: NsfwLevel = NsfwLevel(8);
    pub const XXX: NsfwLevel = NsfwLevel(16);
    pub const BLOCKED: NsfwLevel = NsfwLevel(32);

    /// Every flag that is safe for work.
    pub const SFW: NsfwLevel = NsfwLevel(1 | 2);
    /// Every flag a browsing level may contain.
    pub const ALL: NsfwLevel = NsfwLevel(1 | 2 | 4 | 8 | 16 | 32);

    /// Build a level from raw bits, rejecting bits outside the known flags.
    pub fn from_bits(bits: u32) -> Option<Self> {
        if bits & !Self::ALL.0 == 0 {
            Some(NsfwLevel(bits))
        } else {
            None
        }
    }

    /// Build a level without validating the bits.
    ///
    /// Item ratings come from the catalog as-is; only browsing levels are
    /// validated.
    pub const fn from_bits_retain(bits: u32) -> Self {
        NsfwLevel(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    /// True for the minimum level (not yet classified).
    pub const fn is_unrated(self) -> bool {
        self.0 == 0
    }

    /// True when the two levels share at least one flag.
    pub const fn overlaps(self, other: NsfwLevel) -> bool {
        self.0 & other.0 != 0
    }

    /// True when no flag above `PG` is set.
    pub const fn is_safe_only(self) -> bool {
        self.0 & !Self::PG.0 == 0
    }
}

impl BitOr for NsfwLevel {
    type Output = NsfwLevel;

    fn bitor(self, rhs: NsfwLevel) -> NsfwLevel {
        NsfwLevel(self.0 | rhs.0)
    }
}

impl From<u32> for NsfwLevel {
    fn from(bits: u32) -> Self {
        NsfwLevel::from_bits_retain(bits)
    }
}

// =============================================================================
// Images
// =============================================================================

/// Where an image is in the moderation pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IngestionStatus {
    Pending,
    Scanned,
    Error,
    Blocked,
    NotFound,
    Rescan,
}

/// Anything that can be pruned out of a nested image list.
pub trait ImageRef {
    fn id(&self) -> ImageId;

    fn tag_ids(&self) -> &[TagId];

    fn ingestion(&self) -> Option<IngestionStatus> {
        None
    }
}

/// Image attached to a model, or an article cover. Tags live under `tags`,
/// with `tagIds` accepted on input.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelImage {
    pub id: ImageId,
    #[serde(default)]
    pub nsfw_level: NsfwLevel,
    #[serde(default, alias = "tagIds", skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<TagId>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ModelImage {
    pub fn new(id: ImageId, nsfw_level: NsfwLevel) -> Self {
        Self {
            id,
            nsfw_level,
            ..Default::default()
        }
    }

    pub fn with_tags(mut self, tags: impl IntoIterator<Item = TagId>) -> Self {
        self.tags = tags.into_iter().collect();
        self
    }
}

impl ImageRef for ModelImage {
    fn id(&self) -> ImageId {
        self.id
    }

    fn tag_ids(&self) -> &[TagId] {
        &self.tags
    }
}

/// Image nested in a collection, bounty or post. Tags live under `tagIds`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NestedImage {
    pub id: ImageId,
    #[serde(default)]
    pub nsfw_level: NsfwLevel,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tag_ids: Vec<TagId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingestion: Option<IngestionStatus>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NestedImage {
    pub fn new(id: ImageId, nsfw_level: NsfwLevel) -> Self {
        Self {
            id,
            nsfw_level,
            ..Default::default()
        }
    }

    pub fn with_tags(mut self, tags: impl IntoIterator<Item = TagId>) -> Self {
        self.tag_ids = tags.into_iter().collect();
        self
    }

    pub fn with_ingestion(mut self, status: IngestionStatus) -> Self {
        self.ingestion = Some(status);
        self
    }
}

impl ImageRef for NestedImage {
    fn id(&self) -> ImageId {
        self.id
    }

    fn tag_ids(&self) -> &[TagId] {
        &self.tag_ids
    }

    fn ingestion(&self) -> Option<IngestionStatus> {
        self.ingestion
    }
}

// =============================================================================
// Content Items
// =============================================================================

/// `{ "id": ... }` reference to the owning user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OwnerRef {
    pub id: UserId,
}

/// `{ "id": ... }` reference to a tag, as articles carry them.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TagRef {
    pub id: TagId,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    pub id: ModelId,
    pub user: OwnerRef,
    #[serde(default)]
    pub nsfw_level: NsfwLevel,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<TagId>,
    #[serde(default)]
    pub images: Vec<ModelImage>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Model {
    pub fn new(id: ModelId, owner: UserId, nsfw_level: NsfwLevel) -> Self {
        Self {
            id,
            user: OwnerRef { id: owner },
            nsfw_level,
            ..Default::default()
        }
    }

    pub fn with_tags(mut self, tags: impl IntoIterator<Item = TagId>) -> Self {
        self.tags = tags.into_iter().collect();
        self
    }

    pub fn with_images(mut self, images: impl IntoIterator<Item = ModelImage>) -> Self {
        self.images = images.into_iter().collect();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub id: ImageId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<OwnerRef>,
    #[serde(default)]
    pub nsfw_level: NsfwLevel,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tag_ids: Vec<TagId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingestion: Option<IngestionStatus>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Image {
    pub fn new(id: ImageId, owner: UserId, nsfw_level: NsfwLevel) -> Self {
        Self {
            id,
            user_id: Some(owner),
            nsfw_level,
            ..Default::default()
        }
    }

    pub fn with_tags(mut self, tags: impl IntoIterator<Item = TagId>) -> Self {
        self.tag_ids = tags.into_iter().collect();
        self
    }

    /// `userId` when present, otherwise `user.id`.
    pub fn owner_id(&self) -> Option<UserId> {
        self.user_id.or(self.user.map(|u| u.id))
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: ArticleId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<OwnerRef>,
    #[serde(default)]
    pub nsfw_level: NsfwLevel,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<TagRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<ModelImage>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Article {
    pub fn new(id: ArticleId, owner: UserId, nsfw_level: NsfwLevel) -> Self {
        Self {
            id,
            user: Some(OwnerRef { id: owner }),
            nsfw_level,
            ..Default::default()
        }
    }

    pub fn with_tags(mut self, tags: impl IntoIterator<Item = TagId>) -> Self {
        self.tags = tags
            .into_iter()
            .map(|id| TagRef {
                id,
                extra: Map::new(),
            })
            .collect();
        self
    }

    pub fn with_cover(mut self, cover: ModelImage) -> Self {
        self.cover_image = Some(cover);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl User {
    pub fn new(id: UserId) -> Self {
        Self {
            id,
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    pub id: CollectionId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<OwnerRef>,
    #[serde(default)]
    pub nsfw_level: NsfwLevel,
    /// Representative image shown on the collection card.
    #[serde(default)]
    pub image: Option<NestedImage>,
    #[serde(default)]
    pub images: Vec<NestedImage>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Collection {
    pub fn new(id: CollectionId, owner: UserId, nsfw_level: NsfwLevel) -> Self {
        Self {
            id,
            user_id: Some(owner),
            nsfw_level,
            ..Default::default()
        }
    }

    pub fn with_image(mut self, image: NestedImage) -> Self {
        self.image = Some(image);
        self
    }

    pub fn with_images(mut self, images: impl IntoIterator<Item = NestedImage>) -> Self {
        self.images = images.into_iter().collect();
        self
    }

    /// `userId` when present, otherwise `user.id`.
    pub fn owner_id(&self) -> Option<UserId> {
        self.user_id.or(self.user.map(|u| u.id))
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bounty {
    pub id: BountyId,
    pub user: OwnerRef,
    #[serde(default)]
    pub nsfw_level: NsfwLevel,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<TagId>,
    #[serde(default)]
    pub images: Vec<NestedImage>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Bounty {
    pub fn new(id: BountyId, owner: UserId, nsfw_level: NsfwLevel) -> Self {
        Self {
            id,
            user: OwnerRef { id: owner },
            nsfw_level,
            ..Default::default()
        }
    }

    pub fn with_tags(mut self, tags: impl IntoIterator<Item = TagId>) -> Self {
        self.tags = tags.into_iter().collect();
        self
    }

    pub fn with_images(mut self, images: impl IntoIterator<Item = NestedImage>) -> Self {
        self.images = images.into_iter().collect();
        self
    }
}

/// A post. `images: None` (field absent) and `images: Some(vec![])` are
/// different inputs and filter differently.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<PostId>,
    pub user: OwnerRef,
    #[serde(default)]
    pub nsfw_level: NsfwLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<NestedImage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<NestedImage>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Post {
    pub fn new(id: PostId, owner: UserId, nsfw_level: NsfwLevel) -> Self {
        Self {
            id: Some(id),
            user: OwnerRef { id: owner },
            nsfw_level,
            ..Default::default()
        }
    }

    pub fn with_image(mut self, image: NestedImage) -> Self {
        self.image = Some(image);
        self
    }

    pub fn with_images(mut self, images: impl IntoIterator<Item = NestedImage>) -> Self {
        self.images = Some(images.into_iter().collect());
        self
    }
}

// =============================================================================
// Content Type and Lists
// =============================================================================

/// Which list shape a caller is handing over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Models,
    Images,
    Articles,
    Users,
    Collections,
    Bounties,
    Posts,
}

impl ContentType {
    pub const ALL: [ContentType; 7] = [
        ContentType::Models,
        ContentType::Images,
        ContentType::Articles,
        ContentType::Users,
        ContentType::Collections,
        ContentType::Bounties,
        ContentType::Posts,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ContentType::Models => "models",
            ContentType::Images => "images",
            ContentType::Articles => "articles",
            ContentType::Users => "users",
            ContentType::Collections => "collections",
            ContentType::Bounties => "bounties",
            ContentType::Posts => "posts",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = ContentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ContentType::ALL
            .into_iter()
            .find(|ct| ct.as_str() == s)
            .ok_or_else(|| ContentError::UnsupportedContentType(s.to_string()))
    }
}

/// A typed list of one content shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ContentList {
    Models(Vec<Model>),
    Images(Vec<Image>),
    Articles(Vec<Article>),
    Users(Vec<User>),
    Collections(Vec<Collection>),
    Bounties(Vec<Bounty>),
    Posts(Vec<Post>),
}

impl ContentList {
    /// An empty list of the given shape.
    pub fn empty(content_type: ContentType) -> Self {
        match content_type {
            ContentType::Models => ContentList::Models(Vec::new()),
            ContentType::Images => ContentList::Images(Vec::new()),
            ContentType::Articles => ContentList::Articles(Vec::new()),
            ContentType::Users => ContentList::Users(Vec::new()),
            ContentType::Collections => ContentList::Collections(Vec::new()),
            ContentType::Bounties => ContentList::Bounties(Vec::new()),
            ContentType::Posts => ContentList::Posts(Vec::new()),
        }
    }

    pub fn content_type(&self) -> ContentType {
        match self {
            ContentList::Models(_) => ContentType::Models,
            ContentList::Images(_) => ContentType::Images,
            ContentList::Articles(_) => ContentType::Articles,
            ContentList::Users(_) => ContentType::Users,
            ContentList::Collections(_) => ContentType::Collections,
            ContentList::Bounties(_) => ContentType::Bounties,
            ContentList::Posts(_) => ContentType::Posts,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ContentList::Models(v) => v.len(),
            ContentList::Images(v) => v.len(),
            ContentList::Articles(v) => v.len(),
            ContentList::Users(v) => v.len(),
            ContentList::Collections(v) => v.len(),
            ContentList::Bounties(v) => v.len(),
            ContentList::Posts(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap() {
        let level = NsfwLevel::PG | NsfwLevel::PG13;
        assert!(NsfwLevel::PG.overlaps(level));
        assert!(!NsfwLevel::R.overlaps(level));
        assert!(!NsfwLevel::NONE.overlaps(NsfwLevel::ALL));
    }

    #[test]
    fn test_safe_only() {
        assert!(NsfwLevel::PG.is_safe_only());
        assert!(NsfwLevel::NONE.is_safe_only());
        assert!(!NsfwLevel::SFW.is_safe_only());
        assert!(!(NsfwLevel::PG | NsfwLevel::X).is_safe_only());
    }

    #[test]
    fn test_from_bits_rejects_unknown_flags() {
        assert_eq!(NsfwLevel::from_bits(31), Some(NsfwLevel::from_bits_retain(31)));
        assert!(NsfwLevel::from_bits(64).is_none());
    }

    #[test]
    fn test_content_type_parse() {
        assert_eq!("bounties".parse::<ContentType>().unwrap(), ContentType::Bounties);
        let err = "videos".parse::<ContentType>().unwrap_err();
        assert!(matches!(err, ContentError::UnsupportedContentType(ref s) if s == "videos"));
    }

    #[test]
    fn test_owner_id_fallback() {
        let mut image = Image::new(1, 7, NsfwLevel::PG);
        assert_eq!(image.owner_id(), Some(7));

        image.user_id = None;
        assert_eq!(image.owner_id(), None);

        image.user = Some(OwnerRef { id: 9 });
        assert_eq!(image.owner_id(), Some(9));
    }

    #[test]
    fn test_empty_list_matches_type() {
        for ct in ContentType::ALL {
            let list = ContentList::empty(ct);
            assert_eq!(list.content_type(), ct);
            assert!(list.is_empty());
        }
    }

    #[test]
    fn test_model_image_accepts_tag_ids() {
        let image: ModelImage =
            serde_json::from_str(r#"{"id": 10, "nsfwLevel": 1, "tagIds": [7]}"#).unwrap();
        assert_eq!(image.tags, vec![7]);
        assert!(image.extra.is_empty());
    }

    #[test]
    fn test_untagged_items_round_trip_unchanged() {
        let json = r#"{"id":1,"user":{"id":2},"nsfwLevel":1,"images":[{"id":10,"nsfwLevel":1}]}"#;
        let model: Model = serde_json::from_str(json).unwrap();
        let value = serde_json::to_value(&model).unwrap();

        assert!(value.get("tags").is_none());
        assert!(value["images"][0].get("tags").is_none());

        let nested: NestedImage = serde_json::from_str(r#"{"id":3,"nsfwLevel":1}"#).unwrap();
        assert!(serde_json::to_value(&nested).unwrap().get("tagIds").is_none());
    }
}
