//! Build a `FilterContext` from a preferences document.
//!
//! The document is what a preferences provider hands over once it has
//! finished loading:
//!
//! ```json
//! {
//!   "viewer": { "userId": 5, "isModerator": false, "browsingLevel": 3 },
//!   "hiddenUsers": [12], "hiddenModels": [], "hiddenImages": [40], "hiddenTags": [7],
//!   "isSfw": false
//! }
//! ```

use crate::error::{PreferencesError, Result};
use crate::types::{FilterContext, HiddenRegistries, ViewerContext};
use content::{ImageId, ModelId, NsfwLevel, TagId, UserId};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewerDocument {
    #[serde(default)]
    pub user_id: Option<UserId>,
    #[serde(default)]
    pub is_moderator: bool,
    #[serde(default)]
    pub browsing_level: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesDocument {
    #[serde(default)]
    pub viewer: ViewerDocument,
    #[serde(default)]
    pub hidden_users: Vec<UserId>,
    #[serde(default)]
    pub hidden_models: Vec<ModelId>,
    #[serde(default)]
    pub hidden_images: Vec<ImageId>,
    #[serde(default)]
    pub hidden_tags: Vec<TagId>,
    /// Overrides the safe-only flag derived from the browsing level.
    #[serde(default)]
    pub is_sfw: Option<bool>,
}

/// Browsing level used when the document does not carry one.
pub const DEFAULT_BROWSING_LEVEL: NsfwLevel = NsfwLevel::PG;

/// Turn a loaded preferences document into a ready filter context.
///
/// The registries come back with `loading` cleared; a document only exists
/// once the provider has finished.
pub fn build_filter_context(doc: &PreferencesDocument) -> Result<FilterContext> {
    let browsing_level = match doc.viewer.browsing_level {
        Some(bits) => {
            NsfwLevel::from_bits(bits).ok_or(PreferencesError::InvalidBrowsingLevel(bits))?
        }
        None => DEFAULT_BROWSING_LEVEL,
    };

    let viewer = ViewerContext {
        user_id: doc.viewer.user_id,
        is_moderator: doc.viewer.is_moderator,
        browsing_level,
    };

    let registries = HiddenRegistries {
        hidden_users: doc.hidden_users.iter().copied().collect(),
        hidden_models: doc.hidden_models.iter().copied().collect(),
        hidden_images: doc.hidden_images.iter().copied().collect(),
        hidden_tags: doc.hidden_tags.iter().copied().collect(),
        is_sfw: doc.is_sfw.unwrap_or_else(|| browsing_level.is_safe_only()),
        loading: false,
    };

    tracing::debug!(
        users = registries.hidden_users.len(),
        models = registries.hidden_models.len(),
        images = registries.hidden_images.len(),
        tags = registries.hidden_tags.len(),
        is_sfw = registries.is_sfw,
        "Built filter context"
    );

    Ok(FilterContext::new(registries, viewer))
}

/// Read a preferences document from disk and build its context.
pub fn load_filter_context(path: &Path) -> Result<FilterContext> {
    let doc: PreferencesDocument = content::read_json(path)?;
    build_filter_context(&doc)
}
