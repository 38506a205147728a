//! Rule shapes shared by the per-type filters.
//!
//! Two owner rules exist and are kept apart:
//! - models and images use the rating bitmask: an owner (or moderator)
//!   always sees their own unrated item, and everything else must overlap
//!   the viewer's browsing level;
//! - articles, users, collections, bounties and posts only look at the
//!   coarse `is_sfw` flag: an owner sees their own item unless the viewer is
//!   in safe-only mode.

use content::{ImageRef, NsfwLevel, UserId};
use preferences::{FilterContext, HiddenRegistries};

/// Outcome of an early rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Gate {
    /// Visible; skip every remaining item rule.
    Visible,
    /// Excluded.
    Hidden,
    /// No decision; keep evaluating.
    Continue,
}

/// Owner/moderator exemption followed by the rating overlap check.
pub(crate) fn rating_gate(owner: Option<UserId>, level: NsfwLevel, ctx: &FilterContext) -> Gate {
    let viewer = &ctx.viewer;
    if (viewer.owns(owner) || viewer.is_moderator) && level.is_unrated() {
        return Gate::Visible;
    }
    if !level.overlaps(viewer.browsing_level) {
        return Gate::Hidden;
    }
    Gate::Continue
}

/// Owner exemption for the coarse rule shape.
pub(crate) fn sfw_owner_exempt(owner: Option<UserId>, ctx: &FilterContext) -> bool {
    ctx.viewer.owns(owner) && !ctx.registries.is_sfw
}

/// True when the image itself or any of its tags is hidden.
pub(crate) fn image_hidden<I: ImageRef>(image: &I, registries: &HiddenRegistries) -> bool {
    registries.hidden_images.contains(image.id()) || registries.any_tag_hidden(image.tag_ids())
}

/// Keep the nested images that are still visible.
///
/// Owner and rating rules are not re-run here; nested images ride on the
/// parent's decision. `require_scanned` additionally drops images whose
/// ingestion status is known and is not `Scanned`.
pub(crate) fn prune_images<I: ImageRef>(
    images: Vec<I>,
    registries: &HiddenRegistries,
    require_scanned: bool,
) -> Vec<I> {
    images
        .into_iter()
        .filter(|image| {
            if registries.hidden_images.contains(image.id()) {
                return false;
            }
            if require_scanned
                && image
                    .ingestion()
                    .is_some_and(|status| status != content::IngestionStatus::Scanned)
            {
                return false;
            }
            !registries.any_tag_hidden(image.tag_ids())
        })
        .collect()
}
