//! # Hidden Preferences Service
//!
//! Owns the viewer's hidden-preference registries and runs the visibility
//! pipeline against immutable snapshots of them:
//! 1. Start in the loading state; every list comes back empty
//! 2. `load` installs registries and clears the loading flag
//! 3. `hide` / `unhide` mutate a single registry entry
//! 4. `apply` clones a snapshot under the read lock and filters on a
//!    blocking task, so registry writers never wait on a filter run

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use tokio::sync::RwLock;
use tracing::{debug, info};

use content::{ContentList, ContentType};
use pipeline::{FilterOptions, FilterOutcome, VisibilityPipeline};
use preferences::{
    FilterContext, HiddenKind, HiddenRegistries, PreferencesDocument, ViewerContext,
    build_filter_context,
};

#[derive(Clone)]
pub struct HiddenPreferencesService {
    pipeline: Arc<VisibilityPipeline>,
    state: Arc<RwLock<FilterContext>>,
}

impl HiddenPreferencesService {
    /// A service for `viewer` with registries still loading.
    pub fn new(viewer: ViewerContext) -> Self {
        Self::with_pipeline(VisibilityPipeline::standard(), viewer)
    }

    pub fn with_pipeline(pipeline: VisibilityPipeline, viewer: ViewerContext) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            state: Arc::new(RwLock::new(FilterContext::new(
                HiddenRegistries::loading(),
                viewer,
            ))),
        }
    }

    /// Install freshly fetched registries and mark them ready.
    pub async fn load(&self, mut registries: HiddenRegistries) {
        registries.loading = false;
        let mut state = self.state.write().await;
        info!(
            "Loaded hidden preferences: users={}, models={}, images={}, tags={}",
            registries.hidden_users.len(),
            registries.hidden_models.len(),
            registries.hidden_images.len(),
            registries.hidden_tags.len()
        );
        state.registries = registries;
    }

    /// Replace viewer and registries from a preferences document.
    pub async fn load_document(&self, doc: &PreferencesDocument) -> Result<()> {
        let context = build_filter_context(doc).context("Failed to build filter context")?;
        let mut state = self.state.write().await;
        *state = context;
        info!("Loaded preferences document for viewer {:?}", state.viewer.user_id);
        Ok(())
    }

    /// Put the registries back into the loading state (e.g. on sign-out).
    pub async fn reset(&self) {
        let mut state = self.state.write().await;
        state.registries = HiddenRegistries::loading();
        debug!("Hidden preferences reset");
    }

    pub async fn set_viewer(&self, viewer: ViewerContext) {
        self.state.write().await.viewer = viewer;
    }

    pub async fn hide(&self, kind: HiddenKind, id: u32) {
        let mut state = self.state.write().await;
        state.registries.registry_mut(kind).hide(id);
        debug!("Hid {:?} {}", kind, id);
    }

    pub async fn unhide(&self, kind: HiddenKind, id: u32) {
        let mut state = self.state.write().await;
        state.registries.registry_mut(kind).unhide(id);
        debug!("Unhid {:?} {}", kind, id);
    }

    pub async fn is_loading(&self) -> bool {
        self.state.read().await.registries.loading
    }

    /// Copy of the current viewer and registries.
    pub async fn snapshot(&self) -> FilterContext {
        self.state.read().await.clone()
    }

    /// Filter `items` against the current snapshot.
    pub async fn apply(
        &self,
        content_type: ContentType,
        items: Option<ContentList>,
        options: FilterOptions,
    ) -> Result<FilterOutcome> {
        let start = Instant::now();
        let context = self.snapshot().await;
        let pipeline = self.pipeline.clone();

        let outcome = tokio::task::spawn_blocking(move || {
            pipeline.apply(content_type, items, &context, options)
        })
        .await
        .context("Filter task panicked")?
        .with_context(|| format!("Failed to filter {}", content_type))?;

        info!(
            "Filtered {}: {} visible, {} hidden in {:.2?}",
            content_type,
            outcome.items.len(),
            outcome.hidden_count,
            start.elapsed()
        );
        Ok(outcome)
    }
}
