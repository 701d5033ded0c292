//! Content access layer.
//!
//! `ContentLibrary` keeps a cached, ordered copy of the content table and
//! funnels every write through the store followed by a full refresh, so the
//! cache always mirrors the store's ordering and visibility filtering.
//! There is no optimistic patching and no sequencing between concurrent
//! writers: whichever refresh completes last wins.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use folio_core::{
    CategoryFilter, ContentItem, ContentPatch, ContentStore, ContentType, DisplayItem, NewContent,
    Result, to_display,
};
use tokio::sync::RwLock;
use tracing::{debug, error, info};

/// Counts a fetch as in flight until dropped, so a cancelled fetch still clears `is_loading`
struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

pub struct ContentLibrary {
    store: Arc<dyn ContentStore>,
    include_hidden: AtomicBool,
    in_flight: AtomicUsize,
    items: RwLock<Vec<ContentItem>>,
    last_error: RwLock<Option<String>>,
}

impl ContentLibrary {
    /// Public listings pass `include_hidden = false`, admin listings `true`.
    /// Nothing is fetched until `list` or `refresh` runs.
    pub fn new(store: Arc<dyn ContentStore>, include_hidden: bool) -> Self {
        Self {
            store,
            include_hidden: AtomicBool::new(include_hidden),
            in_flight: AtomicUsize::new(0),
            items: RwLock::new(Vec::new()),
            last_error: RwLock::new(None),
        }
    }

    /// Fetch newest-first and replace the cache. The flag becomes the
    /// listing mode for refreshes triggered by later writes.
    ///
    /// On failure the error is recorded and returned and the previous cache is kept.
    pub async fn list(&self, include_hidden: bool) -> Result<Vec<ContentItem>> {
        self.include_hidden.store(include_hidden, Ordering::SeqCst);
        self.fetch(include_hidden).await
    }

    /// Re-run the last listing
    pub async fn refresh(&self) -> Result<Vec<ContentItem>> {
        self.fetch(self.include_hidden.load(Ordering::SeqCst)).await
    }

    async fn fetch(&self, include_hidden: bool) -> Result<Vec<ContentItem>> {
        let _loading = InFlight::enter(&self.in_flight);

        match self.store.list(include_hidden).await {
            Ok(items) => {
                debug!("Loaded {} content items (include_hidden={})", items.len(), include_hidden);
                *self.items.write().await = items.clone();
                *self.last_error.write().await = None;
                Ok(items)
            }
            Err(e) => {
                error!("Error fetching portfolio content: {}", e);
                *self.last_error.write().await = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Single item straight from the store, bypassing the cache
    pub async fn get(&self, id: &str) -> Result<ContentItem> {
        self.store.get(id).await
    }

    /// A failed refresh after a successful write is recorded, not returned
    async fn refresh_after_write(&self) {
        let _ = self.refresh().await;
    }

    pub async fn create(&self, content: NewContent) -> Result<ContentItem> {
        content.validate()?;
        let item = self.store.insert(&content).await?;
        info!("Created {} '{}' ({})", item.content_type, item.title, item.id);

        self.refresh_after_write().await;
        Ok(item)
    }

    pub async fn update(&self, id: &str, patch: ContentPatch) -> Result<ContentItem> {
        patch.validate()?;
        let item = self.store.update(id, &patch).await?;
        info!("Updated content {}", id);

        self.refresh_after_write().await;
        Ok(item)
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.store.delete(id).await?;
        info!("Deleted content {}", id);

        self.refresh_after_write().await;
        Ok(())
    }

    pub async fn toggle_visibility(&self, id: &str, is_visible: bool) -> Result<ContentItem> {
        self.update(id, ContentPatch::visibility(is_visible)).await
    }

    pub async fn items(&self) -> Vec<ContentItem> {
        self.items.read().await.clone()
    }

    pub async fn items_of_type(&self, content_type: ContentType) -> Vec<ContentItem> {
        self.items
            .read()
            .await
            .iter()
            .filter(|item| item.content_type == content_type)
            .cloned()
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    pub fn include_hidden(&self) -> bool {
        self.include_hidden.load(Ordering::SeqCst)
    }

    pub async fn last_error(&self) -> Option<String> {
        self.last_error.read().await.clone()
    }

    /// Cached items as project cards, legacy seed cards when the cache is empty
    pub async fn display_items(&self) -> Vec<DisplayItem> {
        to_display(&self.items.read().await)
    }

    pub async fn projects(&self, filter: CategoryFilter) -> Vec<DisplayItem> {
        filter.apply(self.display_items().await)
    }
}
