//! Shared state handed to every request handler

use std::sync::Arc;

use crate::render::PreviewRenderer;
use crate::store::ComponentStore;

/// Shared state for the HTTP server
#[derive(Clone)]
pub struct AppState {
    /// File-backed component store (stateless; every call re-reads disk)
    pub store: Arc<ComponentStore>,
    /// Preview renderer, a no-op when screenshots are disabled
    pub renderer: Arc<dyn PreviewRenderer>,
    /// Listing page size when the request gives no `limit`
    pub page_size: usize,
}

impl AppState {
    pub fn new(store: ComponentStore, renderer: Arc<dyn PreviewRenderer>, page_size: usize) -> Self {
        Self {
            store: Arc::new(store),
            renderer,
            page_size,
        }
    }
}
