use std::sync::Arc;
use std::time::Duration;

use shelfmates_core::{CacheManager, Config, Shelf};

/// Shared, read-only state handed to every request.
pub struct AppState<S> {
    pub config: Arc<Config>,
    pub shelf: Arc<Shelf<S>>,
    pub cache: Arc<CacheManager>,
    pub cache_ttl: Duration,
}

// Manual impl: derive would require `S: Clone`.
impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            shelf: Arc::clone(&self.shelf),
            cache: Arc::clone(&self.cache),
            cache_ttl: self.cache_ttl,
        }
    }
}
