use anyhow::Result;
use async_trait::async_trait;

use crate::models::{CatalogEntry, OwnedGame};

/// Where game libraries and the app catalog come from.
#[async_trait]
pub trait GameLibrarySource: Send + Sync + 'static {
    /// A player's owned games, in upstream order. Transport and HTTP
    /// failures are returned to the caller.
    async fn fetch_owned_games(&self, steam_id: u64) -> Result<Vec<OwnedGame>>;

    /// The full app catalog. Failures are logged and come back as an empty
    /// catalog.
    async fn fetch_catalog(&self) -> Vec<CatalogEntry>;
}
