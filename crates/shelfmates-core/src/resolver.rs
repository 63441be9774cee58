//! App id to display name lookup.
//!
//! By default every lookup fetches the whole app catalog and scans it, so a
//! name is always as fresh as the catalog. With a catalog TTL the resolver
//! keeps the last non-empty catalog in memory for that long and answers from
//! an index instead.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;
use tracing::debug;

use crate::api::GameLibrarySource;
use crate::models::game::AppId;

/// In-memory copy of the catalog, indexed by app id.
struct CatalogMemo {
    names: HashMap<AppId, String>,
    fetched_at: Instant,
}

pub struct NameResolver<S> {
    source: Arc<S>,
    catalog_ttl: Option<Duration>,
    memo: Mutex<Option<CatalogMemo>>,
}

impl<S: GameLibrarySource> NameResolver<S> {
    /// Resolver that fetches the catalog on every lookup.
    pub fn new(source: Arc<S>) -> Self {
        Self {
            source,
            catalog_ttl: None,
            memo: Mutex::new(None),
        }
    }

    /// Resolver that reuses a fetched catalog for `ttl`.
    pub fn with_catalog_ttl(source: Arc<S>, ttl: Duration) -> Self {
        Self {
            source,
            catalog_ttl: Some(ttl),
            memo: Mutex::new(None),
        }
    }

    /// Display name for `appid`, or `None` if the catalog has no such id or
    /// could not be fetched.
    pub async fn resolve_name(&self, appid: AppId) -> Option<String> {
        match self.catalog_ttl {
            None => self.resolve_uncached(appid).await,
            Some(ttl) => self.resolve_memoized(appid, ttl).await,
        }
    }

    async fn resolve_uncached(&self, appid: AppId) -> Option<String> {
        let catalog = self.source.fetch_catalog().await;
        let name = catalog
            .into_iter()
            .find(|entry| entry.appid == appid)
            .map(|entry| entry.name);
        if name.is_none() {
            debug!(appid, "App id not found in catalog");
        }
        name
    }

    async fn resolve_memoized(&self, appid: AppId, ttl: Duration) -> Option<String> {
        let mut memo = self.memo.lock().await;

        let fresh = memo
            .as_ref()
            .is_some_and(|m| m.fetched_at.elapsed() < ttl);
        if !fresh {
            let catalog = self.source.fetch_catalog().await;
            // An empty catalog means the fetch failed; don't pin it for a
            // whole window.
            if catalog.is_empty() {
                debug!(appid, "Catalog unavailable, not memoizing");
                return None;
            }
            let mut names = HashMap::with_capacity(catalog.len());
            for entry in catalog {
                // First occurrence wins, same as the linear scan
                names.entry(entry.appid).or_insert(entry.name);
            }
            debug!(count = names.len(), "Memoized app catalog");
            *memo = Some(CatalogMemo {
                names,
                fetched_at: Instant::now(),
            });
        }

        memo.as_ref().and_then(|m| m.names.get(&appid).cloned())
    }
}
