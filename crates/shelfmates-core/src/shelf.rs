//! Library intersection and per-player game lists.

use std::collections::BTreeSet;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::api::GameLibrarySource;
use crate::models::game::AppId;
use crate::models::OwnedGame;
use crate::resolver::NameResolver;

/// App ids present in every library. Ascending order; an empty slice of
/// libraries gives an empty set.
pub fn intersect_ids(libraries: &[&[OwnedGame]]) -> BTreeSet<AppId> {
    let mut iter = libraries.iter();
    let Some(first) = iter.next() else {
        return BTreeSet::new();
    };

    let mut common: BTreeSet<AppId> = first.iter().map(|g| g.appid).collect();
    for library in iter {
        let ids: BTreeSet<AppId> = library.iter().map(|g| g.appid).collect();
        common.retain(|id| ids.contains(id));
    }
    common
}

pub struct Shelf<S> {
    source: Arc<S>,
    resolver: NameResolver<S>,
}

impl<S: GameLibrarySource> Shelf<S> {
    pub fn new(source: Arc<S>, resolver: NameResolver<S>) -> Self {
        Self { source, resolver }
    }

    /// Names of the games owned by all three players, ordered by app id.
    /// Ids whose name can't be resolved are dropped.
    pub async fn common_games(&self, a: u64, b: u64, c: u64) -> Result<Vec<String>> {
        let mut libraries = Vec::with_capacity(3);
        for steam_id in [a, b, c] {
            let games = self
                .source
                .fetch_owned_games(steam_id)
                .await
                .with_context(|| format!("Failed to load library for {}", steam_id))?;
            libraries.push(games);
        }

        let slices: Vec<&[OwnedGame]> = libraries.iter().map(Vec::as_slice).collect();
        let common = intersect_ids(&slices);
        debug!(count = common.len(), "Computed common app ids");

        let names = self.resolve_all(common).await;
        info!(count = names.len(), "Resolved common games");
        Ok(names)
    }

    /// Names of a single player's games in upstream order, unresolved ids
    /// dropped.
    pub async fn user_games(&self, steam_id: u64) -> Result<Vec<String>> {
        let games = self
            .source
            .fetch_owned_games(steam_id)
            .await
            .with_context(|| format!("Failed to load library for {}", steam_id))?;

        let names = self.resolve_all(games.into_iter().map(|g| g.appid)).await;
        info!(steam_id, count = names.len(), "Resolved player games");
        Ok(names)
    }

    async fn resolve_all(&self, ids: impl IntoIterator<Item = AppId>) -> Vec<String> {
        let mut names = Vec::new();
        for appid in ids {
            if let Some(name) = self.resolver.resolve_name(appid).await {
                names.push(name);
            }
        }
        names
    }
}
