//! HTTP routes.
//!
//! Every route follows the same path: check the cache entry for its key,
//! render it if fresh, otherwise recompute from the Steam API, store, then
//! render.

use axum::extract::State;
use axum::response::Html;
use axum::routing::get;
use axum::Router;
use tracing::debug;

use shelfmates_core::config::PlayerSlot;
use shelfmates_core::{CacheKey, GameLibrarySource};

use crate::error::AppError;
use crate::render;
use crate::state::AppState;

pub fn router<S: GameLibrarySource>(state: AppState<S>) -> Router {
    Router::new()
        .route("/", get(common_games::<S>))
        .route("/ryan_games", get(ryan_games::<S>))
        .route("/jess_games", get(jess_games::<S>))
        .route("/amber_games", get(amber_games::<S>))
        .with_state(state)
}

async fn common_games<S: GameLibrarySource>(
    State(state): State<AppState<S>>,
) -> Result<Html<String>, AppError> {
    debug!("GET /");
    let [a, b, c] = state.config.players();
    let (a, b, c) = (a.steam_id, b.steam_id, c.steam_id);

    let entry = state
        .cache
        .get_or_refresh(CacheKey::CommonGames, state.cache_ttl, || {
            state.shelf.common_games(a, b, c)
        })
        .await?;

    Ok(Html(render::common_games_page(&entry.data, &entry.age_display())))
}

async fn ryan_games<S: GameLibrarySource>(
    State(state): State<AppState<S>>,
) -> Result<Html<String>, AppError> {
    player_games(&state, PlayerSlot::Ryan).await
}

async fn jess_games<S: GameLibrarySource>(
    State(state): State<AppState<S>>,
) -> Result<Html<String>, AppError> {
    player_games(&state, PlayerSlot::Jess).await
}

async fn amber_games<S: GameLibrarySource>(
    State(state): State<AppState<S>>,
) -> Result<Html<String>, AppError> {
    player_games(&state, PlayerSlot::Amber).await
}

async fn player_games<S: GameLibrarySource>(
    state: &AppState<S>,
    slot: PlayerSlot,
) -> Result<Html<String>, AppError> {
    debug!(player = %slot, "GET player games");
    let steam_id = state.config.player(slot).steam_id;

    let entry = state
        .cache
        .get_or_refresh(CacheKey::PlayerGames(slot), state.cache_ttl, || {
            state.shelf.user_games(steam_id)
        })
        .await?;

    Ok(Html(render::player_games_page(slot, &entry.data, &entry.age_display())))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use anyhow::Result;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use chrono::Utc;
    use http_body_util::BodyExt;
    use shelfmates_core::models::{CatalogEntry, OwnedGame};
    use shelfmates_core::{CacheManager, CachedData, Config, NameResolver, Shelf};
    use tempfile::TempDir;
    use tower::ServiceExt;

    const DAY: Duration = Duration::from_secs(86_400);
    const RYAN_ID: u64 = 76561197960000001;
    const JESS_ID: u64 = 76561197960000002;
    const AMBER_ID: u64 = 76561197960000003;

    /// In-memory Steam that counts how often it is asked for anything.
    struct FakeSteam {
        libraries: HashMap<u64, Vec<u32>>,
        catalog: Vec<CatalogEntry>,
        calls: AtomicUsize,
    }

    impl FakeSteam {
        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl GameLibrarySource for FakeSteam {
        async fn fetch_owned_games(&self, steam_id: u64) -> Result<Vec<OwnedGame>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.libraries
                .get(&steam_id)
                .map(|ids| ids.iter().map(|&appid| OwnedGame { appid }).collect())
                .ok_or_else(|| anyhow::anyhow!("connection refused"))
        }

        async fn fetch_catalog(&self) -> Vec<CatalogEntry> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.catalog.clone()
        }
    }

    struct TestApp {
        router: Router,
        steam: Arc<FakeSteam>,
        cache: Arc<CacheManager>,
        _temp_dir: TempDir,
    }

    fn test_app(libraries: Vec<(u64, Vec<u32>)>) -> TestApp {
        let steam = Arc::new(FakeSteam {
            libraries: libraries.into_iter().collect(),
            catalog: vec![
                CatalogEntry { appid: 1, name: "Spacewar".to_string() },
                CatalogEntry { appid: 2, name: "Portal".to_string() },
                CatalogEntry { appid: 3, name: "Half-Life".to_string() },
                CatalogEntry { appid: 4, name: "Terraria".to_string() },
            ],
            calls: AtomicUsize::new(0),
        });
        let temp_dir = TempDir::new().unwrap();
        let cache = Arc::new(CacheManager::new(temp_dir.path().to_path_buf()).unwrap());
        let state = AppState {
            config: Arc::new(Config::new("test-key", RYAN_ID, JESS_ID, AMBER_ID)),
            shelf: Arc::new(Shelf::new(steam.clone(), NameResolver::new(steam.clone()))),
            cache: cache.clone(),
            cache_ttl: DAY,
        };
        TestApp {
            router: router(state),
            steam,
            cache,
            _temp_dir: temp_dir,
        }
    }

    fn trio() -> Vec<(u64, Vec<u32>)> {
        vec![
            (RYAN_ID, vec![1, 2, 3]),
            (JESS_ID, vec![2, 3, 4]),
            (AMBER_ID, vec![2, 3, 5]),
        ]
    }

    async fn get(router: &Router, uri: &str) -> (StatusCode, String) {
        let res = router
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = res.status();
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    fn seed(cache: &CacheManager, key: CacheKey, names: &[&str], age_secs: i64) {
        let data: Vec<String> = names.iter().map(|s| s.to_string()).collect();
        let entry = CachedData::with_timestamp(data, Utc::now() - chrono::Duration::seconds(age_secs));
        cache.write_entry(key, &entry).unwrap();
    }

    fn cached_names(cache: &CacheManager, key: CacheKey) -> Vec<String> {
        cache.read::<Vec<String>>(key, DAY).unwrap().unwrap()
    }

    #[tokio::test]
    async fn test_common_games_computes_and_caches() {
        let app = test_app(trio());

        let (status, body) = get(&app.router, "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<li>Portal</li>"));
        assert!(body.contains("<li>Half-Life</li>"));
        assert!(!body.contains("Spacewar"));
        assert!(!body.contains("Terraria"));
        assert_eq!(cached_names(&app.cache, CacheKey::CommonGames), vec!["Portal", "Half-Life"]);

        // Second request is served from the cache
        let calls = app.steam.calls();
        let (status, body) = get(&app.router, "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<li>Portal</li>"));
        assert_eq!(app.steam.calls(), calls);
    }

    #[tokio::test]
    async fn test_fresh_player_cache_skips_upstream() {
        let app = test_app(trio());
        let ryan = CacheKey::PlayerGames(PlayerSlot::Ryan);
        seed(&app.cache, ryan, &["Game A"], 10);

        let (status, body) = get(&app.router, "/ryan_games").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<h1>Ryan&#39;s games</h1>"));
        assert!(body.contains("<li>Game A</li>"));
        assert_eq!(app.steam.calls(), 0);
    }

    #[tokio::test]
    async fn test_bare_array_cache_file_is_served() {
        let app = test_app(trio());
        let ryan = CacheKey::PlayerGames(PlayerSlot::Ryan);
        std::fs::write(app.cache.cache_path(ryan), r#"["Game A"]"#).unwrap();

        let (status, body) = get(&app.router, "/ryan_games").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<li>Game A</li>"));
        assert_eq!(app.steam.calls(), 0);
        assert_eq!(
            std::fs::read_to_string(app.cache.cache_path(ryan)).unwrap(),
            r#"["Game A"]"#
        );
    }

    #[tokio::test]
    async fn test_stale_player_cache_is_refetched_and_overwritten() {
        let app = test_app(trio());
        let jess = CacheKey::PlayerGames(PlayerSlot::Jess);
        seed(&app.cache, jess, &["Game A"], 90_000);

        let (status, body) = get(&app.router, "/jess_games").await;
        assert_eq!(status, StatusCode::OK);
        assert!(!body.contains("Game A"));
        assert!(body.contains("<li>Portal</li>"));
        assert!(body.contains("<li>Terraria</li>"));
        assert!(app.steam.calls() > 0);
        assert_eq!(cached_names(&app.cache, jess), vec!["Portal", "Half-Life", "Terraria"]);
    }

    #[tokio::test]
    async fn test_player_routes_use_their_own_ids() {
        let app = test_app(trio());

        let (_, body) = get(&app.router, "/amber_games").await;
        assert!(body.contains("<h1>Amber&#39;s games</h1>"));
        // Amber owns 5, which the catalog doesn't know
        assert!(body.contains("2 games"));

        let (_, body) = get(&app.router, "/ryan_games").await;
        assert!(body.contains("<li>Spacewar</li>"));
        assert!(body.contains("3 games"));
    }

    #[tokio::test]
    async fn test_upstream_failure_is_500_and_writes_nothing() {
        let app = test_app(vec![(RYAN_ID, vec![1]), (JESS_ID, vec![1])]);

        let (status, body) = get(&app.router, "/").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!body.contains("connection refused"));
        assert!(!app.cache.cache_path(CacheKey::CommonGames).exists());
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let app = test_app(trio());
        let (status, _) = get(&app.router, "/bob_games").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
