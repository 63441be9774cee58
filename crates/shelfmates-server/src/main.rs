//! shelfmates - which Steam games do all three of us own?
//!
//! Serves four pages: the games Ryan, Jess and Amber all own, plus each
//! player's full library. Lists are cached on disk for a day.

mod error;
mod render;
mod routes;
mod state;

use std::io;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use shelfmates_core::{CacheKey, CacheManager, Config, NameResolver, Settings, Shelf, SteamClient};

use state::AppState;

/// Initialize the tracing subscriber for logging.
///
/// Logs go to stderr; with a log directory they are also written to a daily
/// rolling file. The returned guard must live until shutdown so buffered
/// file output is flushed.
fn init_tracing(log_dir: Option<&Path>) -> Option<WorkerGuard> {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "shelfmates.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some(fmt::layer().with_writer(writer).with_ansi(false)), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .with(filter)
        .init();

    guard
}

/// Log what the cache holds at startup so a stale or empty cache is visible
/// before the first request.
fn log_cache_state(cache: &CacheManager, ttl: std::time::Duration) {
    for key in CacheKey::ALL {
        match cache.entry_age(key) {
            Ok(Some(age)) => info!(
                cache = %key,
                age_secs = age.as_secs(),
                fresh = age < ttl,
                "Cache entry found"
            ),
            Ok(None) => info!(cache = %key, "No cache entry"),
            Err(e) => warn!(cache = %key, error = %format!("{:#}", e), "Failed to inspect cache entry"),
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let settings = Settings::from_env()?;
    let _log_guard = init_tracing(settings.log_dir.as_deref());
    info!("shelfmates starting");

    let config = Arc::new(Config::load(&settings.keys_path)?);

    let client = Arc::new(SteamClient::from_settings(config.api_key.clone(), &settings)?);
    let resolver = match settings.catalog_ttl {
        Some(ttl) => NameResolver::with_catalog_ttl(client.clone(), ttl),
        None => NameResolver::new(client.clone()),
    };
    let shelf = Arc::new(Shelf::new(client, resolver));
    let cache = Arc::new(CacheManager::new(settings.cache_dir.clone())?);
    log_cache_state(&cache, settings.cache_ttl);

    let cache_dir = cache.cache_dir().to_path_buf();
    let state = AppState {
        config,
        shelf,
        cache,
        cache_ttl: settings.cache_ttl,
    };
    let app = routes::router(state);

    let listener = tokio::net::TcpListener::bind(&settings.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", settings.bind_addr))?;
    info!(
        addr = %listener.local_addr()?,
        cache_dir = %cache_dir.display(),
        cache_ttl_secs = settings.cache_ttl.as_secs(),
        catalog_memo = settings.catalog_ttl.is_some(),
        "Listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("shelfmates shutting down");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use shelfmates_core::config::PlayerSlot;
    use tempfile::TempDir;

    #[test]
    fn test_log_cache_state_handles_every_entry_shape() {
        let temp_dir = TempDir::new().unwrap();
        let cache = CacheManager::new(temp_dir.path().to_path_buf()).unwrap();
        cache.write(CacheKey::CommonGames, &vec!["Portal".to_string()]).unwrap();
        std::fs::write(temp_dir.path().join("jess_games.json"), "not json").unwrap();
        std::fs::write(temp_dir.path().join("amber_games.json"), r#"["Terraria"]"#).unwrap();

        log_cache_state(&cache, Duration::from_secs(86_400));

        assert!(cache.entry_age(CacheKey::CommonGames).unwrap().is_some());
        assert!(cache.entry_age(CacheKey::PlayerGames(PlayerSlot::Amber)).unwrap().is_some());
        assert!(cache.entry_age(CacheKey::PlayerGames(PlayerSlot::Ryan)).unwrap().is_none());
    }
}
