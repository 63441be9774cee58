use std::collections::HashMap;
use std::fs;
use std::future::Future;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use super::CacheKey;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedData<T> {
    pub data: T,
    pub cached_at: DateTime<Utc>,
}

impl<T> CachedData<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            cached_at: Utc::now(),
        }
    }

    pub fn with_timestamp(data: T, cached_at: DateTime<Utc>) -> Self {
        Self { data, cached_at }
    }

    /// Time since the entry was written. A timestamp in the future counts
    /// as zero.
    pub fn age(&self) -> Duration {
        (Utc::now() - self.cached_at).to_std().unwrap_or(Duration::ZERO)
    }

    pub fn is_valid(&self, ttl: Duration) -> bool {
        self.age() < ttl
    }

    pub fn age_display(&self) -> String {
        let minutes = (self.age().as_secs() / 60) as i64;
        if minutes < 1 {
            "just now".to_string()
        } else if minutes < 60 {
            format!("{}m ago", minutes)
        } else if minutes < 1440 {
            let hours = minutes / 60;
            let remaining_mins = minutes % 60;
            if remaining_mins >= 30 {
                // Round up: 1h 30m+ becomes 2h
                format!("{}h ago", hours + 1)
            } else {
                format!("{}h ago", hours)
            }
        } else {
            let days = minutes / 1440;
            let remaining_hours = (minutes % 1440) / 60;
            if remaining_hours >= 12 {
                format!("{}d ago", days + 1)
            } else {
                format!("{}d ago", days)
            }
        }
    }
}

pub struct CacheManager {
    cache_dir: PathBuf,
    /// One refresh guard per key, created on first use.
    guards: Mutex<HashMap<CacheKey, Arc<tokio::sync::Mutex<()>>>>,
}

impl CacheManager {
    pub fn new(cache_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&cache_dir)
            .with_context(|| format!("Failed to create cache directory: {}", cache_dir.display()))?;
        Ok(Self {
            cache_dir,
            guards: Mutex::new(HashMap::new()),
        })
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    pub fn cache_path(&self, key: CacheKey) -> PathBuf {
        self.cache_dir.join(format!("{}.json", key.file_stem()))
    }

    /// Load an entry regardless of age.
    ///
    /// Accepts both the `{data, cached_at}` record and a bare value (e.g. a
    /// plain JSON array of names); a bare value is stamped with the file's
    /// modification time. A file that parses as neither is logged and treated
    /// as absent so the next refresh replaces it.
    pub fn load<T: DeserializeOwned>(&self, key: CacheKey) -> Result<Option<CachedData<T>>> {
        let path = self.cache_path(key);
        if !path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read cache file: {}", path.display()))?;

        if let Ok(cached) = serde_json::from_str::<CachedData<T>>(&contents) {
            return Ok(Some(cached));
        }

        match serde_json::from_str::<T>(&contents) {
            Ok(data) => {
                let modified = fs::metadata(&path)
                    .and_then(|meta| meta.modified())
                    .with_context(|| format!("Failed to read cache file mtime: {}", path.display()))?;
                debug!(cache = %key, "Bare cache value, using file mtime");
                Ok(Some(CachedData::with_timestamp(data, DateTime::<Utc>::from(modified))))
            }
            Err(e) => {
                warn!(cache = %key, error = %e, "Unreadable cache file, ignoring");
                Ok(None)
            }
        }
    }

    /// The cached value if it is younger than `ttl`.
    pub fn read<T: DeserializeOwned>(&self, key: CacheKey, ttl: Duration) -> Result<Option<T>> {
        Ok(self
            .load::<T>(key)?
            .filter(|cached| cached.is_valid(ttl))
            .map(|cached| cached.data))
    }

    /// Store `data` under `key`, stamped with the current time.
    pub fn write<T: Serialize>(&self, key: CacheKey, data: &T) -> Result<()> {
        self.write_entry(key, &CachedData::new(data))
    }

    /// Store a full entry. The file is replaced atomically: readers see the
    /// old content or the new, never a partial write. Each write stages into
    /// its own temp file, so concurrent writers on one key don't collide.
    pub fn write_entry<T: Serialize>(&self, key: CacheKey, entry: &CachedData<T>) -> Result<()> {
        fs::create_dir_all(&self.cache_dir)
            .with_context(|| format!("Failed to create cache directory: {}", self.cache_dir.display()))?;

        let path = self.cache_path(key);
        let contents = serde_json::to_string_pretty(entry)?;

        let mut file = NamedTempFile::new_in(&self.cache_dir)
            .with_context(|| format!("Failed to create temp file in {}", self.cache_dir.display()))?;
        file.write_all(contents.as_bytes())?;
        file.as_file().sync_all()?;
        file.persist(&path)
            .with_context(|| format!("Failed to replace cache file: {}", path.display()))?;

        Ok(())
    }

    /// Age of the entry under `key`, if there is one.
    pub fn entry_age(&self, key: CacheKey) -> Result<Option<Duration>> {
        Ok(self
            .load::<serde::de::IgnoredAny>(key)?
            .map(|cached| cached.age()))
    }

    /// Return the entry under `key` if it is younger than `ttl`; otherwise
    /// run `compute`, store its result and return that.
    ///
    /// Callers for the same key are serialized, so concurrent requests share
    /// one recomputation. A failed `compute` leaves the old file in place.
    pub async fn get_or_refresh<T, F, Fut>(
        &self,
        key: CacheKey,
        ttl: Duration,
        compute: F,
    ) -> Result<CachedData<T>>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let guard = self.guard(key);
        let _held = guard.lock().await;

        match self.load::<T>(key)? {
            Some(cached) if cached.is_valid(ttl) => {
                debug!(cache = %key, age = %cached.age_display(), "Cache hit");
                return Ok(cached);
            }
            Some(cached) => {
                debug!(cache = %key, age = %cached.age_display(), "Cache stale");
            }
            None => {
                debug!(cache = %key, "Cache miss");
            }
        }

        let entry = CachedData::new(compute().await?);
        self.write_entry(key, &entry)?;
        info!(cache = %key, "Cache refreshed");
        Ok(entry)
    }

    fn guard(&self, key: CacheKey) -> Arc<tokio::sync::Mutex<()>> {
        let mut guards = self.guards.lock().unwrap_or_else(PoisonError::into_inner);
        guards.entry(key).or_default().clone()
    }
}

// ============================================================================
// Tests
// ============================================================================
