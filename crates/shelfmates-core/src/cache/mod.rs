//! Local caching module for computed game lists.
//!
//! This module provides the `CacheManager` for storing and retrieving
//! game-name lists as JSON files, one file per `CacheKey`. An entry is valid
//! until it is older than the configured TTL (24 hours by default).
//!
//! Cached keys:
//! - `common_games`: games all three players own
//! - `ryan_games`, `jess_games`, `amber_games`: each player's library

pub mod key;
pub mod manager;

pub use key::CacheKey;
pub use manager::{CacheManager, CachedData};
