//! Core library for shelfmates.
//!
//! Fetches Steam game libraries for a fixed trio of players, works out which
//! games all three own, and keeps the results in a small on-disk cache.
//!
//! - `api`: Steam Web API client behind the `GameLibrarySource` trait
//! - `resolver`: app id to display name lookup against the app catalog
//! - `shelf`: library intersection and per-player listings
//! - `cache`: JSON file cache with a TTL and per-key refresh guard
//! - `config`: keys file and environment settings

pub mod api;
pub mod cache;
pub mod config;
pub mod models;
pub mod resolver;
pub mod shelf;

pub use api::{ApiError, GameLibrarySource, SteamClient};
pub use cache::{CacheKey, CacheManager, CachedData};
pub use config::{Config, Player, Settings};
pub use resolver::NameResolver;
pub use shelf::Shelf;
