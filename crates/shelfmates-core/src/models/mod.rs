//! Data models for Steam Web API payloads.
//!
//! - `OwnedGame`, `OwnedGamesResponse`: a player's library
//! - `CatalogEntry`, `AppListResponse`: the global app id to name catalog
//!
//! Every envelope field defaults to empty so a partial response never fails
//! to parse.

pub mod game;

pub use game::{AppListResponse, CatalogEntry, OwnedGame, OwnedGamesResponse};
