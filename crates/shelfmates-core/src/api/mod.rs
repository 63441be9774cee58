//! Steam Web API client module.
//!
//! `SteamClient` talks to the two read-only endpoints the service needs:
//! a player's owned games and the global app catalog. Callers depend on the
//! `GameLibrarySource` trait so the engine can run against a fake.

pub mod client;
pub mod error;
pub mod source;

pub use client::SteamClient;
pub use error::ApiError;
pub use source::GameLibrarySource;
