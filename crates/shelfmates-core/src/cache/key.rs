use std::fmt;

use crate::config::PlayerSlot;

/// The fixed set of computations the cache holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKey {
    CommonGames,
    PlayerGames(PlayerSlot),
}

impl CacheKey {
    pub const ALL: [CacheKey; 4] = [
        CacheKey::CommonGames,
        CacheKey::PlayerGames(PlayerSlot::Ryan),
        CacheKey::PlayerGames(PlayerSlot::Jess),
        CacheKey::PlayerGames(PlayerSlot::Amber),
    ];

    /// File stem of the entry, e.g. `common_games` or `jess_games`.
    pub fn file_stem(&self) -> String {
        match self {
            CacheKey::CommonGames => "common_games".to_string(),
            CacheKey::PlayerGames(slot) => format!("{}_games", slot.slug()),
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.file_stem())
    }
}
