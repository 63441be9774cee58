//! Application configuration management.
//!
//! Two sources feed the service at startup:
//!
//! - the keys file (`keys.json`), holding the Steam API key and the three
//!   players' account ids, parsed into an immutable [`Config`]
//! - `SHELFMATES_*` environment variables (optionally from `.env`), parsed
//!   into [`Settings`]
//!
//! Neither is reloaded while the server runs.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer};

/// Application name used for the cache directory path
const APP_NAME: &str = "shelfmates";

/// Cache directory used when the platform has no cache dir
const FALLBACK_CACHE_DIR: &str = "game_files";

const DEFAULT_KEYS_FILE: &str = "keys.json";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5000";
const DEFAULT_API_BASE: &str = "https://api.steampowered.com";

/// Cached lists are recomputed after 24 hours.
const DEFAULT_CACHE_TTL_SECS: u64 = 86_400;

/// Upstream request timeout.
/// The app catalog is a multi-megabyte response, 30s leaves room for it.
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// The three fixed players the service compares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerSlot {
    Ryan,
    Jess,
    Amber,
}

impl PlayerSlot {
    pub const ALL: [PlayerSlot; 3] = [PlayerSlot::Ryan, PlayerSlot::Jess, PlayerSlot::Amber];

    /// Display name used in page headings.
    pub fn label(&self) -> &'static str {
        match self {
            PlayerSlot::Ryan => "Ryan",
            PlayerSlot::Jess => "Jess",
            PlayerSlot::Amber => "Amber",
        }
    }

    /// Lowercase name used in routes and cache file names.
    pub fn slug(&self) -> &'static str {
        match self {
            PlayerSlot::Ryan => "ryan",
            PlayerSlot::Jess => "jess",
            PlayerSlot::Amber => "amber",
        }
    }
}

impl fmt::Display for PlayerSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub slot: PlayerSlot,
    pub steam_id: u64,
}

/// Contents of the keys file.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    players: [Player; 3],
}

/// On-disk shape of `keys.json`.
#[derive(Deserialize)]
struct KeysFile {
    #[serde(rename = "API_KEY")]
    api_key: String,
    #[serde(rename = "ID", deserialize_with = "steam_id")]
    ryan: u64,
    #[serde(rename = "JESS_ID", deserialize_with = "steam_id")]
    jess: u64,
    #[serde(rename = "AMBER_ID", deserialize_with = "steam_id")]
    amber: u64,
}

/// Steam ids show up both as JSON numbers and as quoted strings.
fn steam_id<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid steam id: {:?}", s))),
    }
}

impl Config {
    pub fn new(api_key: impl Into<String>, ryan: u64, jess: u64, amber: u64) -> Self {
        Self {
            api_key: api_key.into(),
            players: [
                Player { slot: PlayerSlot::Ryan, steam_id: ryan },
                Player { slot: PlayerSlot::Jess, steam_id: jess },
                Player { slot: PlayerSlot::Amber, steam_id: amber },
            ],
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read keys file: {}", path.display()))?;
        Self::from_json(&contents)
            .with_context(|| format!("Failed to parse keys file: {}", path.display()))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let keys: KeysFile = serde_json::from_str(json)?;
        if keys.api_key.trim().is_empty() {
            anyhow::bail!("API_KEY is empty");
        }
        Ok(Self::new(keys.api_key, keys.ryan, keys.jess, keys.amber))
    }

    pub fn players(&self) -> &[Player; 3] {
        &self.players
    }

    pub fn player(&self, slot: PlayerSlot) -> &Player {
        match slot {
            PlayerSlot::Ryan => &self.players[0],
            PlayerSlot::Jess => &self.players[1],
            PlayerSlot::Amber => &self.players[2],
        }
    }
}

/// Runtime settings read from the environment.
#[derive(Debug, Clone)]
pub struct Settings {
    pub keys_path: PathBuf,
    pub bind_addr: String,
    pub cache_dir: PathBuf,
    pub cache_ttl: Duration,
    /// Keep the app catalog in memory for this long. `None` fetches it on
    /// every name lookup.
    pub catalog_ttl: Option<Duration>,
    pub http_timeout: Duration,
    pub api_base: String,
    pub log_dir: Option<PathBuf>,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build settings from an arbitrary variable lookup. Empty values count
    /// as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let secs = |name: &str| -> Result<Option<Duration>> {
            match var(name) {
                Some(v) => {
                    let n: u64 = v
                        .trim()
                        .parse()
                        .with_context(|| format!("{} must be a whole number of seconds, got {:?}", name, v))?;
                    Ok(Some(Duration::from_secs(n)))
                }
                None => Ok(None),
            }
        };

        Ok(Self {
            keys_path: var("SHELFMATES_KEYS")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_KEYS_FILE)),
            bind_addr: var("SHELFMATES_BIND").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            cache_dir: var("SHELFMATES_CACHE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(default_cache_dir),
            cache_ttl: secs("SHELFMATES_CACHE_TTL_SECS")?
                .unwrap_or(Duration::from_secs(DEFAULT_CACHE_TTL_SECS)),
            catalog_ttl: secs("SHELFMATES_CATALOG_TTL_SECS")?,
            http_timeout: secs("SHELFMATES_HTTP_TIMEOUT_SECS")?
                .unwrap_or(Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS)),
            api_base: var("SHELFMATES_API_BASE")
                .map(|base| base.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            log_dir: var("SHELFMATES_LOG_DIR").map(PathBuf::from),
        })
    }
}

fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .map(|dir| dir.join(APP_NAME))
        .unwrap_or_else(|| PathBuf::from(FALLBACK_CACHE_DIR))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings_from(vars: &[(&str, &str)]) -> Result<Settings> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn test_keys_file_accepts_numbers_and_strings() {
        let config = Config::from_json(
            r#"{"API_KEY":"abc","ID":"76561197960287930","JESS_ID":76561197960287931,"AMBER_ID":" 76561197960287932 "}"#,
        )
        .unwrap();
        assert_eq!(config.api_key, "abc");
        assert_eq!(config.player(PlayerSlot::Ryan).steam_id, 76561197960287930);
        assert_eq!(config.player(PlayerSlot::Jess).steam_id, 76561197960287931);
        assert_eq!(config.player(PlayerSlot::Amber).steam_id, 76561197960287932);
    }

    #[test]
    fn test_keys_file_rejects_bad_input() {
        assert!(Config::from_json(r#"{"API_KEY":"abc","ID":1,"JESS_ID":2}"#).is_err());
        assert!(Config::from_json(r#"{"API_KEY":"abc","ID":"me","JESS_ID":2,"AMBER_ID":3}"#).is_err());
        assert!(Config::from_json(r#"{"API_KEY":"  ","ID":1,"JESS_ID":2,"AMBER_ID":3}"#).is_err());
    }

    #[test]
    fn test_load_reports_path() {
        let err = Config::load(Path::new("/nonexistent/keys.json")).unwrap_err();
        assert!(format!("{:#}", err).contains("/nonexistent/keys.json"));
    }

    #[test]
    fn test_players_are_in_slot_order() {
        let config = Config::new("k", 1, 2, 3);
        let slots: Vec<PlayerSlot> = config.players().iter().map(|p| p.slot).collect();
        assert_eq!(slots, PlayerSlot::ALL.to_vec());
    }

    #[test]
    fn test_settings_defaults() {
        let settings = settings_from(&[]).unwrap();
        assert_eq!(settings.keys_path, PathBuf::from("keys.json"));
        assert_eq!(settings.bind_addr, "127.0.0.1:5000");
        assert_eq!(settings.cache_ttl, Duration::from_secs(86_400));
        assert_eq!(settings.catalog_ttl, None);
        assert_eq!(settings.http_timeout, Duration::from_secs(30));
        assert_eq!(settings.api_base, "https://api.steampowered.com");
        assert!(settings.log_dir.is_none());
    }

    #[test]
    fn test_settings_overrides() {
        let settings = settings_from(&[
            ("SHELFMATES_CACHE_DIR", "/tmp/shelf"),
            ("SHELFMATES_CACHE_TTL_SECS", "60"),
            ("SHELFMATES_CATALOG_TTL_SECS", "3600"),
            ("SHELFMATES_API_BASE", "http://localhost:9000/"),
            ("SHELFMATES_LOG_DIR", ""),
        ])
        .unwrap();
        assert_eq!(settings.cache_dir, PathBuf::from("/tmp/shelf"));
        assert_eq!(settings.cache_ttl, Duration::from_secs(60));
        assert_eq!(settings.catalog_ttl, Some(Duration::from_secs(3600)));
        assert_eq!(settings.api_base, "http://localhost:9000");
        assert!(settings.log_dir.is_none());
    }

    #[test]
    fn test_settings_rejects_non_numeric_ttl() {
        let err = settings_from(&[("SHELFMATES_CACHE_TTL_SECS", "a day")]).unwrap_err();
        assert!(err.to_string().contains("SHELFMATES_CACHE_TTL_SECS"));
    }
}
