use serde::{Deserialize, Serialize};

/// Numeric Steam application id.
pub type AppId = u32;

/// One entry of a player's library. Playtime and the other per-game fields
/// the API returns are not used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnedGame {
    pub appid: AppId,
}

/// Body of `IPlayerService/GetOwnedGames`.
#[derive(Debug, Default, Deserialize)]
pub struct OwnedGamesResponse {
    #[serde(default)]
    pub response: OwnedGamesBody,
}

#[derive(Debug, Default, Deserialize)]
pub struct OwnedGamesBody {
    #[serde(default)]
    pub game_count: Option<u32>,
    #[serde(default)]
    pub games: Vec<OwnedGame>,
}

impl OwnedGamesResponse {
    pub fn into_games(self) -> Vec<OwnedGame> {
        self.response.games
    }
}

/// One entry of the global app catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub appid: AppId,
    #[serde(default)]
    pub name: String,
}

/// Body of `ISteamApps/GetAppList/v2`.
#[derive(Debug, Default, Deserialize)]
pub struct AppListResponse {
    #[serde(default)]
    pub applist: AppList,
}

#[derive(Debug, Default, Deserialize)]
pub struct AppList {
    #[serde(default)]
    pub apps: Vec<CatalogEntry>,
}

impl AppListResponse {
    pub fn into_apps(self) -> Vec<CatalogEntry> {
        self.applist.apps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owned_games_parses_nested_list() {
        let json = r#"{"response":{"game_count":2,"games":[
            {"appid":10,"playtime_forever":32},
            {"appid":400,"playtime_forever":0,"playtime_windows_forever":0}
        ]}}"#;
        let parsed: OwnedGamesResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.response.game_count, Some(2));
        let ids: Vec<AppId> = parsed.into_games().iter().map(|g| g.appid).collect();
        assert_eq!(ids, vec![10, 400]);
    }

    #[test]
    fn test_owned_games_missing_games_is_empty() {
        // Private profiles come back as an empty "response" object
        let parsed: OwnedGamesResponse = serde_json::from_str(r#"{"response":{}}"#).unwrap();
        assert!(parsed.into_games().is_empty());

        let parsed: OwnedGamesResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.into_games().is_empty());
    }

    #[test]
    fn test_app_list_parses_and_defaults() {
        let json = r#"{"applist":{"apps":[{"appid":400,"name":"Portal"},{"appid":70}]}}"#;
        let apps = serde_json::from_str::<AppListResponse>(json).unwrap().into_apps();
        assert_eq!(apps.len(), 2);
        assert_eq!(apps[0].name, "Portal");
        assert_eq!(apps[1].name, "");

        let apps = serde_json::from_str::<AppListResponse>(r#"{"other":1}"#)
            .unwrap()
            .into_apps();
        assert!(apps.is_empty());
    }
}
