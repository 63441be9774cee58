//! API client for the Steam Web API.
//!
//! This module provides the `SteamClient` struct for the two read-only
//! requests the service makes: a player's owned games and the app catalog.
//! Neither response is cached here; every call is a live round trip.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use crate::config::Settings;
use crate::models::{AppListResponse, CatalogEntry, OwnedGame, OwnedGamesResponse};

use super::{ApiError, GameLibrarySource};

// ============================================================================
// Constants
// ============================================================================

/// Public Steam Web API host
const API_BASE_URL: &str = "https://api.steampowered.com";

const OWNED_GAMES_PATH: &str = "/IPlayerService/GetOwnedGames/v0001/";
const APP_LIST_PATH: &str = "/ISteamApps/GetAppList/v2/";

/// HTTP request timeout in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// API client for the Steam Web API.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct SteamClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl SteamClient {
    /// Create a client for the public API with default timeouts
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_options(api_key, API_BASE_URL, Duration::from_secs(REQUEST_TIMEOUT_SECS))
    }

    /// Create a client against a specific base URL
    pub fn with_options(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_settings(api_key: impl Into<String>, settings: &Settings) -> Result<Self> {
        Self::with_options(api_key, settings.api_base.clone(), settings.http_timeout)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body).into())
        }
    }

    /// Fetch the games a player owns.
    ///
    /// A response without `response.games` (private profile, unknown id)
    /// yields an empty list rather than an error.
    pub async fn fetch_owned_games(&self, steam_id: u64) -> Result<Vec<OwnedGame>> {
        let url = format!("{}{}", self.base_url, OWNED_GAMES_PATH);
        let steam_id_param = steam_id.to_string();

        let response = self
            .client
            .get(&url)
            .query(&[
                ("key", self.api_key.as_str()),
                ("steamid", steam_id_param.as_str()),
                ("format", "json"),
            ])
            .send()
            .await
            .map_err(ApiError::NetworkError)
            .with_context(|| format!("Failed to fetch owned games for {}", steam_id))?;

        let response = Self::check_response(response)
            .await
            .with_context(|| format!("Owned games request failed for {}", steam_id))?;

        let parsed: OwnedGamesResponse = response
            .json()
            .await
            .with_context(|| format!("Failed to parse owned games response for {}", steam_id))?;

        let games = parsed.into_games();
        debug!(steam_id, count = games.len(), "Fetched owned games");
        Ok(games)
    }

    /// Fetch the full app catalog.
    ///
    /// Never fails: any error is logged and an empty catalog is returned.
    pub async fn fetch_catalog(&self) -> Vec<CatalogEntry> {
        match self.try_fetch_catalog().await {
            Ok(apps) => {
                debug!(count = apps.len(), "Fetched app catalog");
                apps
            }
            Err(e) => {
                warn!(error = %format!("{:#}", e), "Error fetching app catalog from Steam API");
                Vec::new()
            }
        }
    }

    async fn try_fetch_catalog(&self) -> Result<Vec<CatalogEntry>> {
        let url = format!("{}{}", self.base_url, APP_LIST_PATH);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(ApiError::NetworkError)
            .context("Failed to send app catalog request")?;

        let response = Self::check_response(response).await?;

        let parsed: AppListResponse = response
            .json()
            .await
            .context("Failed to parse app catalog response")?;

        Ok(parsed.into_apps())
    }
}

#[async_trait]
impl GameLibrarySource for SteamClient {
    async fn fetch_owned_games(&self, steam_id: u64) -> Result<Vec<OwnedGame>> {
        SteamClient::fetch_owned_games(self, steam_id).await
    }

    async fn fetch_catalog(&self) -> Vec<CatalogEntry> {
        SteamClient::fetch_catalog(self).await
    }
}

// ============================================================================
// Tests
// ============================================================================
