use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::{
    chzzk::{
        structs::{
            Envelope, ExternalVodPayload, ExternalVodStream, FollowingList, LiveDetail, SearchPage,
            VideoDetail,
        },
        utils::{DEFAULT_API_BASE, DEFAULT_VOD_BASE},
    },
    credentials::{CredentialProvider, Headers},
    error::{Error, Result},
};

/// Where requests are sent to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_base: String,
    pub vod_base: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            vod_base: DEFAULT_VOD_BASE.to_string(),
        }
    }
}

impl ClientConfig {
    /// Defaults, overridden by `CHZZK_API_BASE` / `CHZZK_VOD_BASE` when set
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_base: std::env::var("CHZZK_API_BASE").unwrap_or(defaults.api_base),
            vod_base: std::env::var("CHZZK_VOD_BASE").unwrap_or(defaults.vod_base),
        }
    }
}

/// Thin typed wrapper over the Chzzk REST API
///
/// Every request carries [`CredentialProvider::request_headers`], read at send time.
#[derive(Debug, Clone)]
pub struct ChzzkClient {
    http: reqwest::Client,
    config: ClientConfig,
    credentials: CredentialProvider,
}

impl ChzzkClient {
    #[must_use]
    pub fn new(
        http: reqwest::Client,
        config: ClientConfig,
        credentials: CredentialProvider,
    ) -> Self {
        let config = ClientConfig {
            api_base: config.api_base.trim_end_matches('/').to_string(),
            vod_base: config.vod_base.trim_end_matches('/').to_string(),
        };
        Self {
            http,
            config,
            credentials,
        }
    }

    #[must_use]
    pub const fn credentials(&self) -> &CredentialProvider {
        &self.credentials
    }

    #[must_use]
    pub const fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Live broadcasts of followed channels; requires credentials to return anything useful
    ///
    /// # Errors
    /// On network failure or an undecodable body
    #[instrument(skip(self))]
    pub async fn fetch_following_live(&self) -> Result<Envelope<FollowingList>> {
        let url = format!("{}/service/v1/channels/followings/live", self.config.api_base);
        self.get_json(&url, &[], "following list").await
    }

    /// # Errors
    /// On network failure or an undecodable body
    #[instrument(skip(self))]
    pub async fn search_lives(
        &self,
        query: &str,
        offset: u32,
        size: u32,
    ) -> Result<Envelope<SearchPage>> {
        let url = format!("{}/service/v1/search/lives", self.config.api_base);
        self.get_json(&url, &search_params(query, offset, size), "live search")
            .await
    }

    /// # Errors
    /// On network failure or an undecodable body
    #[instrument(skip(self))]
    pub async fn search_videos(
        &self,
        query: &str,
        offset: u32,
        size: u32,
    ) -> Result<Envelope<SearchPage>> {
        let url = format!("{}/service/v1/search/videos", self.config.api_base);
        self.get_json(&url, &search_params(query, offset, size), "video search")
            .await
    }

    /// # Errors
    /// On network failure or an undecodable body
    #[instrument(skip(self))]
    pub async fn fetch_live_detail(&self, channel_id: &str) -> Result<Envelope<LiveDetail>> {
        let url = format!(
            "{}/service/v3.3/channels/{channel_id}/live-detail",
            self.config.api_base
        );
        self.get_json(&url, &[], "live detail").await
    }

    /// # Errors
    /// On network failure or an undecodable body
    #[instrument(skip(self))]
    pub async fn fetch_video_detail(&self, video_number: &str) -> Result<Envelope<VideoDetail>> {
        let url = format!("{}/service/v3/videos/{video_number}", self.config.api_base);
        self.get_json(&url, &[], "video detail").await
    }

    /// Stream list of the upstream VOD provider, keyed by the video's `inKey`
    ///
    /// # Errors
    /// On network failure or an undecodable body
    #[instrument(skip(self, play_key))]
    pub async fn fetch_external_vod(
        &self,
        video_id: &str,
        play_key: &str,
    ) -> Result<Vec<ExternalVodStream>> {
        let url = format!("{}/vod/play/v2.0/{video_id}", self.config.vod_base);
        let payload: ExternalVodPayload = self
            .get_json(&url, &[("key", play_key.to_string())], "external VOD")
            .await?;
        Ok(payload.into_streams())
    }

    /// Attaches the current header profile to a request
    pub(crate) fn with_headers(
        req: reqwest::RequestBuilder,
        headers: &Headers,
    ) -> reqwest::RequestBuilder {
        headers
            .iter()
            .fold(req, |req, (name, value)| req.header(name.as_str(), value.as_str()))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
        what: &'static str,
    ) -> Result<T> {
        let mut req = self.http.get(url);
        if !query.is_empty() {
            req = req.query(query);
        }
        let req = Self::with_headers(req, &self.credentials.request_headers());

        let transport = |source| Error::Transport {
            url: url.to_string(),
            source,
        };
        let res = req.send().await.map_err(transport)?;
        let status = res.status();
        let final_url = res.url().to_string();
        let body = res.text().await.map_err(transport)?;
        debug!(%status, bytes = body.len(), "Received {what}");

        decode_body(&body, status, final_url, what)
    }
}

fn search_params(query: &str, offset: u32, size: u32) -> [(&'static str, String); 3] {
    [
        ("keyword", query.to_string()),
        ("offset", offset.to_string()),
        ("size", size.to_string()),
    ]
}

/// Error envelopes frequently come with 4xx statuses; those still decode.
/// Only a body that fails to decode is blamed on the status.
fn decode_body<T: DeserializeOwned>(
    body: &str,
    status: reqwest::StatusCode,
    url: String,
    what: &'static str,
) -> Result<T> {
    match serde_json::from_str(body) {
        Ok(v) => Ok(v),
        Err(_) if !status.is_success() => Err(Error::Status { status, url }),
        Err(source) => Err(Error::Decode { what, source }),
    }
}
