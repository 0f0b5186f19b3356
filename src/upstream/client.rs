//! `reqwest`-backed upstream client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderName, HeaderValue, USER_AGENT};
use reqwest::{Client, Response, StatusCode};
use serde_json::Value;
use tracing::{debug, info, warn};

use super::{RankApi, UpstreamError};
use crate::config::{ApiKey, UpstreamConfig};
use crate::models::{Puuid, RawRankResponse, Region, RiotId};

/// A key and the header it travels in.
struct KeyHeader {
    name: HeaderName,
    value: HeaderValue,
}

impl KeyHeader {
    fn new(field: &str, header: &str, key: &ApiKey) -> Result<Self, UpstreamError> {
        let name = HeaderName::from_bytes(header.as_bytes())
            .map_err(|e| UpstreamError::InvalidConfig(format!("{}: {}", field, e)))?;

        let mut value = HeaderValue::from_str(key.expose()).map_err(|_| {
            UpstreamError::InvalidConfig(format!("key for {} is not a valid header value", field))
        })?;
        value.set_sensitive(true);

        Ok(Self { name, value })
    }
}

/// Client for the identity and rank endpoints described by `UpstreamConfig`.
///
/// The two endpoints may live on different hosts, so each has its own key
/// and a request only ever carries the key of the endpoint it targets.
pub struct RiotClient {
    client: Client,
    identity_url: String,
    rank_url: String,
    identity_key: KeyHeader,
    rank_key: KeyHeader,
    timeout: Duration,
}

impl RiotClient {
    pub fn new(
        config: &UpstreamConfig,
        identity_key: ApiKey,
        rank_key: ApiKey,
    ) -> Result<Self, UpstreamError> {
        let identity_key = KeyHeader::new(
            "identity_key_header",
            &config.identity_key_header,
            &identity_key,
        )?;
        let rank_key = KeyHeader::new("rank_key_header", &config.rank_key_header, &rank_key)?;

        let timeout = Duration::from_secs(config.timeout_seconds);
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| UpstreamError::InvalidConfig(e.to_string()))?;

        Ok(Self {
            client,
            identity_url: config.identity_url.clone(),
            rank_url: config.rank_url.clone(),
            identity_key,
            rank_key,
            timeout,
        })
    }

    fn identity_url_for(&self, id: &RiotId, region: &Region) -> String {
        self.identity_url
            .replace("{region}", &urlencoding::encode(region.as_str()))
            .replace("{name}", &urlencoding::encode(&id.game_name))
            .replace("{tag}", &urlencoding::encode(&id.tag_line))
    }

    fn rank_url_for(&self, puuid: &Puuid, region: &Region) -> String {
        self.rank_url
            .replace("{region}", &urlencoding::encode(region.as_str()))
            .replace("{puuid}", &urlencoding::encode(puuid.as_str()))
    }

    async fn get(&self, url: &str, key: &KeyHeader) -> Result<Response, UpstreamError> {
        debug!("GET {}", url);

        self.client
            .get(url)
            .header(USER_AGENT, concat!("rank-lookup/", env!("CARGO_PKG_VERSION")))
            .header(&key.name, key.value.clone())
            .send()
            .await
            .map_err(|e| self.classify(e))
    }

    /// Split transport failures into timeouts and everything else.
    fn classify(&self, error: reqwest::Error) -> UpstreamError {
        if error.is_timeout() {
            UpstreamError::Timeout(self.timeout.as_secs())
        } else {
            UpstreamError::Network(error.to_string())
        }
    }

    async fn read_body(&self, response: Response) -> Result<String, UpstreamError> {
        response.text().await.map_err(|e| self.classify(e))
    }
}

/// Pull the player id out of an identity response, bare or wrapped in `data`.
fn extract_puuid(body: &Value) -> Option<Puuid> {
    body.get("puuid")
        .or_else(|| body.pointer("/data/puuid"))
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(Puuid::new)
}

#[async_trait]
impl RankApi for RiotClient {
    fn name(&self) -> &'static str {
        "riot"
    }

    async fn resolve_identity(&self, id: &RiotId, region: &Region) -> Result<Puuid, UpstreamError> {
        let url = self.identity_url_for(id, region);
        let response = self.get(&url, &self.identity_key).await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            info!("Identity {} not found in {}", id, region);
            return Err(UpstreamError::NotFound(id.to_string()));
        }

        if !status.is_success() {
            warn!("Identity lookup for {} returned {}", id, status);
            return Err(UpstreamError::Http {
                status: status.as_u16(),
            });
        }

        let text = self.read_body(response).await?;
        let body: Value = serde_json::from_str(&text)
            .map_err(|e| UpstreamError::Malformed(format!("identity body is not JSON: {}", e)))?;

        extract_puuid(&body)
            .ok_or_else(|| UpstreamError::Malformed("identity response has no puuid".to_string()))
    }

    async fn fetch_rank(
        &self,
        puuid: &Puuid,
        region: &Region,
    ) -> Result<RawRankResponse, UpstreamError> {
        let url = self.rank_url_for(puuid, region);
        let response = self.get(&url, &self.rank_key).await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND || status == StatusCode::NO_CONTENT {
            debug!("No rank data for {} ({})", puuid, status);
            return Ok(RawRankResponse::NotRanked);
        }

        if !status.is_success() {
            warn!("Rank lookup for {} returned {}", puuid, status);
            return Err(UpstreamError::Http {
                status: status.as_u16(),
            });
        }

        let text = self.read_body(response).await?;
        if text.trim().is_empty() {
            return Ok(RawRankResponse::NotRanked);
        }

        let body: Value = serde_json::from_str(&text)
            .map_err(|e| UpstreamError::Malformed(format!("rank body is not JSON: {}", e)))?;

        Ok(RawRankResponse::Body(body))
    }
}
