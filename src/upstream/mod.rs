//! Upstream game-statistics API adapter.
//!
//! Two sequential lookups: identity (name + tag to PUUID), then rank by
//! PUUID. All implementations go through the `RankApi` trait so the
//! lookup flow can be exercised without a network.

pub mod client;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Puuid, RawRankResponse, Region, RiotId};

pub use client::RiotClient;

#[cfg(test)]
use std::sync::atomic::{AtomicUsize, Ordering};

/// Errors that can occur while talking to the upstream API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpstreamError {
    #[error("No account named {0}")]
    NotFound(String),

    #[error("Upstream returned HTTP {status}")]
    Http { status: u16 },

    #[error("Upstream did not answer within {0} seconds")]
    Timeout(u64),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed upstream response: {0}")]
    Malformed(String),

    #[error("Invalid client configuration: {0}")]
    InvalidConfig(String),
}

impl UpstreamError {
    /// HTTP status behind this error, if upstream answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            UpstreamError::NotFound(_) => Some(404),
            UpstreamError::Http { status } => Some(*status),
            _ => None,
        }
    }

    pub fn is_rate_limited(&self) -> bool {
        self.status() == Some(429)
    }

    /// Message suitable for showing to the person who submitted the lookup.
    pub fn user_message(&self) -> String {
        match self {
            UpstreamError::NotFound(player) => {
                format!("Player {} was not found in this region.", player)
            }
            UpstreamError::Http { status } => status_message(*status),
            UpstreamError::Timeout(_) => {
                "The stats service took too long to respond. Please try again.".to_string()
            }
            UpstreamError::Network(_) => {
                "Could not reach the stats service. Please try again later.".to_string()
            }
            UpstreamError::Malformed(_) => {
                "The stats service returned data we could not understand.".to_string()
            }
            UpstreamError::InvalidConfig(_) => {
                "The lookup service is misconfigured.".to_string()
            }
        }
    }
}

/// Human-readable explanation for an upstream HTTP status.
pub fn status_message(status: u16) -> String {
    match status {
        400 => "Bad request: the player name or tag is malformed.".to_string(),
        401 | 403 => "The API key was rejected by the stats service.".to_string(),
        404 => "Player not found.".to_string(),
        429 => "Rate limit exceeded. Please wait a moment and try again.".to_string(),
        500..=599 => {
            "The stats service is having problems right now. Please try again later.".to_string()
        }
        other => format!("Unexpected response from the stats service (HTTP {}).", other),
    }
}

/// The two upstream calls a rank lookup needs.
#[async_trait]
pub trait RankApi: Send + Sync {
    /// Implementation name for logging.
    fn name(&self) -> &'static str;

    /// Resolve a display name and tag to an opaque player id.
    async fn resolve_identity(&self, id: &RiotId, region: &Region) -> Result<Puuid, UpstreamError>;

    /// Fetch the raw rank payload for a resolved player.
    async fn fetch_rank(
        &self,
        puuid: &Puuid,
        region: &Region,
    ) -> Result<RawRankResponse, UpstreamError>;
}

/// Scripted `RankApi` for tests; counts the calls it receives.
#[cfg(test)]
pub struct MockRankApi {
    identity: Result<Puuid, UpstreamError>,
    rank: Result<RawRankResponse, UpstreamError>,
    identity_calls: AtomicUsize,
    rank_calls: AtomicUsize,
}

#[cfg(test)]
impl MockRankApi {
    pub fn new(
        identity: Result<Puuid, UpstreamError>,
        rank: Result<RawRankResponse, UpstreamError>,
    ) -> Self {
        Self {
            identity,
            rank,
            identity_calls: Default::default(),
            rank_calls: Default::default(),
        }
    }

    /// Identity resolves to `puuid`, rank endpoint answers with `body`.
    pub fn ranked(puuid: &str, body: serde_json::Value) -> Self {
        Self::new(Ok(Puuid::new(puuid)), Ok(RawRankResponse::Body(body)))
    }

    pub fn identity_calls(&self) -> usize {
        self.identity_calls.load(Ordering::SeqCst)
    }

    pub fn rank_calls(&self) -> usize {
        self.rank_calls.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
#[async_trait]
impl RankApi for MockRankApi {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn resolve_identity(
        &self,
        _id: &RiotId,
        _region: &Region,
    ) -> Result<Puuid, UpstreamError> {
        self.identity_calls.fetch_add(1, Ordering::SeqCst);
        self.identity.clone()
    }

    async fn fetch_rank(
        &self,
        _puuid: &Puuid,
        _region: &Region,
    ) -> Result<RawRankResponse, UpstreamError> {
        self.rank_calls.fetch_add(1, Ordering::SeqCst);
        self.rank.clone()
    }
}
