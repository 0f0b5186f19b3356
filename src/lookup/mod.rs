//! Lookup orchestration: validate input, resolve the identity, fetch and
//! normalize the rank, and fold everything into a `LookupOutcome`.

use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::UpstreamConfig;
use crate::models::{NormalizedRank, Region, RegionError, RiotId};
use crate::normalize::Normalizer;
use crate::upstream::{RankApi, UpstreamError};

/// Errors that end a lookup without a rank.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error("Malformed rank response: {0}")]
    Malformed(String),
}

impl LookupError {
    /// Message suitable for the person who submitted the lookup.
    pub fn user_message(&self) -> String {
        match self {
            LookupError::Validation(msg) => msg.clone(),
            LookupError::Upstream(e) => e.user_message(),
            LookupError::Malformed(_) => {
                "The stats service returned rank data in an unknown format.".to_string()
            }
        }
    }
}

/// What a single lookup produced.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupOutcome {
    Ranked {
        player: RiotId,
        region: Region,
        rank: NormalizedRank,
    },
    Unranked {
        player: RiotId,
        region: Region,
    },
    NotFound {
        player: RiotId,
    },
    Failed(LookupError),
}

impl LookupOutcome {
    /// Rank record to display, if the player was found.
    pub fn rank(&self) -> Option<NormalizedRank> {
        match self {
            LookupOutcome::Ranked { rank, .. } => Some(rank.clone()),
            LookupOutcome::Unranked { .. } => Some(NormalizedRank::unranked()),
            _ => None,
        }
    }

    pub fn player(&self) -> Option<&RiotId> {
        match self {
            LookupOutcome::Ranked { player, .. }
            | LookupOutcome::Unranked { player, .. }
            | LookupOutcome::NotFound { player } => Some(player),
            LookupOutcome::Failed(_) => None,
        }
    }

    /// Short machine-readable label.
    pub fn kind(&self) -> &'static str {
        match self {
            LookupOutcome::Ranked { .. } => "ranked",
            LookupOutcome::Unranked { .. } => "unranked",
            LookupOutcome::NotFound { .. } => "not_found",
            LookupOutcome::Failed(_) => "error",
        }
    }
}

/// A submitted lookup form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LookupRequest {
    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub tag: String,

    /// Rank region override; the configured default is used when absent
    #[serde(default)]
    pub region: Option<String>,
}

impl LookupRequest {
    pub fn new(username: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            tag: tag.into(),
            region: None,
        }
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }
}

/// Runs lookups against a `RankApi`.
pub struct LookupService {
    api: Arc<dyn RankApi>,
    normalizer: Normalizer,
    identity_region: Region,
    rank_region: Region,
    allowed_regions: Vec<String>,
}

impl LookupService {
    pub fn new(api: Arc<dyn RankApi>, config: &UpstreamConfig) -> Result<Self, RegionError> {
        let normalizer = if config.strict_shapes {
            Normalizer::strict()
        } else {
            Normalizer::default()
        };

        Ok(Self {
            api,
            normalizer,
            identity_region: Region::parse(&config.identity_region, &config.allowed_regions)?,
            rank_region: Region::parse(&config.rank_region, &config.allowed_regions)?,
            allowed_regions: config.allowed_regions.clone(),
        })
    }

    pub fn allowed_regions(&self) -> &[String] {
        &self.allowed_regions
    }

    pub fn default_region(&self) -> &Region {
        &self.rank_region
    }

    /// Run one lookup. Never fails: errors become `LookupOutcome::Failed`.
    pub async fn lookup(&self, request: &LookupRequest) -> LookupOutcome {
        match self.run(request).await {
            Ok(outcome) => outcome,
            Err(LookupError::Validation(msg)) => {
                info!("Rejected lookup: {}", msg);
                LookupOutcome::Failed(LookupError::Validation(msg))
            }
            Err(e) => {
                warn!("Lookup via {} failed: {}", self.api.name(), e);
                LookupOutcome::Failed(e)
            }
        }
    }

    async fn run(&self, request: &LookupRequest) -> Result<LookupOutcome, LookupError> {
        let player = RiotId::new(&request.username, &request.tag)
            .map_err(|e| LookupError::Validation(e.to_string()))?;

        let region = match request.region.as_deref().map(str::trim) {
            Some(code) if !code.is_empty() => Region::parse(code, &self.allowed_regions)
                .map_err(|e| LookupError::Validation(e.to_string()))?,
            _ => self.rank_region.clone(),
        };

        info!(player = %player, region = %region, "Looking up rank");

        let puuid = match self
            .api
            .resolve_identity(&player, &self.identity_region)
            .await
        {
            Ok(puuid) => puuid,
            Err(UpstreamError::NotFound(_)) => {
                info!("No account for {}", player);
                return Ok(LookupOutcome::NotFound { player });
            }
            Err(e) => return Err(e.into()),
        };

        let raw = self.api.fetch_rank(&puuid, &region).await?;
        let rank = self
            .normalizer
            .normalize(&raw)
            .map_err(|e| LookupError::Malformed(e.to_string()))?;

        if rank.is_unranked() {
            info!("{} has no rank in {}", player, region);
            Ok(LookupOutcome::Unranked { player, region })
        } else {
            info!("{} is {} in {}", player, rank.tier, region);
            Ok(LookupOutcome::Ranked {
                player,
                region,
                rank,
            })
        }
    }
}
