use axum::extract::{Query, State};
use axum::Json;
use serde::Serialize;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::lookup::{LookupOutcome, LookupRequest};
use crate::models::NormalizedRank;

#[derive(Debug, Serialize)]
pub struct RankResponse {
    pub outcome: &'static str,
    pub player: String,
    pub region: String,
    pub rank: NormalizedRank,
}

pub async fn get_rank(
    State(state): State<AppState>,
    Query(request): Query<LookupRequest>,
) -> Result<Json<RankResponse>, ApiError> {
    let outcome = state.lookup.lookup(&request).await;
    let kind = outcome.kind();
    let rank = outcome.rank();

    match outcome {
        LookupOutcome::Ranked { player, region, .. }
        | LookupOutcome::Unranked { player, region } => Ok(Json(RankResponse {
            outcome: kind,
            player: player.to_string(),
            region: region.to_string(),
            rank: rank.unwrap_or_default(),
        })),
        LookupOutcome::NotFound { player } => {
            Err(ApiError::NotFound(format!("No account named {}", player)))
        }
        LookupOutcome::Failed(e) => Err(e.into()),
    }
}
