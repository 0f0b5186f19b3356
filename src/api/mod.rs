//! HTTP front end.
//!
//! Axum router serving the HTML search page, a JSON rank endpoint and the
//! domain verification file.

pub mod routes;
pub mod state;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use thiserror::Error;
use tower_http::trace::TraceLayer;

use crate::lookup::{LookupError, LookupOutcome};
use crate::upstream::UpstreamError;
use state::AppState;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Upstream timeout: {0}")]
    UpstreamTimeout(String),

    #[error("Bad gateway: {0}")]
    BadGateway(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::RateLimited(_) => (StatusCode::TOO_MANY_REQUESTS, "RATE_LIMITED"),
            ApiError::UpstreamTimeout(_) => (StatusCode::GATEWAY_TIMEOUT, "UPSTREAM_TIMEOUT"),
            ApiError::BadGateway(_) => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status_and_code().0
    }
}

impl From<LookupError> for ApiError {
    fn from(error: LookupError) -> Self {
        let message = error.user_message();
        match error {
            LookupError::Validation(_) => ApiError::BadRequest(message),
            LookupError::Malformed(_) => ApiError::BadGateway(message),
            LookupError::Upstream(upstream) if upstream.is_rate_limited() => {
                ApiError::RateLimited(message)
            }
            LookupError::Upstream(upstream) => match upstream {
                UpstreamError::NotFound(_) => ApiError::NotFound(message),
                UpstreamError::Timeout(_) => ApiError::UpstreamTimeout(message),
                UpstreamError::InvalidConfig(_) => ApiError::Internal(message),
                UpstreamError::Http { .. }
                | UpstreamError::Network(_)
                | UpstreamError::Malformed(_) => ApiError::BadGateway(message),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

/// HTTP status for a rendered lookup page.
pub fn outcome_status(outcome: &LookupOutcome) -> StatusCode {
    match outcome {
        LookupOutcome::Ranked { .. } | LookupOutcome::Unranked { .. } => StatusCode::OK,
        LookupOutcome::NotFound { .. } => StatusCode::NOT_FOUND,
        LookupOutcome::Failed(e) => ApiError::from(e.clone()).status(),
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::pages::index))
        .route(
            "/lookup",
            get(routes::pages::index).post(routes::pages::lookup),
        )
        .route("/api/rank", get(routes::rank::get_rank))
        .route("/health", get(routes::health))
        .route("/riot.txt", get(routes::verification::riot_txt))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
