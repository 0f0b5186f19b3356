use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;
use axum::Form;
use tracing::error;

use crate::api::state::AppState;
use crate::api::{outcome_status, ApiError};
use crate::lookup::{LookupOutcome, LookupRequest};
use crate::render::{render_page, PageView};

fn page(
    state: &AppState,
    form: &LookupRequest,
    outcome: Option<&LookupOutcome>,
) -> Result<Html<String>, ApiError> {
    let lookup = &state.lookup;
    let html = render_page(&PageView {
        form,
        regions: lookup.allowed_regions(),
        default_region: lookup.default_region().as_str(),
        outcome,
    })
    .map_err(|e| {
        error!("Failed to render page: {}", e);
        ApiError::Internal("could not render page".to_string())
    })?;
    Ok(Html(html))
}

pub async fn index(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    page(&state, &LookupRequest::default(), None)
}

pub async fn lookup(
    State(state): State<AppState>,
    Form(form): Form<LookupRequest>,
) -> Result<(StatusCode, Html<String>), ApiError> {
    let outcome = state.lookup.lookup(&form).await;
    let html = page(&state, &form, Some(&outcome))?;
    Ok((outcome_status(&outcome), html))
}
