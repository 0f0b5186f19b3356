use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use tracing::warn;

use crate::api::state::AppState;

const NOT_FOUND_BODY: &str = "riot.txt not found.";

/// Serve the configured domain verification file as plain text.
pub async fn riot_txt(State(state): State<AppState>) -> Response {
    let Some(path) = state.verification_file.as_deref() else {
        return (StatusCode::NOT_FOUND, NOT_FOUND_BODY).into_response();
    };

    match tokio::fs::read_to_string(path).await {
        Ok(contents) => (
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            contents,
        )
            .into_response(),
        Err(e) => {
            warn!("Cannot read verification file {}: {}", path.display(), e);
            (StatusCode::NOT_FOUND, NOT_FOUND_BODY).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::api::build_router;
    use crate::api::routes::pages::tests::state_with;
    use crate::upstream::MockRankApi;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::sync::Arc;
    use tower::util::ServiceExt;

    async fn get_text(app: axum::Router, uri: &str) -> (StatusCode, Option<String>, String) {
        let resp = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let content_type = resp
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, content_type, String::from_utf8_lossy(&body).into_owned())
    }

    fn mock() -> Arc<MockRankApi> {
        Arc::new(MockRankApi::ranked("abc123", serde_json::json!({})))
    }

    #[tokio::test]
    async fn test_serves_configured_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("riot.txt");
        std::fs::write(&path, "3f1c9a2e-verification").unwrap();

        let mut state = state_with(mock());
        state.verification_file = Some(Arc::new(path));
        let app = build_router(state);

        let (status, content_type, body) = get_text(app, "/riot.txt").await;
        assert_eq!(status, StatusCode::OK);
        assert!(content_type.unwrap().starts_with("text/plain"));
        assert_eq!(body, "3f1c9a2e-verification");
    }

    #[tokio::test]
    async fn test_missing_file_is_404() {
        let tmp = tempfile::tempdir().unwrap();
        let mut state = state_with(mock());
        state.verification_file = Some(Arc::new(tmp.path().join("absent.txt")));
        let app = build_router(state);

        let (status, _, body) = get_text(app, "/riot.txt").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, "riot.txt not found.");
    }

    #[tokio::test]
    async fn test_unconfigured_is_404() {
        let app = build_router(state_with(mock()));
        let (status, _, _) = get_text(app, "/riot.txt").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_health() {
        let app = build_router(state_with(mock()));
        let (status, _, body) = get_text(app, "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("\"ok\""));
    }
}
