pub mod dashboard;
pub mod projects;
pub mod suggestions;

use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::Json;
use axum::routing::get;
use axum::Router;
use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health))
        .merge(projects::routes())
        .merge(dashboard::routes())
        .merge(suggestions::routes())
        .fallback(not_found)
}

async fn health(
    State(state): State<Arc<AppState>>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let projects = state.read_store()?.len();
    Ok(Json(serde_json::json!({
        "status": "ok",
        "projects": projects,
        "llm": state.llm.is_some(),
    })))
}

async fn not_found() -> ApiError {
    ApiError::not_found("Ruta no encontrada.")
}

/// Decode a JSON or `application/x-www-form-urlencoded` body.
pub(crate) fn parse_body<T: DeserializeOwned>(
    headers: &HeaderMap,
    body: &[u8],
) -> Result<T, ApiError> {
    let content_type = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    if content_type.contains("application/json") {
        serde_json::from_slice(body)
            .map_err(|e| ApiError::bad_request(format!("invalid JSON: {e}")))
    } else {
        serde_urlencoded::from_bytes(body)
            .map_err(|e| ApiError::bad_request(format!("invalid form data: {e}")))
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use axum::http::StatusCode;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_health() {
        let resp = test_router().oneshot(get("/health")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp.into_body()).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["projects"], 3);
        assert_eq!(json["llm"], false);
    }

    #[tokio::test]
    async fn test_unknown_route_is_json_404() {
        let resp = test_router().oneshot(get("/nope")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let json = body_json(resp.into_body()).await;
        assert!(json["error"].is_string());
    }
}
