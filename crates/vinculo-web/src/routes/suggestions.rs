use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::Json;
use axum::routing::post;
use axum::Router;
use vinculo_core::suggest::{self, ProjectSuggestion, SuggestionInput};

use crate::error::ApiError;
use crate::routes::parse_body;
use crate::AppState;

const AI_DISABLED: &str = "Las sugerencias de IA no están disponibles en este momento.";

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/v1/suggestions", post(suggest_details))
}

async fn suggest_details(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: axum::body::Bytes,
) -> Result<Json<ProjectSuggestion>, ApiError> {
    let input: SuggestionInput = parse_body(&headers, &body)?;
    suggest::check_input(&input)?;

    let llm = state
        .llm
        .as_ref()
        .ok_or_else(|| ApiError::unavailable(AI_DISABLED))?;

    let suggestion = suggest::suggest_project_details(llm, &input).await?;
    Ok(Json(suggestion))
}
