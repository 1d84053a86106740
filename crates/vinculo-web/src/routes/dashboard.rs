use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::Json;
use axum::routing::get;
use axum::Router;
use serde::Deserialize;
use vinculo_core::model::{Project, ProjectStats};

use crate::error::ApiError;
use crate::latency::{self, StoreOp};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/v1/stats", get(stats))
        .route("/api/v1/projects/recent", get(recent))
}

#[derive(Debug, Deserialize)]
pub struct RecentParams {
    pub count: Option<usize>,
}

async fn stats(State(state): State<Arc<AppState>>) -> Result<Json<ProjectStats>, ApiError> {
    latency::simulate(&state.config.store, StoreOp::Stats).await;
    let stats = state.read_store()?.stats();
    Ok(Json(stats))
}

/// Most recently created projects, newest first.
async fn recent(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RecentParams>,
) -> Result<Json<Vec<Project>>, ApiError> {
    let count = params.count.unwrap_or(state.config.store.recent_default);
    latency::simulate(&state.config.store, StoreOp::Recent).await;
    let projects = state.read_store()?.recent(count);
    Ok(Json(projects))
}
