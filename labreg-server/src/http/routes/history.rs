//! Audit-history endpoint.

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};

use crate::db::repos::HistoryRepo;
use crate::http::error::ApiError;
use crate::http::server::AppState;
use crate::models::HistoryEntry;

/// GET /historique - audit history, newest first
async fn list_history(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<HistoryEntry>>, ApiError> {
    let entries = HistoryRepo::new(state.store.as_ref()).list().await?;
    Ok(Json(entries))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/historique", get(list_history))
}
