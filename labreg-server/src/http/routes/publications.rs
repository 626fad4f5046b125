//! Publication endpoints: global listing, per-researcher listing, and the
//! per-publication bibliography.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

use crate::db::repos::PublicationRepo;
use crate::http::error::ApiError;
use crate::http::server::AppState;
use crate::models::{BibliographyEntry, Publication};

/// GET /publications/all - list all publications
async fn all_publications(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Publication>>, ApiError> {
    let publications = PublicationRepo::new(state.store.as_ref()).list().await?;
    Ok(Json(publications))
}

/// GET /researcher/{chno}/publications - publications for one researcher
async fn researcher_publications(
    State(state): State<Arc<AppState>>,
    Path(chno): Path<i64>,
) -> Result<Json<Vec<Publication>>, ApiError> {
    let publications = PublicationRepo::new(state.store.as_ref())
        .for_researcher(chno)
        .await?;
    Ok(Json(publications))
}

/// GET /publication/{pubno} - co-author bibliography for one publication
async fn bibliography(
    State(state): State<Arc<AppState>>,
    Path(pubno): Path<String>,
) -> Result<Json<Vec<BibliographyEntry>>, ApiError> {
    let entries = PublicationRepo::new(state.store.as_ref())
        .bibliography(&pubno)
        .await?;
    Ok(Json(entries))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/publications/all", get(all_publications))
        .route("/publication/{pubno}", get(bibliography))
        .route("/researcher/{chno}/publications", get(researcher_publications))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::fakes::EmptyStore;

    #[tokio::test]
    async fn empty_bibliography_is_an_empty_list() {
        let state = State(Arc::new(AppState {
            store: Arc::new(EmptyStore),
        }));

        let Json(entries) = bibliography(state, Path("P1".into())).await.unwrap();
        assert!(entries.is_empty());
    }
}
