//! Researcher endpoints: listings, the create/update/delete write paths, and
//! the top-by-publications report.
//!
//! Each handler is one repository call; the write handlers add exactly one
//! classifier decision via [`ApiError::write`].

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::db::repos::ResearcherRepo;
use crate::http::error::ApiError;
use crate::http::server::AppState;
use crate::models::{
    ProfilePatch, Researcher, ResearcherForm, ResearcherSummary, ResearcherUpdate, TopResearcher,
};

/// GET /researcher - list all researchers
async fn list_researchers(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Researcher>>, ApiError> {
    let researchers = ResearcherRepo::new(state.store.as_ref()).list().await?;
    Ok(Json(researchers))
}

/// GET /laboratory/{labno}/researchers - researchers in one laboratory
async fn laboratory_researchers(
    State(state): State<Arc<AppState>>,
    Path(labno): Path<i64>,
) -> Result<Json<Vec<ResearcherSummary>>, ApiError> {
    let researchers = ResearcherRepo::new(state.store.as_ref())
        .in_lab(labno)
        .await?;
    Ok(Json(researchers))
}

/// GET /researcher/add - blank form payload for the create view
async fn blank_form() -> Json<ResearcherForm> {
    Json(ResearcherForm::default())
}

/// POST /researcher/add - create a researcher
async fn create_researcher(
    State(state): State<Arc<AppState>>,
    Json(form): Json<ResearcherForm>,
) -> Result<(StatusCode, Json<ResearcherForm>), ApiError> {
    ResearcherRepo::new(state.store.as_ref())
        .create(&form)
        .await
        .map_err(|err| ApiError::write("create researcher", None, err))?;

    Ok((StatusCode::CREATED, Json(form)))
}

/// GET /researcher/update/{chno} - current row, to pre-populate an edit view
async fn edit_researcher(
    State(state): State<Arc<AppState>>,
    Path(chno): Path<i64>,
) -> Result<Json<Researcher>, ApiError> {
    let researcher = ResearcherRepo::new(state.store.as_ref()).get(chno).await?;
    Ok(Json(researcher))
}

/// POST /researcher/update/{chno} - full update keyed by identifier
async fn update_researcher(
    State(state): State<Arc<AppState>>,
    Path(chno): Path<i64>,
    Json(form): Json<ResearcherUpdate>,
) -> Result<StatusCode, ApiError> {
    ResearcherRepo::new(state.store.as_ref())
        .update(chno, &form)
        .await
        .map_err(|err| ApiError::write("update researcher", Some(chno), err))?;

    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /researcher/update/{chno} - partial profile update; absent fields
/// keep their stored values
async fn patch_researcher(
    State(state): State<Arc<AppState>>,
    Path(chno): Path<i64>,
    Json(patch): Json<ProfilePatch>,
) -> Result<StatusCode, ApiError> {
    ResearcherRepo::new(state.store.as_ref())
        .update_profile(chno, &patch)
        .await
        .map_err(|err| ApiError::write("update researcher profile", Some(chno), err))?;

    Ok(StatusCode::NO_CONTENT)
}

/// GET|DELETE /researcher/delete/{chno} - delete by identifier (GET kept for
/// plain-link compatibility)
async fn delete_researcher(
    State(state): State<Arc<AppState>>,
    Path(chno): Path<i64>,
) -> Result<StatusCode, ApiError> {
    ResearcherRepo::new(state.store.as_ref())
        .delete(chno)
        .await
        .map_err(|err| ApiError::write("delete researcher", Some(chno), err))?;

    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Default, Deserialize)]
struct TopParams {
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
}

/// GET /researchers/top?start_date&end_date - top researchers by publication
/// count in the (closed-inclusive) range; two parameters in, rows out
async fn top_researchers(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TopParams>,
) -> Result<Json<Vec<TopResearcher>>, ApiError> {
    let start = params
        .start_date
        .unwrap_or_else(|| NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    let end = params
        .end_date
        .unwrap_or_else(|| NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());

    let top = ResearcherRepo::new(state.store.as_ref())
        .top_by_publications(start, end)
        .await?;
    Ok(Json(top))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/researcher", get(list_researchers))
        .route("/researcher/add", get(blank_form).post(create_researcher))
        .route(
            "/researcher/update/{chno}",
            get(edit_researcher)
                .post(update_researcher)
                .patch(patch_researcher),
        )
        .route(
            "/researcher/delete/{chno}",
            get(delete_researcher).delete(delete_researcher),
        )
        .route("/researchers/top", get(top_researchers))
        .route("/laboratory/{labno}/researchers", get(laboratory_researchers))
}
