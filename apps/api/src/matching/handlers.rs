//! HTTP handlers for the matching API.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::request::{MatchingRequest, MatchingResponse};
use crate::models::resume::{RankingResult, ResumeSummary};
use crate::state::AppState;

/// POST /api/resumes/fetch
/// Runs the full matching pipeline for a job description.
pub async fn handle_match_resumes(
    State(state): State<AppState>,
    Json(request): Json<MatchingRequest>,
) -> Result<Json<MatchingResponse>, AppError> {
    let response = state.matching.match_resumes(&request).await?;
    Ok(Json(response))
}

/// GET /api/resumes
/// Lists every resume visible across the configured sources, content excluded.
pub async fn handle_available_resumes(
    State(state): State<AppState>,
) -> Result<Json<Vec<ResumeSummary>>, AppError> {
    let resumes = state.matching.available_resumes().await?;
    Ok(Json(resumes))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingQuery {
    pub job_description: String,
}

/// GET /api/resumes/:id/ranking
/// Ranks a single resume against a job description at the flat legacy weight.
pub async fn handle_resume_ranking(
    State(state): State<AppState>,
    Path(resume_id): Path<String>,
    Query(params): Query<RankingQuery>,
) -> Result<Json<RankingResult>, AppError> {
    let ranking = state
        .matching
        .resume_ranking(&resume_id, &params.job_description)
        .await?;
    Ok(Json(ranking))
}
