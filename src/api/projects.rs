//! Project detail endpoints.

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use super::{csv_attachment, success, OutputFormat};
use crate::errors::AppError;
use crate::presentation::ProjectDetail;
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct DetailQuery {
    pub format: Option<String>,
}

fn parse_id(raw: &str) -> Result<u64, AppError> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::NotFound(format!("Project {} not found", raw)))
}

async fn load(state: &AppState, raw_id: &str) -> Result<ProjectDetail, AppError> {
    let id = parse_id(raw_id)?;
    ProjectDetail::load(&state.gateway, id, &state.config.currency()).await
}

fn detail_csv(detail: &ProjectDetail) -> Result<Response, AppError> {
    csv_attachment(&detail.csv_filename(), detail.to_csv()?)
}

/// GET /api/projects/{id} - Project detail, or its CSV with `format=csv`.
pub async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<DetailQuery>,
) -> Result<Response, AppError> {
    let detail = load(&state, &id).await?;

    match OutputFormat::from_param(query.format.as_deref()) {
        OutputFormat::Csv => detail_csv(&detail),
        OutputFormat::Json => Ok(success(detail)?.into_response()),
    }
}

/// GET /api/projects/{id}/csv - Project detail as CSV.
pub async fn get_project_csv(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let detail = load(&state, &id).await?;
    detail_csv(&detail)
}
