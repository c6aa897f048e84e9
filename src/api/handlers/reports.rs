use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    api::state::AppState,
    domain::{CreateReportRequest, Report, UpdateReportRequest},
    error::{AppError, Result},
};

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Report>>> {
    let reports = state.service_context.report_repo.list().await?;
    Ok(Json(reports))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Report>> {
    let report = state.service_context.report_repo
        .find_by_id(id)
        .await?
        .ok_or(AppError::NotFound("Report not found".to_string()))?;

    Ok(Json(report))
}

pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<CreateReportRequest>,
) -> Result<(StatusCode, Json<Report>)> {
    request.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let report = Report {
        id: Uuid::new_v4(),
        title: request.title,
        description: request.description,
        file_url: request.file_url,
        report_date: request.report_date,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };

    let created = state.service_context.report_repo.create(report).await?;

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateReportRequest>,
) -> Result<Json<Report>> {
    request.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let mut report = state.service_context.report_repo
        .find_by_id(id)
        .await?
        .ok_or(AppError::NotFound("Report not found".to_string()))?;

    if let Some(title) = request.title {
        report.title = title;
    }
    if let Some(description) = request.description {
        report.description = description;
    }
    if let Some(file_url) = request.file_url {
        report.file_url = file_url;
    }
    if let Some(report_date) = request.report_date {
        report.report_date = report_date;
    }

    let updated = state.service_context.report_repo.update(id, report).await?;

    Ok(Json(updated))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    state.service_context.report_repo
        .find_by_id(id)
        .await?
        .ok_or(AppError::NotFound("Report not found".to_string()))?;

    state.service_context.report_repo.delete(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
