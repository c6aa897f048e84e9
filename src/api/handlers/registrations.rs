use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
    api::state::AppState,
    domain::{
        CertificateStatus, CreateRegistrationRequest, Registration, SetAttendanceRequest,
    },
    error::{AppError, Result},
};

pub async fn list_by_event(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> Result<Json<Vec<Registration>>> {
    state.service_context.event_repo
        .find_by_id(event_id)
        .await?
        .ok_or(AppError::NotFound("Event not found".to_string()))?;

    let registrations = state.service_context.registration_repo
        .list_by_event(event_id)
        .await?;

    Ok(Json(registrations))
}

/// Admin-entered signup; the public self-service variant lives in the
/// public handlers and remaps duplicate emails to a 409.
pub async fn create(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
    Json(request): Json<CreateRegistrationRequest>,
) -> Result<(StatusCode, Json<Registration>)> {
    request.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    state.service_context.event_repo
        .find_by_id(event_id)
        .await?
        .ok_or(AppError::NotFound("Event not found".to_string()))?;

    let registration = Registration {
        id: Uuid::new_v4(),
        event_id,
        student_name: request.student_name,
        email: request.email,
        phone: request.phone,
        branch: request.branch,
        year: request.year,
        attended: false,
        certificate_url: None,
        certificate_status: CertificateStatus::None,
        certificate_attempt: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };

    let created = state.service_context.registration_repo
        .create(registration)
        .await
        .map_err(|e| match e {
            AppError::Database(msg) if msg.contains("UNIQUE") => {
                AppError::Conflict("This email is already registered for the event".to_string())
            }
            _ => e,
        })?;

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn set_attendance(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<SetAttendanceRequest>,
) -> Result<Json<Registration>> {
    state.service_context.registration_repo
        .find_by_id(id)
        .await?
        .ok_or(AppError::NotFound("Registration not found".to_string()))?;

    let updated = state.service_context.registration_repo
        .set_attended(id, request.attended)
        .await?;

    Ok(Json(updated))
}

#[derive(Debug, Serialize)]
pub struct IssueCertificateResponse {
    pub registration_id: Uuid,
    pub certificate_url: String,
    pub certificate_status: CertificateStatus,
}

pub async fn issue_certificate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<IssueCertificateResponse>> {
    let registration = state.service_context.certificate_service.issue(id).await?;

    let certificate_url = registration.certificate_url.clone().ok_or_else(|| {
        AppError::Internal("Issued registration has no certificate URL".to_string())
    })?;

    Ok(Json(IssueCertificateResponse {
        registration_id: registration.id,
        certificate_url,
        certificate_status: registration.certificate_status,
    }))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    state.service_context.registration_repo
        .find_by_id(id)
        .await?
        .ok_or(AppError::NotFound("Registration not found".to_string()))?;

    state.service_context.registration_repo.delete(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
