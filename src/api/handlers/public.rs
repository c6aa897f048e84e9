use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{
    api::state::AppState,
    domain::{
        Announcement, BlogPost, CertificateStatus, CreateRegistrationRequest, Event, Member,
        Registration, Report, Resource, Testimonial,
    },
    error::{AppError, Result},
};

pub async fn active_announcement(
    State(state): State<AppState>,
) -> Result<Json<Announcement>> {
    let announcement = state.service_context.announcement_service
        .active()
        .await?
        .ok_or(AppError::NotFound("No active announcement".to_string()))?;

    Ok(Json(announcement))
}

#[derive(Debug, Deserialize)]
pub struct PublicEventsQuery {
    pub limit: Option<i64>,
    pub upcoming_only: Option<bool>,
}

pub async fn list_events(
    State(state): State<AppState>,
    Query(params): Query<PublicEventsQuery>,
) -> Result<Json<Vec<Event>>> {
    let limit = params.limit.unwrap_or(20).min(100);

    let events = if params.upcoming_only.unwrap_or(true) {
        state.service_context.event_repo.list_upcoming(limit).await?
    } else {
        state.service_context.event_repo.list(limit, 0).await?
    };

    Ok(Json(events))
}

pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Event>> {
    let event = state.service_context.event_repo
        .find_by_id(id)
        .await?
        .ok_or(AppError::NotFound("Event not found".to_string()))?;

    Ok(Json(event))
}

#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub registration_id: Uuid,
    pub message: String,
}

/// Self-service signup for an event.
pub async fn register(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
    Json(request): Json<CreateRegistrationRequest>,
) -> Result<(StatusCode, Json<SignupResponse>)> {
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

    let response = SignupResponse {
        registration_id: created.id,
        message: "Registration successful. See you at the event!".to_string(),
    };

    Ok((StatusCode::CREATED, Json(response)))
}

#[derive(Debug, Deserialize)]
pub struct PublicBlogQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

pub async fn list_blog(
    State(state): State<AppState>,
    Query(params): Query<PublicBlogQuery>,
) -> Result<Json<Vec<BlogPost>>> {
    let limit = params.limit.unwrap_or(20).min(100);
    let offset = params.offset.unwrap_or(0);

    let posts = state.service_context.blog_repo
        .list_published(limit, offset)
        .await?;

    Ok(Json(posts))
}

pub async fn get_blog_post(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<BlogPost>> {
    let post = state.service_context.blog_repo
        .find_by_slug(&slug)
        .await?
        .filter(|p| p.published)
        .ok_or(AppError::NotFound("Blog post not found".to_string()))?;

    Ok(Json(post))
}

pub async fn list_members(State(state): State<AppState>) -> Result<Json<Vec<Member>>> {
    let members = state.service_context.member_repo.list().await?;
    Ok(Json(members))
}

pub async fn list_resources(State(state): State<AppState>) -> Result<Json<Vec<Resource>>> {
    let resources = state.service_context.resource_repo.list().await?;
    Ok(Json(resources))
}

pub async fn list_reports(State(state): State<AppState>) -> Result<Json<Vec<Report>>> {
    let reports = state.service_context.report_repo.list().await?;
    Ok(Json(reports))
}

pub async fn list_testimonials(State(state): State<AppState>) -> Result<Json<Vec<Testimonial>>> {
    let testimonials = state.service_context.testimonial_repo.list().await?;
    Ok(Json(testimonials))
}
