use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
    api::state::AppState,
    domain::{CreateEventRequest, Event, UpdateEventRequest},
    error::{AppError, Result},
};

#[derive(Debug, Deserialize)]
pub struct ListEventsQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub upcoming_only: Option<bool>,
}

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListEventsQuery>,
) -> Result<Json<Vec<Event>>> {
    let limit = params.limit.unwrap_or(20).min(100);
    let offset = params.offset.unwrap_or(0);

    let events = if params.upcoming_only.unwrap_or(false) {
        state.service_context.event_repo.list_upcoming(limit).await?
    } else {
        state.service_context.event_repo.list(limit, offset).await?
    };

    Ok(Json(events))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Event>> {
    let event = state.service_context.event_repo
        .find_by_id(id)
        .await?
        .ok_or(AppError::NotFound("Event not found".to_string()))?;

    Ok(Json(event))
}

pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<Event>)> {
    request.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let event = Event {
        id: Uuid::new_v4(),
        title: request.title,
        description: request.description,
        starts_at: request.starts_at,
        location: request.location,
        image_url: request.image_url,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };

    let created = state.service_context.event_repo.create(event).await?;

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateEventRequest>,
) -> Result<Json<Event>> {
    request.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let mut event = state.service_context.event_repo
        .find_by_id(id)
        .await?
        .ok_or(AppError::NotFound("Event not found".to_string()))?;

    if let Some(title) = request.title {
        event.title = title;
    }
    if let Some(description) = request.description {
        event.description = description;
    }
    if let Some(starts_at) = request.starts_at {
        event.starts_at = starts_at;
    }
    if let Some(location) = request.location {
        event.location = location;
    }
    if let Some(image_url) = request.image_url {
        event.image_url = image_url;
    }

    let updated = state.service_context.event_repo.update(id, event).await?;

    Ok(Json(updated))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    state.service_context.event_repo
        .find_by_id(id)
        .await?
        .ok_or(AppError::NotFound("Event not found".to_string()))?;

    state.service_context.event_repo.delete(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
