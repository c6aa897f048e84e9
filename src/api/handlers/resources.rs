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
    domain::{CreateResourceRequest, Resource, UpdateResourceRequest},
    error::{AppError, Result},
};

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Resource>>> {
    let resources = state.service_context.resource_repo.list().await?;
    Ok(Json(resources))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Resource>> {
    let resource = state.service_context.resource_repo
        .find_by_id(id)
        .await?
        .ok_or(AppError::NotFound("Resource not found".to_string()))?;

    Ok(Json(resource))
}

pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<CreateResourceRequest>,
) -> Result<(StatusCode, Json<Resource>)> {
    request.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let resource = Resource {
        id: Uuid::new_v4(),
        title: request.title,
        description: request.description,
        url: request.url,
        category: request.category,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };

    let created = state.service_context.resource_repo.create(resource).await?;

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateResourceRequest>,
) -> Result<Json<Resource>> {
    request.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let mut resource = state.service_context.resource_repo
        .find_by_id(id)
        .await?
        .ok_or(AppError::NotFound("Resource not found".to_string()))?;

    if let Some(title) = request.title {
        resource.title = title;
    }
    if let Some(description) = request.description {
        resource.description = description;
    }
    if let Some(url) = request.url {
        resource.url = url;
    }
    if let Some(category) = request.category {
        resource.category = category;
    }

    let updated = state.service_context.resource_repo.update(id, resource).await?;

    Ok(Json(updated))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    state.service_context.resource_repo
        .find_by_id(id)
        .await?
        .ok_or(AppError::NotFound("Resource not found".to_string()))?;

    state.service_context.resource_repo.delete(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
