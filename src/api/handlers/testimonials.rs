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
    domain::{CreateTestimonialRequest, Testimonial, UpdateTestimonialRequest},
    error::{AppError, Result},
};

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Testimonial>>> {
    let testimonials = state.service_context.testimonial_repo.list().await?;
    Ok(Json(testimonials))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Testimonial>> {
    let testimonial = state.service_context.testimonial_repo
        .find_by_id(id)
        .await?
        .ok_or(AppError::NotFound("Testimonial not found".to_string()))?;

    Ok(Json(testimonial))
}

pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<CreateTestimonialRequest>,
) -> Result<(StatusCode, Json<Testimonial>)> {
    request.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let testimonial = Testimonial {
        id: Uuid::new_v4(),
        author: request.author,
        role: request.role,
        quote: request.quote,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };

    let created = state.service_context.testimonial_repo.create(testimonial).await?;

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateTestimonialRequest>,
) -> Result<Json<Testimonial>> {
    request.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let mut testimonial = state.service_context.testimonial_repo
        .find_by_id(id)
        .await?
        .ok_or(AppError::NotFound("Testimonial not found".to_string()))?;

    if let Some(author) = request.author {
        testimonial.author = author;
    }
    if let Some(role) = request.role {
        testimonial.role = role;
    }
    if let Some(quote) = request.quote {
        testimonial.quote = quote;
    }

    let updated = state.service_context.testimonial_repo.update(id, testimonial).await?;

    Ok(Json(updated))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    state.service_context.testimonial_repo
        .find_by_id(id)
        .await?
        .ok_or(AppError::NotFound("Testimonial not found".to_string()))?;

    state.service_context.testimonial_repo.delete(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
