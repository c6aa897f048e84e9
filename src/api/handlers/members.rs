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
    domain::{CreateMemberRequest, Member, UpdateMemberRequest},
    error::{AppError, Result},
};

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Member>>> {
    let members = state.service_context.member_repo.list().await?;
    Ok(Json(members))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Member>> {
    let member = state.service_context.member_repo
        .find_by_id(id)
        .await?
        .ok_or(AppError::NotFound("Member not found".to_string()))?;

    Ok(Json(member))
}

pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<CreateMemberRequest>,
) -> Result<(StatusCode, Json<Member>)> {
    request.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let member = Member {
        id: Uuid::new_v4(),
        name: request.name,
        role: request.role,
        year: request.year,
        bio: request.bio,
        photo_url: request.photo_url,
        linkedin_url: request.linkedin_url,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };

    let created = state.service_context.member_repo.create(member).await?;

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateMemberRequest>,
) -> Result<Json<Member>> {
    request.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let mut member = state.service_context.member_repo
        .find_by_id(id)
        .await?
        .ok_or(AppError::NotFound("Member not found".to_string()))?;

    if let Some(name) = request.name {
        member.name = name;
    }
    if let Some(role) = request.role {
        member.role = role;
    }
    if let Some(year) = request.year {
        member.year = year;
    }
    if let Some(bio) = request.bio {
        member.bio = bio;
    }
    if let Some(photo_url) = request.photo_url {
        member.photo_url = photo_url;
    }
    if let Some(linkedin_url) = request.linkedin_url {
        member.linkedin_url = linkedin_url;
    }

    let updated = state.service_context.member_repo.update(id, member).await?;

    Ok(Json(updated))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    state.service_context.member_repo
        .find_by_id(id)
        .await?
        .ok_or(AppError::NotFound("Member not found".to_string()))?;

    state.service_context.member_repo.delete(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
