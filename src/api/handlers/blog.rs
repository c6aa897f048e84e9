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
    domain::{slugify, BlogPost, CreateBlogPostRequest, UpdateBlogPostRequest},
    error::{AppError, Result},
    generation::BlogDraft,
};

#[derive(Debug, Deserialize)]
pub struct ListBlogQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListBlogQuery>,
) -> Result<Json<Vec<BlogPost>>> {
    let limit = params.limit.unwrap_or(20).min(100);
    let offset = params.offset.unwrap_or(0);

    let posts = state.service_context.blog_repo.list(limit, offset).await?;

    Ok(Json(posts))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<BlogPost>> {
    let post = state.service_context.blog_repo
        .find_by_id(id)
        .await?
        .ok_or(AppError::NotFound("Blog post not found".to_string()))?;

    Ok(Json(post))
}

pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<CreateBlogPostRequest>,
) -> Result<(StatusCode, Json<BlogPost>)> {
    request.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let slug = slugify(&request.title);
    if slug.is_empty() {
        return Err(AppError::Validation("Title produces an empty slug".to_string()));
    }

    let post = BlogPost {
        id: Uuid::new_v4(),
        title: request.title,
        slug,
        content: request.content,
        author: request.author,
        tags: request.tags,
        published: request.published,
        cover_image_url: request.cover_image_url,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };

    let created = state.service_context.blog_repo
        .create(post)
        .await
        .map_err(|e| match e {
            AppError::Database(msg) if msg.contains("UNIQUE") => {
                AppError::Conflict("A post with this title already exists".to_string())
            }
            _ => e,
        })?;

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateBlogPostRequest>,
) -> Result<Json<BlogPost>> {
    request.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let mut post = state.service_context.blog_repo
        .find_by_id(id)
        .await?
        .ok_or(AppError::NotFound("Blog post not found".to_string()))?;

    if let Some(title) = request.title {
        let slug = slugify(&title);
        if slug.is_empty() {
            return Err(AppError::Validation("Title produces an empty slug".to_string()));
        }
        post.slug = slug;
        post.title = title;
    }
    if let Some(content) = request.content {
        post.content = content;
    }
    if let Some(author) = request.author {
        post.author = author;
    }
    if let Some(tags) = request.tags {
        post.tags = tags;
    }
    if let Some(published) = request.published {
        post.published = published;
    }
    if let Some(cover_image_url) = request.cover_image_url {
        post.cover_image_url = cover_image_url;
    }

    let updated = state.service_context.blog_repo.update(id, post).await?;

    Ok(Json(updated))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    state.service_context.blog_repo
        .find_by_id(id)
        .await?
        .ok_or(AppError::NotFound("Blog post not found".to_string()))?;

    state.service_context.blog_repo.delete(id).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize, Validate)]
pub struct DraftBlogRequest {
    #[validate(length(min = 3, max = 300))]
    pub topic: String,
    #[serde(default)]
    pub key_points: Vec<String>,
}

pub async fn draft(
    State(state): State<AppState>,
    Json(request): Json<DraftBlogRequest>,
) -> Result<Json<BlogDraft>> {
    request.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let draft = state.service_context.blog_service
        .draft(&request.topic, &request.key_points)
        .await?;

    Ok(Json(draft))
}
