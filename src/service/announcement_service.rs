use std::sync::Arc;
use chrono::Utc;
use uuid::Uuid;

use crate::{
    domain::{Announcement, CreateAnnouncementRequest, UpdateAnnouncementRequest},
    error::{AppError, Result},
    repository::AnnouncementRepository,
};

/// Guards the single-active-announcement invariant. All activations go
/// through the repository's transactional `activate`.
pub struct AnnouncementService {
    repo: Arc<dyn AnnouncementRepository>,
}

impl AnnouncementService {
    pub fn new(repo: Arc<dyn AnnouncementRepository>) -> Self {
        Self { repo }
    }

    pub async fn create(&self, request: CreateAnnouncementRequest) -> Result<Announcement> {
        let announcement = Announcement {
            id: Uuid::new_v4(),
            title: request.title,
            message: request.message,
            is_active: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let created = self.repo.create(announcement).await?;

        if request.activate {
            return self.repo.activate(created.id).await;
        }

        Ok(created)
    }

    pub async fn update(&self, id: Uuid, request: UpdateAnnouncementRequest) -> Result<Announcement> {
        let mut announcement = self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Announcement not found".to_string()))?;

        if let Some(title) = request.title {
            announcement.title = title;
        }
        if let Some(message) = request.message {
            announcement.message = message;
        }

        self.repo.update(id, announcement).await
    }

    pub async fn activate(&self, id: Uuid) -> Result<Announcement> {
        self.repo.activate(id).await
    }

    pub async fn deactivate(&self, id: Uuid) -> Result<Announcement> {
        self.repo.deactivate(id).await
    }

    pub async fn active(&self) -> Result<Option<Announcement>> {
        self.repo.find_active().await
    }
}
