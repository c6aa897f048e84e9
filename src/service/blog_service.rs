use std::sync::Arc;

use crate::{
    error::{AppError, Result},
    generation::{BlogDraft, TextGenerator},
};

/// AI blog-drafting helper. Output is a draft for the admin to edit;
/// nothing is persisted until the admin saves it as a post.
pub struct BlogService {
    generator: Option<Arc<dyn TextGenerator>>,
}

impl BlogService {
    pub fn new(generator: Option<Arc<dyn TextGenerator>>) -> Self {
        Self { generator }
    }

    pub async fn draft(&self, topic: &str, key_points: &[String]) -> Result<BlogDraft> {
        let generator = self.generator.as_ref().ok_or_else(|| {
            AppError::ServiceUnavailable("Blog drafting is not configured".to_string())
        })?;

        if topic.trim().is_empty() {
            return Err(AppError::BadRequest("Topic must not be empty".to_string()));
        }

        generator.draft_blog_post(topic, key_points).await
    }
}
