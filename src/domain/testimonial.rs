use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Testimonial {
    pub id: Uuid,
    pub author: String,
    pub role: String,
    pub quote: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTestimonialRequest {
    #[validate(length(min = 1, max = 100))]
    pub author: String,
    #[validate(length(min = 1, max = 100))]
    pub role: String,
    #[validate(length(min = 1))]
    pub quote: String,
}

#[derive(Debug, Clone, Deserialize, Default, Validate)]
pub struct UpdateTestimonialRequest {
    #[validate(length(min = 1, max = 100))]
    pub author: Option<String>,
    pub role: Option<String>,
    pub quote: Option<String>,
}
