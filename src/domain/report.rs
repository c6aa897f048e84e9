use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Published club report (e.g. an event recap PDF) listed on the public
/// reports page.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Report {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub file_url: String,
    pub report_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateReportRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub description: String,
    #[validate(url)]
    pub file_url: String,
    pub report_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Default, Validate)]
pub struct UpdateReportRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    pub description: Option<String>,
    #[validate(url)]
    pub file_url: Option<String>,
    pub report_date: Option<DateTime<Utc>>,
}
