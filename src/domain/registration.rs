use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// One student's signup for one event.
///
/// `certificate_status` tracks the issuance pipeline so retries are safe
/// and observable; `certificate_attempt` holds the nonce of the most
/// recent issuance attempt.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Registration {
    pub id: Uuid,
    pub event_id: Uuid,
    pub student_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub branch: Option<String>,
    pub year: Option<String>,
    pub attended: bool,
    pub certificate_url: Option<String>,
    pub certificate_status: CertificateStatus,
    pub certificate_attempt: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "TEXT")]
pub enum CertificateStatus {
    /// No issuance has been attempted.
    None,
    /// An issuance attempt holds the claim; concurrent attempts are rejected.
    Generating,
    /// A certificate URL is stored but the email has not gone out yet.
    Issued,
    /// Certificate stored and email accepted by the SMTP relay.
    Delivered,
    /// Certificate stored; the delivery email failed. Still counts as issued.
    DeliveryFailed,
    /// The last attempt failed before a URL was stored; retry allowed.
    Failed,
}

impl CertificateStatus {
    /// True once a certificate URL has been stored for this registration.
    pub fn is_issued(&self) -> bool {
        matches!(
            self,
            CertificateStatus::Issued
                | CertificateStatus::Delivered
                | CertificateStatus::DeliveryFailed
        )
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateRegistrationRequest {
    #[validate(length(min = 1, max = 200))]
    pub student_name: String,
    #[validate(email)]
    pub email: String,
    pub phone: Option<String>,
    pub branch: Option<String>,
    pub year: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SetAttendanceRequest {
    pub attended: bool,
}
