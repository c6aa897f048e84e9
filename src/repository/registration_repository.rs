use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc, NaiveDateTime};
use sqlx::{SqlitePool, FromRow};
use uuid::Uuid;

use crate::{
    domain::{CertificateStatus, Registration},
    error::{AppError, Result},
    repository::RegistrationRepository,
};

#[derive(FromRow)]
struct RegistrationRow {
    id: String,
    event_id: String,
    student_name: String,
    email: String,
    phone: Option<String>,
    branch: Option<String>,
    year: Option<String>,
    attended: i32,
    certificate_url: Option<String>,
    certificate_status: String,
    certificate_attempt: Option<String>,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

/// A `Generating` claim older than this is treated as abandoned (the
/// process died mid-pipeline) and may be re-taken.
const CLAIM_STALE_AFTER_MINUTES: i64 = 15;

pub struct SqliteRegistrationRepository {
    pool: SqlitePool,
}

impl SqliteRegistrationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_registration(row: RegistrationRow) -> Result<Registration> {
        Ok(Registration {
            id: Uuid::parse_str(&row.id).map_err(|e| AppError::Database(e.to_string()))?,
            event_id: Uuid::parse_str(&row.event_id).map_err(|e| AppError::Database(e.to_string()))?,
            student_name: row.student_name,
            email: row.email,
            phone: row.phone,
            branch: row.branch,
            year: row.year,
            attended: row.attended != 0,
            certificate_url: row.certificate_url,
            certificate_status: Self::parse_status(&row.certificate_status)?,
            certificate_attempt: row.certificate_attempt,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
            updated_at: DateTime::from_naive_utc_and_offset(row.updated_at, Utc),
        })
    }

    fn parse_status(s: &str) -> Result<CertificateStatus> {
        match s {
            "None" => Ok(CertificateStatus::None),
            "Generating" => Ok(CertificateStatus::Generating),
            "Issued" => Ok(CertificateStatus::Issued),
            "Delivered" => Ok(CertificateStatus::Delivered),
            "DeliveryFailed" => Ok(CertificateStatus::DeliveryFailed),
            "Failed" => Ok(CertificateStatus::Failed),
            _ => Err(AppError::Database(format!("Invalid certificate status: {}", s))),
        }
    }

    fn status_to_str(status: &CertificateStatus) -> &'static str {
        match status {
            CertificateStatus::None => "None",
            CertificateStatus::Generating => "Generating",
            CertificateStatus::Issued => "Issued",
            CertificateStatus::Delivered => "Delivered",
            CertificateStatus::DeliveryFailed => "DeliveryFailed",
            CertificateStatus::Failed => "Failed",
        }
    }
}

#[async_trait]
impl RegistrationRepository for SqliteRegistrationRepository {
    async fn create(&self, registration: Registration) -> Result<Registration> {
        let id_str = registration.id.to_string();
        let event_id_str = registration.event_id.to_string();
        let attended_int = if registration.attended { 1i32 } else { 0i32 };
        let status_str = Self::status_to_str(&registration.certificate_status);
        let now = Utc::now().naive_utc();

        sqlx::query(
            r#"
            INSERT INTO registrations (
                id, event_id, student_name, email, phone, branch, year,
                attended, certificate_url, certificate_status,
                certificate_attempt, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#
        )
        .bind(&id_str)
        .bind(&event_id_str)
        .bind(&registration.student_name)
        .bind(&registration.email)
        .bind(&registration.phone)
        .bind(&registration.branch)
        .bind(&registration.year)
        .bind(attended_int)
        .bind(&registration.certificate_url)
        .bind(status_str)
        .bind(&registration.certificate_attempt)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(registration.id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created registration".to_string())
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Registration>> {
        let id_str = id.to_string();
        let row = sqlx::query_as::<_, RegistrationRow>(
            r#"
            SELECT id, event_id, student_name, email, phone, branch, year,
                   attended, certificate_url, certificate_status,
                   certificate_attempt, created_at, updated_at
            FROM registrations
            WHERE id = ?
            "#
        )
        .bind(id_str)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        match row {
            Some(r) => Ok(Some(Self::row_to_registration(r)?)),
            None => Ok(None)
        }
    }

    async fn list_by_event(&self, event_id: Uuid) -> Result<Vec<Registration>> {
        let event_id_str = event_id.to_string();
        let rows = sqlx::query_as::<_, RegistrationRow>(
            r#"
            SELECT id, event_id, student_name, email, phone, branch, year,
                   attended, certificate_url, certificate_status,
                   certificate_attempt, created_at, updated_at
            FROM registrations
            WHERE event_id = ?
            ORDER BY created_at ASC
            "#
        )
        .bind(event_id_str)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter()
            .map(Self::row_to_registration)
            .collect()
    }

    async fn set_attended(&self, id: Uuid, attended: bool) -> Result<Registration> {
        let id_str = id.to_string();
        let attended_int = if attended { 1i32 } else { 0i32 };
        let now = Utc::now().naive_utc();

        sqlx::query(
            r#"
            UPDATE registrations
            SET attended = ?, updated_at = ?
            WHERE id = ?
            "#
        )
        .bind(attended_int)
        .bind(now)
        .bind(&id_str)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::NotFound("Registration not found".to_string())
        })
    }

    async fn claim_for_issuance(&self, id: Uuid) -> Result<bool> {
        let id_str = id.to_string();
        let now = Utc::now().naive_utc();
        let stale_before = now - Duration::minutes(CLAIM_STALE_AFTER_MINUTES);

        // The WHERE clause is the guard: an in-flight attempt keeps the row
        // in 'Generating' and the second writer matches zero rows. A claim
        // older than the staleness cutoff belongs to a crashed attempt and
        // can be re-taken.
        let result = sqlx::query(
            r#"
            UPDATE registrations
            SET certificate_status = 'Generating', updated_at = ?
            WHERE id = ?
              AND (certificate_status != 'Generating' OR updated_at < ?)
            "#
        )
        .bind(now)
        .bind(&id_str)
        .bind(stale_before)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    async fn store_certificate(&self, id: Uuid, url: &str, attempt: &str) -> Result<Registration> {
        let id_str = id.to_string();
        let now = Utc::now().naive_utc();

        sqlx::query(
            r#"
            UPDATE registrations
            SET certificate_url = ?, certificate_status = 'Issued',
                certificate_attempt = ?, updated_at = ?
            WHERE id = ?
            "#
        )
        .bind(url)
        .bind(attempt)
        .bind(now)
        .bind(&id_str)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::NotFound("Registration not found".to_string())
        })
    }

    async fn set_certificate_status(&self, id: Uuid, status: CertificateStatus) -> Result<()> {
        let id_str = id.to_string();
        let status_str = Self::status_to_str(&status);
        let now = Utc::now().naive_utc();

        sqlx::query(
            r#"
            UPDATE registrations
            SET certificate_status = ?, updated_at = ?
            WHERE id = ?
            "#
        )
        .bind(status_str)
        .bind(now)
        .bind(&id_str)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let id_str = id.to_string();
        sqlx::query("DELETE FROM registrations WHERE id = ?")
            .bind(&id_str)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }
}
