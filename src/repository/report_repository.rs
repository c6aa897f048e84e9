use async_trait::async_trait;
use chrono::{DateTime, Utc, NaiveDateTime};
use sqlx::{SqlitePool, FromRow};
use uuid::Uuid;

use crate::{
    domain::Report,
    error::{AppError, Result},
    repository::ReportRepository,
};

#[derive(FromRow)]
struct ReportRow {
    id: String,
    title: String,
    description: String,
    file_url: String,
    report_date: NaiveDateTime,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

pub struct SqliteReportRepository {
    pool: SqlitePool,
}

impl SqliteReportRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_report(row: ReportRow) -> Result<Report> {
        Ok(Report {
            id: Uuid::parse_str(&row.id).map_err(|e| AppError::Database(e.to_string()))?,
            title: row.title,
            description: row.description,
            file_url: row.file_url,
            report_date: DateTime::from_naive_utc_and_offset(row.report_date, Utc),
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
            updated_at: DateTime::from_naive_utc_and_offset(row.updated_at, Utc),
        })
    }
}

#[async_trait]
impl ReportRepository for SqliteReportRepository {
    async fn create(&self, report: Report) -> Result<Report> {
        let id_str = report.id.to_string();
        let report_date_naive = report.report_date.naive_utc();
        let now = Utc::now().naive_utc();

        sqlx::query(
            r#"
            INSERT INTO reports (
                id, title, description, file_url, report_date,
                created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?)
            "#
        )
        .bind(&id_str)
        .bind(&report.title)
        .bind(&report.description)
        .bind(&report.file_url)
        .bind(report_date_naive)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(report.id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created report".to_string())
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Report>> {
        let id_str = id.to_string();
        let row = sqlx::query_as::<_, ReportRow>(
            r#"
            SELECT id, title, description, file_url, report_date,
                   created_at, updated_at
            FROM reports
            WHERE id = ?
            "#
        )
        .bind(id_str)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        match row {
            Some(r) => Ok(Some(Self::row_to_report(r)?)),
            None => Ok(None)
        }
    }

    async fn list(&self) -> Result<Vec<Report>> {
        let rows = sqlx::query_as::<_, ReportRow>(
            r#"
            SELECT id, title, description, file_url, report_date,
                   created_at, updated_at
            FROM reports
            ORDER BY report_date DESC
            "#
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter()
            .map(Self::row_to_report)
            .collect()
    }

    async fn update(&self, id: Uuid, report: Report) -> Result<Report> {
        let id_str = id.to_string();
        let report_date_naive = report.report_date.naive_utc();
        let now = Utc::now().naive_utc();

        sqlx::query(
            r#"
            UPDATE reports
            SET title = ?, description = ?, file_url = ?, report_date = ?,
                updated_at = ?
            WHERE id = ?
            "#
        )
        .bind(&report.title)
        .bind(&report.description)
        .bind(&report.file_url)
        .bind(report_date_naive)
        .bind(now)
        .bind(&id_str)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve updated report".to_string())
        })
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let id_str = id.to_string();
        sqlx::query("DELETE FROM reports WHERE id = ?")
            .bind(&id_str)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }
}
