use async_trait::async_trait;
use chrono::{DateTime, Utc, NaiveDateTime};
use sqlx::{SqlitePool, FromRow};
use uuid::Uuid;

use crate::{
    domain::Testimonial,
    error::{AppError, Result},
    repository::TestimonialRepository,
};

#[derive(FromRow)]
struct TestimonialRow {
    id: String,
    author: String,
    role: String,
    quote: String,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

pub struct SqliteTestimonialRepository {
    pool: SqlitePool,
}

impl SqliteTestimonialRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_testimonial(row: TestimonialRow) -> Result<Testimonial> {
        Ok(Testimonial {
            id: Uuid::parse_str(&row.id).map_err(|e| AppError::Database(e.to_string()))?,
            author: row.author,
            role: row.role,
            quote: row.quote,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
            updated_at: DateTime::from_naive_utc_and_offset(row.updated_at, Utc),
        })
    }
}

#[async_trait]
impl TestimonialRepository for SqliteTestimonialRepository {
    async fn create(&self, testimonial: Testimonial) -> Result<Testimonial> {
        let id_str = testimonial.id.to_string();
        let now = Utc::now().naive_utc();

        sqlx::query(
            r#"
            INSERT INTO testimonials (
                id, author, role, quote, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?)
            "#
        )
        .bind(&id_str)
        .bind(&testimonial.author)
        .bind(&testimonial.role)
        .bind(&testimonial.quote)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(testimonial.id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created testimonial".to_string())
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Testimonial>> {
        let id_str = id.to_string();
        let row = sqlx::query_as::<_, TestimonialRow>(
            r#"
            SELECT id, author, role, quote, created_at, updated_at
            FROM testimonials
            WHERE id = ?
            "#
        )
        .bind(id_str)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        match row {
            Some(r) => Ok(Some(Self::row_to_testimonial(r)?)),
            None => Ok(None)
        }
    }

    async fn list(&self) -> Result<Vec<Testimonial>> {
        let rows = sqlx::query_as::<_, TestimonialRow>(
            r#"
            SELECT id, author, role, quote, created_at, updated_at
            FROM testimonials
            ORDER BY created_at DESC
            "#
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter()
            .map(Self::row_to_testimonial)
            .collect()
    }

    async fn update(&self, id: Uuid, testimonial: Testimonial) -> Result<Testimonial> {
        let id_str = id.to_string();
        let now = Utc::now().naive_utc();

        sqlx::query(
            r#"
            UPDATE testimonials
            SET author = ?, role = ?, quote = ?, updated_at = ?
            WHERE id = ?
            "#
        )
        .bind(&testimonial.author)
        .bind(&testimonial.role)
        .bind(&testimonial.quote)
        .bind(now)
        .bind(&id_str)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve updated testimonial".to_string())
        })
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let id_str = id.to_string();
        sqlx::query("DELETE FROM testimonials WHERE id = ?")
            .bind(&id_str)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }
}
