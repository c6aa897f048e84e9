use async_trait::async_trait;
use chrono::{DateTime, Utc, NaiveDateTime};
use sqlx::{SqlitePool, FromRow};
use uuid::Uuid;

use crate::{
    domain::Resource,
    error::{AppError, Result},
    repository::ResourceRepository,
};

#[derive(FromRow)]
struct ResourceRow {
    id: String,
    title: String,
    description: String,
    url: String,
    category: String,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

pub struct SqliteResourceRepository {
    pool: SqlitePool,
}

impl SqliteResourceRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_resource(row: ResourceRow) -> Result<Resource> {
        Ok(Resource {
            id: Uuid::parse_str(&row.id).map_err(|e| AppError::Database(e.to_string()))?,
            title: row.title,
            description: row.description,
            url: row.url,
            category: row.category,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
            updated_at: DateTime::from_naive_utc_and_offset(row.updated_at, Utc),
        })
    }
}

#[async_trait]
impl ResourceRepository for SqliteResourceRepository {
    async fn create(&self, resource: Resource) -> Result<Resource> {
        let id_str = resource.id.to_string();
        let now = Utc::now().naive_utc();

        sqlx::query(
            r#"
            INSERT INTO resources (
                id, title, description, url, category, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?)
            "#
        )
        .bind(&id_str)
        .bind(&resource.title)
        .bind(&resource.description)
        .bind(&resource.url)
        .bind(&resource.category)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(resource.id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created resource".to_string())
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Resource>> {
        let id_str = id.to_string();
        let row = sqlx::query_as::<_, ResourceRow>(
            r#"
            SELECT id, title, description, url, category, created_at, updated_at
            FROM resources
            WHERE id = ?
            "#
        )
        .bind(id_str)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        match row {
            Some(r) => Ok(Some(Self::row_to_resource(r)?)),
            None => Ok(None)
        }
    }

    async fn list(&self) -> Result<Vec<Resource>> {
        let rows = sqlx::query_as::<_, ResourceRow>(
            r#"
            SELECT id, title, description, url, category, created_at, updated_at
            FROM resources
            ORDER BY category ASC, title ASC
            "#
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter()
            .map(Self::row_to_resource)
            .collect()
    }

    async fn update(&self, id: Uuid, resource: Resource) -> Result<Resource> {
        let id_str = id.to_string();
        let now = Utc::now().naive_utc();

        sqlx::query(
            r#"
            UPDATE resources
            SET title = ?, description = ?, url = ?, category = ?, updated_at = ?
            WHERE id = ?
            "#
        )
        .bind(&resource.title)
        .bind(&resource.description)
        .bind(&resource.url)
        .bind(&resource.category)
        .bind(now)
        .bind(&id_str)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve updated resource".to_string())
        })
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let id_str = id.to_string();
        sqlx::query("DELETE FROM resources WHERE id = ?")
            .bind(&id_str)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }
}
