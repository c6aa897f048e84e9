use async_trait::async_trait;
use chrono::{DateTime, Utc, NaiveDateTime};
use sqlx::{SqlitePool, FromRow};
use uuid::Uuid;

use crate::{
    domain::BlogPost,
    error::{AppError, Result},
    repository::BlogRepository,
};

#[derive(FromRow)]
struct BlogPostRow {
    id: String,
    title: String,
    slug: String,
    content: String,
    author: String,
    tags: String,
    published: i32,
    cover_image_url: Option<String>,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

pub struct SqliteBlogRepository {
    pool: SqlitePool,
}

impl SqliteBlogRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_post(row: BlogPostRow) -> Result<BlogPost> {
        Ok(BlogPost {
            id: Uuid::parse_str(&row.id).map_err(|e| AppError::Database(e.to_string()))?,
            title: row.title,
            slug: row.slug,
            content: row.content,
            author: row.author,
            tags: Self::tags_from_str(&row.tags),
            published: row.published != 0,
            cover_image_url: row.cover_image_url,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
            updated_at: DateTime::from_naive_utc_and_offset(row.updated_at, Utc),
        })
    }

    fn tags_to_str(tags: &[String]) -> String {
        tags.join(",")
    }

    fn tags_from_str(s: &str) -> Vec<String> {
        s.split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(String::from)
            .collect()
    }
}

#[async_trait]
impl BlogRepository for SqliteBlogRepository {
    async fn create(&self, post: BlogPost) -> Result<BlogPost> {
        let id_str = post.id.to_string();
        let tags_str = Self::tags_to_str(&post.tags);
        let published_int = if post.published { 1i32 } else { 0i32 };
        let now = Utc::now().naive_utc();

        sqlx::query(
            r#"
            INSERT INTO blog_posts (
                id, title, slug, content, author, tags, published,
                cover_image_url, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#
        )
        .bind(&id_str)
        .bind(&post.title)
        .bind(&post.slug)
        .bind(&post.content)
        .bind(&post.author)
        .bind(&tags_str)
        .bind(published_int)
        .bind(&post.cover_image_url)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(post.id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created blog post".to_string())
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<BlogPost>> {
        let id_str = id.to_string();
        let row = sqlx::query_as::<_, BlogPostRow>(
            r#"
            SELECT id, title, slug, content, author, tags, published,
                   cover_image_url, created_at, updated_at
            FROM blog_posts
            WHERE id = ?
            "#
        )
        .bind(id_str)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        match row {
            Some(r) => Ok(Some(Self::row_to_post(r)?)),
            None => Ok(None)
        }
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<BlogPost>> {
        let row = sqlx::query_as::<_, BlogPostRow>(
            r#"
            SELECT id, title, slug, content, author, tags, published,
                   cover_image_url, created_at, updated_at
            FROM blog_posts
            WHERE slug = ?
            "#
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        match row {
            Some(r) => Ok(Some(Self::row_to_post(r)?)),
            None => Ok(None)
        }
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<BlogPost>> {
        let rows = sqlx::query_as::<_, BlogPostRow>(
            r#"
            SELECT id, title, slug, content, author, tags, published,
                   cover_image_url, created_at, updated_at
            FROM blog_posts
            ORDER BY created_at DESC
            LIMIT ? OFFSET ?
            "#
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter()
            .map(Self::row_to_post)
            .collect()
    }

    async fn list_published(&self, limit: i64, offset: i64) -> Result<Vec<BlogPost>> {
        let rows = sqlx::query_as::<_, BlogPostRow>(
            r#"
            SELECT id, title, slug, content, author, tags, published,
                   cover_image_url, created_at, updated_at
            FROM blog_posts
            WHERE published = 1
            ORDER BY created_at DESC
            LIMIT ? OFFSET ?
            "#
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter()
            .map(Self::row_to_post)
            .collect()
    }

    async fn update(&self, id: Uuid, post: BlogPost) -> Result<BlogPost> {
        let id_str = id.to_string();
        let tags_str = Self::tags_to_str(&post.tags);
        let published_int = if post.published { 1i32 } else { 0i32 };
        let now = Utc::now().naive_utc();

        sqlx::query(
            r#"
            UPDATE blog_posts
            SET title = ?, slug = ?, content = ?, author = ?, tags = ?,
                published = ?, cover_image_url = ?, updated_at = ?
            WHERE id = ?
            "#
        )
        .bind(&post.title)
        .bind(&post.slug)
        .bind(&post.content)
        .bind(&post.author)
        .bind(&tags_str)
        .bind(published_int)
        .bind(&post.cover_image_url)
        .bind(now)
        .bind(&id_str)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve updated blog post".to_string())
        })
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let id_str = id.to_string();
        sqlx::query("DELETE FROM blog_posts WHERE id = ?")
            .bind(&id_str)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }
}
