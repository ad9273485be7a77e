//! PostgreSQL implementation of the persistence layer.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use super::models::{UserRow, VideoRow, key_to_db, user_from_row, video_from_row};
use super::{UserRepository, VideoRepository, page_offset};
use crate::config::ShareConfig;
use crate::domain::{NewUser, NewVideo, User, UserId, Video, VideoId, VideoSort};
use crate::error::ShareError;

const USER_COLUMNS: &str = "id, name, email, created_at, updated_at";
const VIDEO_COLUMNS: &str = "id, url, shared_by, description, created_at, updated_at";

/// PostgreSQL-backed repositories using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Creates a store over an existing connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a connection pool from configuration and applies migrations.
    ///
    /// # Errors
    ///
    /// Returns [`ShareError::Persistence`] if the database is unreachable or
    /// a migration fails.
    pub async fn connect(config: &ShareConfig) -> Result<Self, ShareError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .min_connections(config.database_min_connections)
            .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
            .connect(&config.database_url)
            .await?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| ShareError::Persistence(format!("migration failed: {e}")))?;

        tracing::info!("database migrations applied");
        Ok(Self::new(pool))
    }
}

#[async_trait]
impl UserRepository for PostgresStore {
    async fn get(&self, id: UserId) -> Result<Option<User>, ShareError> {
        let Ok(key) = key_to_db(id.get()) else {
            return Ok(None);
        };
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        row.map(user_from_row).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ShareError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.map(user_from_row).transpose()
    }

    async fn create(&self, user: NewUser) -> Result<User, ShareError> {
        // Concurrent first logins for one email resolve to the same row.
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "INSERT INTO users (name, email) VALUES ($1, $2) \
             ON CONFLICT (email) DO UPDATE SET email = EXCLUDED.email \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(&user.name)
        .bind(&user.email)
        .fetch_one(&self.pool)
        .await?;

        user_from_row(row)
    }
}

#[async_trait]
impl VideoRepository for PostgresStore {
    async fn create(&self, video: NewVideo) -> Result<Video, ShareError> {
        let row = sqlx::query_as::<_, VideoRow>(&format!(
            "INSERT INTO videos (url, shared_by, description) VALUES ($1, $2, $3) \
             RETURNING {VIDEO_COLUMNS}"
        ))
        .bind(&video.url)
        .bind(&video.shared_by)
        .bind(&video.description)
        .fetch_one(&self.pool)
        .await?;

        video_from_row(row)
    }

    async fn get(&self, id: VideoId) -> Result<Option<Video>, ShareError> {
        let Ok(key) = key_to_db(id.get()) else {
            return Ok(None);
        };
        let row = sqlx::query_as::<_, VideoRow>(&format!(
            "SELECT {VIDEO_COLUMNS} FROM videos WHERE id = $1"
        ))
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        row.map(video_from_row).transpose()
    }

    async fn list(&self, sort: VideoSort, limit: u32, page: u32) -> Result<Vec<Video>, ShareError> {
        let offset = i64::try_from(page_offset(limit, page)).unwrap_or(i64::MAX);
        let rows = sqlx::query_as::<_, VideoRow>(&format!(
            "SELECT {VIDEO_COLUMNS} FROM videos ORDER BY {} LIMIT $1 OFFSET $2",
            sort.order_by_sql()
        ))
        .bind(i64::from(limit))
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(video_from_row).collect()
    }

    async fn count(&self) -> Result<u64, ShareError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM videos")
            .fetch_one(&self.pool)
            .await?;
        Ok(u64::try_from(count).unwrap_or(0))
    }
}
