//! In-process implementation of the repositories.
//!
//! Used when `PERSISTENCE_ENABLED=false` and by tests. Data lives for the
//! lifetime of the process.

use std::cmp::Ordering;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{UserRepository, VideoRepository, page_offset};
use crate::domain::{
    NewUser, NewVideo, SortField, User, UserId, Video, VideoId, VideoSort,
};
use crate::error::ShareError;

#[derive(Debug, Default)]
struct Tables {
    users: Vec<User>,
    videos: Vec<Video>,
    next_user_id: u64,
    next_video_id: u64,
}

/// Users and videos held in memory behind a single `RwLock`.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn compare(sort: VideoSort, a: &Video, b: &Video) -> Ordering {
    let ordering = match sort.field {
        SortField::Id => a.id.cmp(&b.id),
        SortField::CreatedAt => a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)),
    };
    if sort.descending {
        ordering.reverse()
    } else {
        ordering
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn get(&self, id: UserId) -> Result<Option<User>, ShareError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ShareError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn create(&self, user: NewUser) -> Result<User, ShareError> {
        let mut tables = self.tables.write().await;
        if let Some(existing) = tables.users.iter().find(|u| u.email == user.email) {
            return Ok(existing.clone());
        }
        tables.next_user_id = tables.next_user_id.saturating_add(1);
        let now = Utc::now();
        let created = User {
            id: UserId::new(tables.next_user_id),
            name: user.name,
            email: user.email,
            created_at: now,
            updated_at: now,
        };
        tables.users.push(created.clone());
        Ok(created)
    }
}

#[async_trait]
impl VideoRepository for InMemoryStore {
    async fn create(&self, video: NewVideo) -> Result<Video, ShareError> {
        let mut tables = self.tables.write().await;
        tables.next_video_id = tables.next_video_id.saturating_add(1);
        let now = Utc::now();
        let created = Video {
            id: VideoId::new(tables.next_video_id),
            url: video.url,
            shared_by: video.shared_by,
            description: video.description,
            created_at: now,
            updated_at: now,
        };
        tables.videos.push(created.clone());
        Ok(created)
    }

    async fn get(&self, id: VideoId) -> Result<Option<Video>, ShareError> {
        let tables = self.tables.read().await;
        Ok(tables.videos.iter().find(|v| v.id == id).cloned())
    }

    async fn list(&self, sort: VideoSort, limit: u32, page: u32) -> Result<Vec<Video>, ShareError> {
        let tables = self.tables.read().await;
        let mut videos = tables.videos.clone();
        drop(tables);

        videos.sort_by(|a, b| compare(sort, a, b));
        let skip = usize::try_from(page_offset(limit, page)).unwrap_or(usize::MAX);
        let take = usize::try_from(limit).unwrap_or(usize::MAX);
        Ok(videos.into_iter().skip(skip).take(take).collect())
    }

    async fn count(&self) -> Result<u64, ShareError> {
        let tables = self.tables.read().await;
        Ok(tables.videos.len() as u64)
    }
}
