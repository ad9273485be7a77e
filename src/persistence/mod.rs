//! Persistence layer: user and video repositories.
//!
//! Services depend on the [`UserRepository`] and [`VideoRepository`] traits.
//! [`postgres::PostgresStore`] backs them with `sqlx::PgPool`;
//! [`memory::InMemoryStore`] keeps everything in process memory and is used
//! when persistence is disabled and in tests.

pub mod memory;
pub mod models;
pub mod postgres;

use std::fmt;

use async_trait::async_trait;

use crate::domain::{NewUser, NewVideo, User, UserId, Video, VideoId, VideoSort};
use crate::error::ShareError;

pub use memory::InMemoryStore;
pub use postgres::PostgresStore;

/// Storage for user accounts.
#[async_trait]
pub trait UserRepository: Send + Sync + fmt::Debug {
    /// Finds a user by id.
    ///
    /// # Errors
    ///
    /// Returns [`ShareError::Persistence`] on storage failure.
    async fn get(&self, id: UserId) -> Result<Option<User>, ShareError>;

    /// Finds a user by email.
    ///
    /// # Errors
    ///
    /// Returns [`ShareError::Persistence`] on storage failure.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ShareError>;

    /// Creates a user, or returns the existing one with the same email.
    ///
    /// # Errors
    ///
    /// Returns [`ShareError::Persistence`] on storage failure.
    async fn create(&self, user: NewUser) -> Result<User, ShareError>;
}

/// Storage for shared videos.
#[async_trait]
pub trait VideoRepository: Send + Sync + fmt::Debug {
    /// Persists a new video and returns it with its id and timestamps.
    ///
    /// # Errors
    ///
    /// Returns [`ShareError::Persistence`] on storage failure.
    async fn create(&self, video: NewVideo) -> Result<Video, ShareError>;

    /// Finds a video by id.
    ///
    /// # Errors
    ///
    /// Returns [`ShareError::Persistence`] on storage failure.
    async fn get(&self, id: VideoId) -> Result<Option<Video>, ShareError>;

    /// Returns page `page` (1-based) of `limit` videos in `sort` order.
    ///
    /// # Errors
    ///
    /// Returns [`ShareError::Persistence`] on storage failure.
    async fn list(&self, sort: VideoSort, limit: u32, page: u32) -> Result<Vec<Video>, ShareError>;

    /// Counts all videos.
    ///
    /// # Errors
    ///
    /// Returns [`ShareError::Persistence`] on storage failure.
    async fn count(&self) -> Result<u64, ShareError>;
}

/// Number of rows to skip for a 1-based `page` of `limit` rows.
#[must_use]
pub fn page_offset(limit: u32, page: u32) -> u64 {
    u64::from(limit) * u64::from(page.saturating_sub(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_offset_is_zero_for_first_page() {
        assert_eq!(page_offset(20, 1), 0);
        assert_eq!(page_offset(20, 0), 0);
        assert_eq!(page_offset(20, 3), 40);
    }
}
