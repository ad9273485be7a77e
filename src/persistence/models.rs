//! Database row shapes and their conversion into domain entities.

use chrono::{DateTime, Utc};

use crate::domain::{User, UserId, Video, VideoId};
use crate::error::ShareError;

/// A row of the `users` table: `(id, name, email, created_at, updated_at)`.
pub type UserRow = (i64, String, String, DateTime<Utc>, DateTime<Utc>);

/// A row of the `videos` table:
/// `(id, url, shared_by, description, created_at, updated_at)`.
pub type VideoRow = (i64, String, String, String, DateTime<Utc>, DateTime<Utc>);

/// Converts a `BIGINT` key into an unsigned id.
///
/// # Errors
///
/// Returns [`ShareError::Persistence`] for a negative key.
pub fn key_from_db(raw: i64) -> Result<u64, ShareError> {
    u64::try_from(raw).map_err(|_| ShareError::Persistence(format!("negative key {raw}")))
}

/// Converts an unsigned id into a `BIGINT` key.
///
/// # Errors
///
/// Returns [`ShareError::InvalidRequest`] if the id exceeds `i64::MAX`;
/// such an id cannot exist in the table.
pub fn key_to_db(raw: u64) -> Result<i64, ShareError> {
    i64::try_from(raw).map_err(|_| ShareError::InvalidRequest(format!("id out of range: {raw}")))
}

/// Builds a [`User`] from a `users` row.
///
/// # Errors
///
/// Returns [`ShareError::Persistence`] for a negative key.
pub fn user_from_row(row: UserRow) -> Result<User, ShareError> {
    let (id, name, email, created_at, updated_at) = row;
    Ok(User {
        id: UserId::new(key_from_db(id)?),
        name,
        email,
        created_at,
        updated_at,
    })
}

/// Builds a [`Video`] from a `videos` row.
///
/// # Errors
///
/// Returns [`ShareError::Persistence`] for a negative key.
pub fn video_from_row(row: VideoRow) -> Result<Video, ShareError> {
    let (id, url, shared_by, description, created_at, updated_at) = row;
    Ok(Video {
        id: VideoId::new(key_from_db(id)?),
        url,
        shared_by,
        description,
        created_at,
        updated_at,
    })
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn negative_keys_are_rejected() {
        assert!(key_from_db(-1).is_err());
        assert!(matches!(key_from_db(7), Ok(7)));
    }

    #[test]
    fn oversized_ids_are_rejected() {
        assert!(key_to_db(u64::MAX).is_err());
        assert!(matches!(key_to_db(3), Ok(3)));
    }

    #[test]
    fn video_row_maps_fields_in_order() {
        let now = Utc::now();
        let row: VideoRow = (
            4,
            "https://youtu.be/x".to_string(),
            "a@example.com".to_string(),
            "desc".to_string(),
            now,
            now,
        );
        let Ok(video) = video_from_row(row) else {
            panic!("row should convert");
        };
        assert_eq!(video.id, VideoId::new(4));
        assert_eq!(video.shared_by, "a@example.com");
        assert_eq!(video.description, "desc");
    }
}
