//! Shared video resource.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::VideoId;

/// A video shared by a user.
///
/// This is also the public JSON shape: the same value is returned by
/// `GET /api/v1/videos/{id}` and pushed to WebSocket subscribers, so the two
/// paths cannot drift apart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    /// Store-assigned identifier.
    #[schema(value_type = u64)]
    pub id: VideoId,
    /// Link to the shared video.
    pub url: String,
    /// Email of the user who shared it.
    pub shared_by: String,
    /// Free-form description, possibly empty.
    pub description: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Fields required to persist a new video. The store assigns the id and
/// timestamps.
#[derive(Debug, Clone)]
pub struct NewVideo {
    /// Link to the shared video.
    pub url: String,
    /// Free-form description.
    pub description: String,
    /// Email of the sharer.
    pub shared_by: String,
}

/// Column used to order video listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    /// Order by identifier.
    Id,
    /// Order by creation time.
    CreatedAt,
}

/// Listing order accepted by `GET /api/v1/videos?sort=`.
///
/// Only a fixed set of orderings is accepted; the string never reaches SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoSort {
    /// Column to order by.
    pub field: SortField,
    /// `true` for descending order.
    pub descending: bool,
}

impl VideoSort {
    /// Parses a sort expression such as `"id desc"` or `"created_at"`.
    ///
    /// An empty string yields the default order (`id desc`). A bare column
    /// name sorts ascending.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Some(Self::default());
        }
        let mut parts = raw.split_whitespace();
        let field = match parts.next()? {
            "id" => SortField::Id,
            "created_at" | "createdAt" => SortField::CreatedAt,
            _ => return None,
        };
        let descending = match parts.next().map(str::to_ascii_lowercase).as_deref() {
            None | Some("asc") => false,
            Some("desc") => true,
            Some(_) => return None,
        };
        if parts.next().is_some() {
            return None;
        }
        Some(Self { field, descending })
    }

    /// Returns the SQL `ORDER BY` clause for this sort.
    #[must_use]
    pub const fn order_by_sql(&self) -> &'static str {
        match (self.field, self.descending) {
            (SortField::Id, false) => "id ASC",
            (SortField::Id, true) => "id DESC",
            (SortField::CreatedAt, false) => "created_at ASC, id ASC",
            (SortField::CreatedAt, true) => "created_at DESC, id DESC",
        }
    }
}

impl Default for VideoSort {
    fn default() -> Self {
        Self {
            field: SortField::Id,
            descending: true,
        }
    }
}
