//! Video service: shares videos and announces them to live subscribers.

use std::sync::Arc;

use crate::domain::{BroadcastHub, NewVideo, UserId, Video, VideoId, VideoSort};
use crate::error::ShareError;
use crate::persistence::{UserRepository, VideoRepository};

/// Longest accepted video URL, in characters.
pub const MAX_URL_LEN: usize = 200;

/// Page size used when the client does not ask for one.
pub const DEFAULT_PAGE_LIMIT: u32 = 20;

/// Largest page size a client may request.
pub const MAX_PAGE_LIMIT: u32 = 200;

/// Raw listing parameters as received from the client.
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    /// 1-based page number.
    pub page: Option<u32>,
    /// Page size.
    pub limit: Option<u32>,
    /// Sort expression, e.g. `"created_at desc"`.
    pub sort: Option<String>,
}

/// One page of videos plus the total row count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoPage {
    /// Total number of videos.
    pub total: u64,
    /// Page number returned.
    pub page: u32,
    /// Page size used.
    pub limit: u32,
    /// Videos on this page.
    pub items: Vec<Video>,
}

/// Coordinates the video store and the broadcast hub.
///
/// Creating a video persists it first, then fans it out to every live
/// subscriber except its creator. Fan-out problems are logged and never
/// change the outcome of the request.
#[derive(Debug, Clone)]
pub struct VideoService {
    videos: Arc<dyn VideoRepository>,
    users: Arc<dyn UserRepository>,
    hub: BroadcastHub,
}

impl VideoService {
    /// Creates a new `VideoService`.
    #[must_use]
    pub fn new(
        videos: Arc<dyn VideoRepository>,
        users: Arc<dyn UserRepository>,
        hub: BroadcastHub,
    ) -> Self {
        Self { videos, users, hub }
    }

    /// Returns the hub new videos are announced on.
    #[must_use]
    pub fn hub(&self) -> &BroadcastHub {
        &self.hub
    }

    /// Shares a video on behalf of `creator` and broadcasts it.
    ///
    /// # Errors
    ///
    /// Returns [`ShareError::InvalidRequest`] for an empty or overlong URL,
    /// [`ShareError::UserNotFound`] if the creator has no account, and
    /// [`ShareError::Persistence`] if the store fails.
    pub async fn create(
        &self,
        creator: UserId,
        url: String,
        description: String,
    ) -> Result<Video, ShareError> {
        let url = validate_url(url)?;
        let user = self
            .users
            .get(creator)
            .await?
            .ok_or(ShareError::UserNotFound(creator))?;

        let video = self
            .videos
            .create(NewVideo {
                url,
                description,
                shared_by: user.email,
            })
            .await?;

        tracing::info!(video_id = %video.id, %creator, "video shared");

        match self.hub.broadcast(&video, creator).await {
            Ok(report) => tracing::debug!(
                video_id = %video.id,
                delivered = report.delivered,
                skipped = report.skipped,
                failed = report.failed,
                "video broadcast"
            ),
            Err(e) => tracing::warn!(video_id = %video.id, error = %e, "video broadcast failed"),
        }

        Ok(video)
    }

    /// Looks up a single video.
    ///
    /// # Errors
    ///
    /// Returns [`ShareError::VideoNotFound`] if no such video exists.
    pub async fn get(&self, id: VideoId) -> Result<Video, ShareError> {
        self.videos
            .get(id)
            .await?
            .ok_or(ShareError::VideoNotFound(id))
    }

    /// Returns one page of videos.
    ///
    /// # Errors
    ///
    /// Returns [`ShareError::InvalidRequest`] if `page` is zero, `limit` is
    /// outside `1..=200`, or `sort` is not a recognised ordering.
    pub async fn list(&self, query: ListQuery) -> Result<VideoPage, ShareError> {
        let page = query.page.unwrap_or(1);
        if page == 0 {
            return Err(ShareError::InvalidRequest("page must be at least 1".into()));
        }

        let limit = query.limit.unwrap_or(DEFAULT_PAGE_LIMIT);
        if !(1..=MAX_PAGE_LIMIT).contains(&limit) {
            return Err(ShareError::InvalidRequest(format!(
                "limit must be between 1 and {MAX_PAGE_LIMIT}"
            )));
        }

        let raw_sort = query.sort.unwrap_or_default();
        let sort = VideoSort::parse(&raw_sort)
            .ok_or_else(|| ShareError::InvalidRequest(format!("unsupported sort: {raw_sort:?}")))?;

        let total = self.videos.count().await?;
        let items = self.videos.list(sort, limit, page).await?;

        Ok(VideoPage {
            total,
            page,
            limit,
            items,
        })
    }
}

fn validate_url(url: String) -> Result<String, ShareError> {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return Err(ShareError::InvalidRequest("url is required".into()));
    }
    if trimmed.chars().count() > MAX_URL_LEN {
        return Err(ShareError::InvalidRequest(format!(
            "url must be at most {MAX_URL_LEN} characters"
        )));
    }
    if trimmed.len() == url.len() {
        Ok(url)
    } else {
        Ok(trimmed.to_string())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::time::Duration;

    use tokio::sync::mpsc;

    use super::*;
    use crate::domain::{NewUser, Subscriber};
    use crate::persistence::InMemoryStore;

    struct Fixture {
        service: VideoService,
        store: Arc<InMemoryStore>,
    }

    async fn fixture() -> Fixture {
        let store = Arc::new(InMemoryStore::new());
        let (hub, intake) = BroadcastHub::new(8);
        tokio::spawn(intake.run());
        let service = VideoService::new(
            Arc::clone(&store) as Arc<dyn VideoRepository>,
            Arc::clone(&store) as Arc<dyn UserRepository>,
            hub,
        );
        for (name, email) in [("Ada", "ada@example.com"), ("Bob", "bob@example.com")] {
            let created = UserRepository::create(
                store.as_ref(),
                NewUser {
                    name: name.to_string(),
                    email: email.to_string(),
                },
            )
            .await;
            assert!(created.is_ok());
        }
        Fixture { service, store }
    }

    async fn wait_for_subscribers(hub: &BroadcastHub, expected: usize) {
        for _ in 0..100 {
            if hub.subscriber_count().await == expected {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("registry never reached {expected} subscribers");
    }

    #[tokio::test]
    async fn create_records_sharer_email_and_broadcasts() {
        let fx = fixture().await;
        let (tx_a, mut rx_a) = mpsc::channel(4);
        let (tx_b, mut rx_b) = mpsc::channel(4);
        let hub = fx.service.hub();
        assert!(hub.submit(Subscriber::new(UserId::new(1), "a", tx_a)).await.is_ok());
        assert!(hub.submit(Subscriber::new(UserId::new(2), "b", tx_b)).await.is_ok());
        wait_for_subscribers(hub, 2).await;

        let Ok(video) = fx
            .service
            .create(UserId::new(1), "https://youtu.be/abc".into(), "fun".into())
            .await
        else {
            panic!("create failed");
        };
        assert_eq!(video.shared_by, "ada@example.com");

        let Some(message) = rx_b.recv().await else {
            panic!("B should receive the new video");
        };
        let Ok(pushed) = serde_json::from_str::<Video>(message.as_str()) else {
            panic!("notification should be a video");
        };
        assert_eq!(pushed, video);
        assert!(rx_a.try_recv().is_err());
    }

    #[tokio::test]
    async fn create_rejects_bad_urls() {
        let fx = fixture().await;
        let empty = fx.service.create(UserId::new(1), "  ".into(), String::new()).await;
        assert!(matches!(empty, Err(ShareError::InvalidRequest(_))));

        let long = format!("https://youtu.be/{}", "x".repeat(MAX_URL_LEN));
        let long = fx.service.create(UserId::new(1), long, String::new()).await;
        assert!(matches!(long, Err(ShareError::InvalidRequest(_))));

        assert!(matches!(fx.store.count().await, Ok(0)));
    }

    #[tokio::test]
    async fn create_requires_known_user() {
        let fx = fixture().await;
        let result = fx
            .service
            .create(UserId::new(99), "https://youtu.be/abc".into(), String::new())
            .await;
        assert!(matches!(result, Err(ShareError::UserNotFound(id)) if id == UserId::new(99)));
    }

    #[tokio::test]
    async fn get_missing_video_is_not_found() {
        let fx = fixture().await;
        let result = fx.service.get(VideoId::new(5)).await;
        assert!(matches!(result, Err(ShareError::VideoNotFound(_))));
    }

    #[tokio::test]
    async fn list_validates_and_paginates() {
        let fx = fixture().await;
        for n in 0..3 {
            let url = format!("https://youtu.be/{n}");
            assert!(fx.service.create(UserId::new(2), url, String::new()).await.is_ok());
        }

        let Ok(page) = fx
            .service
            .list(ListQuery {
                page: Some(2),
                limit: Some(2),
                sort: None,
            })
            .await
        else {
            panic!("list failed");
        };
        assert_eq!(page.total, 3);
        assert_eq!(page.page, 2);
        assert_eq!(page.items.len(), 1);

        for query in [
            ListQuery { page: Some(0), ..ListQuery::default() },
            ListQuery { limit: Some(0), ..ListQuery::default() },
            ListQuery { limit: Some(MAX_PAGE_LIMIT + 1), ..ListQuery::default() },
            ListQuery { sort: Some("url".into()), ..ListQuery::default() },
        ] {
            assert!(matches!(
                fx.service.list(query).await,
                Err(ShareError::InvalidRequest(_))
            ));
        }
    }

    #[tokio::test]
    async fn list_defaults_to_twenty_newest_first() {
        let fx = fixture().await;
        for n in 0..25 {
            let url = format!("https://youtu.be/{n}");
            assert!(fx.service.create(UserId::new(1), url, String::new()).await.is_ok());
        }
        let Ok(page) = fx.service.list(ListQuery::default()).await else {
            panic!("list failed");
        };
        assert_eq!(page.limit, DEFAULT_PAGE_LIMIT);
        assert_eq!(page.items.len(), 20);
        assert_eq!(page.items.first().map(|v| v.id), Some(VideoId::new(25)));
    }
}
