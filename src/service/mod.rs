//! Service layer: business logic orchestration.
//!
//! [`VideoService`] persists shared videos and announces them through the
//! [`crate::domain::BroadcastHub`]. [`UserService`] runs the login flow and
//! account lookups.

pub mod user_service;
pub mod video_service;

pub use user_service::{Session, UserService};
pub use video_service::{ListQuery, VideoPage, VideoService};
