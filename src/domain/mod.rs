//! Domain layer: core types, subscriber registry, and broadcast hub.
//!
//! This module contains the server-side domain model: user and video
//! entities with their typed identifiers, the subscribers admitted over
//! WebSocket, the registry that stores them, and the hub that fans out
//! notifications to them.

pub mod broadcast_hub;
pub mod ids;
pub mod subscriber;
pub mod subscriber_registry;
pub mod user;
pub mod video;

pub use broadcast_hub::{BroadcastHub, BroadcastReport, HubError, IntakeLoop};
pub use ids::{UserId, VideoId};
pub use subscriber::{DeliveryError, Notification, Subscriber, SubscriberId};
pub use subscriber_registry::{RegisteredSubscriber, SubscriberRegistry};
pub use user::{NewUser, User};
pub use video::{NewVideo, SortField, Video, VideoSort};
