//! Data Transfer Objects for REST request/response serialization.
//!
//! Field names follow the public JSON contract: camelCase on entities,
//! `redirectURL` on login and `_items` on listings.

pub mod user_dto;
pub mod video_dto;

pub use user_dto::*;
pub use video_dto::*;
