//! WebSocket layer: upgrade, in-band admission, and delivery loop.
//!
//! The endpoint at `/ws` is push-only: after authenticating with a single
//! `Bearer <token>` message the client receives every newly shared video
//! as a JSON text frame, except videos it shared itself.

pub mod admission;
pub mod connection;
pub mod handler;
