//! # vidshare-gateway
//!
//! REST API and WebSocket broadcast gateway for a video-sharing service.
//!
//! Users log in with a Google authorization code and receive a bearer
//! token. With it they share and browse videos over REST, and open a
//! WebSocket on `/ws` to be told about every video other users share, as
//! it happens.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP, WebSocket)
//!     │
//!     ├── Bearer filter (auth/)
//!     ├── REST Handlers (api/)         WS Admission (ws/)
//!     │                                      │
//!     ├── VideoService / UserService (service/)
//!     │         │                            │
//!     │         └──── broadcast ──► BroadcastHub (domain/) ◄── submit
//!     │                                  │
//!     │                          SubscriberRegistry ──► per-connection outbox
//!     │
//!     └── Repositories (persistence/): PostgreSQL or in-memory
//! ```

pub mod api;
pub mod app_state;
pub mod auth;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;
pub mod ws;
