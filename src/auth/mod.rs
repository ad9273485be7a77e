//! Authentication: access tokens, login identity provider, and the HTTP
//! bearer filter.
//!
//! The same [`TokenService`] verifies the `Authorization` header on REST
//! calls and the in-band `Bearer <token>` message on WebSocket admission.

pub mod claims;
pub mod error;
pub mod identity;
pub mod middleware;
pub mod token_service;

pub use claims::{AuthUser, Claims};
pub use error::AuthError;
pub use identity::{ExternalProfile, GoogleIdentityProvider, IdentityProvider};
pub use token_service::{TokenService, parse_bearer};
