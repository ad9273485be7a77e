//! Authentication failures.

/// Why a bearer credential was rejected.
///
/// Used both by the HTTP middleware (mapped to 401) and by WebSocket
/// admission (connection closed without a payload).
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No `Authorization` header on a protected route.
    #[error("missing authorization header")]
    MissingHeader,

    /// The credential is not of the form `Bearer <token>`.
    #[error("invalid authorization scheme: expected 'Bearer <token>'")]
    InvalidScheme,

    /// The token's `exp` claim is in the past.
    #[error("token expired")]
    Expired,

    /// Bad signature, unexpected algorithm, or malformed token.
    #[error("invalid token: {0}")]
    InvalidToken(String),

    /// The `sub` claim is not an unsigned integer user id.
    #[error("invalid subject claim: {0:?}")]
    InvalidSubject(String),

    /// No credential arrived on a fresh WebSocket before the deadline.
    #[error("timed out waiting for credentials")]
    Timeout,

    /// The peer closed the WebSocket before authenticating.
    #[error("connection closed before authentication")]
    PeerClosed,

    /// A token could not be signed.
    #[error("failed to sign token: {0}")]
    Signing(String),
}
