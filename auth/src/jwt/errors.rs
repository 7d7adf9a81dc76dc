use thiserror::Error;

/// Error type for JWT operations.
///
/// Decode failures keep their cause apart so callers can log why a token was
/// refused, even though every decode failure is reported to clients the same way.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Token is malformed: {0}")]
    Malformed(String),

    #[error("Token signature is invalid")]
    InvalidSignature,

    #[error("Token is expired")]
    TokenExpired,

    #[error("Missing required claim: {0}")]
    MissingClaim(String),
}
