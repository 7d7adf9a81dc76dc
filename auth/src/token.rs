use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

use crate::jwt::Claims;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::secret::SigningSecret;

/// Default access token lifetime in minutes.
///
/// Fifty-nine, not sixty: this is the lifetime clients have always been
/// issued and it is kept as is.
pub const DEFAULT_TOKEN_VALIDITY_MINUTES: i64 = 59;

/// Default access token lifetime.
pub fn default_token_validity() -> Duration {
    Duration::minutes(DEFAULT_TOKEN_VALIDITY_MINUTES)
}

/// A freshly signed access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
}

/// Issues and validates stateless access tokens.
///
/// Nothing is stored: a token is valid exactly while its signature verifies
/// under the current secret and its expiry lies in the future.
pub struct TokenService {
    handler: JwtHandler,
    validity: Duration,
}

impl TokenService {
    /// Create a token service.
    ///
    /// # Arguments
    /// * `secret` - Signing secret
    /// * `validity` - Lifetime given to tokens issued by [`TokenService::issue`]
    pub fn new(secret: &SigningSecret, validity: Duration) -> Self {
        Self {
            handler: JwtHandler::new(secret),
            validity,
        }
    }

    /// Create a token service issuing tokens valid for 59 minutes.
    pub fn with_default_validity(secret: &SigningSecret) -> Self {
        Self::new(secret, default_token_validity())
    }

    /// Lifetime of tokens issued by [`TokenService::issue`].
    pub fn validity(&self) -> Duration {
        self.validity
    }

    /// Issue a token for `subject` with the configured validity.
    ///
    /// # Errors
    /// * `EncodingFailed` - Validity is unusable or signing failed
    pub fn issue(&self, subject: &str) -> Result<IssuedToken, JwtError> {
        self.issue_with_validity(subject, self.validity)
    }

    /// Issue a token for `subject` valid for `validity`.
    ///
    /// # Errors
    /// * `EncodingFailed` - Validity is not positive, expiry is out of range, or signing failed
    pub fn issue_with_validity(
        &self,
        subject: &str,
        validity: Duration,
    ) -> Result<IssuedToken, JwtError> {
        let claims = Claims::for_subject(subject, validity)?;
        let access_token = self.handler.encode(&claims)?;

        Ok(IssuedToken {
            access_token,
            expires_at: claims.expires_at(),
        })
    }

    /// Validate a token and return its subject.
    ///
    /// # Errors
    /// * `Malformed` - Token cannot be decoded or uses another algorithm
    /// * `InvalidSignature` - Token was not signed with this secret
    /// * `TokenExpired` - Current time is at or past the expiry
    /// * `MissingClaim` - Subject claim is absent or empty
    pub fn validate(&self, token: &str) -> Result<String, JwtError> {
        let claims = self.handler.decode(token)?;

        if claims.is_expired(Utc::now().timestamp()) {
            return Err(JwtError::TokenExpired);
        }

        claims
            .subject()
            .map(str::to_string)
            .ok_or_else(|| JwtError::MissingClaim("sub".to_string()))
    }
}
