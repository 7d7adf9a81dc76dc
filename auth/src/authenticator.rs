use std::sync::Arc;

use chrono::DateTime;
use chrono::Utc;

use crate::credentials::CredentialVerifier;
use crate::credentials::Credentials;
use crate::credentials::LookupError;
use crate::credentials::Principal;
use crate::credentials::PrincipalLookup;
use crate::credentials::SecretVerifier;
use crate::jwt::JwtError;
use crate::password::PasswordHasher;
use crate::token::TokenService;

/// Token type label returned alongside access tokens.
pub const TOKEN_TYPE: &str = "bearer";

/// Authentication coordinator combining credential verification and tokens.
///
/// Login runs the credential check and signs a token for the principal.
/// Later requests present that token to recover the principal again.
pub struct Authenticator<L, V = PasswordHasher> {
    credentials: CredentialVerifier<L, V>,
    tokens: TokenService,
    lookup: Arc<L>,
}

/// Result of successful authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticationResult {
    /// JWT access token
    pub access_token: String,
    /// Always [`TOKEN_TYPE`]
    pub token_type: &'static str,
    pub expires_at: DateTime<Utc>,
}

/// Why a presented token was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnauthorizedReason {
    Token(JwtError),
    UnknownPrincipal,
}

impl UnauthorizedReason {
    /// Stable label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            UnauthorizedReason::Token(JwtError::TokenExpired) => "expired",
            UnauthorizedReason::Token(JwtError::InvalidSignature) => "invalid_signature",
            UnauthorizedReason::Token(JwtError::MissingClaim(_)) => "missing_subject",
            UnauthorizedReason::Token(_) => "malformed",
            UnauthorizedReason::UnknownPrincipal => "unknown_principal",
        }
    }
}

/// Authentication operation errors.
///
/// The display strings are safe to show to clients: they never say which
/// credential was wrong or why a token was refused.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Username or password is wrong")]
    InvalidCredentials,

    #[error("Unauthorized")]
    Unauthorized(UnauthorizedReason),

    #[error("Token generation failed: {0}")]
    TokenIssuance(JwtError),

    #[error(transparent)]
    Lookup(#[from] LookupError),
}

impl<L, V> Authenticator<L, V>
where
    L: PrincipalLookup,
    V: SecretVerifier,
{
    /// Create a new authenticator.
    ///
    /// # Arguments
    /// * `lookup` - Principal store
    /// * `verifier` - Password verification capability
    /// * `tokens` - Token service holding the signing secret
    pub fn new(lookup: Arc<L>, verifier: V, tokens: TokenService) -> Self {
        Self {
            credentials: CredentialVerifier::new(Arc::clone(&lookup), verifier),
            tokens,
            lookup,
        }
    }

    /// Token service used for issuance and validation.
    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    /// Verify credentials and issue an access token for the principal.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown identifier or wrong password
    /// * `TokenIssuance` - Token signing failed
    /// * `Lookup` - Principal store could not be queried
    pub async fn login(
        &self,
        credentials: &Credentials,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        let principal = self.credentials.authenticate(credentials).await?;

        let issued = self
            .tokens
            .issue(principal.identifier())
            .map_err(AuthenticationError::TokenIssuance)?;

        tracing::info!(expires_at = %issued.expires_at, "Access token issued");

        Ok(AuthenticationResult {
            access_token: issued.access_token,
            token_type: TOKEN_TYPE,
            expires_at: issued.expires_at,
        })
    }

    /// Resolve the principal a token was issued to.
    ///
    /// The token is validated from scratch on every call.
    ///
    /// # Errors
    /// * `Unauthorized` - Token is malformed, badly signed, expired, has no
    ///   subject, or its subject no longer exists
    /// * `Lookup` - Principal store could not be queried
    pub async fn current_principal(
        &self,
        token: &str,
    ) -> Result<L::Principal, AuthenticationError> {
        let subject = self
            .tokens
            .validate(token)
            .map_err(|e| AuthenticationError::Unauthorized(UnauthorizedReason::Token(e)))?;

        self.lookup
            .find_principal(&subject)
            .await?
            .ok_or(AuthenticationError::Unauthorized(
                UnauthorizedReason::UnknownPrincipal,
            ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::tests::CountingVerifier;
    use crate::credentials::tests::InMemoryLookup;
    use crate::secret::SigningSecret;

    const SECRET: &str = "test_secret_key_at_least_32_bytes!";

    fn authenticator(lookup: Arc<InMemoryLookup>) -> Authenticator<InMemoryLookup, CountingVerifier> {
        let secret = SigningSecret::new(SECRET).unwrap();
        Authenticator::new(
            lookup,
            CountingVerifier::default(),
            TokenService::with_default_validity(&secret),
        )
    }

    fn lookup() -> Arc<InMemoryLookup> {
        Arc::new(InMemoryLookup::with(&[(
            "alice@example.com",
            "hashed:wonderland",
        )]))
    }

    #[tokio::test]
    async fn test_login_and_resolve_principal() {
        let authenticator = authenticator(lookup());

        let result = authenticator
            .login(&Credentials::new("alice@example.com", "wonderland"))
            .await
            .expect("Login failed");
        assert_eq!(result.token_type, "bearer");
        assert!(!result.access_token.is_empty());

        let principal = authenticator
            .current_principal(&result.access_token)
            .await
            .expect("Token was not accepted");
        assert_eq!(principal.identifier(), "alice@example.com");
    }

    #[tokio::test]
    async fn test_login_invalid_password() {
        let authenticator = authenticator(lookup());

        let result = authenticator
            .login(&Credentials::new("alice@example.com", "looking-glass"))
            .await;
        assert!(matches!(
            result,
            Err(AuthenticationError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_deleted_principal_is_unauthorized() {
        let lookup = lookup();
        let authenticator = authenticator(Arc::clone(&lookup));

        let result = authenticator
            .login(&Credentials::new("alice@example.com", "wonderland"))
            .await
            .unwrap();
        lookup.remove("alice@example.com");

        let error = authenticator
            .current_principal(&result.access_token)
            .await
            .unwrap_err();
        match error {
            AuthenticationError::Unauthorized(reason) => {
                assert_eq!(reason, UnauthorizedReason::UnknownPrincipal);
                assert_eq!(reason.kind(), "unknown_principal");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_invalid_token_is_unauthorized() {
        let authenticator = authenticator(lookup());

        let error = authenticator
            .current_principal("invalid.token.here")
            .await
            .unwrap_err();
        assert!(matches!(error, AuthenticationError::Unauthorized(_)));
        assert_eq!(error.to_string(), "Unauthorized");
    }

    #[tokio::test]
    async fn test_token_from_other_secret_is_unauthorized() {
        let authenticator = authenticator(lookup());
        let other = TokenService::with_default_validity(
            &SigningSecret::new("another_secret_key_at_least_32_bytes").unwrap(),
        );
        let foreign = other.issue("alice@example.com").unwrap();

        let error = authenticator
            .current_principal(&foreign.access_token)
            .await
            .unwrap_err();
        match error {
            AuthenticationError::Unauthorized(reason) => {
                assert_eq!(reason.kind(), "invalid_signature")
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_reason_kinds() {
        assert_eq!(
            UnauthorizedReason::Token(JwtError::TokenExpired).kind(),
            "expired"
        );
        assert_eq!(
            UnauthorizedReason::Token(JwtError::Malformed("bad".to_string())).kind(),
            "malformed"
        );
        assert_eq!(
            UnauthorizedReason::Token(JwtError::MissingClaim("sub".to_string())).kind(),
            "missing_subject"
        );
    }
}
