use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::authenticator::AuthenticationError;

/// An authenticated entity as seen by the authentication flow.
pub trait Principal {
    /// Unique identifier, also used as the token subject.
    fn identifier(&self) -> &str;

    /// Stored password hash. Only ever handed to a [`SecretVerifier`].
    fn secret_hash(&self) -> &str;
}

/// Error raised when the principal store cannot be queried.
///
/// This is an infrastructure failure, not a rejection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Principal lookup failed: {0}")]
pub struct LookupError(pub String);

/// Read-only access to stored principals.
#[async_trait]
pub trait PrincipalLookup: Send + Sync + 'static {
    type Principal: Principal + Send;

    /// Retrieve a principal by identifier.
    ///
    /// # Returns
    /// Optional principal (None if no principal has this identifier)
    ///
    /// # Errors
    /// * `LookupError` - Storage could not be queried
    async fn find_principal(
        &self,
        identifier: &str,
    ) -> Result<Option<Self::Principal>, LookupError>;
}

/// Checks a plaintext secret against a stored hash.
pub trait SecretVerifier: Send + Sync {
    /// Returns true only when `plaintext` matches `stored_hash`.
    fn verify(&self, plaintext: &str, stored_hash: &str) -> bool;

    /// Spend the cost of one verification without a stored hash.
    fn verify_decoy(&self, _plaintext: &str) {}
}

/// Identifier and plaintext secret presented at login.
#[derive(Clone)]
pub struct Credentials {
    pub identifier: String,
    pub secret: String,
}

impl Credentials {
    pub fn new(identifier: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            secret: secret.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("identifier", &self.identifier)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

/// Confirms that presented credentials belong to a stored principal.
pub struct CredentialVerifier<L, V> {
    lookup: Arc<L>,
    verifier: V,
}

impl<L, V> CredentialVerifier<L, V>
where
    L: PrincipalLookup,
    V: SecretVerifier,
{
    pub fn new(lookup: Arc<L>, verifier: V) -> Self {
        Self { lookup, verifier }
    }

    /// Verify credentials against the stored principal.
    ///
    /// An unknown identifier and a wrong secret produce the same
    /// `InvalidCredentials` outcome, and both pay for one hash verification.
    ///
    /// # Returns
    /// The matching principal
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown identifier, wrong secret, or empty input
    /// * `Lookup` - Principal store could not be queried
    pub async fn authenticate(
        &self,
        credentials: &Credentials,
    ) -> Result<L::Principal, AuthenticationError> {
        if credentials.identifier.is_empty() || credentials.secret.is_empty() {
            return Err(AuthenticationError::InvalidCredentials);
        }

        let principal = self.lookup.find_principal(&credentials.identifier).await?;

        let Some(principal) = principal else {
            self.verifier.verify_decoy(&credentials.secret);
            tracing::debug!("Login rejected");
            return Err(AuthenticationError::InvalidCredentials);
        };

        if !self
            .verifier
            .verify(&credentials.secret, principal.secret_hash())
        {
            tracing::debug!("Login rejected");
            return Err(AuthenticationError::InvalidCredentials);
        }

        Ok(principal)
    }
}
