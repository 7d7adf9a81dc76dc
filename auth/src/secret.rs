use std::env;
use std::fmt;

use thiserror::Error;

/// Error for signing secret construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SecretError {
    #[error("Signing secret is empty")]
    Empty,

    #[error("Signing secret variable {0} is not set")]
    Missing(String),
}

/// Symmetric key used to sign and verify access tokens.
///
/// Built once at startup and shared read-only afterwards. Replacing it
/// invalidates every token signed with the previous value.
#[derive(Clone, PartialEq, Eq)]
pub struct SigningSecret(Vec<u8>);

impl SigningSecret {
    /// Wrap raw key material.
    ///
    /// # Errors
    /// * `Empty` - No key material was given
    pub fn new(secret: impl Into<Vec<u8>>) -> Result<Self, SecretError> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(SecretError::Empty);
        }
        Ok(Self(secret))
    }

    /// Read the secret from an environment variable.
    ///
    /// # Errors
    /// * `Missing` - Variable is unset or not valid unicode
    /// * `Empty` - Variable is set to an empty string
    pub fn from_env(variable: &str) -> Result<Self, SecretError> {
        let value = env::var(variable).map_err(|_| SecretError::Missing(variable.to_string()))?;
        Self::new(value)
    }

    pub(crate) fn expose(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningSecret([REDACTED])")
    }
}
