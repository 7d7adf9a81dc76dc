//! Credential authentication and access tokens.
//!
//! Provides the authentication core used by the service:
//! - Credential verification against stored password hashes (Argon2id)
//! - Signed, time-bounded access tokens (HS256 JWT)
//! - Token validation back to the principal it was issued for
//!
//! Storage stays outside this crate. Services implement [`PrincipalLookup`]
//! for their user store and hand it to an [`Authenticator`].
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! let is_valid = hasher.verify("my_password", &hash).unwrap();
//! assert!(is_valid);
//! ```
//!
//! ## Access Tokens
//! ```
//! use auth::{SigningSecret, TokenService};
//!
//! let secret = SigningSecret::new("secret_key_at_least_32_bytes_long!").unwrap();
//! let tokens = TokenService::with_default_validity(&secret);
//! let issued = tokens.issue("alice@example.com").unwrap();
//! let subject = tokens.validate(&issued.access_token).unwrap();
//! assert_eq!(subject, "alice@example.com");
//! ```

pub mod authenticator;
pub mod credentials;
pub mod jwt;
pub mod password;
pub mod secret;
pub mod token;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::AuthenticationResult;
pub use authenticator::Authenticator;
pub use authenticator::UnauthorizedReason;
pub use authenticator::TOKEN_TYPE;
pub use credentials::CredentialVerifier;
pub use credentials::Credentials;
pub use credentials::LookupError;
pub use credentials::Principal;
pub use credentials::PrincipalLookup;
pub use credentials::SecretVerifier;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use secret::SecretError;
pub use secret::SigningSecret;
pub use token::default_token_validity;
pub use token::IssuedToken;
pub use token::TokenService;
pub use token::DEFAULT_TOKEN_VALIDITY_MINUTES;
