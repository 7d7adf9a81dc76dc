use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::user::errors::EmailError;
use crate::user::errors::UserError;

/// User aggregate entity.
///
/// The email address identifies the user at login and is the subject of
/// every access token issued to them.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub email: EmailAddress,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl auth::Principal for User {
    fn identifier(&self) -> &str {
        self.email.as_str()
    }

    fn secret_hash(&self) -> &str {
        &self.password_hash
    }
}

/// User unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Generate a new random user ID.
    ///
    /// # Returns
    /// UserId with random UUID v4
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Validates email format using RFC 5322 compliant parser.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated email address.
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    /// Get email as string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Command to register a new user with domain types
#[derive(Debug)]
pub struct CreateUserCommand {
    pub email: EmailAddress,
    pub password: String,
}

impl CreateUserCommand {
    const MIN_PASSWORD_LENGTH: usize = 8;

    /// Construct a new create user command.
    ///
    /// # Arguments
    /// * `email` - Validated email address
    /// * `password` - Plain text password (will be hashed by service)
    ///
    /// # Errors
    /// * `PasswordTooShort` - Password has fewer than 8 characters
    pub fn new(email: EmailAddress, password: String) -> Result<Self, UserError> {
        let length = password.chars().count();
        if length < Self::MIN_PASSWORD_LENGTH {
            return Err(UserError::PasswordTooShort {
                min: Self::MIN_PASSWORD_LENGTH,
                actual: length,
            });
        }

        Ok(Self { email, password })
    }
}

#[cfg(test)]
mod tests {
    use auth::Principal;

    use super::*;

    #[test]
    fn test_email_validation() {
        assert!(EmailAddress::new("alice@example.com".to_string()).is_ok());
        assert!(matches!(
            EmailAddress::new("not-an-email".to_string()),
            Err(EmailError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_password_minimum_length() {
        let email = EmailAddress::new("alice@example.com".to_string()).unwrap();

        let result = CreateUserCommand::new(email.clone(), "short".to_string());
        assert!(matches!(
            result,
            Err(UserError::PasswordTooShort { min: 8, actual: 5 })
        ));
        assert!(CreateUserCommand::new(email, "long enough".to_string()).is_ok());
    }

    #[test]
    fn test_user_is_principal_by_email() {
        let user = User {
            id: UserId::new(),
            email: EmailAddress::new("alice@example.com".to_string()).unwrap(),
            password_hash: "$argon2id$stub".to_string(),
            created_at: Utc::now(),
        };

        assert_eq!(user.identifier(), "alice@example.com");
        assert_eq!(user.secret_hash(), "$argon2id$stub");
    }
}
