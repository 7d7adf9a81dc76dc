use std::sync::Arc;

use async_trait::async_trait;
use auth::LookupError;
use auth::PrincipalLookup;
use chrono::Utc;

use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::UserError;
use crate::user::ports::UserRepository;
use crate::user::ports::UserServicePort;

/// Domain service implementation for user operations.
///
/// Also serves as the principal store for authentication, looking users up
/// by email address.
pub struct UserService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    password_hasher: auth::PasswordHasher,
}

impl<UR> UserService<UR>
where
    UR: UserRepository,
{
    /// Create a new user service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - User persistence implementation
    pub fn new(repository: Arc<UR>) -> Self {
        Self {
            repository,
            password_hasher: auth::PasswordHasher::new(),
        }
    }
}

#[async_trait]
impl<UR> UserServicePort for UserService<UR>
where
    UR: UserRepository,
{
    async fn create_user(&self, command: CreateUserCommand) -> Result<User, UserError> {
        let password_hash = self
            .password_hasher
            .hash(&command.password)
            .map_err(|e| UserError::Unknown(format!("Password hashing failed: {}", e)))?;

        let user = User {
            id: UserId::new(),
            email: command.email,
            password_hash,
            created_at: Utc::now(),
        };

        let created_user = self.repository.create(user).await?;
        tracing::info!(user_id = %created_user.id, "User registered");

        Ok(created_user)
    }
}

#[async_trait]
impl<UR> PrincipalLookup for UserService<UR>
where
    UR: UserRepository,
{
    type Principal = User;

    async fn find_principal(&self, identifier: &str) -> Result<Option<User>, LookupError> {
        // Anything that is not an email address cannot name a user.
        let Ok(email) = EmailAddress::new(identifier.to_string()) else {
            return Ok(None);
        };

        self.repository
            .find_by_email(&email)
            .await
            .map_err(|e| LookupError(e.to_string()))
    }
}
