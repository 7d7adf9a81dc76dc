use std::collections::HashMap;
use std::sync::Arc;
use std::sync::RwLock;

use async_trait::async_trait;
use auth::Authenticator;
use auth::PasswordHasher;
use auth::SigningSecret;
use auth::TokenService;
use identity_service::config::CookieConfig;
use identity_service::domain::user::models::EmailAddress;
use identity_service::domain::user::models::User;
use identity_service::domain::user::models::UserId;
use identity_service::domain::user::ports::UserRepository;
use identity_service::domain::user::service::UserService;
use identity_service::inbound::http::router::create_router;
use identity_service::user::errors::UserError;

pub const TEST_SECRET: &str = "test-secret-key-for-jwt-signing-at-least-32-bytes";

/// In-memory user store standing in for PostgreSQL
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<UserId, User>>,
}

impl InMemoryUserRepository {
    pub fn remove_by_email(&self, email: &str) {
        self.users
            .write()
            .unwrap()
            .retain(|_, user| user.email.as_str() != email);
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> Result<User, UserError> {
        let mut users = self.users.write().unwrap();
        if users.values().any(|existing| existing.email == user.email) {
            return Err(UserError::EmailAlreadyExists(
                user.email.as_str().to_string(),
            ));
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError> {
        Ok(self
            .users
            .read()
            .unwrap()
            .values()
            .find(|user| &user.email == email)
            .cloned())
    }
}

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub repository: Arc<InMemoryUserRepository>,
    pub api_client: reqwest::Client,
    pub tokens: TokenService,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let repository = Arc::new(InMemoryUserRepository::default());
        let user_service = Arc::new(UserService::new(Arc::clone(&repository)));

        let secret = SigningSecret::new(TEST_SECRET).expect("Invalid test secret");
        let authenticator = Arc::new(Authenticator::new(
            Arc::clone(&user_service),
            PasswordHasher::new(),
            TokenService::with_default_validity(&secret),
        ));

        let router = create_router(user_service, authenticator, CookieConfig::default());

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            repository,
            api_client: reqwest::Client::new(),
            tokens: TokenService::with_default_validity(&secret),
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Register a user through the API
    pub async fn register(&self, email: &str, password: &str) -> reqwest::Response {
        self.post("/api/users")
            .json(&serde_json::json!({
                "email": email,
                "password": password,
            }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Submit the login form
    pub async fn login(&self, username: &str, password: &str) -> reqwest::Response {
        self.post("/login")
            .form(&[("username", username), ("password", password)])
            .send()
            .await
            .expect("Failed to execute request")
    }
}
