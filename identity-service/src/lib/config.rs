use std::env;

use auth::SecretError;
use auth::SigningSecret;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

/// Environment variable the signing secret has historically been deployed under.
pub const SECRET_KEY_VARIABLE: &str = "SECRET_KEY";

/// Upper bound for `jwt.expiration_minutes` (one year).
pub const MAX_EXPIRATION_MINUTES: i64 = 365 * 24 * 60;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub cookie: CookieConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

#[derive(Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    #[serde(default = "default_expiration_minutes")]
    pub expiration_minutes: i64,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct CookieConfig {
    /// Mark the access token cookie `Secure` (HTTPS only).
    #[serde(default)]
    pub secure: bool,
}

fn default_expiration_minutes() -> i64 {
    auth::DEFAULT_TOKEN_VALIDITY_MINUTES
}

impl JwtConfig {
    /// Signing secret for the token service.
    ///
    /// # Errors
    /// * `Empty` - No secret was configured
    pub fn signing_secret(&self) -> Result<SigningSecret, SecretError> {
        SigningSecret::new(self.secret.as_bytes())
    }

    /// Lifetime of issued access tokens.
    ///
    /// # Errors
    /// * `Message` - `expiration_minutes` is not in `1..=MAX_EXPIRATION_MINUTES`
    pub fn validity(&self) -> Result<chrono::Duration, ConfigError> {
        if !(1..=MAX_EXPIRATION_MINUTES).contains(&self.expiration_minutes) {
            return Err(ConfigError::Message(format!(
                "jwt.expiration_minutes must be between 1 and {}, got {}",
                MAX_EXPIRATION_MINUTES, self.expiration_minutes
            )));
        }

        chrono::Duration::try_minutes(self.expiration_minutes).ok_or_else(|| {
            ConfigError::Message(format!(
                "jwt.expiration_minutes {} is out of range",
                self.expiration_minutes
            ))
        })
    }
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"[REDACTED]")
            .field("expiration_minutes", &self.expiration_minutes)
            .finish()
    }
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. `SECRET_KEY` for the signing secret
    /// 2. Environment variables (DATABASE__URL, SERVER__HTTP_PORT, JWT__SECRET, etc.)
    /// 3. Environment-specific config file (config/{environment}.toml)
    /// 4. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: DATABASE__URL=postgres://... overrides database.url
            .add_source(Environment::default().separator("__"))
            .set_override_option("jwt.secret", env::var(SECRET_KEY_VARIABLE).ok())?
            .build()?;

        let config: Config = configuration.try_deserialize()?;
        config.jwt.validity()?;

        Ok(config)
    }
}
