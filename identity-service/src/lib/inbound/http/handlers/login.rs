use auth::Credentials;
use axum::extract::State;
use axum::http::header;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Form;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::config::CookieConfig;
use crate::domain::user::ports::UserRepository;
use crate::inbound::http::middleware::ACCESS_TOKEN_COOKIE;
use crate::inbound::http::router::AppState;

/// Exchange username (email) and password for an access token.
///
/// The token is returned in the body and also set as an HTTP-only cookie.
pub async fn login<UR: UserRepository>(
    State(state): State<AppState<UR>>,
    Form(form): Form<LoginForm>,
) -> Result<impl IntoResponse, ApiError> {
    let credentials = Credentials::new(form.username, form.password);

    let result = state.authenticator.login(&credentials).await?;

    let max_age = state.authenticator.tokens().validity().num_seconds();
    let cookie = access_token_cookie(&result.access_token, max_age, &state.cookie);

    Ok((
        [(header::SET_COOKIE, cookie)],
        ApiSuccess::new(
            StatusCode::OK,
            LoginResponseData {
                access_token: result.access_token,
                token_type: result.token_type.to_string(),
            },
        ),
    ))
}

fn access_token_cookie(token: &str, max_age: i64, config: &CookieConfig) -> String {
    let mut cookie = format!(
        "{}=\"Bearer {}\"; HttpOnly; Path=/; SameSite=Lax; Max-Age={}",
        ACCESS_TOKEN_COOKIE, token, max_age
    );
    if config.secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// OAuth2 password form fields.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginForm {
    username: String,
    password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponseData {
    pub access_token: String,
    pub token_type: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_token_cookie() {
        let cookie = access_token_cookie("abc.def.ghi", 3540, &CookieConfig::default());

        assert_eq!(
            cookie,
            "access_token=\"Bearer abc.def.ghi\"; HttpOnly; Path=/; SameSite=Lax; Max-Age=3540"
        );
    }

    #[test]
    fn test_secure_cookie() {
        let cookie = access_token_cookie("abc.def.ghi", 60, &CookieConfig { secure: true });
        assert!(cookie.ends_with("; Secure"));
    }
}
