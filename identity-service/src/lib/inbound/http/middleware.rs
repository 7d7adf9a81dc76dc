use axum::extract::Request;
use axum::extract::State;
use axum::http::header;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;

use super::handlers::ApiError;
use super::handlers::UNAUTHORIZED_MESSAGE;
use crate::domain::user::models::User;
use crate::domain::user::ports::UserRepository;
use crate::inbound::http::router::AppState;

/// Cookie the login handler stores the access token in.
pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// Extension type carrying the user the request is authenticated as
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Middleware that resolves the access token to a user and adds it to request extensions
pub async fn authenticate<UR: UserRepository>(
    State(state): State<AppState<UR>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_token(req.headers()).ok_or_else(|| {
        tracing::debug!("No access token presented");
        ApiError::Unauthorized(UNAUTHORIZED_MESSAGE.to_string())
    })?;

    let user = state.authenticator.current_principal(&token).await?;

    req.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(req).await)
}

/// Token from `Authorization: Bearer <token>`, falling back to the access token cookie.
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    if let Some(value) = headers.get(header::AUTHORIZATION) {
        return value.to_str().ok().and_then(strip_bearer).map(str::to_string);
    }

    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == ACCESS_TOKEN_COOKIE)
        .and_then(|(_, value)| strip_bearer(value.trim_matches('"')))
        .map(str::to_string)
}

fn strip_bearer(value: &str) -> Option<&str> {
    let (scheme, token) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let token = token.trim();
    (!token.is_empty()).then_some(token)
}
