use axum::http::StatusCode;
use axum::Extension;
use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use super::ApiSuccess;
use crate::domain::user::models::User;
use crate::inbound::http::middleware::CurrentUser;

/// Return the user the access token was issued to.
pub async fn current_user(
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> ApiSuccess<UserData> {
    ApiSuccess::new(StatusCode::OK, (&user).into())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserData {
    pub id: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserData {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            email: user.email.as_str().to_string(),
            created_at: user.created_at,
        }
    }
}
