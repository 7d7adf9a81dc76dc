use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::User;
use crate::domain::user::ports::UserRepository;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

pub async fn create_user<UR: UserRepository>(
    State(state): State<AppState<UR>>,
    Json(body): Json<CreateUserRequestBody>,
) -> Result<ApiSuccess<CreateUserResponseData>, ApiError> {
    let command = body.try_into_domain()?;

    state
        .user_service
        .create_user(command)
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::CREATED, user.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateUserRequestBody {
    email: String,
    password: String,
}

impl CreateUserRequestBody {
    fn try_into_domain(self) -> Result<CreateUserCommand, UserError> {
        let email = EmailAddress::new(self.email)?;
        CreateUserCommand::new(email, self.password)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateUserResponseData {
    pub id: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for CreateUserResponseData {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            email: user.email.as_str().to_string(),
            created_at: user.created_at,
        }
    }
}
