use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use thiserror::Error;

use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::Username;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::router::AppState;

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<ApiSuccess<UserData>, ApiError> {
    state
        .user_service
        .register_user(body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref user| {
            ApiSuccess::new(
                StatusCode::CREATED,
                "User registered successfully",
                user.into(),
            )
        })
}

/// HTTP request body for registration (raw JSON).
///
/// Fields are optional so that absent values produce the validation error
/// below instead of a deserialization rejection.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegisterRequest {
    username: Option<String>,
    email: Option<String>,
    password: Option<String>,
}

#[derive(Debug, Clone, Error)]
enum ParseRegisterRequestError {
    #[error("Username, email, and password are required")]
    MissingFields,
}

impl RegisterRequest {
    fn try_into_command(self) -> Result<RegisterUserCommand, ParseRegisterRequestError> {
        let username = self
            .username
            .and_then(|u| Username::new(u).ok())
            .ok_or(ParseRegisterRequestError::MissingFields)?;
        let email = self
            .email
            .and_then(|e| EmailAddress::new(e).ok())
            .ok_or(ParseRegisterRequestError::MissingFields)?;
        let password = self
            .password
            .filter(|p| !p.is_empty())
            .ok_or(ParseRegisterRequestError::MissingFields)?;

        Ok(RegisterUserCommand::new(username, email, password))
    }
}

impl From<ParseRegisterRequestError> for ApiError {
    fn from(err: ParseRegisterRequestError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}
