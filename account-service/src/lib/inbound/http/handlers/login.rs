use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::router::AppState;

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<ApiSuccess<LoginResponseData>, ApiError> {
    let (identifier, password) = body.into_credentials()?;

    let (user, token) = state
        .user_service
        .login(&identifier, &password)
        .await
        .map_err(ApiError::from)?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        "Login successful",
        LoginResponseData {
            user: (&user).into(),
            token,
        },
    ))
}

/// HTTP request body for login. The identifier matches either a username or
/// an email address.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequest {
    identifier: Option<String>,
    password: Option<String>,
}

impl LoginRequest {
    fn into_credentials(self) -> Result<(String, String), ApiError> {
        match (self.identifier, self.password) {
            (Some(identifier), Some(password)) if !identifier.is_empty() && !password.is_empty() => {
                Ok((identifier, password))
            }
            _ => Err(ApiError::BadRequest(
                "Username/email and password are required".to_string(),
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponseData {
    pub user: UserData,
    pub token: String,
}
