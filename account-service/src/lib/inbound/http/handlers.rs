use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use crate::domain::user::models::User;
use crate::user::errors::UserError;

pub mod delete_user;
pub mod health;
pub mod list_users;
pub mod login;
pub mod me;
pub mod register;

/// Successful JSON response in the service envelope.
#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize>(StatusCode, Json<ApiResponseBody<T>>);

impl<T: Serialize> ApiSuccess<T> {
    pub fn new(status: StatusCode, message: impl Into<String>, data: T) -> Self {
        ApiSuccess(status, Json(ApiResponseBody::new(message, Some(data))))
    }
}

impl ApiSuccess<()> {
    /// Confirmation response carrying no data payload.
    pub fn message_only(status: StatusCode, message: impl Into<String>) -> Self {
        ApiSuccess(status, Json(ApiResponseBody::new(message, None)))
    }
}

impl<T: Serialize> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    BadRequest(String),
    Unauthorized(String),
    Forbidden(String),
    NotFound(String),
    InternalServerError(String),
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        Self::InternalServerError(e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ApiResponseBody::new_error(msg))
            }
            ApiError::Unauthorized(msg) => {
                (StatusCode::UNAUTHORIZED, ApiResponseBody::new_error(msg))
            }
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, ApiResponseBody::new_error(msg)),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, ApiResponseBody::new_error(msg)),
            // Internal failures surface the underlying message in the
            // response body for diagnostics
            ApiError::InternalServerError(detail) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiResponseBody::new_error_with_detail(
                    "An unexpected server error occurred",
                    detail,
                ),
            ),
        };

        (status, Json(body)).into_response()
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            // Duplicate errors name the colliding field; both map to 400
            UserError::UsernameAlreadyExists(_) => {
                ApiError::BadRequest("Username is already taken".to_string())
            }
            UserError::EmailAlreadyExists(_) => {
                ApiError::BadRequest("Email is already taken".to_string())
            }
            UserError::InvalidUsername(_) | UserError::InvalidEmail(_) => {
                ApiError::BadRequest(err.to_string())
            }
            // The generic message never reveals whether the identifier or
            // the password was wrong
            UserError::InvalidCredentials => {
                ApiError::Unauthorized("Username/email or password is incorrect".to_string())
            }
            UserError::NotFound(_) | UserError::InvalidUserId(_) => {
                ApiError::NotFound("User not found".to_string())
            }
            UserError::PasswordHash(_) | UserError::TokenIssuance(_) | UserError::Unknown(_) => {
                ApiError::InternalServerError(err.to_string())
            }
        }
    }
}

/// Response envelope shared by every JSON endpoint:
/// `{success, message, data?, error?}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseBody<T: Serialize> {
    success: bool,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T: Serialize> ApiResponseBody<T> {
    pub fn new(message: impl Into<String>, data: Option<T>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data,
            error: None,
        }
    }
}

impl ApiResponseBody<()> {
    pub fn new_error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            error: None,
        }
    }

    pub fn new_error_with_detail(message: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            error: Some(error.into()),
        }
    }
}

/// Externally visible user record. The password hash is stripped here and
/// never serialized outward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserData {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserData {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.0,
            username: user.username.as_str().to_string(),
            email: user.email.as_str().to_string(),
            created_at: user.created_at,
        }
    }
}
