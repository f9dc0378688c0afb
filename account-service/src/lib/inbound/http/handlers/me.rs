use axum::http::StatusCode;
use axum::Extension;
use serde::Serialize;

use super::ApiSuccess;
use crate::inbound::http::middleware::AuthenticatedUser;

/// Returns the identity claims of the presented bearer token.
///
/// Claims are a snapshot taken at issuance; this endpoint reflects the
/// token, not the current registry state.
pub async fn me(Extension(user): Extension<AuthenticatedUser>) -> ApiSuccess<MeResponseData> {
    ApiSuccess::new(
        StatusCode::OK,
        "Authenticated user retrieved successfully",
        MeResponseData {
            id: user.user_id.0,
            username: user.username,
            email: user.email,
        },
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MeResponseData {
    pub id: i64,
    pub username: String,
    pub email: String,
}
