use axum::extract::State;
use axum::http::StatusCode;

use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::router::AppState;

pub async fn list_users(
    State(state): State<AppState>,
) -> Result<ApiSuccess<Vec<UserData>>, ApiError> {
    state
        .user_service
        .list_users()
        .await
        .map_err(ApiError::from)
        .map(|users| {
            let users: Vec<UserData> = users.iter().map(UserData::from).collect();
            ApiSuccess::new(StatusCode::OK, "Users retrieved successfully", users)
        })
}
