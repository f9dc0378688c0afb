use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;

use crate::domain::user::models::UserId;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::router::AppState;
use crate::user::ports::UserServicePort;

pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiSuccess<()>, ApiError> {
    // Non-numeric ids fall through to the not-found response
    let user_id = UserId::from_string(&id)
        .map_err(|_| ApiError::NotFound("User not found".to_string()))?;

    state
        .user_service
        .delete_user(&user_id)
        .await
        .map_err(ApiError::from)
        .map(|_| ApiSuccess::message_only(StatusCode::OK, "User deleted successfully"))
}
