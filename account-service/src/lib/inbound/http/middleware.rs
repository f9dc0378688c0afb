use axum::extract::Request;
use axum::extract::State;
use axum::http::{self};
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;

use crate::domain::user::models::UserId;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;

/// Extension type carrying the authenticated identity into request handlers
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub username: String,
    pub email: String,
}

/// Middleware that validates bearer tokens on protected routes.
///
/// A missing or unextractable token yields 401; a token that is present but
/// fails verification (malformed, bad signature, or expired) yields 403.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    // Extract token from Authorization header
    let token = extract_token_from_header(&req)?;

    // Validate signature and expiry
    let claims: auth::Claims = state.authenticator.validate_token(token).map_err(|e| {
        tracing::warn!("JWT validation failed: {}", e);
        ApiError::Forbidden("Token is not valid".to_string()).into_response()
    })?;

    let user_id = UserId::from_string(&claims.sub).map_err(|e| {
        tracing::warn!("Failed to parse user id from token: {}", e);
        ApiError::Forbidden("Token is not valid".to_string()).into_response()
    })?;

    let username = claims.username().unwrap_or_else(|| "unknown".to_string());
    let email = claims.email().unwrap_or_else(|| "unknown".to_string());

    // Add authenticated identity to request extensions
    req.extensions_mut().insert(AuthenticatedUser {
        user_id,
        username,
        email,
    });

    Ok(next.run(req).await)
}

fn extract_token_from_header(req: &Request) -> Result<&str, Response> {
    let missing_token =
        || ApiError::Unauthorized("Token not found".to_string()).into_response();

    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .ok_or_else(missing_token)?;

    let auth_str = auth_header.to_str().map_err(|_| missing_token())?;

    let token = auth_str
        .strip_prefix("Bearer ")
        .filter(|t| !t.is_empty())
        .ok_or_else(missing_token)?;

    Ok(token)
}
