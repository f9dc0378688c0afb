use std::sync::Arc;
use std::time::Duration;

use auth::Authenticator;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::delete;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::delete_user::delete_user;
use super::handlers::health::health;
use super::handlers::list_users::list_users;
use super::handlers::login::login;
use super::handlers::me::me;
use super::handlers::register::register;
use super::middleware::authenticate as auth_middleware;
use crate::domain::user::service::UserService;
use crate::outbound::repositories::memory::InMemoryUserRegistry;

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserService<InMemoryUserRegistry>>,
    pub authenticator: Arc<Authenticator>,
}

pub fn create_router(
    user_service: Arc<UserService<InMemoryUserRegistry>>,
    authenticator: Arc<Authenticator>,
) -> Router {
    let state = AppState {
        user_service,
        authenticator,
    };

    // List and delete are intentionally public, matching the original
    // contract; token verification is exercised on /api/me
    let public_routes = Router::new()
        .route("/api/register", post(register))
        .route("/api/login", post(login))
        .route("/api/users", get(list_users))
        .route("/api/users/:id", delete(delete_user))
        .route("/api/health", get(health));

    let protected_routes = Router::new().route("/api/me", get(me)).route_layer(
        middleware::from_fn_with_state(state.clone(), auth_middleware),
    );

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
