use std::sync::Arc;

use account_service::config::Config;
use account_service::domain::user::service::UserService;
use account_service::inbound::http::router::create_router;
use account_service::outbound::repositories::InMemoryUserRegistry;
use auth::Authenticator;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "account_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "account-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    if config.uses_default_secret() {
        tracing::warn!(
            "JWT secret is the insecure built-in placeholder; set JWT__SECRET before exposing this service"
        );
    }

    tracing::info!(
        port = config.server.port,
        token_validity_hours = config.jwt.expiration_hours,
        storage = "in-memory",
        "Configuration loaded"
    );

    let authenticator = Arc::new(Authenticator::new(config.jwt.secret.as_bytes()));
    let user_registry = Arc::new(InMemoryUserRegistry::new());
    let user_service = Arc::new(UserService::new(
        user_registry,
        Arc::clone(&authenticator),
        config.jwt.expiration_hours,
    ));

    let address = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(
        address = %address,
        protocol = "http",
        "Http server listening"
    );

    let application = create_router(user_service, authenticator);
    axum::serve(listener, application).await?;

    Ok(())
}
