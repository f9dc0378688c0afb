use std::sync::Arc;

use account_service::domain::user::service::UserService;
use account_service::inbound::http::router::create_router;
use account_service::outbound::repositories::InMemoryUserRegistry;
use auth::Authenticator;
use auth::JwtHandler;

pub const TEST_JWT_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub jwt_handler: JwtHandler,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp.
    ///
    /// Every test gets its own isolated in-memory registry, so tests never
    /// observe each other's records.
    pub async fn spawn() -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let registry = Arc::new(InMemoryUserRegistry::new());
        let authenticator = Arc::new(Authenticator::new(TEST_JWT_SECRET));
        let user_service = Arc::new(UserService::new(
            registry,
            Arc::clone(&authenticator),
            24,
        ));

        let router = create_router(user_service, authenticator);

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            api_client: reqwest::Client::new(),
            jwt_handler: JwtHandler::new(TEST_JWT_SECRET),
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make DELETE request
    pub fn delete(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.delete(format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Register a user and assert success, returning the response body
    pub async fn register_user(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> serde_json::Value {
        let response = self
            .post("/api/register")
            .json(&serde_json::json!({
                "username": username,
                "email": email,
                "password": password
            }))
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(response.status(), reqwest::StatusCode::CREATED);
        response.json().await.expect("Failed to parse response")
    }

    /// Log a user in and return the issued bearer token
    pub async fn login_user(&self, identifier: &str, password: &str) -> String {
        let response = self
            .post("/api/login")
            .json(&serde_json::json!({
                "identifier": identifier,
                "password": password
            }))
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(response.status(), reqwest::StatusCode::OK);
        let body: serde_json::Value = response.json().await.expect("Failed to parse response");
        body["data"]["token"]
            .as_str()
            .expect("Missing token in login response")
            .to_string()
    }
}
