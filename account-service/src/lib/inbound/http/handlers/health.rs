use axum::http::StatusCode;
use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use super::ApiSuccess;

pub async fn health() -> ApiSuccess<HealthData> {
    ApiSuccess::new(
        StatusCode::OK,
        "Server is running",
        HealthData {
            timestamp: Utc::now(),
        },
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthData {
    pub timestamp: DateTime<Utc>,
}
