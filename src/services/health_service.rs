use tracing::warn;

use crate::{dto::health::HealthResponse, state::SharedState};

/// Ping the store and report overall service health.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    if let Err(err) = state.store().health_check().await {
        warn!(error = %err, "storage health check failed");
        return HealthResponse::degraded();
    }
    HealthResponse::ok()
}
