use serde::Serialize;
use utoipa::ToSchema;

/// Minimal acknowledgement payload for update and delete operations.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    /// Human readable confirmation.
    pub message: String,
}

impl MessageResponse {
    /// Build an acknowledgement from any displayable message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
