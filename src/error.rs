use axum::{ http::StatusCode, response::{ IntoResponse, Response }, Json };
use serde_json::json;
use thiserror::Error;

/// Failures raised by a [`MessageQueue`](crate::queue::MessageQueue).
#[derive(Error, Debug)]
pub enum QueueError {
    #[error("AMQP error: {0}")]
    Amqp(#[from] lapin::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Queue '{0}' is closed")]
    Closed(String),

    #[error("Queue '{0}' already has a consumer")]
    AlreadyConsumed(String),
}

/// Failures raised by a [`ConversationStore`](crate::history::ConversationStore).
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Why a single delivery was dropped by the processor.
#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("Error decoding message: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("Error saving message to Redis: {0}")]
    Store(#[from] StoreError),
}

/// Error returned to HTTP callers as `{"error": "..."}`.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
