use crate::error::ApiError;
use crate::models::Message;
use crate::queue::MessageQueue;
use crate::server::StatusResponse;
use axum::{ body::Bytes, extract::{ DefaultBodyLimit, State }, routing::post, Json, Router };
use log::{ debug, error };
use std::sync::Arc;

const PUBLISH_FAILED: &str = "Error publishing message";

#[derive(Clone)]
struct IngestState {
    queue: Arc<dyn MessageQueue>,
}

/// `POST /message`: decode a message and put it on the queue.
///
/// Message bodies have no size cap.
pub fn router(queue: Arc<dyn MessageQueue>) -> Router {
    Router::new()
        .route("/message", post(publish_message_handler))
        .layer(DefaultBodyLimit::disable())
        .with_state(IngestState { queue })
}

// The body is decoded by hand so that a missing or wrong Content-Type is
// not rejected and every decode failure becomes a 400.
async fn publish_message_handler(
    State(state): State<IngestState>,
    body: Bytes
) -> Result<Json<StatusResponse>, ApiError> {
    let message: Message = serde_json::from_slice(&body).map_err(|e| {
        debug!("Rejected message body: {}", e);
        ApiError::BadRequest(e.to_string())
    })?;

    if let Err(e) = state.queue.publish(&message).await {
        error!("Failed to publish message to '{}': {}", state.queue.name(), e);
        return Err(ApiError::BadRequest(PUBLISH_FAILED.into()));
    }
    debug!("Queued message {} -> {}", message.sender, message.receiver);

    Ok(Json(StatusResponse { status: "OK" }))
}
