use crate::error::ApiError;
use crate::history::ConversationStore;
use crate::models::Message;
use axum::{
    extract::{ rejection::QueryRejection, Query, State },
    routing::get,
    Json,
    Router,
};
use log::{ debug, error };
use std::sync::Arc;

const MISSING_PARAMS: &str = "Both sender and receiver parameters are required";
const FETCH_FAILED: &str = "Error fetching messages from Redis";

/// Parameters of a list request. Only the first occurrence of each key counts.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub sender: Option<String>,
    pub receiver: Option<String>,
}

impl ListQuery {
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut query = ListQuery::default();
        for (key, value) in pairs {
            match key.as_str() {
                "sender" if query.sender.is_none() => query.sender = Some(value),
                "receiver" if query.receiver.is_none() => query.receiver = Some(value),
                _ => {}
            }
        }
        query
    }
}

#[derive(Clone)]
struct ReportingState {
    store: Arc<dyn ConversationStore>,
}

/// `GET /message/list?sender=..&receiver=..`: read one conversation back.
pub fn router(store: Arc<dyn ConversationStore>) -> Router {
    Router::new()
        .route("/message/list", get(list_messages_handler))
        .with_state(ReportingState { store })
}

async fn list_messages_handler(
    State(state): State<ReportingState>,
    pairs: Result<Query<Vec<(String, String)>>, QueryRejection>
) -> Result<Json<Vec<Message>>, ApiError> {
    let Query(pairs) = pairs.map_err(|e| {
        debug!("Rejected list query: {}", e);
        ApiError::BadRequest(MISSING_PARAMS.into())
    })?;
    let query = ListQuery::from_pairs(pairs);

    let sender = query.sender.filter(|s| !s.is_empty());
    let receiver = query.receiver.filter(|r| !r.is_empty());
    let (sender, receiver) = match (sender, receiver) {
        (Some(s), Some(r)) => (s, r),
        _ => {
            return Err(ApiError::BadRequest(MISSING_PARAMS.into()));
        }
    };

    // Most recent first, as stored.
    let messages = state.store.get_messages(&sender, &receiver).await.map_err(|e| {
        error!("Failed to read conversation {} -> {}: {}", sender, receiver, e);
        ApiError::Internal(FETCH_FAILED.into())
    })?;

    Ok(Json(messages))
}
