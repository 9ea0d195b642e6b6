use axum::body::{ to_bytes, Body };
use axum::http::{ Request, StatusCode };
use axum::Router;
use chat_pipeline::history::{ ConversationStore, MemoryConversationStore };
use chat_pipeline::processor::Processor;
use chat_pipeline::queue::{ MemoryQueue, MessageQueue, DEFAULT_QUEUE_NAME };
use chat_pipeline::server::{ ingest, reporting };
use serde_json::{ json, Value };
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

struct Pipeline {
    queue: Arc<MemoryQueue>,
    store: Arc<MemoryConversationStore>,
    ingest: Router,
    reporting: Router,
    shutdown: CancellationToken,
    consumer: JoinHandle<()>,
}

impl Pipeline {
    async fn start() -> Self {
        let queue = Arc::new(MemoryQueue::new(DEFAULT_QUEUE_NAME));
        let store = Arc::new(MemoryConversationStore::new());
        let shutdown = CancellationToken::new();
        let consumer = Processor::new(queue.clone(), store.clone())
            .start(shutdown.clone()).await
            .unwrap();

        Self {
            ingest: ingest::router(queue.clone()),
            reporting: reporting::router(store.clone()),
            queue,
            store,
            shutdown,
            consumer,
        }
    }

    async fn post(&self, body: &str) -> StatusCode {
        let response = self.ingest
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/message")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap()
            ).await
            .unwrap();
        response.status()
    }

    async fn list(&self, sender: &str, receiver: &str) -> (StatusCode, Value) {
        let uri = format!("/message/list?sender={}&receiver={}", sender, receiver);
        let response = self.reporting
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap()).await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    /// Closes the queue and waits for the processor to drain what is left.
    async fn drain(self) -> Drained {
        self.queue.close().await.unwrap();
        tokio::time::timeout(Duration::from_secs(5), self.consumer).await.unwrap().unwrap();
        Drained {
            store: self.store,
            reporting: self.reporting,
        }
    }
}

struct Drained {
    store: Arc<MemoryConversationStore>,
    reporting: Router,
}

impl Drained {
    async fn list(&self, sender: &str, receiver: &str) -> Value {
        let uri = format!("/message/list?sender={}&receiver={}", sender, receiver);
        let response = self.reporting
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap()).await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }
}

#[tokio::test]
async fn posted_message_becomes_retrievable() {
    let pipeline = Pipeline::start().await;

    let status = pipeline.post(r#"{"sender":"alice","receiver":"bob","message":"hi"}"#).await;
    assert_eq!(status, StatusCode::OK);

    let expected = json!([{ "sender": "alice", "receiver": "bob", "message": "hi" }]);
    let mut found = false;
    for _ in 0..100 {
        let (status, body) = pipeline.list("alice", "bob").await;
        assert_eq!(status, StatusCode::OK);
        if body == expected {
            found = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert!(found, "message never reached the reporting API");

    pipeline.shutdown.cancel();
}

#[tokio::test]
async fn reverse_direction_is_not_mixed_in() {
    let pipeline = Pipeline::start().await;
    pipeline.post(r#"{"sender":"alice","receiver":"bob","message":"hi"}"#).await;
    pipeline.post(r#"{"sender":"bob","receiver":"alice","message":"hey"}"#).await;

    let drained = pipeline.drain().await;

    assert_eq!(
        drained.list("alice", "bob").await,
        json!([{ "sender": "alice", "receiver": "bob", "message": "hi" }])
    );
    assert_eq!(
        drained.list("bob", "alice").await,
        json!([{ "sender": "bob", "receiver": "alice", "message": "hey" }])
    );
}

#[tokio::test]
async fn back_to_back_messages_are_listed_most_recent_first() {
    let pipeline = Pipeline::start().await;
    pipeline.post(r#"{"sender":"alice","receiver":"bob","message":"first"}"#).await;
    pipeline.post(r#"{"sender":"alice","receiver":"bob","message":"second"}"#).await;

    let drained = pipeline.drain().await;

    assert_eq!(
        drained.list("alice", "bob").await,
        json!([
            { "sender": "alice", "receiver": "bob", "message": "second" },
            { "sender": "alice", "receiver": "bob", "message": "first" }
        ])
    );
}

#[tokio::test]
async fn malformed_post_enqueues_nothing() {
    let pipeline = Pipeline::start().await;

    assert_eq!(pipeline.post("{not json").await, StatusCode::BAD_REQUEST);
    assert_eq!(pipeline.queue.published_count(), 0);

    let drained = pipeline.drain().await;
    assert_eq!(drained.list("alice", "bob").await, json!([]));
}

#[tokio::test]
async fn undecodable_delivery_is_dropped_silently() {
    let pipeline = Pipeline::start().await;
    pipeline.queue.publish_body(br#"{"sender":"alice","receiver":"bob"}"#.to_vec()).await.unwrap();
    pipeline.queue.publish_body(b"\xff\xfe".to_vec()).await.unwrap();
    pipeline.post(r#"{"sender":"alice","receiver":"bob","message":"ok"}"#).await;

    let drained = pipeline.drain().await;

    assert_eq!(
        drained.list("alice", "bob").await,
        json!([{ "sender": "alice", "receiver": "bob", "message": "ok" }])
    );
    assert_eq!(drained.store.entries("alice_bob").await.unwrap().len(), 1);
}

#[tokio::test]
async fn unknown_conversation_and_missing_params() {
    let pipeline = Pipeline::start().await;

    let (status, body) = pipeline.list("nobody", "nowhere").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
    let reads = pipeline.store.read_count();

    let response = pipeline.reporting
        .clone()
        .oneshot(Request::builder().uri("/message/list?sender=alice").body(Body::empty()).unwrap()).await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(pipeline.store.read_count(), reads);

    pipeline.shutdown.cancel();
    tokio::time::timeout(Duration::from_secs(5), pipeline.consumer).await.unwrap().unwrap();
}
