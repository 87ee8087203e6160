#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use notes_service::{
    models::{Note, TestRecord},
    repository::{MemoryStore, NoteStore, StoreError, StoreResult},
    service::NoteService,
    startup,
};
use serde_json::Value;
use tower::ServiceExt;

use std::sync::Arc;

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
}

impl TestApp {
    pub fn spawn() -> Self {
        let store = Arc::new(MemoryStore::new());
        let service = Arc::new(NoteService::new(store.clone()));

        Self {
            router: startup::router(service, false),
            store,
        }
    }

    pub async fn request(&self, method: &str, uri: &str, body: Option<Value>) -> TestResponse {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        send(self.router.clone(), request).await
    }

    pub async fn create(&self, title: &str, content: &str) -> Value {
        let response = self
            .request(
                "POST",
                "/api/note",
                Some(serde_json::json!({ "title": title, "content": content })),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED);
        response.body["note"].clone()
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    pub body: Value,
}

pub async fn send(router: Router, request: Request<Body>) -> TestResponse {
    let response = router.oneshot(request).await.unwrap();

    let status = response.status();
    let location = response
        .headers()
        .get(header::LOCATION)
        .map(|v| v.to_str().unwrap().to_string());
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    TestResponse {
        status,
        location,
        body,
    }
}

/// Store that fails every call the way a throttled database would.
pub struct ThrottledStore;

fn throttled() -> StoreError {
    StoreError::Database {
        code: Some(16500),
        message: "Request rate is large".to_string(),
    }
}

#[async_trait]
impl NoteStore for ThrottledStore {
    async fn provision(&self) -> Result<(), StoreError> {
        Err(throttled())
    }
    async fn list_notes(&self) -> StoreResult<Vec<Note>> {
        Err(throttled())
    }
    async fn get_note(&self, _id: &str) -> StoreResult<Note> {
        Err(throttled())
    }
    async fn create_note(&self, _note: Note) -> StoreResult<Note> {
        Err(throttled())
    }
    async fn replace_note(&self, _note: Note) -> StoreResult<Note> {
        Err(throttled())
    }
    async fn delete_note(&self, _id: &str) -> StoreResult<()> {
        Err(throttled())
    }
    async fn create_test_record(&self, _record: TestRecord) -> StoreResult<TestRecord> {
        Err(StoreError::Unexpected("connection reset".to_string()))
    }
}

pub fn throttled_router() -> Router {
    startup::router(Arc::new(NoteService::new(Arc::new(ThrottledStore))), false)
}
