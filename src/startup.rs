use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use std::sync::Arc;

use crate::{
    config::{Backend, DatabaseConfig},
    handlers::{diagnostics, rest},
    repository::{MemoryStore, MongoStore, NoteStore, StoreError},
    service::NoteService,
};

pub async fn build_store(config: &DatabaseConfig) -> Result<Arc<dyn NoteStore>, StoreError> {
    match config.backend {
        Backend::Mongo => Ok(Arc::new(MongoStore::connect(config).await?)),
        Backend::Memory => {
            tracing::warn!("Using the in-memory store, notes will not survive a restart");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

/// Provisions the database and collection. A failure is logged and the
/// service keeps starting; requests then fail one by one against the
/// missing collection.
pub async fn init_database(service: &NoteService) -> bool {
    match service.provision().await {
        Ok(()) => {
            tracing::info!("Database and collection initialized successfully");
            true
        }
        Err(e) => {
            tracing::error!("Failed to initialize database: {e}");
            false
        }
    }
}

pub fn router(service: Arc<NoteService>, swagger: bool) -> Router {
    let api = Router::new()
        .route(
            rest::NOTES_PATH,
            get(rest::get_all_notes).post(rest::create_note),
        )
        .route(
            rest::NOTE_PATH,
            get(rest::get_one_note)
                .put(rest::update_note)
                .delete(rest::delete_note),
        )
        .route("/cosmos", get(diagnostics::cosmos_hello))
        .route(
            "/cosmos/add-test-record",
            post(diagnostics::add_test_record),
        );

    let mut router = Router::new()
        .route("/helloworld", get(diagnostics::hello_world))
        .nest(rest::API_PREFIX, api)
        .with_state(service);

    if swagger {
        router = router.merge(
            SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", rest::ApiDoc::openapi()),
        );
    }

    router.layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Note, TestRecord};
    use crate::repository::StoreResult;

    use async_trait::async_trait;

    struct Unreachable;

    fn unreachable() -> StoreError {
        StoreError::Database {
            code: None,
            message: "server selection timeout".to_string(),
        }
    }

    #[async_trait]
    impl NoteStore for Unreachable {
        async fn provision(&self) -> Result<(), StoreError> {
            Err(unreachable())
        }
        async fn list_notes(&self) -> StoreResult<Vec<Note>> {
            Err(unreachable())
        }
        async fn get_note(&self, _id: &str) -> StoreResult<Note> {
            Err(unreachable())
        }
        async fn create_note(&self, _note: Note) -> StoreResult<Note> {
            Err(unreachable())
        }
        async fn replace_note(&self, _note: Note) -> StoreResult<Note> {
            Err(unreachable())
        }
        async fn delete_note(&self, _id: &str) -> StoreResult<()> {
            Err(unreachable())
        }
        async fn create_test_record(&self, _record: TestRecord) -> StoreResult<TestRecord> {
            Err(unreachable())
        }
    }

    #[tokio::test]
    async fn provisioning_failure_is_not_fatal() {
        let service = NoteService::new(Arc::new(Unreachable));
        assert!(!init_database(&service).await);

        // The router still builds and serves.
        let _router = router(Arc::new(service), false);
    }

    #[tokio::test]
    async fn memory_backend_provisions() {
        let config = DatabaseConfig {
            backend: Backend::Memory,
            ..DatabaseConfig::default()
        };
        let store = build_store(&config).await.unwrap();
        let service = NoteService::new(store);

        assert!(init_database(&service).await);
    }
}
