mod memory;
mod mongo;

pub use memory::MemoryStore;
pub use mongo::MongoStore;

use async_trait::async_trait;

use crate::models::{Note, TestRecord};

/// Result of a single database operation together with its reported cost.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreResponse<T> {
    pub resource: T,
    pub request_charge: Option<f64>,
}

impl<T> StoreResponse<T> {
    pub const fn new(resource: T, request_charge: Option<f64>) -> Self {
        Self {
            resource,
            request_charge,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> StoreResponse<U> {
        StoreResponse {
            resource: f(self.resource),
            request_charge: self.request_charge,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("document not found")]
    NotFound,

    /// An error reported by the database itself, with its own code when it sent one.
    #[error("{message}")]
    Database { code: Option<i32>, message: String },

    #[error("{0}")]
    Unexpected(String),
}

pub type StoreResult<T> = Result<StoreResponse<T>, StoreError>;

/// Handle to the one database/collection pair the service works against.
///
/// Every point operation addresses a document by its id, which is also its
/// partition key.
#[async_trait]
pub trait NoteStore: Send + Sync {
    /// Creates the database and collection when they are missing.
    async fn provision(&self) -> Result<(), StoreError>;

    /// Reads every note in the collection, draining all result batches.
    async fn list_notes(&self) -> StoreResult<Vec<Note>>;

    async fn get_note(&self, id: &str) -> StoreResult<Note>;

    async fn create_note(&self, note: Note) -> StoreResult<Note>;

    /// Replaces the whole document stored under `note.id`.
    async fn replace_note(&self, note: Note) -> StoreResult<Note>;

    async fn delete_note(&self, id: &str) -> StoreResult<()>;

    async fn create_test_record(&self, record: TestRecord) -> StoreResult<TestRecord>;
}
