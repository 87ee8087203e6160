use crate::{
    dto::{NoteRequest, NoteResponse, TestRecordResponse},
    models::{Note, TestRecord},
    repository::{NoteStore, StoreError, StoreResponse},
};

use std::sync::Arc;

pub type ServiceResult<T> = Result<StoreResponse<T>, ServiceError>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(&'static str),

    #[error("Note with ID {0} not found")]
    NotFound(String),

    #[error("{message}")]
    Database { code: Option<i32>, message: String },

    #[error("{0}")]
    Unexpected(String),
}

impl ServiceError {
    /// Attaches the note id a store failure refers to.
    fn from_store(err: StoreError, id: &str) -> Self {
        match err {
            StoreError::NotFound => Self::NotFound(id.to_string()),
            other => other.into(),
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            // Only point lookups can miss, and those go through `from_store`.
            StoreError::NotFound => Self::Unexpected("document not found".to_string()),
            StoreError::Database { code, message } => Self::Database { code, message },
            StoreError::Unexpected(message) => Self::Unexpected(message),
        }
    }
}

#[derive(Clone)]
pub struct NoteService {
    store: Arc<dyn NoteStore>,
}

impl NoteService {
    pub fn new(store: Arc<dyn NoteStore>) -> Self {
        Self { store }
    }

    /// Ensures the database and collection exist. Failure is reported to the
    /// caller, which decides whether to keep serving.
    pub async fn provision(&self) -> Result<(), ServiceError> {
        self.store.provision().await.map_err(Into::into)
    }

    pub async fn list_notes(&self) -> ServiceResult<Vec<NoteResponse>> {
        let notes = self.store.list_notes().await?;
        Ok(notes.map(|notes| notes.into_iter().map(NoteResponse::from).collect()))
    }

    pub async fn get_note(&self, id: &str) -> ServiceResult<NoteResponse> {
        self.store
            .get_note(id)
            .await
            .map(|response| response.map(NoteResponse::from))
            .map_err(|e| ServiceError::from_store(e, id))
    }

    pub async fn create_note(&self, request: Option<NoteRequest>) -> ServiceResult<NoteResponse> {
        let request = validate(request)?;

        // Identifier and timestamp are always generated here, whatever the client sent.
        let note = Note::new(request.title, request.content.unwrap_or_default());
        let id = note.id.clone();

        self.store
            .create_note(note)
            .await
            .map(|response| response.map(NoteResponse::from))
            .map_err(|e| ServiceError::from_store(e, &id))
    }

    /// Read-modify-write of title and content. There is no version check, so
    /// concurrent updates of the same note are last-writer-wins.
    pub async fn update_note(
        &self,
        id: &str,
        request: Option<NoteRequest>,
    ) -> ServiceResult<NoteResponse> {
        let request = validate(request)?;

        let mut note = self
            .store
            .get_note(id)
            .await
            .map_err(|e| ServiceError::from_store(e, id))?
            .resource;

        note.title = request.title;
        note.content = request.content.unwrap_or_default();

        self.store
            .replace_note(note)
            .await
            .map(|response| response.map(NoteResponse::from))
            .map_err(|e| ServiceError::from_store(e, id))
    }

    pub async fn delete_note(&self, id: &str) -> ServiceResult<()> {
        self.store
            .delete_note(id)
            .await
            .map_err(|e| ServiceError::from_store(e, id))
    }

    pub async fn add_test_record(&self) -> ServiceResult<TestRecordResponse> {
        let record = TestRecord::new(
            "Test Record".to_string(),
            "Diagnostic record written to verify database connectivity".to_string(),
        );

        let response = self.store.create_test_record(record).await?;
        Ok(response.map(TestRecordResponse::from))
    }
}

fn validate(request: Option<NoteRequest>) -> Result<NoteRequest, ServiceError> {
    let request = request.ok_or(ServiceError::Validation("Note data is required"))?;

    if request.title.trim().is_empty() {
        return Err(ServiceError::Validation("Note title is required"));
    }

    Ok(request)
}
