use async_trait::async_trait;
use tokio::sync::RwLock;

use std::collections::HashMap;

use super::{NoteStore, StoreError, StoreResponse, StoreResult};
use crate::models::{Note, TestRecord};

/// In-process store for running without a database and for tests.
///
/// Reports no request charge.
#[derive(Debug, Default)]
pub struct MemoryStore {
    notes: RwLock<HashMap<String, Note>>,
    test_records: RwLock<HashMap<String, TestRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn test_record_count(&self) -> usize {
        self.test_records.read().await.len()
    }
}

fn respond<T>(resource: T) -> StoreResult<T> {
    Ok(StoreResponse::new(resource, None))
}

fn conflict(id: &str) -> StoreError {
    StoreError::Database {
        code: Some(409),
        message: format!("document with id {id} already exists"),
    }
}

#[async_trait]
impl NoteStore for MemoryStore {
    async fn provision(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn list_notes(&self) -> StoreResult<Vec<Note>> {
        respond(self.notes.read().await.values().cloned().collect())
    }

    async fn get_note(&self, id: &str) -> StoreResult<Note> {
        let notes = self.notes.read().await;
        notes.get(id).cloned().map_or(Err(StoreError::NotFound), respond)
    }

    async fn create_note(&self, note: Note) -> StoreResult<Note> {
        let mut notes = self.notes.write().await;
        if notes.contains_key(&note.id) {
            return Err(conflict(&note.id));
        }
        notes.insert(note.id.clone(), note.clone());
        respond(note)
    }

    async fn replace_note(&self, note: Note) -> StoreResult<Note> {
        let mut notes = self.notes.write().await;
        match notes.get_mut(&note.id) {
            Some(stored) => {
                *stored = note.clone();
                respond(note)
            }
            None => Err(StoreError::NotFound),
        }
    }

    async fn delete_note(&self, id: &str) -> StoreResult<()> {
        match self.notes.write().await.remove(id) {
            Some(_) => respond(()),
            None => Err(StoreError::NotFound),
        }
    }

    async fn create_test_record(&self, record: TestRecord) -> StoreResult<TestRecord> {
        let mut records = self.test_records.write().await;
        if records.contains_key(&record.id) {
            return Err(conflict(&record.id));
        }
        records.insert(record.id.clone(), record.clone());
        respond(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_then_get_returns_same_note() {
        let store = MemoryStore::new();
        let note = Note::new("title".to_string(), "content".to_string());

        store.create_note(note.clone()).await.unwrap();
        let fetched = store.get_note(&note.id).await.unwrap();

        assert_eq!(fetched.resource, note);
        assert_eq!(fetched.request_charge, None);
    }

    #[tokio::test]
    async fn duplicate_id_is_a_database_error() {
        let store = MemoryStore::new();
        let note = Note::new("title".to_string(), String::new());

        store.create_note(note.clone()).await.unwrap();
        let err = store.create_note(note).await.unwrap_err();

        assert!(matches!(err, StoreError::Database { code: Some(409), .. }));
    }

    #[tokio::test]
    async fn replace_and_delete_of_missing_note_are_not_found() {
        let store = MemoryStore::new();
        let note = Note::new("title".to_string(), String::new());

        assert!(matches!(
            store.replace_note(note.clone()).await,
            Err(StoreError::NotFound)
        ));
        assert!(matches!(
            store.delete_note(&note.id).await,
            Err(StoreError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_records_stay_out_of_note_listing() {
        let store = MemoryStore::new();
        store
            .create_test_record(TestRecord::new("n".to_string(), "d".to_string()))
            .await
            .unwrap();

        assert!(store.list_notes().await.unwrap().resource.is_empty());
        assert_eq!(store.test_record_count().await, 1);
    }
}
