use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{Note, TestRecord};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NoteResponse {
    /// Note ID, also the partition key
    pub id: String,
    /// Note title
    pub title: String,
    /// Note content
    pub content: String,
    /// Creation time, UTC
    pub created_at: DateTime<Utc>,
}

impl From<Note> for NoteResponse {
    fn from(note: Note) -> Self {
        Self {
            id: note.id,
            title: note.title,
            content: note.content,
            created_at: note.created_at,
        }
    }
}

/// Body of both create and update requests.
///
/// Any `id` or `createdAt` sent by the client is ignored; the server owns both.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct NoteRequest {
    /// Note title, must not be blank
    #[serde(default)]
    pub title: String,
    /// Note content
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TestRecordResponse {
    pub id: String,
    pub name: String,
    pub description: String,
    pub timestamp: DateTime<Utc>,
}

impl From<TestRecord> for TestRecordResponse {
    fn from(record: TestRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            description: record.description,
            timestamp: record.timestamp,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NoteListEnvelope {
    pub success: bool,
    pub count: usize,
    pub notes: Vec<NoteResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NoteEnvelope {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub note: NoteResponse,
    /// Database-reported cost of the operation, when the backend reports one
    pub request_charge: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteEnvelope {
    pub success: bool,
    pub message: String,
    pub request_charge: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TestRecordEnvelope {
    pub success: bool,
    pub message: String,
    pub record: TestRecordResponse,
    pub request_charge: Option<f64>,
}

/// The single failure shape shared by every endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FailureEnvelope {
    pub success: bool,
    pub message: String,
    /// Status code reported by the database, present for database errors only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<i32>,
}

impl FailureEnvelope {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            status_code: None,
        }
    }

    #[must_use]
    pub fn with_status_code(mut self, status_code: Option<i32>) -> Self {
        self.status_code = status_code;
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}
