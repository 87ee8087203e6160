use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A note as stored in the collection.
///
/// `_id` doubles as the partition key, so every point lookup addresses the
/// document by the same value twice over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

impl Note {
    pub fn new(title: String, content: String) -> Self {
        Self {
            id: new_id(),
            title,
            content,
            created_at: now(),
        }
    }
}

/// Disposable document written by the diagnostics endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub timestamp: DateTime<Utc>,
}

impl TestRecord {
    pub fn new(name: String, description: String) -> Self {
        Self {
            id: new_id(),
            name,
            description,
            timestamp: now(),
        }
    }
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

// BSON dates hold milliseconds; truncating up front keeps the value returned
// on create identical to what a later read yields.
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}
