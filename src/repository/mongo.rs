use async_trait::async_trait;
use mongodb::{
    Client, Collection, Database,
    bson::{Bson, doc},
    error::{ErrorKind, WriteFailure},
    options::ClientOptions,
};

use super::{NoteStore, StoreError, StoreResponse, StoreResult};
use crate::{
    config::DatabaseConfig,
    models::{Note, TestRecord},
};

const NAMESPACE_EXISTS: i32 = 48;

/// Store speaking the MongoDB wire protocol, as exposed by Azure Cosmos DB
/// for MongoDB or by a plain MongoDB server.
#[derive(Debug, Clone)]
pub struct MongoStore {
    database: Database,
    collection_name: String,
    shard_by_id: bool,
    report_request_charge: bool,
}

impl MongoStore {
    /// Builds the client. The driver connects lazily, so an unreachable server
    /// only surfaces on the first operation.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let uri = config
            .uri
            .as_deref()
            .ok_or_else(|| StoreError::Unexpected("database uri is not configured".to_string()))?;

        let mut options = ClientOptions::parse(uri).await?;
        options.app_name = Some(env!("CARGO_PKG_NAME").to_string());

        let client = Client::with_options(options)?;
        tracing::info!(
            database = %config.name,
            collection = %config.collection,
            "Created document database client"
        );

        Ok(Self {
            database: client.database(&config.name),
            collection_name: config.collection.clone(),
            shard_by_id: config.shard_by_id,
            report_request_charge: config.request_charge,
        })
    }

    pub const fn database(&self) -> &Database {
        &self.database
    }

    fn notes(&self) -> Collection<Note> {
        self.database.collection(&self.collection_name)
    }

    fn test_records(&self) -> Collection<TestRecord> {
        self.database.collection(&self.collection_name)
    }

    /// Cosmos DB reports the cost of the previous operation on request.
    ///
    /// Statistics are tracked per connection; with a pooled client the answer
    /// may belong to another request's operation, so the figure is indicative.
    async fn request_charge(&self) -> Option<f64> {
        if !self.report_request_charge {
            return None;
        }

        match self
            .database
            .run_command(doc! { "getLastRequestStatistics": 1 }, None)
            .await
        {
            Ok(stats) => match stats.get("RequestCharge") {
                Some(Bson::Double(charge)) => Some(*charge),
                Some(Bson::Int32(charge)) => Some(f64::from(*charge)),
                #[allow(clippy::cast_precision_loss)]
                Some(Bson::Int64(charge)) => Some(*charge as f64),
                _ => None,
            },
            Err(e) => {
                tracing::debug!("failed to read request statistics: {e}");
                None
            }
        }
    }

    async fn respond<T>(&self, resource: T) -> StoreResult<T> {
        Ok(StoreResponse::new(resource, self.request_charge().await))
    }
}

#[async_trait]
impl NoteStore for MongoStore {
    async fn provision(&self) -> Result<(), StoreError> {
        // The database itself comes into existence with its first collection.
        let result = if self.shard_by_id {
            self.database
                .run_command(
                    doc! {
                        "customAction": "CreateCollection",
                        "collection": self.collection_name.as_str(),
                        "shardKey": "_id",
                    },
                    None,
                )
                .await
                .map(|_| ())
        } else {
            self.database
                .create_collection(&self.collection_name, None)
                .await
        };

        match result {
            Ok(()) => {
                tracing::info!(
                    database = %self.database.name(),
                    collection = %self.collection_name,
                    "Created collection"
                );
                Ok(())
            }
            Err(e) if is_namespace_exists(&e) => {
                tracing::info!(
                    database = %self.database.name(),
                    collection = %self.collection_name,
                    "Collection already exists"
                );
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn list_notes(&self) -> StoreResult<Vec<Note>> {
        // Test records share the collection; only note-shaped documents are listed.
        let mut cursor = self
            .notes()
            .find(doc! { "title": { "$exists": true } }, None)
            .await?;

        let mut notes = Vec::new();
        while cursor.advance().await? {
            notes.push(cursor.deserialize_current()?);
        }

        self.respond(notes).await
    }

    async fn get_note(&self, id: &str) -> StoreResult<Note> {
        let note = self
            .notes()
            .find_one(doc! { "_id": id }, None)
            .await?
            .ok_or(StoreError::NotFound)?;

        self.respond(note).await
    }

    async fn create_note(&self, note: Note) -> StoreResult<Note> {
        self.notes().insert_one(&note, None).await?;

        self.respond(note).await
    }

    async fn replace_note(&self, note: Note) -> StoreResult<Note> {
        let result = self
            .notes()
            .replace_one(doc! { "_id": note.id.as_str() }, &note, None)
            .await?;

        if result.matched_count == 0 {
            return Err(StoreError::NotFound);
        }

        self.respond(note).await
    }

    async fn delete_note(&self, id: &str) -> StoreResult<()> {
        let result = self.notes().delete_one(doc! { "_id": id }, None).await?;

        if result.deleted_count == 0 {
            return Err(StoreError::NotFound);
        }

        self.respond(()).await
    }

    async fn create_test_record(&self, record: TestRecord) -> StoreResult<TestRecord> {
        self.test_records().insert_one(&record, None).await?;

        self.respond(record).await
    }
}

fn is_namespace_exists(e: &mongodb::error::Error) -> bool {
    matches!(e.kind.as_ref(), ErrorKind::Command(err) if err.code == NAMESPACE_EXISTS)
}

impl From<mongodb::error::Error> for StoreError {
    fn from(e: mongodb::error::Error) -> Self {
        match e.kind.as_ref() {
            ErrorKind::BsonDeserialization(_) | ErrorKind::BsonSerialization(_) => {
                Self::Unexpected(e.to_string())
            }
            ErrorKind::Command(err) => Self::Database {
                code: Some(err.code),
                message: err.message.clone(),
            },
            ErrorKind::Write(WriteFailure::WriteError(err)) => Self::Database {
                code: Some(err.code),
                message: err.message.clone(),
            },
            ErrorKind::Write(WriteFailure::WriteConcernError(err)) => Self::Database {
                code: Some(err.code),
                message: err.message.clone(),
            },
            _ => Self::Database {
                code: None,
                message: e.to_string(),
            },
        }
    }
}
