use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;

#[cfg(test)]
pub mod memory;
pub mod postgres;

pub use postgres::PgStore;

/// A stored record: a JSON object carrying an `_id` field once persisted.
pub type Document = serde_json::Map<String, Value>;

/// Shared handle handed to services and importers.
pub type SharedStore = Arc<dyn DocumentStore>;

/// Collection names used across the service.
pub mod collections {
    pub const PROGRAMS: &str = "programs";
    pub const COURSES: &str = "courses";
    pub const BATCHES: &str = "batches";
    pub const FACULTIES: &str = "faculties";
    pub const STUDENTS: &str = "students";
    pub const USERS: &str = "users";
}

#[derive(Debug)]
pub enum StoreError {
    Database(sqlx::Error),
    Serialization(serde_json::Error),
    Failed(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Database(e) => write!(f, "database error: {}", e),
            StoreError::Serialization(e) => write!(f, "serialization error: {}", e),
            StoreError::Failed(msg) => f.write_str(msg),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        StoreError::Database(e)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialization(e)
    }
}

/// Async CRUD surface over an opaque document store, keyed by collection
/// name. `delete_one` exists for the compensating delete in the two-phase
/// faculty/student writers.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// First document in `collection` whose `field` equals `value`.
    async fn find_one(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Option<Document>, StoreError>;

    /// All documents in `collection`, oldest first.
    async fn find(&self, collection: &str) -> Result<Vec<Document>, StoreError>;

    /// Inserts `doc` and returns the generated id (also written into `_id`).
    async fn insert_one(&self, collection: &str, doc: Document) -> Result<String, StoreError>;

    /// Merges `changes` into the document with `id`; returns matched count.
    async fn update_one(
        &self,
        collection: &str,
        id: &str,
        changes: Document,
    ) -> Result<u64, StoreError>;

    /// Removes the document with `id`; returns removed count.
    async fn delete_one(&self, collection: &str, id: &str) -> Result<u64, StoreError>;
}

/// Serializes a record into a document.
pub fn to_document<T: serde::Serialize>(record: &T) -> Result<Document, StoreError> {
    match serde_json::to_value(record)? {
        Value::Object(map) => Ok(map),
        _ => Err(StoreError::Failed(
            "record did not serialize to an object".to_string(),
        )),
    }
}

/// Stamps `created_at`/`updated_at` on a document about to be inserted.
pub fn stamp_created(doc: &mut Document) {
    let now = Value::String(Utc::now().to_rfc3339());
    doc.insert("created_at".to_string(), now.clone());
    doc.insert("updated_at".to_string(), now);
}

/// Refreshes `updated_at` on a change set.
pub fn stamp_updated(doc: &mut Document) {
    doc.insert(
        "updated_at".to_string(),
        Value::String(Utc::now().to_rfc3339()),
    );
}
