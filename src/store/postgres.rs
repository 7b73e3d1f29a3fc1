use serde_json::Value;
use sqlx::{Pool, Postgres, Row};
use tracing::debug;
use uuid::Uuid;

use async_trait::async_trait;

use super::{Document, DocumentStore, StoreError};

/// Document store over the `documents` JSONB table, one logical collection
/// per `collection` value.
pub struct PgStore {
    pool: Pool<Postgres>,
}

impl PgStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

fn as_object(value: Value) -> Result<Document, StoreError> {
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(StoreError::Failed(
            "stored document is not a JSON object".to_string(),
        )),
    }
}

#[async_trait]
impl DocumentStore for PgStore {
    async fn find_one(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Option<Document>, StoreError> {
        let row = sqlx::query(
            "SELECT doc FROM documents WHERE collection = $1 AND doc->>$2 = $3 LIMIT 1",
        )
        .bind(collection)
        .bind(field)
        .bind(value)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let doc: Value = row.try_get("doc")?;
                Ok(Some(as_object(doc)?))
            }
            None => Ok(None),
        }
    }

    async fn find(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        let rows = sqlx::query(
            "SELECT doc FROM documents WHERE collection = $1 ORDER BY created_at, id",
        )
        .bind(collection)
        .fetch_all(&self.pool)
        .await?;

        let mut docs = Vec::with_capacity(rows.len());
        for row in rows {
            let doc: Value = row.try_get("doc")?;
            docs.push(as_object(doc)?);
        }
        Ok(docs)
    }

    async fn insert_one(&self, collection: &str, mut doc: Document) -> Result<String, StoreError> {
        let id = Uuid::new_v4().simple().to_string();
        doc.insert("_id".to_string(), Value::String(id.clone()));

        sqlx::query("INSERT INTO documents (id, collection, doc) VALUES ($1, $2, $3)")
            .bind(&id)
            .bind(collection)
            .bind(Value::Object(doc))
            .execute(&self.pool)
            .await?;

        debug!("Inserted document {} into {}", id, collection);
        Ok(id)
    }

    async fn update_one(
        &self,
        collection: &str,
        id: &str,
        changes: Document,
    ) -> Result<u64, StoreError> {
        let result = sqlx::query(
            "UPDATE documents SET doc = doc || $3, updated_at = now() \
             WHERE collection = $1 AND id = $2",
        )
        .bind(collection)
        .bind(id)
        .bind(Value::Object(changes))
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn delete_one(&self, collection: &str, id: &str) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
