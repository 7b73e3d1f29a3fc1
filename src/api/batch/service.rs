use chrono::Utc;
use serde_json::Value;
use tracing::debug;

use crate::api::error::ServiceError;
use crate::store::{self, collections, Document, DocumentStore, SharedStore};

use super::models::Batch;

/// Batch persistence. Batch names must be unique: student imports resolve
/// against them.
#[derive(Clone)]
pub struct BatchService {
    store: SharedStore,
}

impl BatchService {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    pub(crate) fn store(&self) -> &dyn DocumentStore {
        self.store.as_ref()
    }

    pub async fn add_batch(&self, batch: &Batch) -> Result<String, ServiceError> {
        let existing = self
            .store
            .find_one(collections::BATCHES, "batch_name", &batch.batch_name)
            .await?;
        if existing.is_some() {
            return Err(ServiceError::Conflict(
                "Batch name already exists".to_string(),
            ));
        }

        let mut doc = store::to_document(batch)?;
        store::stamp_created(&mut doc);
        let id = self.store.insert_one(collections::BATCHES, doc).await?;
        debug!("Batch {} created with id={}", batch.batch_name, id);
        Ok(id)
    }

    pub async fn list_batches(&self) -> Result<Vec<Document>, ServiceError> {
        Ok(self.store.find(collections::BATCHES).await?)
    }

    /// Soft delete; returns matched count.
    pub async fn delete_batch(&self, batch_id: &str) -> Result<u64, ServiceError> {
        let mut changes = Document::new();
        changes.insert("status".to_string(), Value::String("Deleted".to_string()));
        changes.insert(
            "deleted_at".to_string(),
            Value::String(Utc::now().to_rfc3339()),
        );
        store::stamp_updated(&mut changes);
        Ok(self
            .store
            .update_one(collections::BATCHES, batch_id, changes)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::RecordStatus;
    use crate::store::memory::MemoryStore;
    use std::sync::Arc;

    fn batch(name: &str) -> Batch {
        Batch {
            batch_name: name.to_string(),
            faculty_in_charge: None,
            program_id: None,
            semester: Some(1),
            start_date: Some("2026-08-01".to_string()),
            end_date: None,
            status: RecordStatus::Active,
        }
    }

    #[tokio::test]
    async fn duplicate_batch_names_conflict() {
        let service = BatchService::new(Arc::new(MemoryStore::new()));
        service.add_batch(&batch("2026-CS-A")).await.unwrap();

        let result = service.add_batch(&batch("2026-CS-A")).await;
        assert!(matches!(result, Err(ServiceError::Conflict(_))));
        assert_eq!(service.list_batches().await.unwrap().len(), 1);
    }
}
