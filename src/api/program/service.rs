use chrono::Utc;
use serde_json::Value;
use tracing::debug;

use crate::api::error::ServiceError;
use crate::store::{self, collections, Document, DocumentStore, SharedStore};

use super::models::Program;

/// Program persistence. Program names must be unique: they are the keys
/// course/faculty/student imports resolve against.
#[derive(Clone)]
pub struct ProgramService {
    store: SharedStore,
}

impl ProgramService {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    pub async fn add_program(&self, program: &Program) -> Result<String, ServiceError> {
        let existing = self
            .store
            .find_one(collections::PROGRAMS, "program_name", &program.program_name)
            .await?;
        if existing.is_some() {
            return Err(ServiceError::Conflict(
                "Program name already exists".to_string(),
            ));
        }

        let mut doc = store::to_document(program)?;
        store::stamp_created(&mut doc);
        let id = self.store.insert_one(collections::PROGRAMS, doc).await?;
        debug!("Program {} created with id={}", program.program_name, id);
        Ok(id)
    }

    pub async fn list_programs(&self) -> Result<Vec<Document>, ServiceError> {
        Ok(self.store.find(collections::PROGRAMS).await?)
    }

    /// Soft delete: flips status and stamps `deleted_at`. Returns matched
    /// count so handlers can distinguish a missing id.
    pub async fn delete_program(&self, program_id: &str) -> Result<u64, ServiceError> {
        let mut changes = Document::new();
        changes.insert("status".to_string(), Value::String("Deleted".to_string()));
        changes.insert(
            "deleted_at".to_string(),
            Value::String(Utc::now().to_rfc3339()),
        );
        store::stamp_updated(&mut changes);
        Ok(self
            .store
            .update_one(collections::PROGRAMS, program_id, changes)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::RecordStatus;
    use crate::store::memory::MemoryStore;
    use std::sync::Arc;

    fn service() -> (Arc<MemoryStore>, ProgramService) {
        let store = Arc::new(MemoryStore::new());
        (store.clone(), ProgramService::new(store))
    }

    fn program(name: &str) -> Program {
        Program {
            program_name: name.to_string(),
            status: RecordStatus::Active,
        }
    }

    #[tokio::test]
    async fn duplicate_program_names_conflict() {
        let (_, service) = service();
        service.add_program(&program("CS")).await.unwrap();

        let result = service.add_program(&program("CS")).await;
        assert!(matches!(result, Err(ServiceError::Conflict(_))));
        assert_eq!(service.list_programs().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn delete_is_a_soft_status_flip() {
        let (store, service) = service();
        let id = service.add_program(&program("EE")).await.unwrap();

        assert_eq!(service.delete_program(&id).await.unwrap(), 1);
        assert_eq!(service.delete_program("missing").await.unwrap(), 0);

        let doc = store
            .find_one(collections::PROGRAMS, "_id", &id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            doc.get("status").and_then(Value::as_str),
            Some("Deleted")
        );
        assert!(doc.contains_key("deleted_at"));
    }
}
