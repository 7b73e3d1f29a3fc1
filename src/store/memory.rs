use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use super::{Document, DocumentStore, StoreError};

/// In-memory store backing the unit tests. `poison` makes every subsequent
/// insert into the named collection fail, to exercise write-failure paths.
#[derive(Default)]
pub struct MemoryStore {
    collections: Mutex<HashMap<String, Vec<Document>>>,
    poisoned: Mutex<HashSet<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn poison(&self, collection: &str) {
        self.poisoned.lock().unwrap().insert(collection.to_string());
    }

    pub fn count(&self, collection: &str) -> usize {
        self.collections
            .lock()
            .unwrap()
            .get(collection)
            .map(Vec::len)
            .unwrap_or(0)
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find_one(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Option<Document>, StoreError> {
        let collections = self.collections.lock().unwrap();
        let docs = collections.get(collection);
        Ok(docs.and_then(|docs| {
            docs.iter()
                .find(|doc| doc.get(field).and_then(Value::as_str) == Some(value))
                .cloned()
        }))
    }

    async fn find(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.lock().unwrap();
        Ok(collections.get(collection).cloned().unwrap_or_default())
    }

    async fn insert_one(&self, collection: &str, mut doc: Document) -> Result<String, StoreError> {
        if self.poisoned.lock().unwrap().contains(collection) {
            return Err(StoreError::Failed(format!(
                "insert into {} rejected",
                collection
            )));
        }

        let id = Uuid::new_v4().simple().to_string();
        doc.insert("_id".to_string(), Value::String(id.clone()));
        self.collections
            .lock()
            .unwrap()
            .entry(collection.to_string())
            .or_default()
            .push(doc);
        Ok(id)
    }

    async fn update_one(
        &self,
        collection: &str,
        id: &str,
        changes: Document,
    ) -> Result<u64, StoreError> {
        let mut collections = self.collections.lock().unwrap();
        let Some(docs) = collections.get_mut(collection) else {
            return Ok(0);
        };
        for doc in docs.iter_mut() {
            if doc.get("_id").and_then(Value::as_str) == Some(id) {
                for (key, value) in changes {
                    doc.insert(key, value);
                }
                return Ok(1);
            }
        }
        Ok(0)
    }

    async fn delete_one(&self, collection: &str, id: &str) -> Result<u64, StoreError> {
        let mut collections = self.collections.lock().unwrap();
        let Some(docs) = collections.get_mut(collection) else {
            return Ok(0);
        };
        let before = docs.len();
        docs.retain(|doc| doc.get("_id").and_then(Value::as_str) != Some(id));
        Ok((before - docs.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(pairs: &[(&str, &str)]) -> Document {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), json!(v)))
            .collect()
    }

    #[tokio::test]
    async fn insert_and_find_one_by_field() {
        let store = MemoryStore::new();
        let id = store
            .insert_one("programs", doc(&[("program_name", "CS")]))
            .await
            .unwrap();

        let found = store
            .find_one("programs", "program_name", "CS")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.get("_id").and_then(Value::as_str), Some(id.as_str()));
        assert!(store
            .find_one("programs", "program_name", "EE")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn update_merges_and_delete_removes() {
        let store = MemoryStore::new();
        let id = store
            .insert_one("courses", doc(&[("course_code", "CS101")]))
            .await
            .unwrap();

        let matched = store
            .update_one("courses", &id, doc(&[("status", "Deleted")]))
            .await
            .unwrap();
        assert_eq!(matched, 1);
        let updated = store
            .find_one("courses", "_id", &id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.get("status"), Some(&json!("Deleted")));

        assert_eq!(store.delete_one("courses", &id).await.unwrap(), 1);
        assert_eq!(store.count("courses"), 0);
    }

    #[tokio::test]
    async fn poisoned_collection_rejects_inserts() {
        let store = MemoryStore::new();
        store.poison("faculties");
        let result = store
            .insert_one("faculties", doc(&[("email", "a@b.c")]))
            .await;
        assert!(result.is_err());
        assert_eq!(store.count("faculties"), 0);
    }
}
