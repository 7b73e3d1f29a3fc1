use std::collections::HashMap;

use serde_json::Value;

use crate::api::error::ServiceError;
use crate::store::DocumentStore;

/// Maps display names to document ids, built fresh per import run by a full
/// read of the referenced collection. Lookup is exact and case-sensitive.
pub struct NameIndex {
    ids: HashMap<String, String>,
}

impl NameIndex {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.ids.get(name).map(String::as_str)
    }
}

/// Reads `collection` and indexes document ids by the `name_field` value.
pub async fn name_index(
    store: &dyn DocumentStore,
    collection: &str,
    name_field: &str,
) -> Result<NameIndex, ServiceError> {
    let docs = store.find(collection).await?;

    let mut ids = HashMap::with_capacity(docs.len());
    for doc in docs {
        let name = doc.get(name_field).and_then(Value::as_str);
        let id = doc.get("_id").and_then(Value::as_str);
        if let (Some(name), Some(id)) = (name, id) {
            ids.insert(name.to_string(), id.to_string());
        }
    }

    Ok(NameIndex { ids })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::collections;
    use crate::store::memory::MemoryStore;
    use serde_json::json;

    #[tokio::test]
    async fn index_maps_names_to_ids_case_sensitively() {
        let store = MemoryStore::new();
        for name in ["CS", "EE"] {
            let mut doc = crate::store::Document::new();
            doc.insert("program_name".to_string(), json!(name));
            store.insert_one(collections::PROGRAMS, doc).await.unwrap();
        }

        let index = name_index(&store, collections::PROGRAMS, "program_name")
            .await
            .unwrap();
        assert!(index.get("CS").is_some());
        assert!(index.get("cs").is_none());
        assert!(index.get("ME").is_none());
    }
}
