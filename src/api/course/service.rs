use chrono::Utc;
use serde_json::Value;
use tracing::debug;

use crate::api::error::ServiceError;
use crate::store::{self, collections, Document, DocumentStore, SharedStore};

use super::models::Course;

/// Course persistence and catalog queries.
#[derive(Clone)]
pub struct CourseService {
    store: SharedStore,
}

impl CourseService {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    pub(crate) fn store(&self) -> &dyn DocumentStore {
        self.store.as_ref()
    }

    /// Uniqueness precondition on the course code, then insert.
    pub async fn add_course(&self, course: &Course) -> Result<String, ServiceError> {
        let existing = self
            .store
            .find_one(collections::COURSES, "course_code", &course.course_code)
            .await?;
        if existing.is_some() {
            return Err(ServiceError::Conflict(
                "Course code already exists".to_string(),
            ));
        }

        let mut doc = store::to_document(course)?;
        store::stamp_created(&mut doc);
        let id = self.store.insert_one(collections::COURSES, doc).await?;
        debug!("Course {} created with id={}", course.course_code, id);
        Ok(id)
    }

    /// All courses with their referenced program embedded.
    pub async fn list_courses(&self) -> Result<Vec<Document>, ServiceError> {
        let mut courses = self.store.find(collections::COURSES).await?;
        for course in &mut courses {
            let program_id = course
                .get("program_id")
                .and_then(Value::as_str)
                .map(str::to_string);
            if let Some(program_id) = program_id {
                if let Some(program) = self
                    .store
                    .find_one(collections::PROGRAMS, "_id", &program_id)
                    .await?
                {
                    course.insert("program".to_string(), Value::Object(program));
                }
            }
        }
        Ok(courses)
    }

    /// Soft delete; returns matched count.
    pub async fn delete_course(&self, course_id: &str) -> Result<u64, ServiceError> {
        let mut changes = Document::new();
        changes.insert("status".to_string(), Value::String("Deleted".to_string()));
        changes.insert(
            "deleted_at".to_string(),
            Value::String(Utc::now().to_rfc3339()),
        );
        store::stamp_updated(&mut changes);
        Ok(self
            .store
            .update_one(collections::COURSES, course_id, changes)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::RecordStatus;
    use crate::store::memory::MemoryStore;
    use serde_json::json;
    use std::sync::Arc;

    fn course(code: &str, program_id: Option<&str>) -> Course {
        Course {
            course_code: code.to_string(),
            course_name: "Intro".to_string(),
            semester: 1,
            program_id: program_id.map(str::to_string),
            status: RecordStatus::Active,
        }
    }

    #[tokio::test]
    async fn duplicate_course_codes_conflict() {
        let store = Arc::new(MemoryStore::new());
        let service = CourseService::new(store);

        service.add_course(&course("CS101", None)).await.unwrap();
        let result = service.add_course(&course("CS101", None)).await;
        assert!(matches!(result, Err(ServiceError::Conflict(_))));
    }

    #[tokio::test]
    async fn listing_embeds_the_referenced_program() {
        let store = Arc::new(MemoryStore::new());

        let mut program = Document::new();
        program.insert("program_name".to_string(), json!("CS"));
        let program_id = store
            .insert_one(collections::PROGRAMS, program)
            .await
            .unwrap();

        let service = CourseService::new(store);
        service
            .add_course(&course("CS101", Some(&program_id)))
            .await
            .unwrap();

        let courses = service.list_courses().await.unwrap();
        assert_eq!(courses.len(), 1);
        let embedded = courses[0].get("program").unwrap();
        assert_eq!(embedded.get("program_name"), Some(&json!("CS")));
    }
}
