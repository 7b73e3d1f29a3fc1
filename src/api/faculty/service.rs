use serde_json::Value;
use tracing::{debug, error};

use crate::api::error::ServiceError;
use crate::api::types::{UserRole, UserStatus};
use crate::api::user::models::User;
use crate::api::user::service::UserService;
use crate::store::{self, collections, Document, DocumentStore, SharedStore};

use super::models::Faculty;

/// Faculty persistence. Writing a faculty record is a two-phase operation:
/// the dependent login account is created first, and removed again if the
/// owning insert fails.
#[derive(Clone)]
pub struct FacultyService {
    store: SharedStore,
    users: UserService,
}

impl FacultyService {
    pub fn new(store: SharedStore) -> Self {
        let users = UserService::new(store.clone());
        Self { store, users }
    }

    pub(crate) fn store(&self) -> &dyn DocumentStore {
        self.store.as_ref()
    }

    pub async fn add_faculty(&self, faculty: &Faculty) -> Result<String, ServiceError> {
        let existing = self
            .store
            .find_one(collections::FACULTIES, "email", &faculty.email)
            .await?;
        if existing.is_some() {
            return Err(ServiceError::Conflict(
                "Email already registered".to_string(),
            ));
        }

        let account = User {
            first_name: faculty.first_name.clone(),
            middle_name: faculty.middle_name.clone(),
            last_name: faculty.last_name.clone(),
            email: faculty.email.clone(),
            role: UserRole::Faculty,
            status: UserStatus::Inactive,
        };
        let user_id = self.users.add_user(&account).await?;

        let mut doc = store::to_document(faculty)?;
        doc.insert("user_id".to_string(), Value::String(user_id.clone()));
        store::stamp_created(&mut doc);

        match self.store.insert_one(collections::FACULTIES, doc).await {
            Ok(id) => {
                debug!("Faculty {} created with id={}", faculty.email, id);
                Ok(id)
            }
            Err(e) => {
                // Compensate: the login account must not outlive a failed
                // owning insert.
                if let Err(cleanup) = self.users.remove_user(&user_id).await {
                    error!("Could not remove orphaned user {}: {}", user_id, cleanup);
                }
                Err(ServiceError::Store(e))
            }
        }
    }

    /// All faculty members with their referenced program embedded.
    pub async fn list_faculties(&self) -> Result<Vec<Document>, ServiceError> {
        let mut faculties = self.store.find(collections::FACULTIES).await?;
        for faculty in &mut faculties {
            let program_id = faculty
                .get("program_id")
                .and_then(Value::as_str)
                .map(str::to_string);
            if let Some(program_id) = program_id {
                if let Some(program) = self
                    .store
                    .find_one(collections::PROGRAMS, "_id", &program_id)
                    .await?
                {
                    faculty.insert("program".to_string(), Value::Object(program));
                }
            }
        }
        Ok(faculties)
    }

    /// Lookup by the owning login account.
    pub async fn get_faculty_by_user_id(&self, user_id: &str) -> Result<Document, ServiceError> {
        self.store
            .find_one(collections::FACULTIES, "user_id", user_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Faculty not found".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::EmploymentStatus;
    use crate::store::memory::MemoryStore;
    use std::sync::Arc;

    fn faculty(email: &str) -> Faculty {
        Faculty {
            user_id: None,
            first_name: "Ada".to_string(),
            middle_name: None,
            last_name: Some("Lovelace".to_string()),
            email: email.to_string(),
            phone_no: "9876543210".to_string(),
            gender: None,
            dob: None,
            program_id: "p1".to_string(),
            join_date: None,
            end_date: None,
            status: EmploymentStatus::Active,
        }
    }

    #[tokio::test]
    async fn writer_creates_the_dependent_user_first() {
        let store = Arc::new(MemoryStore::new());
        let service = FacultyService::new(store.clone());

        let id = service.add_faculty(&faculty("ada@college.edu")).await.unwrap();

        let stored = store
            .find_one(collections::FACULTIES, "_id", &id)
            .await
            .unwrap()
            .unwrap();
        let user_id = stored.get("user_id").and_then(Value::as_str).unwrap();

        let account = store
            .find_one(collections::USERS, "_id", user_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(account.get("role"), Some(&Value::String("faculty".into())));
        assert_eq!(
            account.get("status"),
            Some(&Value::String("Inactive".into()))
        );
    }

    #[tokio::test]
    async fn failed_owning_insert_removes_the_fresh_user() {
        let store = Arc::new(MemoryStore::new());
        store.poison(collections::FACULTIES);
        let service = FacultyService::new(store.clone());

        let result = service.add_faculty(&faculty("ada@college.edu")).await;
        assert!(result.is_err());
        assert_eq!(store.count(collections::USERS), 0);
        assert_eq!(store.count(collections::FACULTIES), 0);
    }

    #[tokio::test]
    async fn duplicate_email_conflicts_before_any_write() {
        let store = Arc::new(MemoryStore::new());
        let service = FacultyService::new(store.clone());
        service.add_faculty(&faculty("ada@college.edu")).await.unwrap();

        let result = service.add_faculty(&faculty("ada@college.edu")).await;
        assert!(matches!(result, Err(ServiceError::Conflict(_))));
        assert_eq!(store.count(collections::USERS), 1);
    }
}
