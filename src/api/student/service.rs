use serde_json::Value;
use tracing::{debug, error};

use crate::api::error::ServiceError;
use crate::api::types::{UserRole, UserStatus};
use crate::api::user::models::User;
use crate::api::user::service::UserService;
use crate::store::{self, collections, Document, DocumentStore, SharedStore};

use super::models::Student;

/// Student persistence. Same two-phase write as faculty: the login account
/// comes first and is removed again if the owning insert fails.
#[derive(Clone)]
pub struct StudentService {
    store: SharedStore,
    users: UserService,
}

impl StudentService {
    pub fn new(store: SharedStore) -> Self {
        let users = UserService::new(store.clone());
        Self { store, users }
    }

    pub(crate) fn store(&self) -> &dyn DocumentStore {
        self.store.as_ref()
    }

    pub async fn add_student(&self, student: &Student) -> Result<String, ServiceError> {
        let existing = self
            .store
            .find_one(collections::STUDENTS, "email", &student.email)
            .await?;
        if existing.is_some() {
            return Err(ServiceError::Conflict(
                "Email already registered".to_string(),
            ));
        }

        let account = User {
            first_name: student.first_name.clone(),
            middle_name: student.middle_name.clone(),
            last_name: student.last_name.clone(),
            email: student.email.clone(),
            role: UserRole::Student,
            status: UserStatus::Inactive,
        };
        let user_id = self.users.add_user(&account).await?;

        let mut doc = store::to_document(student)?;
        doc.insert("user_id".to_string(), Value::String(user_id.clone()));
        store::stamp_created(&mut doc);

        match self.store.insert_one(collections::STUDENTS, doc).await {
            Ok(id) => {
                debug!("Student {} created with id={}", student.email, id);
                Ok(id)
            }
            Err(e) => {
                if let Err(cleanup) = self.users.remove_user(&user_id).await {
                    error!("Could not remove orphaned user {}: {}", user_id, cleanup);
                }
                Err(ServiceError::Store(e))
            }
        }
    }

    /// All students with their referenced program and batch embedded.
    pub async fn list_students(&self) -> Result<Vec<Document>, ServiceError> {
        let mut students = self.store.find(collections::STUDENTS).await?;
        for student in &mut students {
            let program_id = student
                .get("program_id")
                .and_then(Value::as_str)
                .map(str::to_string);
            if let Some(program_id) = program_id {
                if let Some(program) = self
                    .store
                    .find_one(collections::PROGRAMS, "_id", &program_id)
                    .await?
                {
                    student.insert("program".to_string(), Value::Object(program));
                }
            }

            let batch_id = student
                .get("batch_id")
                .and_then(Value::as_str)
                .map(str::to_string);
            if let Some(batch_id) = batch_id {
                if let Some(batch) = self
                    .store
                    .find_one(collections::BATCHES, "_id", &batch_id)
                    .await?
                {
                    student.insert("batch".to_string(), Value::Object(batch));
                }
            }
        }
        Ok(students)
    }

    /// Lookup by the owning login account.
    pub async fn get_student_by_user_id(&self, user_id: &str) -> Result<Document, ServiceError> {
        self.store
            .find_one(collections::STUDENTS, "user_id", user_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Student not found".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::EmploymentStatus;
    use crate::store::memory::MemoryStore;
    use std::sync::Arc;

    fn student(email: &str) -> Student {
        Student {
            user_id: None,
            first_name: "Grace".to_string(),
            middle_name: None,
            last_name: Some("Hopper".to_string()),
            email: email.to_string(),
            phone_no: "9876543210".to_string(),
            gender: None,
            dob: None,
            program_id: "p1".to_string(),
            batch_id: None,
            adm_year: Some("2026".to_string()),
            join_date: None,
            end_date: None,
            status: EmploymentStatus::Active,
        }
    }

    #[tokio::test]
    async fn writer_creates_a_student_role_account() {
        let store = Arc::new(MemoryStore::new());
        let service = StudentService::new(store.clone());

        service.add_student(&student("grace@college.edu")).await.unwrap();

        let account = store
            .find_one(collections::USERS, "email", "grace@college.edu")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(account.get("role"), Some(&Value::String("student".into())));
    }

    #[tokio::test]
    async fn failed_owning_insert_removes_the_fresh_user() {
        let store = Arc::new(MemoryStore::new());
        store.poison(collections::STUDENTS);
        let service = StudentService::new(store.clone());

        let result = service.add_student(&student("grace@college.edu")).await;
        assert!(result.is_err());
        assert_eq!(store.count(collections::USERS), 0);
    }
}
