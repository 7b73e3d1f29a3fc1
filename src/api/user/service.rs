use rand::distributions::Alphanumeric;
use rand::Rng;
use serde_json::Value;
use tracing::debug;

use crate::api::error::ServiceError;
use crate::store::{self, collections, Document, DocumentStore, SharedStore};

use super::models::User;

const GENERATED_PASSWORD_LEN: usize = 10;

/// Login-account persistence. Also used internally by the faculty and
/// student writers to create the dependent account.
#[derive(Clone)]
pub struct UserService {
    store: SharedStore,
}

impl UserService {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Uniqueness precondition on email, then insert with a generated
    /// initial password. Returns the new user id.
    pub async fn add_user(&self, user: &User) -> Result<String, ServiceError> {
        let existing = self
            .store
            .find_one(collections::USERS, "email", &user.email)
            .await?;
        if existing.is_some() {
            return Err(ServiceError::Conflict(
                "Email already registered".to_string(),
            ));
        }

        let mut doc = store::to_document(user)?;
        doc.insert(
            "password".to_string(),
            Value::String(generate_password(GENERATED_PASSWORD_LEN)),
        );
        store::stamp_created(&mut doc);

        let id = self.store.insert_one(collections::USERS, doc).await?;
        debug!("User {} created with id={}", user.email, id);
        Ok(id)
    }

    /// All users, with the stored password kept server-side.
    pub async fn list_users(&self) -> Result<Vec<Document>, ServiceError> {
        let mut users = self.store.find(collections::USERS).await?;
        for user in &mut users {
            user.remove("password");
        }
        Ok(users)
    }

    /// Removes a user document; the compensating half of the two-phase
    /// faculty/student write.
    pub async fn remove_user(&self, user_id: &str) -> Result<u64, ServiceError> {
        Ok(self.store.delete_one(collections::USERS, user_id).await?)
    }
}

/// Random initial password for created accounts.
fn generate_password(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::{UserRole, UserStatus};
    use crate::store::memory::MemoryStore;
    use std::sync::Arc;

    fn user(email: &str) -> User {
        User {
            first_name: "Ada".to_string(),
            middle_name: None,
            last_name: Some("Lovelace".to_string()),
            email: email.to_string(),
            role: UserRole::Faculty,
            status: UserStatus::Inactive,
        }
    }

    #[test]
    fn generated_passwords_are_alphanumeric_and_sized() {
        let password = generate_password(10);
        assert_eq!(password.len(), 10);
        assert!(password.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let store = Arc::new(MemoryStore::new());
        let service = UserService::new(store);

        service.add_user(&user("ada@college.edu")).await.unwrap();
        let result = service.add_user(&user("ada@college.edu")).await;
        assert!(matches!(result, Err(ServiceError::Conflict(_))));
    }

    #[tokio::test]
    async fn stored_password_never_leaves_the_list_endpoint() {
        let store = Arc::new(MemoryStore::new());
        let service = UserService::new(store.clone());
        service.add_user(&user("ada@college.edu")).await.unwrap();

        let stored = store
            .find_one(collections::USERS, "email", "ada@college.edu")
            .await
            .unwrap()
            .unwrap();
        assert!(stored.contains_key("password"));

        let listed = service.list_users().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert!(!listed[0].contains_key("password"));
    }
}
