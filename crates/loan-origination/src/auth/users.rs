use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};

use crate::records::{RecordId, RepositoryError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: RecordId,
    /// Lowercased, trimmed.
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Account storage. Implementations key users by normalized e-mail.
pub trait UserRepository: Send + Sync {
    /// Fails with `Conflict` when the e-mail is already registered.
    fn insert(&self, email: String, password_hash: String) -> Result<User, RepositoryError>;
    fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError>;
}

#[derive(Default)]
struct UserTable {
    next_id: RecordId,
    by_email: HashMap<String, User>,
}

#[derive(Default)]
pub struct InMemoryUserRepository {
    table: Mutex<UserTable>,
}

impl UserRepository for InMemoryUserRepository {
    fn insert(&self, email: String, password_hash: String) -> Result<User, RepositoryError> {
        let mut table = self
            .table
            .lock()
            .map_err(|_| RepositoryError::Unavailable("user table lock poisoned".to_string()))?;
        if table.by_email.contains_key(&email) {
            return Err(RepositoryError::Conflict);
        }

        table.next_id += 1;
        let user = User {
            id: table.next_id,
            email: email.clone(),
            password_hash,
            created_at: Utc::now(),
        };
        table.by_email.insert(email, user.clone());
        Ok(user)
    }

    fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        let table = self
            .table
            .lock()
            .map_err(|_| RepositoryError::Unavailable("user table lock poisoned".to_string()))?;
        Ok(table.by_email.get(email).cloned())
    }
}
