/// User accounts
///
/// Credentials live in the top-level `users` collection. Emails are stored
/// trimmed and lowercased and are unique across the collection. The
/// password hash never leaves this crate's callers: API responses use
/// [`UserProfile`].

use crate::store::{to_fields, CollectionPath, DocumentStore, Record, StoreError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub email: String,

    /// Argon2id PHC string
    pub password_hash: String,

    pub display_name: String,

    pub created_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct CreateUser {
    pub email: String,
    pub password_hash: String,
    pub display_name: String,
}

/// Public view of a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub display_name: String,
}

impl From<&Record<User>> for UserProfile {
    fn from(user: &Record<User>) -> Self {
        Self {
            id: user.id.clone(),
            email: user.data.email.clone(),
            display_name: user.data.display_name.clone(),
        }
    }
}

/// Canonical form used for storage and lookup
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl User {
    /// Creates an account
    ///
    /// # Errors
    ///
    /// [`StoreError::Conflict`] when the email is already registered.
    pub async fn create(store: &dyn DocumentStore, data: CreateUser) -> Result<Record<Self>, StoreError> {
        let email = normalize_email(&data.email);

        let user = User {
            email,
            password_hash: data.password_hash,
            display_name: data.display_name,
            created_at: Utc::now(),
            last_login_at: None,
        };

        let id = store
            .add_unique(
                &CollectionPath::users(),
                "email",
                &Value::from(user.email.as_str()),
                to_fields(&user)?,
            )
            .await
            .map_err(|e| match e {
                StoreError::Conflict(_) => StoreError::Conflict("Email already exists".to_string()),
                other => other,
            })?;
        info!(user_id = %id, "User created");

        Ok(Record { id, data: user })
    }

    pub async fn find_by_id(store: &dyn DocumentStore, id: &str) -> Result<Option<Record<Self>>, StoreError> {
        match store.get(&CollectionPath::users(), id).await? {
            Some(doc) => Ok(Some(doc.decode()?)),
            None => Ok(None),
        }
    }

    pub async fn find_by_email(
        store: &dyn DocumentStore,
        email: &str,
    ) -> Result<Option<Record<Self>>, StoreError> {
        let docs = store
            .find_where(
                &CollectionPath::users(),
                "email",
                &Value::String(normalize_email(email)),
            )
            .await?;

        match docs.into_iter().next() {
            Some(doc) => Ok(Some(doc.decode()?)),
            None => Ok(None),
        }
    }

    pub async fn update_last_login(store: &dyn DocumentStore, id: &str) -> Result<(), StoreError> {
        let mut fields = serde_json::Map::new();
        fields.insert("lastLoginAt".to_string(), serde_json::to_value(Utc::now())?);
        store.update(&CollectionPath::users(), id, fields).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn new_user(email: &str) -> CreateUser {
        CreateUser {
            email: email.to_string(),
            password_hash: "$argon2id$v=19$stub".to_string(),
            display_name: "Ada".to_string(),
        }
    }

    #[tokio::test]
    async fn test_email_is_normalized_and_unique() {
        let store = MemoryStore::new();
        let user = User::create(&store, new_user("  Ada@Example.COM ")).await.unwrap();
        assert_eq!(user.data.email, "ada@example.com");

        let duplicate = User::create(&store, new_user("ada@example.com")).await;
        assert!(matches!(duplicate, Err(StoreError::Conflict(_))));

        let found = User::find_by_email(&store, "ADA@example.com").await.unwrap().unwrap();
        assert_eq!(found.id, user.id);
    }

    #[tokio::test]
    async fn test_concurrent_signups_with_same_email() {
        let store = std::sync::Arc::new(MemoryStore::new());

        let (first, second) = tokio::join!(
            User::create(store.as_ref(), new_user("ada@example.com")),
            User::create(store.as_ref(), new_user("ADA@example.com")),
        );

        assert_eq!(first.is_ok() as u8 + second.is_ok() as u8, 1);
        let conflict = if first.is_err() { first } else { second };
        assert!(matches!(conflict, Err(StoreError::Conflict(msg)) if msg == "Email already exists"));
    }

    #[tokio::test]
    async fn test_update_last_login() {
        let store = MemoryStore::new();
        let user = User::create(&store, new_user("grace@example.com")).await.unwrap();
        assert!(user.data.last_login_at.is_none());

        User::update_last_login(&store, &user.id).await.unwrap();

        let reloaded = User::find_by_id(&store, &user.id).await.unwrap().unwrap();
        assert!(reloaded.data.last_login_at.is_some());
        assert_eq!(reloaded.data.password_hash, user.data.password_hash);
    }

    #[test]
    fn test_profile_omits_hash() {
        let record = Record {
            id: "u1".to_string(),
            data: User {
                email: "ada@example.com".to_string(),
                password_hash: "secret".to_string(),
                display_name: "Ada".to_string(),
                created_at: Utc::now(),
                last_login_at: None,
            },
        };

        let value = serde_json::to_value(UserProfile::from(&record)).unwrap();
        assert!(value.get("passwordHash").is_none());
        assert_eq!(value["displayName"], "Ada");
    }
}
