//! Application state shared by all handlers.
//!
//! [`UserStore`] is backed by two `DashMap`s: users by id, and an email index
//! that enforces unique addresses. No operation holds a guard on one map
//! while locking the other.

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use uuid::Uuid;

use crate::error::AppError;
use crate::schema::users::User;

/// Concurrent in-memory user storage.
#[derive(Debug, Default)]
pub struct UserStore {
    users: DashMap<String, User>,
    emails: DashMap<String, String>,
}

fn email_key(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

fn not_found(id: &str) -> AppError {
    tracing::debug!(user_id = id, "user lookup missed");
    AppError::NotFound("user not found".to_string())
}

impl UserStore {
    pub fn new() -> Self {
        UserStore::default()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Creates a user with a fresh UUID.
    pub fn create(&self, name: String, email: String) -> Result<User, AppError> {
        let user = User {
            id: Uuid::new_v4().to_string(),
            name,
            email,
        };
        self.insert(user.clone())?;
        Ok(user)
    }

    /// Inserts a user with a caller-chosen id.
    pub fn insert(&self, user: User) -> Result<(), AppError> {
        if self.users.contains_key(&user.id) {
            return Err(AppError::Conflict(format!("user {} already exists", user.id)));
        }
        self.reserve_email(&user.email, &user.id)?;
        self.users.insert(user.id.clone(), user);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Result<User, AppError> {
        self.users
            .get(id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| not_found(id))
    }

    /// Lists users sorted by name, optionally filtered and truncated.
    pub fn list(&self, name_filter: Option<&str>, limit: Option<usize>) -> Vec<User> {
        let needle = name_filter.map(str::to_lowercase);
        let mut users: Vec<User> = self
            .users
            .iter()
            .map(|entry| entry.value().clone())
            .filter(|user| match &needle {
                Some(needle) => user.name.to_lowercase().contains(needle.as_str()),
                None => true,
            })
            .collect();
        users.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        if let Some(limit) = limit {
            users.truncate(limit);
        }
        users
    }

    /// Applies a change to an existing user.
    ///
    /// `name` and `email` replace the current values when present.
    pub fn update(
        &self,
        id: &str,
        name: Option<String>,
        email: Option<String>,
    ) -> Result<User, AppError> {
        let current = self.get(id)?;
        let new_email = email.filter(|email| email_key(email) != email_key(&current.email));
        if let Some(email) = &new_email {
            self.reserve_email(email, id)?;
        }

        let updated = match self.users.get_mut(id) {
            Some(mut entry) => {
                let user = entry.value_mut();
                if let Some(name) = name {
                    user.name = name;
                }
                if let Some(email) = &new_email {
                    user.email = email.clone();
                }
                user.clone()
            }
            None => {
                if let Some(email) = &new_email {
                    self.release_email(email, id);
                }
                return Err(not_found(id));
            }
        };

        if new_email.is_some() {
            self.release_email(&current.email, id);
        }
        Ok(updated)
    }

    pub fn delete(&self, id: &str) -> Result<User, AppError> {
        let (_, user) = self.users.remove(id).ok_or_else(|| not_found(id))?;
        self.release_email(&user.email, id);
        Ok(user)
    }

    fn reserve_email(&self, email: &str, id: &str) -> Result<(), AppError> {
        match self.emails.entry(email_key(email)) {
            Entry::Occupied(entry) if entry.get() != id => Err(AppError::Conflict(format!(
                "email {} is already registered",
                email
            ))),
            Entry::Occupied(_) => Ok(()),
            Entry::Vacant(slot) => {
                slot.insert(id.to_string());
                Ok(())
            }
        }
    }

    fn release_email(&self, email: &str, id: &str) {
        self.emails.remove_if(&email_key(email), |_, owner| owner == id);
    }
}

/// Shared application state for the HTTP server.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub users: Arc<UserStore>,
}

impl AppState {
    pub fn new() -> Self {
        AppState::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str, name: &str, email: &str) -> User {
        User {
            id: id.to_string(),
            name: name.to_string(),
            email: email.to_string(),
        }
    }

    #[test]
    fn create_then_get() {
        let store = UserStore::new();
        let created = store
            .create("Ada".to_string(), "ada@example.com".to_string())
            .unwrap();
        assert_eq!(store.get(&created.id).unwrap(), created);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn duplicate_email_is_a_conflict() {
        let store = UserStore::new();
        store.insert(user("1", "Ada", "ada@example.com")).unwrap();
        let err = store
            .create("Other".to_string(), "ADA@example.com".to_string())
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn update_moves_email_reservation() {
        let store = UserStore::new();
        store.insert(user("1", "Ada", "ada@example.com")).unwrap();
        store
            .update("1", None, Some("countess@example.com".to_string()))
            .unwrap();

        // the old address is free again, the new one is taken
        store.insert(user("2", "Bob", "ada@example.com")).unwrap();
        let err = store
            .insert(user("3", "Eve", "countess@example.com"))
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[test]
    fn update_keeping_same_email_succeeds() {
        let store = UserStore::new();
        store.insert(user("1", "Ada", "ada@example.com")).unwrap();
        let updated = store
            .update("1", Some("Ada L.".to_string()), Some("ada@example.com".to_string()))
            .unwrap();
        assert_eq!(updated.name, "Ada L.");
    }

    #[test]
    fn delete_releases_email() {
        let store = UserStore::new();
        store.insert(user("1", "Ada", "ada@example.com")).unwrap();
        store.delete("1").unwrap();
        assert!(store.get("1").is_err());
        store.insert(user("2", "Ada", "ada@example.com")).unwrap();
    }

    #[test]
    fn list_filters_sorts_and_limits() {
        let store = UserStore::new();
        store.insert(user("1", "Grace", "grace@example.com")).unwrap();
        store.insert(user("2", "Ada", "ada@example.com")).unwrap();
        store.insert(user("3", "Adele", "adele@example.com")).unwrap();

        let names: Vec<String> = store.list(None, None).into_iter().map(|u| u.name).collect();
        assert_eq!(names, vec!["Ada", "Adele", "Grace"]);

        let names: Vec<String> = store
            .list(Some("AD"), Some(1))
            .into_iter()
            .map(|u| u.name)
            .collect();
        assert_eq!(names, vec!["Ada"]);
    }
}
