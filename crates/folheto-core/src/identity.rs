//! Identity store
//!
//! User accounts and the current-session slot, persisted as JSON under
//! the `users` and `current_session` keys. A bootstrap admin account is
//! created on first run so the dashboard is reachable out of the box.
//!
//! Secrets are compared as plaintext, matching the system this replaces;
//! the stored record type keeps the secret confined to this module and
//! every read path returns the sanitized [`User`] view.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::models::{Role, User, UserRecord};
use crate::storage::{KvStore, StoreError};

/// Collection key for user records
pub const USERS_KEY: &str = "users";

/// Slot key for the current session
pub const SESSION_KEY: &str = "current_session";

/// Username of the bootstrap admin account
pub const DEFAULT_ADMIN_USERNAME: &str = "admin";

/// Secret of the bootstrap admin account
pub const DEFAULT_ADMIN_SECRET: &str = "admin123";

/// Minimum accepted username length
pub const MIN_USERNAME_LEN: usize = 3;

/// Minimum accepted secret length
pub const MIN_SECRET_LEN: usize = 6;

/// Errors from identity store operations
#[derive(Error, Debug)]
pub enum AuthError {
    /// Username/secret pair did not match any account
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// The username is already taken
    #[error("Username already exists: {0}")]
    DuplicateUsername(String),

    /// Input shape rejected (username or secret too short)
    #[error("{0}")]
    Validation(&'static str),

    /// No user with the given id
    #[error("User not found: {0}")]
    NotFound(Uuid),

    /// The acting user tried to delete their own account
    #[error("Cannot delete the currently authenticated account")]
    SelfDeletion,

    /// Underlying persistence failure
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Store of user accounts and the session slot
#[derive(Clone)]
pub struct IdentityStore {
    kv: Arc<dyn KvStore>,
}

impl IdentityStore {
    /// Create an identity store over the given store handle
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self { kv }
    }

    /// Create the bootstrap admin account if the collection is absent
    ///
    /// Idempotent: returns `true` only on the run that created the
    /// account.
    pub fn bootstrap(&self) -> Result<bool, AuthError> {
        if self.kv.get(USERS_KEY)?.is_some() {
            return Ok(false);
        }

        let admin = UserRecord::new(DEFAULT_ADMIN_USERNAME, DEFAULT_ADMIN_SECRET, Role::Admin);
        self.save_records(&[admin])?;

        info!("Created bootstrap admin account");
        Ok(true)
    }

    /// Authenticate and open a session
    ///
    /// Linear scan for an exact username and secret match. On success the
    /// sanitized user is written to the session slot and returned. On
    /// failure the slot is left untouched.
    pub fn login(&self, username: &str, secret: &str) -> Result<User, AuthError> {
        let records = self.load_records()?;
        let found = records
            .iter()
            .find(|r| r.username == username && r.secret == secret)
            .ok_or(AuthError::InvalidCredentials)?;

        let user = found.to_user();
        self.set_session(&user)?;

        info!("Session opened for '{}'", user.username);
        Ok(user)
    }

    /// Clear the session slot
    pub fn logout(&self) -> Result<(), AuthError> {
        self.kv.remove(SESSION_KEY)?;
        debug!("Session cleared");
        Ok(())
    }

    /// The user referenced by the session slot, if any
    pub fn current_user(&self) -> Result<Option<User>, AuthError> {
        let Some(value) = self.kv.get(SESSION_KEY)? else {
            return Ok(None);
        };

        let user = serde_json::from_value(value).map_err(|e| StoreError::Serialization {
            key: SESSION_KEY.to_string(),
            source: e,
        })?;
        Ok(Some(user))
    }

    /// All accounts, sanitized, in insertion order
    pub fn list_users(&self) -> Result<Vec<User>, AuthError> {
        Ok(self.load_records()?.iter().map(UserRecord::to_user).collect())
    }

    /// Create a new account
    ///
    /// Usernames must be unique and at least [`MIN_USERNAME_LEN`]
    /// characters; secrets at least [`MIN_SECRET_LEN`].
    pub fn add_user(&self, username: &str, secret: &str, role: Role) -> Result<User, AuthError> {
        if username.chars().count() < MIN_USERNAME_LEN {
            return Err(AuthError::Validation(
                "Username must be at least 3 characters",
            ));
        }
        if secret.chars().count() < MIN_SECRET_LEN {
            return Err(AuthError::Validation(
                "Password must be at least 6 characters",
            ));
        }

        let mut records = self.load_records()?;
        if records.iter().any(|r| r.username == username) {
            return Err(AuthError::DuplicateUsername(username.to_string()));
        }

        let record = UserRecord::new(username, secret, role);
        let user = record.to_user();
        records.push(record);
        self.save_records(&records)?;

        info!("Created account '{}' ({})", user.username, user.role);
        Ok(user)
    }

    /// Replace an account's secret
    pub fn change_password(&self, user_id: Uuid, new_secret: &str) -> Result<(), AuthError> {
        if new_secret.chars().count() < MIN_SECRET_LEN {
            return Err(AuthError::Validation(
                "Password must be at least 6 characters",
            ));
        }

        let mut records = self.load_records()?;
        let record = records
            .iter_mut()
            .find(|r| r.id == user_id)
            .ok_or(AuthError::NotFound(user_id))?;
        record.secret = new_secret.to_string();
        self.save_records(&records)?;

        info!("Password changed for user {}", user_id);
        Ok(())
    }

    /// Delete an account
    ///
    /// The acting user may not delete their own account. If the session
    /// slot references the deleted account (a session opened elsewhere),
    /// it is cleared so the pointer cannot dangle.
    pub fn delete_user(&self, user_id: Uuid, acting: &User) -> Result<(), AuthError> {
        if acting.id == user_id {
            return Err(AuthError::SelfDeletion);
        }

        let mut records = self.load_records()?;
        let before = records.len();
        records.retain(|r| r.id != user_id);
        if records.len() == before {
            return Err(AuthError::NotFound(user_id));
        }
        self.save_records(&records)?;

        // Invalidation sweep: a session belonging to the deleted account
        // must not outlive it
        if let Some(session) = self.current_user()? {
            if session.id == user_id {
                self.logout()?;
            }
        }

        info!("Deleted user {}", user_id);
        Ok(())
    }

    /// Write the session slot
    fn set_session(&self, user: &User) -> Result<(), AuthError> {
        let value = serde_json::to_value(user).map_err(|e| StoreError::Serialization {
            key: SESSION_KEY.to_string(),
            source: e,
        })?;
        self.kv.set(SESSION_KEY, &value)?;
        Ok(())
    }

    /// Load the user collection; absent collection reads as empty
    fn load_records(&self) -> Result<Vec<UserRecord>, AuthError> {
        let Some(value) = self.kv.get(USERS_KEY)? else {
            return Ok(Vec::new());
        };

        let records = serde_json::from_value(value).map_err(|e| StoreError::Serialization {
            key: USERS_KEY.to_string(),
            source: e,
        })?;
        Ok(records)
    }

    /// Persist the user collection
    fn save_records(&self, records: &[UserRecord]) -> Result<(), AuthError> {
        let value = serde_json::to_value(records).map_err(|e| StoreError::Serialization {
            key: USERS_KEY.to_string(),
            source: e,
        })?;
        self.kv.set(USERS_KEY, &value)?;
        Ok(())
    }
}
