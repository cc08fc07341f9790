//! Persistence of users and their single active refresh token.
//!
//! Every method is one atomic statement against the backing store. Nothing
//! here spans statements, so callers composing a check with a later write
//! must tolerate interleaving with other requests.

mod sqlite;

pub use sqlite::SqliteCredentialStore;

use async_trait::async_trait;

use crate::models::{NewUser, SessionState, User};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Connection error: {0}")]
    Connection(String),
    #[error("Query error: {0}")]
    Query(String),
    #[error("Constraint violation: {0}")]
    Constraint(String),
}

/// Result of a conditional refresh token write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwapOutcome {
    /// No session was stored; the new token is now stored.
    Swapped,
    /// A session was already stored and was left untouched.
    Occupied(String),
    /// No user with that id.
    Missing,
}

/// Storage operations consumed by the session service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Insert a user row. A duplicate external id is a [`StoreError::Constraint`].
    async fn create_user(&self, user: &NewUser) -> Result<User, StoreError>;

    async fn find_id_by_external(&self, external_id: &str) -> Result<Option<i64>, StoreError>;

    async fn find_id_by_internal(&self, internal_id: i64) -> Result<Option<i64>, StoreError>;

    /// Current session of a user; `None` when the external id is unknown.
    async fn fetch_refresh_token(&self, external_id: &str)
        -> Result<Option<SessionState>, StoreError>;

    /// Overwrite the stored refresh token. Returns rows affected.
    async fn set_refresh_token(&self, internal_id: i64, token: &str) -> Result<u64, StoreError>;

    /// Store `token` only if no refresh token is stored.
    async fn claim_session(&self, internal_id: i64, token: &str)
        -> Result<SwapOutcome, StoreError>;

    /// Null the stored refresh token. Rows whose token was already null do not count.
    async fn clear_refresh_token(&self, internal_id: i64) -> Result<u64, StoreError>;

    async fn rename_user(&self, internal_id: i64, name: &str) -> Result<u64, StoreError>;
}
