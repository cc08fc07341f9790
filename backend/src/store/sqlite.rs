use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};

use super::{CredentialStore, StoreError, SwapOutcome};
use crate::models::{NewUser, SessionState, User};

/// SQLite-backed credential store.
///
/// Statements run on the blocking thread pool so a slow disk never stalls
/// the async workers.
pub struct SqliteCredentialStore {
    conn: Arc<Mutex<Connection>>,
}

fn query_error(e: rusqlite::Error) -> StoreError {
    match &e {
        rusqlite::Error::SqliteFailure(err, _) if err.code == ErrorCode::ConstraintViolation => {
            StoreError::Constraint(e.to_string())
        }
        rusqlite::Error::SqliteFailure(err, _)
            if matches!(
                err.code,
                ErrorCode::CannotOpen | ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked
            ) =>
        {
            StoreError::Connection(e.to_string())
        }
        _ => StoreError::Query(e.to_string()),
    }
}

impl SqliteCredentialStore {
    pub fn open(database_url: &str) -> Result<Self, StoreError> {
        // Parse sqlite: prefix if present
        let path = database_url.strip_prefix("sqlite:").unwrap_or(database_url);

        let conn = if path == ":memory:" {
            Connection::open_in_memory()
        } else {
            // Create parent directories if needed
            if let Some(parent) = Path::new(path).parent() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| StoreError::Connection(e.to_string()))?;
            }
            Connection::open(path)
        }
        .map_err(|e| StoreError::Connection(e.to_string()))?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                external_id TEXT NOT NULL UNIQUE,
                display_name TEXT,
                refresh_token TEXT,
                created_at TEXT NOT NULL
            )",
            [],
        )
        .map_err(query_error)?;

        tracing::info!("Credential store initialized with database: {}", path);

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    async fn run<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&Connection) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let conn = conn
                .lock()
                .map_err(|e| StoreError::Connection(e.to_string()))?;
            f(&*conn)
        })
        .await
        .map_err(|e| StoreError::Connection(e.to_string()))?
    }
}

#[async_trait]
impl CredentialStore for SqliteCredentialStore {
    async fn create_user(&self, user: &NewUser) -> Result<User, StoreError> {
        let user = user.clone();
        self.run(move |conn| {
            conn.execute(
                "INSERT INTO users (external_id, display_name, created_at) VALUES (?1, ?2, ?3)",
                params![user.external_id, user.display_name, Utc::now().to_rfc3339()],
            )
            .map_err(query_error)?;

            let internal_id = conn.last_insert_rowid();
            tracing::info!("Created user {} for external id {}", internal_id, user.external_id);

            Ok(User {
                internal_id,
                external_id: user.external_id,
                display_name: user.display_name,
            })
        })
        .await
    }

    async fn find_id_by_external(&self, external_id: &str) -> Result<Option<i64>, StoreError> {
        let external_id = external_id.to_string();
        self.run(move |conn| {
            conn.query_row(
                "SELECT id FROM users WHERE external_id = ?1",
                params![external_id],
                |row| row.get::<_, i64>(0),
            )
            .optional()
            .map_err(query_error)
        })
        .await
    }

    async fn find_id_by_internal(&self, internal_id: i64) -> Result<Option<i64>, StoreError> {
        self.run(move |conn| {
            conn.query_row(
                "SELECT id FROM users WHERE id = ?1",
                params![internal_id],
                |row| row.get::<_, i64>(0),
            )
            .optional()
            .map_err(query_error)
        })
        .await
    }

    async fn fetch_refresh_token(
        &self,
        external_id: &str,
    ) -> Result<Option<SessionState>, StoreError> {
        let external_id = external_id.to_string();
        self.run(move |conn| {
            let column: Option<Option<String>> = conn
                .query_row(
                    "SELECT refresh_token FROM users WHERE external_id = ?1",
                    params![external_id],
                    |row| row.get(0),
                )
                .optional()
                .map_err(query_error)?;

            Ok(column.map(SessionState::from_column))
        })
        .await
    }

    async fn set_refresh_token(&self, internal_id: i64, token: &str) -> Result<u64, StoreError> {
        let token = token.to_string();
        self.run(move |conn| {
            let rows = conn
                .execute(
                    "UPDATE users SET refresh_token = ?1 WHERE id = ?2",
                    params![token, internal_id],
                )
                .map_err(query_error)?;
            Ok(rows as u64)
        })
        .await
    }

    async fn claim_session(
        &self,
        internal_id: i64,
        token: &str,
    ) -> Result<SwapOutcome, StoreError> {
        let token = token.to_string();
        self.run(move |conn| {
            let rows = conn
                .execute(
                    "UPDATE users SET refresh_token = ?1 WHERE id = ?2 AND refresh_token IS NULL",
                    params![token, internal_id],
                )
                .map_err(query_error)?;

            if rows > 0 {
                return Ok(SwapOutcome::Swapped);
            }

            // Both statements run under the same connection lock, so the row
            // cannot have been cleared in between.
            let current: Option<Option<String>> = conn
                .query_row(
                    "SELECT refresh_token FROM users WHERE id = ?1",
                    params![internal_id],
                    |row| row.get(0),
                )
                .optional()
                .map_err(query_error)?;

            match current {
                None => Ok(SwapOutcome::Missing),
                Some(Some(previous)) => Ok(SwapOutcome::Occupied(previous)),
                Some(None) => Err(StoreError::Query(format!(
                    "refresh token of user {} changed during claim",
                    internal_id
                ))),
            }
        })
        .await
    }

    async fn clear_refresh_token(&self, internal_id: i64) -> Result<u64, StoreError> {
        self.run(move |conn| {
            let rows = conn
                .execute(
                    "UPDATE users SET refresh_token = NULL WHERE id = ?1 AND refresh_token IS NOT NULL",
                    params![internal_id],
                )
                .map_err(query_error)?;
            Ok(rows as u64)
        })
        .await
    }

    async fn rename_user(&self, internal_id: i64, name: &str) -> Result<u64, StoreError> {
        let name = name.to_string();
        self.run(move |conn| {
            let rows = conn
                .execute(
                    "UPDATE users SET display_name = ?1 WHERE id = ?2",
                    params![name, internal_id],
                )
                .map_err(query_error)?;
            Ok(rows as u64)
        })
        .await
    }
}
