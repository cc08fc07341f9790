pub mod auth;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod routes;
pub mod session;
pub mod store;
pub mod test_util;

pub use auth::{TokenClaim, TokenCodec, TokenKind};
pub use config::{Config, SessionPolicy};
pub use error::SessionError;
pub use session::{SessionService, SignInOutcome};
pub use store::{CredentialStore, SqliteCredentialStore, StoreError};

/// Shared application state.
pub struct AppState {
    /// Session lifecycle service, built once at startup.
    pub sessions: SessionService,
}
