//! Fixtures shared by unit and integration tests.

use std::sync::Arc;

use crate::auth::TokenCodec;
use crate::config::{AuthConfig, SessionPolicy};
use crate::session::SessionService;
use crate::store::SqliteCredentialStore;
use crate::AppState;

pub const TEST_SIGNING_SECRET: &str = "test-signing-secret";

pub fn test_auth_config() -> AuthConfig {
    AuthConfig {
        signing_secret: TEST_SIGNING_SECRET.to_string(),
        access_ttl_secs: crate::config::default_access_ttl(),
        refresh_ttl_secs: crate::config::default_refresh_ttl(),
    }
}

pub fn test_codec() -> TokenCodec {
    TokenCodec::new(&test_auth_config()).expect("Failed to build token codec")
}

/// Session service over a fresh in-memory store.
pub fn test_service(policy: SessionPolicy) -> SessionService {
    let store = SqliteCredentialStore::open(":memory:").expect("Failed to open in-memory store");
    SessionService::new(Arc::new(store), test_codec(), policy)
}

pub fn create_test_state(policy: SessionPolicy) -> Arc<AppState> {
    Arc::new(AppState {
        sessions: test_service(policy),
    })
}
