use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Kind of a signed token, carried in the `typ` claim.
///
/// Access and refresh tokens share the same payload shape, so the tag is what
/// keeps one from being accepted in place of the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    /// Short-lived credential authorizing API calls
    Access,
    /// Long-lived credential, persisted server-side, used to obtain access tokens
    Refresh,
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::Access => write!(f, "access"),
            TokenKind::Refresh => write!(f, "refresh"),
        }
    }
}

/// JWT claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaim {
    /// Internal user id
    pub sub: i64,
    /// Expiry (unix seconds)
    pub exp: i64,
    /// Issued at (unix seconds)
    pub iat: i64,
    /// Unique token id, so two tokens issued in the same second still differ
    pub jti: String,
    pub typ: TokenKind,
}

impl TokenClaim {
    /// Build a claim for `subject` expiring `lifetime_secs` from now.
    ///
    /// The expiry saturates at the end of the `i64` range.
    pub fn new(kind: TokenKind, subject: i64, lifetime_secs: i64) -> Self {
        let now = Utc::now().timestamp();
        Self {
            sub: subject,
            exp: now.saturating_add(lifetime_secs),
            iat: now,
            jti: uuid::Uuid::new_v4().to_string(),
            typ: kind,
        }
    }
}
