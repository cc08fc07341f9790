//! Sign-in and token endpoint payloads.

use serde::{Deserialize, Serialize};

/// Body of `POST /signin`.
///
/// A present `display_name` marks the request as a sign-up for a new
/// identity; an absent one asks to sign in an existing identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthRequest {
    /// Opaque user identifier issued by the identity provider.
    #[serde(alias = "uid")]
    pub external_id: String,
    #[serde(default, alias = "name", skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl AuthRequest {
    pub fn sign_up(external_id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            external_id: external_id.into(),
            display_name: Some(display_name.into()),
        }
    }

    pub fn sign_in(external_id: impl Into<String>) -> Self {
        Self {
            external_id: external_id.into(),
            display_name: None,
        }
    }
}

/// Access and refresh token issued together on sign-up or sign-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Response of `POST /token/renew`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessTokenResponse {
    pub access_token: String,
}
