/// Session state of a user, mirrored by the nullable `refresh_token` column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// No refresh token stored.
    None,
    /// A refresh token is stored and the user counts as signed in.
    Active(String),
}

impl SessionState {
    pub fn from_column(refresh_token: Option<String>) -> Self {
        match refresh_token {
            Some(token) => SessionState::Active(token),
            None => SessionState::None,
        }
    }
}

/// Data needed to create a user row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    /// Identifier from the identity provider
    pub external_id: String,
    pub display_name: Option<String>,
}

/// User record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Primary identity, embedded as `sub` in every token issued for this user
    pub internal_id: i64,
    /// Identifier from the identity provider (unique)
    pub external_id: String,
    pub display_name: Option<String>,
}
