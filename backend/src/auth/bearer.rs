use axum::http::{header::AUTHORIZATION, HeaderMap};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Missing Authorization header")]
    MissingHeader,
    #[error("Invalid Authorization header format")]
    InvalidFormat,
}

/// Extract the token from an `Authorization: Bearer <token>` header.
///
/// Only the header shape is checked here; the token itself is left to the
/// token codec.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingHeader)?
        .to_str()
        .map_err(|_| AuthError::InvalidFormat)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::InvalidFormat)?
        .trim();

    if token.is_empty() || token.contains(char::is_whitespace) {
        return Err(AuthError::InvalidFormat);
    }

    Ok(token)
}
