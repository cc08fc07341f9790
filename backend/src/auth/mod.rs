//! Token issuance and verification.

pub mod bearer;
pub mod claims;
pub mod token;

pub use bearer::{bearer_token, AuthError};
pub use claims::{TokenClaim, TokenKind};
pub use token::{TokenCodec, TokenError};
