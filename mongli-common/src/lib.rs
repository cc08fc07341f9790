//! Mongli Common Types
//!
//! Wire types shared by the session backend and its clients.

pub mod auth;
pub mod user;

pub use auth::{AccessTokenResponse, AuthRequest, TokenPair};
pub use user::RenameRequest;
