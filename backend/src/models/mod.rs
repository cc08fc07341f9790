pub mod user;

pub use user::{NewUser, SessionState, User};
