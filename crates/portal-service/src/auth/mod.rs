//! Session token handling for the portal.
//!
//! - [`session`] - issuing and verifying HS256 session tokens
//! - [`authenticator`] - `Authorization: Bearer` request authentication

pub mod authenticator;
pub mod session;

pub use authenticator::{authenticate, AuthFailure};
pub use session::{
    issue_session_token, verify_session_token, SessionKeys, SESSION_TOKEN_TTL_SECONDS,
};
