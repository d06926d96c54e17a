//! Port for signed session tokens handed to API clients.
use crate::domain::UserId;

use super::define_port_error;

define_port_error! {
    pub enum TokenError {
        Encode { message: String } => "session token could not be issued: {message}",
        Expired => "session token has expired",
        Invalid { message: String } => "session token is invalid: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
pub trait TokenIssuer: Send + Sync {
    /// Sign a token naming `user` as its subject.
    fn issue(&self, user: &UserId) -> Result<String, TokenError>;

    /// Check signature and expiry, returning the subject.
    fn verify(&self, token: &str) -> Result<UserId, TokenError>;
}
