//! Port for one-way password hashing.
use crate::domain::{HashedPassword, Password};

use super::define_port_error;

define_port_error! {
    pub enum PasswordHashError {
        /// Hashing itself failed.
        Hash { message: String } => "password hashing failed: {message}",
        /// A stored hash could not be parsed.
        MalformedHash { message: String } => "stored password hash is malformed: {message}",
    }
}

/// Hashes and checks passwords. Implementations are CPU bound and
/// synchronous.
#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, password: &Password) -> Result<HashedPassword, PasswordHashError>;

    /// `Ok(false)` for a wrong password; `Err` only when the stored hash is
    /// unusable.
    fn verify(&self, password: &Password, hash: &HashedPassword)
    -> Result<bool, PasswordHashError>;
}
