//! Port abstraction for account persistence adapters and their errors.
use async_trait::async_trait;
use serde_json::json;

use crate::domain::{EmailAddress, Error, HashedPassword, User, UserAccount, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// Another account already uses the email address.
        DuplicateEmail => "email address is already registered",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Store a new account. Fails with `DuplicateEmail` when the address is
    /// taken.
    async fn insert(&self, account: &UserAccount) -> Result<(), UserPersistenceError>;

    /// Fetch an account by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserAccount>, UserPersistenceError>;

    /// Fetch an account by its normalised email address.
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserAccount>, UserPersistenceError>;

    /// Fetch the users with the given identifiers; unknown ids are skipped.
    async fn find_many(&self, ids: &[UserId]) -> Result<Vec<User>, UserPersistenceError>;

    /// Overwrite the profile, host flag and payout account. Returns `false`
    /// when no such user exists.
    async fn update(&self, user: &User) -> Result<bool, UserPersistenceError>;

    /// Replace the stored password hash.
    async fn update_password(
        &self,
        id: &UserId,
        hash: &HashedPassword,
    ) -> Result<bool, UserPersistenceError>;

    /// Remove the account together with its listings and bookings.
    async fn delete(&self, id: &UserId) -> Result<bool, UserPersistenceError>;
}

impl From<UserPersistenceError> for Error {
    fn from(err: UserPersistenceError) -> Self {
        match err {
            UserPersistenceError::Connection { message } => {
                Error::service_unavailable(format!("user repository unavailable: {message}"))
            }
            UserPersistenceError::Query { message } => {
                Error::internal(format!("user repository error: {message}"))
            }
            UserPersistenceError::DuplicateEmail => {
                Error::conflict("email address is already registered")
                    .with_details(json!({ "field": "email", "code": "duplicate_email" }))
            }
        }
    }
}
