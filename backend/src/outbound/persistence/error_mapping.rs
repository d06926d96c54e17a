//! Translation of pool and Diesel failures into port errors.
//!
//! Each repository passes its own `query`/`connection` constructors so the
//! classification below lives in one place.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Unique constraint guarding `users.email`.
pub(super) const USERS_EMAIL_CONSTRAINT: &str = "users_email_key";

/// Classification of a Diesel failure before it becomes a port error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum Failure {
    Connection(&'static str),
    Query(String),
    UniqueViolation { constraint: Option<String> },
}

pub(super) fn classify(error: DieselError) -> Failure {
    match error {
        DieselError::NotFound => Failure::Query("record not found".into()),
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            Failure::UniqueViolation {
                constraint: info.constraint_name().map(str::to_owned),
            }
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, info) => {
            debug!(message = info.message(), "database connection closed");
            Failure::Connection("database connection closed")
        }
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "database rejected statement");
            Failure::Query(format!("database error: {}", info.message()))
        }
        DieselError::SerializationError(err) | DieselError::DeserializationError(err) => {
            Failure::Query(format!("column conversion failed: {err}"))
        }
        other => {
            debug!(error = %other, "diesel operation failed");
            Failure::Query("database error".into())
        }
    }
}

/// Map a pool failure through the repository's connection constructor.
pub(super) fn map_pool_failure<E>(error: PoolError, connection: impl FnOnce(String) -> E) -> E {
    let message = match error {
        PoolError::Checkout { message }
        | PoolError::Build { message }
        | PoolError::Migration { message } => message,
    };
    connection(message)
}

/// Map a Diesel failure for repositories without constraint-specific errors.
pub(super) fn map_query_failure<E>(
    error: DieselError,
    query: impl FnOnce(String) -> E,
    connection: impl FnOnce(String) -> E,
) -> E {
    match classify(error) {
        Failure::Connection(message) => connection(message.to_owned()),
        Failure::Query(message) => query(message),
        Failure::UniqueViolation { constraint } => query(format!(
            "unique constraint violated: {}",
            constraint.as_deref().unwrap_or("unknown")
        )),
    }
}
