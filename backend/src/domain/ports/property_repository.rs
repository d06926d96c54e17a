//! Port for listing storage.
use async_trait::async_trait;

use crate::domain::{Error, Property, PropertyFilter, PropertyId, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by property repository adapters.
    pub enum PropertyPersistenceError {
        Connection { message: String } => "property repository connection failed: {message}",
        Query { message: String } => "property repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PropertyRepository: Send + Sync {
    async fn insert(&self, property: &Property) -> Result<(), PropertyPersistenceError>;

    /// Overwrite a stored listing. Returns `false` when it does not exist.
    async fn update(&self, property: &Property) -> Result<bool, PropertyPersistenceError>;

    async fn find_by_id(&self, id: &PropertyId)
    -> Result<Option<Property>, PropertyPersistenceError>;

    /// Fetch listings with the given identifiers; unknown ids are skipped.
    async fn find_many(&self, ids: &[PropertyId]) -> Result<Vec<Property>, PropertyPersistenceError>;

    /// Public search, newest first, capped at `filter.limit`.
    async fn search(&self, filter: &PropertyFilter)
    -> Result<Vec<Property>, PropertyPersistenceError>;

    /// Every listing owned by `host`, newest first.
    async fn list_by_host(&self, host: &UserId) -> Result<Vec<Property>, PropertyPersistenceError>;
}

impl From<PropertyPersistenceError> for Error {
    fn from(err: PropertyPersistenceError) -> Self {
        match err {
            PropertyPersistenceError::Connection { message } => {
                Error::service_unavailable(format!("property repository unavailable: {message}"))
            }
            PropertyPersistenceError::Query { message } => {
                Error::internal(format!("property repository error: {message}"))
            }
        }
    }
}
