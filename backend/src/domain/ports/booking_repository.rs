//! Port for booking storage.
use async_trait::async_trait;

use crate::domain::{Booking, BookingId, Error, PropertyId, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by booking repository adapters.
    pub enum BookingPersistenceError {
        Connection { message: String } => "booking repository connection failed: {message}",
        Query { message: String } => "booking repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn insert(&self, booking: &Booking) -> Result<(), BookingPersistenceError>;

    /// Overwrite payment state. Returns `false` when the booking is unknown.
    async fn update(&self, booking: &Booking) -> Result<bool, BookingPersistenceError>;

    async fn find_by_id(&self, id: &BookingId) -> Result<Option<Booking>, BookingPersistenceError>;

    /// Bookings made by `guest`, newest first.
    async fn list_for_guest(&self, guest: &UserId) -> Result<Vec<Booking>, BookingPersistenceError>;

    /// Bookings against any of `properties`, newest first.
    async fn list_for_properties(
        &self,
        properties: &[PropertyId],
    ) -> Result<Vec<Booking>, BookingPersistenceError>;
}

impl From<BookingPersistenceError> for Error {
    fn from(err: BookingPersistenceError) -> Self {
        match err {
            BookingPersistenceError::Connection { message } => {
                Error::service_unavailable(format!("booking repository unavailable: {message}"))
            }
            BookingPersistenceError::Query { message } => {
                Error::internal(format!("booking repository error: {message}"))
            }
        }
    }
}
