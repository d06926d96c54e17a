//! Driving port for booking use-cases.
use async_trait::async_trait;

use crate::domain::{Booking, BookingRequest, BookingView, Error, PaymentVerification, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingService: Send + Sync {
    /// Price and store a booking, opening a gateway order for online
    /// payment.
    async fn create(&self, guest: &UserId, request: BookingRequest) -> Result<Booking, Error>;

    /// Mark a booking paid and pay the host out on a best-effort basis.
    async fn verify_payment(
        &self,
        caller: &UserId,
        verification: PaymentVerification,
    ) -> Result<Booking, Error>;

    async fn guest_bookings(&self, guest: &UserId) -> Result<Vec<BookingView>, Error>;

    async fn host_bookings(&self, host: &UserId) -> Result<Vec<BookingView>, Error>;
}
