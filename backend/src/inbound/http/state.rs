//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use zeroize::Zeroizing;

use crate::domain::ports::{AccountService, BookingService, ListingService, TokenIssuer};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<dyn AccountService>,
    pub listings: Arc<dyn ListingService>,
    pub bookings: Arc<dyn BookingService>,
    /// Verifies bearer tokens presented instead of a session cookie.
    pub tokens: Arc<dyn TokenIssuer>,
    /// Shared secret the payment gateway sends with onboarding callbacks.
    /// When unset the callback is accepted without one.
    pub webhook_secret: Option<Arc<Zeroizing<String>>>,
}

impl HttpState {
    pub fn new(
        accounts: Arc<dyn AccountService>,
        listings: Arc<dyn ListingService>,
        bookings: Arc<dyn BookingService>,
        tokens: Arc<dyn TokenIssuer>,
    ) -> Self {
        Self {
            accounts,
            listings,
            bookings,
            tokens,
            webhook_secret: None,
        }
    }

    /// Require `secret` on onboarding callbacks.
    pub fn with_webhook_secret(mut self, secret: Option<String>) -> Self {
        self.webhook_secret = secret
            .filter(|value| !value.trim().is_empty())
            .map(|value| Arc::new(Zeroizing::new(value)));
        self
    }
}
