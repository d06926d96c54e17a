//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;

use crate::domain::ports::{
    AccountService, BookingService, ListingService, MockAccountService, MockBookingService,
    MockListingService, MockTokenIssuer, TokenIssuer,
};
use crate::inbound::http::state::HttpState;

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Mock ports handed to [`HttpState`]; tests set expectations on the ones
/// they exercise and leave the rest untouched.
pub struct MockPorts {
    pub accounts: MockAccountService,
    pub listings: MockListingService,
    pub bookings: MockBookingService,
    pub tokens: MockTokenIssuer,
}

impl MockPorts {
    pub fn new() -> Self {
        Self {
            accounts: MockAccountService::new(),
            listings: MockListingService::new(),
            bookings: MockBookingService::new(),
            tokens: MockTokenIssuer::new(),
        }
    }

    pub fn into_state(self) -> HttpState {
        let accounts: Arc<dyn AccountService> = Arc::new(self.accounts);
        let listings: Arc<dyn ListingService> = Arc::new(self.listings);
        let bookings: Arc<dyn BookingService> = Arc::new(self.bookings);
        let tokens: Arc<dyn TokenIssuer> = Arc::new(self.tokens);
        HttpState::new(accounts, listings, bookings, tokens)
    }
}
