//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod account_service;
mod booking_repository;
mod booking_service;
mod listing_service;
mod media_store;
mod password_hasher;
mod payment_gateway;
mod property_repository;
mod token_issuer;
mod user_repository;

#[cfg(test)]
pub use account_service::MockAccountService;
pub use account_service::{AccountService, AuthSession};
#[cfg(test)]
pub use booking_repository::MockBookingRepository;
pub use booking_repository::{BookingPersistenceError, BookingRepository};
#[cfg(test)]
pub use booking_service::MockBookingService;
pub use booking_service::BookingService;
#[cfg(test)]
pub use listing_service::MockListingService;
pub use listing_service::{ListingService, ListingView};
#[cfg(test)]
pub use media_store::MockMediaStore;
pub use media_store::{LISTING_MEDIA_FOLDER, MediaStore, MediaStoreError, MediaUpload};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use payment_gateway::MockPaymentGateway;
pub use payment_gateway::{
    BOOKING_CURRENCY, OnboardingRequest, OrderRequest, PaymentGateway, PaymentGatewayError,
    PaymentOrder, TransferRequest, to_minor_units,
};
#[cfg(test)]
pub use property_repository::MockPropertyRepository;
pub use property_repository::{PropertyPersistenceError, PropertyRepository};
#[cfg(test)]
pub use token_issuer::MockTokenIssuer;
pub use token_issuer::{TokenError, TokenIssuer};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
