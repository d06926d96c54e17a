//! Domain primitives, aggregates and services.
//!
//! Purpose: define the marketplace's strongly typed entities (accounts,
//! listings, bookings), the rules that govern them (password policy, listing
//! completion, pricing) and the services that drive them through ports.
//! Nothing here knows about HTTP or SQL.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - User, Property, Booking and their validated value objects.
//! - CompletionStatus and the pricing functions.
//! - AccountServiceImpl, ListingServiceImpl, BookingServiceImpl.

pub mod account_service;
pub mod auth;
pub mod booking;
pub mod booking_service;
pub mod error;
pub mod listing_completion;
pub mod listing_service;
pub mod ports;
pub mod pricing;
pub mod property;
#[cfg(test)]
pub(crate) mod service_fixtures;
pub mod trace_id;
pub mod user;

pub use self::account_service::AccountServiceImpl;
pub use self::auth::{
    LoginCredentials, LoginRole, PASSWORD_MIN_LEN, PASSWORD_SPECIAL_CHARACTERS, Password,
    PasswordChange, PasswordPolicyError, ProfileUpdate, Registration, RegistrationParts,
};
pub use self::booking::{
    Booking, BookingId, BookingRequest, BookingView, DurationUnit, GuestContact, PaymentMethod,
    PaymentStatus, PaymentVerification, StayTerm,
};
pub use self::booking_service::BookingServiceImpl;
pub use self::error::{Error, ErrorCode};
pub use self::listing_completion::{CompletionStatus, MIN_LISTING_IMAGES};
pub use self::listing_service::{ListingServiceImpl, MAX_LISTING_UPLOADS};
pub use self::pricing::PricingError;
pub use self::property::{
    HostSummary, Location, PROPERTY_LIST_LIMIT, Property, PropertyDraft, PropertyFields,
    PropertyFilter, PropertyId, PropertyPatch, PropertyPricing, PropertySummary, PropertyType,
    PropertyValidationError, RentalType,
};
pub use self::trace_id::TraceId;
pub use self::user::{
    AvatarUrl, EmailAddress, HashedPassword, PaymentAccountId, PersonName, PhoneNumber, User,
    UserAccount, UserId, UserValidationError,
};

/// Response header carrying the request's trace identifier.
pub const TRACE_ID_HEADER: &str = "trace-id";

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use traveltrove::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
