//! OpenAPI documentation for the TravelTrove REST API.
//!
//! [`ApiDoc`] registers every handler under `inbound::http`, the response
//! bodies they emit and two security schemes: the `session` cookie set on
//! register/login and the bearer token returned in the same responses.
//! Swagger UI serves it in debug builds and `openapi-dump` prints it.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::auth::{
    AuthResponse, LoginRequest, OnboardingRequest, OnboardingResponse, OnboardingWebhookRequest,
    PaymentAccountRequest, RegisterRequest, UpdatePasswordRequest, UpdateProfileRequest,
    UserResponse,
};
use crate::inbound::http::bookings::{
    BookingResponse, BookingsResponse, CheckoutBody, CreateBookingRequest, VerifyPaymentRequest,
    VerifyPaymentResponse,
};
use crate::inbound::http::health::ProbeBody;
use crate::inbound::http::listing_form::ListingPayload;
use crate::inbound::http::properties::{PropertiesResponse, PropertyResponse};
use crate::inbound::http::responses::{
    BookingBody, CompletionBody, GuestBody, HostBody, PropertyBody, PropertySummaryBody, UserBody,
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Encrypted session cookie set by register and login.",
            ))),
        );
        components.add_security_scheme(
            "BearerAuth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Token returned by register and login."))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "TravelTrove API",
        description = "Accounts, property listings and bookings for the TravelTrove marketplace."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = []), ("BearerAuth" = [])),
    paths(
        crate::inbound::http::auth::register,
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::auth::me,
        crate::inbound::http::auth::update_me,
        crate::inbound::http::auth::update_password,
        crate::inbound::http::auth::delete_me,
        crate::inbound::http::auth::link_payment_account,
        crate::inbound::http::auth::start_onboarding,
        crate::inbound::http::auth::onboarding_webhook,
        crate::inbound::http::properties::list_properties,
        crate::inbound::http::properties::my_properties,
        crate::inbound::http::properties::get_property,
        crate::inbound::http::properties::create_property,
        crate::inbound::http::properties::update_property,
        crate::inbound::http::bookings::create_booking,
        crate::inbound::http::bookings::verify_payment,
        crate::inbound::http::bookings::my_bookings,
        crate::inbound::http::bookings::host_bookings,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        RegisterRequest,
        LoginRequest,
        UpdateProfileRequest,
        UpdatePasswordRequest,
        PaymentAccountRequest,
        OnboardingRequest,
        OnboardingWebhookRequest,
        AuthResponse,
        UserResponse,
        OnboardingResponse,
        ListingPayload,
        PropertiesResponse,
        PropertyResponse,
        CreateBookingRequest,
        VerifyPaymentRequest,
        BookingResponse,
        VerifyPaymentResponse,
        BookingsResponse,
        CheckoutBody,
        UserBody,
        CompletionBody,
        HostBody,
        PropertyBody,
        PropertySummaryBody,
        GuestBody,
        BookingBody,
        ProbeBody,
    )),
    tags(
        (name = "auth", description = "Registration, sessions and account management"),
        (name = "properties", description = "Property listings"),
        (name = "bookings", description = "Bookings and payment verification"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
