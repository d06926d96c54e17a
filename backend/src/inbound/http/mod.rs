//! HTTP inbound adapter exposing the REST endpoints.
//!
//! Handlers only see driving ports through [`state::HttpState`]; routing and
//! middleware are assembled by the server binary from the scopes below.

pub mod auth;
pub mod bookings;
pub mod error;
pub mod health;
pub mod listing_form;
pub mod properties;
pub mod responses;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

use actix_web::{Scope, web};

pub use error::ApiResult;

/// JSON extractor settings shared by every scope.
///
/// Body decoding failures are reported with the standard error payload
/// rather than actix's plain-text default.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| validation::malformed_body_error(err).into())
}

/// `/api/auth` routes.
pub fn auth_scope() -> Scope {
    web::scope("/api/auth")
        .service(auth::register)
        .service(auth::login)
        .service(auth::logout)
        .service(auth::me)
        .service(auth::update_me)
        .service(auth::update_password)
        .service(auth::delete_me)
        .service(auth::link_payment_account)
        .service(auth::start_onboarding)
        .service(auth::onboarding_webhook)
}

/// `/api/properties` routes. `my-properties` is registered ahead of `{id}`.
pub fn properties_scope() -> Scope {
    web::scope("/api/properties")
        .service(properties::list_properties)
        .service(properties::my_properties)
        .service(properties::get_property)
        .service(properties::create_property)
        .service(properties::update_property)
}

/// `/api/bookings` routes.
pub fn bookings_scope() -> Scope {
    web::scope("/api/bookings")
        .service(bookings::create_booking)
        .service(bookings::verify_payment)
        .service(bookings::my_bookings)
        .service(bookings::host_bookings)
}
