//! TravelTrove backend: property listings, bookings and payments over REST.
//!
//! The crate is laid out hexagonally. `domain` owns entities, rules and the
//! ports it drives; `inbound::http` adapts HTTP requests onto those ports and
//! `outbound` implements the ports against PostgreSQL, the payment gateway
//! and the media host.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
