//! Listing photo storage adapters.

mod fixture;
mod http_store;

pub use fixture::{DEFAULT_FIXTURE_MEDIA_BASE, FixtureMediaStore};
pub use http_store::HttpMediaStore;
