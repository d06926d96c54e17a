//! Request middleware.
//!
//! Purpose: per-request concerns applied to every route, currently trace
//! identifier propagation.

pub mod trace;

pub use trace::Trace;
