//! Outbound adapters implementing the domain ports.
//!
//! - **persistence**: PostgreSQL repositories using Diesel.
//! - **memory**: process-local repositories for development and tests.
//! - **security**: Argon2id password hashing and JWT bearer tokens.
//! - **payments**: payment gateway over HTTP, simulated, or absent.
//! - **media**: listing photo uploads over HTTP or deterministic fixtures.
//!
//! Adapters translate between domain types and wire or row formats. They
//! hold no business rules.

pub mod media;
pub mod memory;
pub mod payments;
pub mod persistence;
pub mod security;
