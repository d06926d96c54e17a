//! Credential adapters: Argon2id password hashing and HS256 bearer tokens.

mod argon2_hasher;
mod jwt_token_issuer;

pub use argon2_hasher::Argon2PasswordHasher;
pub use jwt_token_issuer::{DEFAULT_TOKEN_TTL_DAYS, JwtTokenIssuer, TOKEN_SECRET_MIN_LEN};
