//! `connectlife-auth` — pure authentication boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage: it issues and
//! verifies bearer tokens and hashes credentials, nothing else. Resource-level
//! ownership rules live in `connectlife-domain`.

pub mod claims;
pub mod password;
pub mod roles;
pub mod token;

pub use claims::{Claims, TokenValidationError, validate_claims};
pub use password::{hash_password, verify_password, PasswordError};
pub use roles::Role;
pub use token::{TokenCodec, TokenError, TOKEN_TTL_SECS};
