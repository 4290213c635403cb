//! Signed bearer token issue/verify (HS256).
//!
//! Tokens carry `{sub, role}` plus issued-at and a fixed 12-hour expiry. There
//! is no refresh mechanism and no revocation list: expiry forces re-login, and
//! a token issued before an account was deactivated or deleted stays valid for
//! its remaining lifetime.

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;

use connectlife_core::UserId;

use crate::{Claims, Role};

/// Fixed token lifetime (12 hours), in seconds.
pub const TOKEN_TTL_SECS: i64 = 12 * 60 * 60;

#[derive(Debug, Error)]
pub enum TokenError {
    /// Signature invalid, token malformed, or expired.
    #[error("invalid token: {0}")]
    Invalid(String),

    #[error("failed to encode token: {0}")]
    Encode(String),
}

/// HS256 token codec around a server-side secret.
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    /// Issue a token for an account.
    pub fn issue(&self, sub: UserId, role: Role) -> Result<String, TokenError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub,
            role,
            iat: now,
            exp: now + TOKEN_TTL_SECS,
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::Encode(e.to_string()))
    }

    /// Verify a token and return its claims.
    ///
    /// Fails on bad signature, malformed input, or expiry — the caller cannot
    /// distinguish these on purpose.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| TokenError::Invalid(e.to_string()))
    }
}
