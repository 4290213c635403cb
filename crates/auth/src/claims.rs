use serde::{Deserialize, Serialize};
use thiserror::Error;

use connectlife_core::UserId;

use crate::Role;

/// Bearer token claims (transport-agnostic).
///
/// This is the full set of claims a verified token carries: who is calling and
/// which role they hold. Handlers must treat this as the only source of caller
/// identity — never identity fields from a request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the account the token was issued to.
    pub sub: UserId,

    /// Role granted at issue time. Role changes after issuance do not
    /// propagate; the token stays valid as issued until it expires.
    pub role: Role,

    /// Issued-at (unix seconds).
    pub iat: i64,

    /// Expiration (unix seconds).
    pub exp: i64,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenValidationError {
    #[error("token has expired")]
    Expired,

    #[error("token not yet valid (iat is in the future)")]
    NotYetValid,

    #[error("invalid token time window (exp <= iat)")]
    InvalidTimeWindow,
}

/// Deterministically validate a claims time window.
///
/// Note: this validates the *claims* only. Signature verification/decoding is
/// the codec's job (`token::TokenCodec`).
pub fn validate_claims(claims: &Claims, now: i64) -> Result<(), TokenValidationError> {
    if claims.exp <= claims.iat {
        return Err(TokenValidationError::InvalidTimeWindow);
    }
    if now < claims.iat {
        return Err(TokenValidationError::NotYetValid);
    }
    if now >= claims.exp {
        return Err(TokenValidationError::Expired);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(iat: i64, exp: i64) -> Claims {
        Claims {
            sub: UserId::new(),
            role: Role::Member,
            iat,
            exp,
        }
    }

    #[test]
    fn valid_window_passes() {
        assert_eq!(validate_claims(&claims(100, 200), 150), Ok(()));
    }

    #[test]
    fn expired_token_rejected() {
        assert_eq!(
            validate_claims(&claims(100, 200), 200),
            Err(TokenValidationError::Expired)
        );
    }

    #[test]
    fn future_iat_rejected() {
        assert_eq!(
            validate_claims(&claims(100, 200), 50),
            Err(TokenValidationError::NotYetValid)
        );
    }

    #[test]
    fn inverted_window_rejected() {
        assert_eq!(
            validate_claims(&claims(200, 100), 150),
            Err(TokenValidationError::InvalidTimeWindow)
        );
    }
}
