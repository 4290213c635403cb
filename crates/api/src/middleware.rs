//! The authorization gate: bearer token verification for protected routes.

use std::sync::Arc;

use axum::{
    extract::State,
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use connectlife_auth::TokenCodec;

use crate::app::errors::ApiError;
use crate::context::Caller;

#[derive(Clone)]
pub struct AuthState {
    pub codec: Arc<TokenCodec>,
}

/// Verify the bearer token and attach the caller to the request.
///
/// Every protected handler runs strictly after this: an expired, tampered or
/// missing token never reaches handler logic.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer(req.headers())?;

    let claims = state
        .codec
        .verify(token)
        .map_err(|e| ApiError::InvalidToken(e.to_string()))?;

    req.extensions_mut()
        .insert(Caller::new(claims.sub, claims.role));

    Ok(next.run(req).await)
}

fn extract_bearer(headers: &HeaderMap) -> Result<&str, ApiError> {
    let header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or(ApiError::MissingToken)?;

    let header = header.to_str().map_err(|_| ApiError::MissingToken)?;

    let header = header.strip_prefix("Bearer ").ok_or(ApiError::MissingToken)?;

    let token = header.trim();
    if token.is_empty() {
        return Err(ApiError::MissingToken);
    }

    Ok(token)
}
