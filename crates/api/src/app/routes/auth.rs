//! Registration and login (the only unauthenticated JSON routes).

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use chrono::Utc;

use connectlife_auth::{hash_password, verify_password, Role};
use connectlife_domain::User;

use crate::app::dto::{LoginRequest, RegisterRequest};
use crate::app::errors::ApiError;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

pub async fn register(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<RegisterRequest>,
) -> Result<axum::response::Response, ApiError> {
    if body.password.is_empty() {
        return Err(ApiError::Validation("password is required".to_string()));
    }

    let role = match body.role.as_deref() {
        Some("admin") => Role::Admin,
        _ => Role::Member,
    };

    let password_hash = hash_password(&body.password).map_err(|e| {
        tracing::error!("password hashing failed: {e}");
        ApiError::Internal
    })?;

    let user = User::create(&body.name, &body.email, password_hash, role, Utc::now())?;
    let id = user.id;
    services.docs.insert_user(user)?;

    tracing::info!(user_id = %id, "account registered");

    Ok((StatusCode::CREATED, Json(serde_json::json!({ "id": id.to_string() }))).into_response())
}

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<LoginRequest>,
) -> Result<axum::response::Response, ApiError> {
    let email = body.email.trim().to_lowercase();
    let user = services
        .docs
        .user_by_email(&email)
        .ok_or_else(|| ApiError::Validation("unknown email".to_string()))?;

    if !user.active {
        return Err(ApiError::Validation("account is deactivated".to_string()));
    }
    if !verify_password(&body.password, &user.password_hash) {
        return Err(ApiError::Validation("incorrect password".to_string()));
    }

    let token = services.codec.issue(user.id, user.role)?;

    Ok(Json(serde_json::json!({
        "token": token,
        "usuario": {
            "id": user.id.to_string(),
            "nome": user.name,
            "email": user.email,
            "tipo": user.role.as_str(),
        },
    }))
    .into_response())
}
