//! Account routes: self-service profile plus admin management.

use std::sync::Arc;

use axum::{
    extract::{Extension, Multipart, Path},
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use connectlife_auth::Role;
use connectlife_core::UserId;
use connectlife_domain::{policy, AdminUserEdit, PictureEdit};

use crate::app::errors::ApiError;
use crate::app::services::AppServices;
use crate::app::{dto, uploads};
use crate::authz;
use crate::context::Caller;

pub fn router() -> Router {
    Router::new()
        .route("/me", get(get_me).put(update_me))
        .route("/list", get(list_users))
        .route("/:id", get(get_user).put(update_user).delete(delete_user))
}

pub async fn get_me(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<Caller>,
) -> Result<axum::response::Response, ApiError> {
    let user = services
        .docs
        .user(caller.user_id())
        .ok_or_else(|| ApiError::NotFound("account no longer exists".to_string()))?;

    Ok(Json(dto::user_to_json(&user)).into_response())
}

/// Self-service edit: name and picture only. The form cannot carry role or
/// active-flag changes; those exist solely on the admin path.
pub async fn update_me(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<Caller>,
    multipart: Multipart,
) -> Result<axum::response::Response, ApiError> {
    let form = uploads::read_form(multipart, "pfp", &services.upload_dir).await?;

    let mut user = services
        .docs
        .user(caller.user_id())
        .ok_or_else(|| ApiError::NotFound("account no longer exists".to_string()))?;

    user.apply_self_edit(form.text("nome"), form.picture().map(String::from))?;
    services.docs.update_user(user.clone())?;

    Ok(Json(dto::user_to_json(&user)).into_response())
}

pub async fn list_users(
    Extension(services): Extension<Arc<AppServices>>,
) -> Result<axum::response::Response, ApiError> {
    let users: Vec<_> = services
        .docs
        .list_users()
        .iter()
        .map(dto::user_to_json)
        .collect();

    Ok(Json(serde_json::Value::Array(users)).into_response())
}

pub async fn get_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
) -> Result<axum::response::Response, ApiError> {
    authz::require_admin(&caller)?;

    let id: UserId = id.parse()?;
    let user = services
        .docs
        .user(id)
        .ok_or_else(|| ApiError::NotFound("user not found".to_string()))?;

    Ok(Json(dto::user_to_json(&user)).into_response())
}

pub async fn update_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<axum::response::Response, ApiError> {
    let id: UserId = id.parse()?;
    policy::user_admin_manage(caller.actor(), id)?;

    let form = uploads::read_form(multipart, "pfp", &services.upload_dir).await?;

    let mut user = services
        .docs
        .user(id)
        .ok_or_else(|| ApiError::NotFound("user not found".to_string()))?;

    let role = match form.text("tipo") {
        None => None,
        Some("admin") => Some(Role::Admin),
        Some("member") => Some(Role::Member),
        Some(other) => {
            return Err(ApiError::Validation(format!(
                "tipo must be admin or member, got '{other}'"
            )))
        }
    };

    let picture = if let Some(path) = form.picture() {
        PictureEdit::Set(path.to_string())
    } else if form.text("resetPfp") == Some("true") {
        PictureEdit::Reset
    } else {
        PictureEdit::Keep
    };

    user.apply_admin_edit(AdminUserEdit {
        name: form.text("nome").map(String::from),
        email: form.text("email").map(String::from),
        role,
        active: form.text("ativo").map(|v| v == "true"),
        picture,
    })?;

    // Email uniqueness is probed before the write; a collision with another
    // account surfaces as a conflict instead of silently relying on the store.
    services.docs.update_user(user.clone())?;

    tracing::info!(user_id = %id, admin = %caller.user_id(), "account updated by admin");

    Ok(Json(dto::user_to_json(&user)).into_response())
}

pub async fn delete_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
) -> Result<axum::response::Response, ApiError> {
    let id: UserId = id.parse()?;
    policy::user_admin_manage(caller.actor(), id)?;

    services
        .docs
        .remove_user(id)
        .ok_or_else(|| ApiError::NotFound("user not found".to_string()))?;

    tracing::info!(user_id = %id, admin = %caller.user_id(), "account removed");

    Ok(Json(serde_json::json!({ "id": id.to_string() })).into_response())
}
