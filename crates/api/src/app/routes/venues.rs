//! Venue routes ("locais"). Admin-managed; readable by anyone signed in.

use std::sync::Arc;

use axum::{
    extract::{Extension, Multipart, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::Utc;

use connectlife_core::VenueId;
use connectlife_domain::{policy, Venue};

use crate::app::errors::ApiError;
use crate::app::services::AppServices;
use crate::app::{dto, uploads};
use crate::context::Caller;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_venues).post(create_venue))
        .route("/:id", axum::routing::delete(delete_venue))
}

pub async fn create_venue(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<Caller>,
    multipart: Multipart,
) -> Result<axum::response::Response, ApiError> {
    policy::venue_manage(caller.actor())?;

    let form = uploads::read_form(multipart, "imagem", &services.upload_dir).await?;

    let venue = Venue::create(
        form.text("nome").unwrap_or_default(),
        form.text("endereco").unwrap_or_default(),
        form.picture().map(String::from),
        caller.user_id(),
        Utc::now(),
    )?;

    let body = dto::venue_to_json(&venue);
    tracing::info!(venue_id = %venue.id, "venue created");
    services.docs.insert_venue(venue)?;

    Ok((StatusCode::CREATED, Json(body)).into_response())
}

pub async fn list_venues(
    Extension(services): Extension<Arc<AppServices>>,
) -> Result<axum::response::Response, ApiError> {
    let body: Vec<_> = services
        .docs
        .list_venues()
        .iter()
        .map(dto::venue_to_json)
        .collect();

    Ok(Json(serde_json::Value::Array(body)).into_response())
}

pub async fn delete_venue(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
) -> Result<axum::response::Response, ApiError> {
    policy::venue_manage(caller.actor())?;

    let id: VenueId = id.parse()?;
    services
        .docs
        .remove_venue(id)
        .ok_or_else(|| ApiError::NotFound("venue not found".to_string()))?;

    tracing::info!(venue_id = %id, "venue removed");

    Ok(Json(serde_json::json!({ "id": id.to_string() })).into_response())
}
