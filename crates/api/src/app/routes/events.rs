//! Event routes. A community holds at most one event at a time: scheduling a
//! new one replaces whatever the community had.

use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};

use connectlife_core::{CommunityId, VenueId};
use connectlife_domain::{policy, Event};

use crate::app::dto::{self, CreateEventRequest, ListEventsQuery};
use crate::app::errors::ApiError;
use crate::app::services::AppServices;
use crate::context::Caller;

pub fn router() -> Router {
    Router::new().route("/", get(list_events).post(create_event))
}

pub async fn create_event(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<Caller>,
    Json(body): Json<CreateEventRequest>,
) -> Result<axum::response::Response, ApiError> {
    let (Some(chat), Some(name), Some(when_at), Some(local)) =
        (&body.chat, &body.name, &body.when_at, &body.local)
    else {
        return Err(ApiError::Validation(
            "chat, nome, dataHora and local are required".to_string(),
        ));
    };

    let when_at: DateTime<Utc> = when_at
        .parse()
        .map_err(|_| ApiError::Validation("dataHora must be an RFC 3339 datetime".to_string()))?;

    let community_id: CommunityId = chat.parse()?;
    let community = services
        .docs
        .community(community_id)
        .ok_or_else(|| ApiError::NotFound("community not found".to_string()))?;

    policy::event_create(caller.actor(), &community)?;

    let venue_id: VenueId = local.parse()?;
    if services.docs.venue(venue_id).is_none() {
        return Err(ApiError::NotFound("venue not found".to_string()));
    }

    let event = Event::create(
        community_id,
        name,
        body.description.clone().unwrap_or_default(),
        when_at,
        venue_id,
        body.sport.clone().unwrap_or_default(),
        Utc::now(),
    )?;

    let replaced = services.docs.replace_community_event(event.clone())?;
    if replaced > 0 {
        tracing::info!(community_id = %community_id, replaced, "prior events replaced");
    }

    Ok((
        StatusCode::CREATED,
        Json(dto::event_to_json(&services.docs, &event)),
    )
        .into_response())
}

pub async fn list_events(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<ListEventsQuery>,
) -> Result<axum::response::Response, ApiError> {
    let after = match query.futura.as_deref() {
        Some("true") => Some(Utc::now()),
        _ => None,
    };

    let body: Vec<_> = services
        .docs
        .list_events(after)
        .iter()
        .map(|e| dto::event_to_json(&services.docs, e))
        .collect();

    Ok(Json(serde_json::Value::Array(body)).into_response())
}
