//! Community routes: creation, discovery, membership, configuration, chat.

use std::cmp::Reverse;
use std::sync::Arc;

use axum::{
    extract::{Extension, Multipart, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;

use connectlife_core::{CommunityId, UserId};
use connectlife_domain::{policy, Community, CommunityEdit, JoinDecision};

use crate::app::dto::{self, OpenCommunitiesQuery, PostMessageRequest};
use crate::app::errors::ApiError;
use crate::app::services::AppServices;
use crate::app::uploads;
use crate::authz;
use crate::context::Caller;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_community).get(list_my_communities))
        .route("/all-admin", get(list_all_communities))
        .route("/abertos", get(list_open_communities))
        .route("/:id/join", post(join_community))
        .route("/:id", axum::routing::put(update_community).delete(delete_community))
        .route("/:id/messages", get(list_messages).post(post_message))
}

pub async fn create_community(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<Caller>,
    multipart: Multipart,
) -> Result<axum::response::Response, ApiError> {
    let form = uploads::read_form(multipart, "groupImage", &services.upload_dir).await?;

    // The member list arrives as a JSON-encoded array of ids, a leftover of
    // the SPA sending everything through one FormData object.
    let initial_members: Vec<UserId> = match form.text("members") {
        None | Some("") => vec![],
        Some(raw) => {
            let ids: Vec<String> = serde_json::from_str(raw)
                .map_err(|_| ApiError::Validation("malformed member list".to_string()))?;
            ids.iter()
                .map(|id| id.parse())
                .collect::<Result<_, _>>()
                .map_err(|_| ApiError::Validation("malformed member list".to_string()))?
        }
    };

    let community = Community::create_group(
        caller.user_id(),
        form.text("name").unwrap_or_default(),
        form.text("descricao").unwrap_or_default().to_string(),
        form.text("esporte").unwrap_or_default().to_string(),
        initial_members,
        form.picture().map(String::from),
        Utc::now(),
    )?;

    let body = dto::community_to_json(&services.docs, &community);
    tracing::info!(community_id = %community.id, owner = %caller.user_id(), "community created");
    services.docs.upsert_community(community);

    Ok((StatusCode::CREATED, Json(body)).into_response())
}

/// The caller's chat sidebar, most recently active first.
pub async fn list_my_communities(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<Caller>,
) -> Result<axum::response::Response, ApiError> {
    let mut communities = services.docs.communities_with_member(caller.user_id());
    communities.sort_by_key(|c| {
        Reverse(c.messages.last().map(|m| m.sent_at).unwrap_or(c.created_at))
    });

    let body: Vec<_> = communities
        .iter()
        .map(|c| dto::community_to_json(&services.docs, c))
        .collect();

    Ok(Json(serde_json::Value::Array(body)).into_response())
}

pub async fn list_all_communities(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<Caller>,
) -> Result<axum::response::Response, ApiError> {
    authz::require_admin(&caller)?;

    let body: Vec<_> = services
        .docs
        .group_communities()
        .iter()
        .map(dto::community_summary_to_json)
        .collect();

    Ok(Json(serde_json::Value::Array(body)).into_response())
}

pub async fn list_open_communities(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<OpenCommunitiesQuery>,
) -> Result<axum::response::Response, ApiError> {
    let body: Vec<_> = services
        .docs
        .open_groups(query.sport.as_deref())
        .iter()
        .map(dto::open_community_to_json)
        .collect();

    Ok(Json(serde_json::Value::Array(body)).into_response())
}

pub async fn join_community(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
) -> Result<axum::response::Response, ApiError> {
    let id: CommunityId = id.parse()?;
    let mut community = services
        .docs
        .community(id)
        .ok_or_else(|| ApiError::NotFound("community not found".to_string()))?;

    let msg = match policy::community_join(caller.actor(), &community)? {
        JoinDecision::Admit => {
            community.add_member(caller.user_id());
            let name = community.name.clone();
            services.docs.upsert_community(community);
            tracing::info!(community_id = %id, user_id = %caller.user_id(), "member joined");
            return Ok(Json(serde_json::json!({
                "msg": "you joined the community",
                "chatId": id.to_string(),
                "name": name,
            }))
            .into_response());
        }
        JoinDecision::AlreadyMember => "you are already a member of this community",
    };

    Ok(Json(serde_json::json!({
        "msg": msg,
        "chatId": id.to_string(),
        "name": community.name,
    }))
    .into_response())
}

pub async fn update_community(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<axum::response::Response, ApiError> {
    let id: CommunityId = id.parse()?;
    let mut community = services
        .docs
        .community(id)
        .ok_or_else(|| ApiError::NotFound("community not found".to_string()))?;

    policy::community_edit(caller.actor(), &community)?;

    let form = uploads::read_form(multipart, "groupImage", &services.upload_dir).await?;

    community.apply_edit(CommunityEdit {
        name: form.text("name").map(String::from),
        description: form.text("descricao").map(String::from),
        sport: form.text("esporte").map(String::from),
        open: form.text("aberto").map(|v| v == "true"),
        picture: form.picture().map(String::from),
        meetup_time: form.text("meetupTime").map(String::from),
        meetup_weekdays: form.all("meetupDays").map(<[String]>::to_vec),
    })?;

    let body = dto::community_to_json(&services.docs, &community);
    services.docs.upsert_community(community);

    Ok(Json(body).into_response())
}

pub async fn delete_community(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
) -> Result<axum::response::Response, ApiError> {
    let id: CommunityId = id.parse()?;
    let community = services
        .docs
        .community(id)
        .ok_or_else(|| ApiError::NotFound("community not found".to_string()))?;

    policy::community_delete(caller.actor(), &community)?;

    services.docs.remove_community(id);
    let removed_events = services.docs.remove_events_for_community(id);
    tracing::info!(community_id = %id, removed_events, "community deleted");

    Ok(Json(serde_json::json!({ "msg": "community deleted" })).into_response())
}

pub async fn list_messages(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
) -> Result<axum::response::Response, ApiError> {
    let id: CommunityId = id.parse()?;
    let community = services
        .docs
        .community(id)
        .ok_or_else(|| ApiError::NotFound("chat not found".to_string()))?;

    policy::message_post(caller.actor(), &community)?;

    let messages: Vec<_> = community
        .messages
        .iter()
        .map(|m| dto::message_to_json(&services.docs, m))
        .collect();

    Ok(Json(serde_json::json!({ "messages": messages })).into_response())
}

pub async fn post_message(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
    Json(body): Json<PostMessageRequest>,
) -> Result<axum::response::Response, ApiError> {
    let id: CommunityId = id.parse()?;
    let mut community = services
        .docs
        .community(id)
        .ok_or_else(|| ApiError::NotFound("chat not found".to_string()))?;

    policy::message_post(caller.actor(), &community)?;

    let message = community.append_message(caller.user_id(), &body.content, Utc::now())?;
    services.docs.upsert_community(community);

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": dto::message_to_json(&services.docs, &message),
        })),
    )
        .into_response())
}
