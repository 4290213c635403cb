//! Request DTOs and JSON mapping helpers.
//!
//! The wire format keeps the field names the SPA already speaks (`nome`,
//! `senha`, `descricao`, ...); Rust-side names stay idiomatic via serde
//! renames. Password hashes never appear in any mapping here.

use serde::Deserialize;
use serde_json::{json, Value};

use connectlife_core::UserId;
use connectlife_domain::{Community, Event, Message, User, Venue};
use connectlife_store::Documents;

// -------------------------
// Request DTOs (JSON bodies)
// -------------------------

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(rename = "nome")]
    pub name: String,
    pub email: String,
    #[serde(rename = "senha")]
    pub password: String,
    /// Requested role; anything but "admin" registers a regular member.
    #[serde(rename = "tipo", default)]
    pub role: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    #[serde(rename = "senha")]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct PostMessageRequest {
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateEventRequest {
    /// Hosting community id.
    pub chat: Option<String>,
    #[serde(rename = "nome")]
    pub name: Option<String>,
    #[serde(rename = "descricao", default)]
    pub description: Option<String>,
    #[serde(rename = "dataHora")]
    pub when_at: Option<String>,
    /// Venue id.
    pub local: Option<String>,
    #[serde(rename = "esporte", default)]
    pub sport: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct OpenCommunitiesQuery {
    pub sport: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListEventsQuery {
    pub futura: Option<String>,
}

// -------------------------
// JSON mapping helpers
// -------------------------

/// Full account view, password hash stripped.
pub fn user_to_json(user: &User) -> Value {
    json!({
        "id": user.id.to_string(),
        "nome": user.name,
        "email": user.email,
        "pfp": user.picture,
        "tipo": user.role.as_str(),
        "ativo": user.active,
        "dataCriacao": user.created_at.to_rfc3339(),
    })
}

/// Trimmed reference used when expanding members, owners and senders.
/// Resolves to `null` when the account no longer exists.
pub fn user_ref_to_json(docs: &Documents, id: UserId) -> Value {
    match docs.user(id) {
        Some(user) => json!({
            "id": user.id.to_string(),
            "nome": user.name,
            "pfp": user.picture,
        }),
        None => Value::Null,
    }
}

/// Full community view with owner and members expanded.
pub fn community_to_json(docs: &Documents, community: &Community) -> Value {
    json!({
        "id": community.id.to_string(),
        "isGroup": community.is_group,
        "name": community.name,
        "descricao": community.description,
        "creator": user_ref_to_json(docs, community.owner),
        "members": community
            .members
            .iter()
            .map(|m| user_ref_to_json(docs, *m))
            .filter(|v| !v.is_null())
            .collect::<Vec<_>>(),
        "groupImage": community.picture,
        "aberto": community.open,
        "sportType": community.sport,
        "meetupDetails": {
            "days": community.meetup.weekdays,
            "time": community.meetup.time,
        },
        "numMembers": community.members.len(),
    })
}

/// Admin overview row: ids only, no member expansion.
pub fn community_summary_to_json(community: &Community) -> Value {
    json!({
        "id": community.id.to_string(),
        "isGroup": community.is_group,
        "name": community.name,
        "descricao": community.description,
        "creator": community.owner.to_string(),
        "groupImage": community.picture,
        "aberto": community.open,
        "sportType": community.sport,
        "meetupDetails": {
            "days": community.meetup.weekdays,
            "time": community.meetup.time,
        },
        "numMembers": community.members.len(),
    })
}

/// Discovery card for the open-communities listing.
pub fn open_community_to_json(community: &Community) -> Value {
    let days = if community.meetup.weekdays.is_empty() {
        "Não informado".to_string()
    } else {
        community.meetup.weekdays.join(", ")
    };
    let time = if community.meetup.time.is_empty() {
        "Não informado".to_string()
    } else {
        community.meetup.time.clone()
    };

    json!({
        "id": community.id.to_string(),
        "name": community.name,
        "groupImage": community.picture,
        "descricao": community.description,
        "sportType": community.sport,
        "diasEncontro": days,
        "horarioEncontro": time,
        "numMembers": community.members.len(),
    })
}

pub fn message_to_json(docs: &Documents, message: &Message) -> Value {
    json!({
        "id": message.id.to_string(),
        "sender": user_ref_to_json(docs, message.sender),
        "content": message.content,
        "timestamp": message.sent_at.to_rfc3339(),
    })
}

pub fn venue_to_json(venue: &Venue) -> Value {
    json!({
        "id": venue.id.to_string(),
        "nome": venue.name,
        "endereco": venue.address,
        "imagemLocal": venue.picture,
        "criadoPor": venue.created_by.to_string(),
    })
}

/// Event with its community and venue references expanded, `null` when a
/// reference no longer resolves.
pub fn event_to_json(docs: &Documents, event: &Event) -> Value {
    let chat = match docs.community(event.community) {
        Some(c) => json!({
            "id": c.id.to_string(),
            "name": c.name,
            "groupImage": c.picture,
            "descricao": c.description,
        }),
        None => Value::Null,
    };
    let venue = match docs.venue(event.venue) {
        Some(v) => json!({
            "id": v.id.to_string(),
            "nome": v.name,
            "endereco": v.address,
        }),
        None => Value::Null,
    };

    json!({
        "id": event.id.to_string(),
        "chat": chat,
        "nome": event.name,
        "descricao": event.description,
        "dataHora": event.when_at.to_rfc3339(),
        "local": venue,
        "esporte": event.sport,
    })
}
