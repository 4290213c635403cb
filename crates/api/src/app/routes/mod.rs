use axum::{routing::get, Router};

pub mod auth;
pub mod chats;
pub mod events;
pub mod system;
pub mod users;
pub mod venues;

/// Router for all authenticated endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .nest("/usuarios", users::router())
        .nest("/chats", chats::router())
        .nest("/eventos", events::router())
        .nest("/locais", venues::router())
}
