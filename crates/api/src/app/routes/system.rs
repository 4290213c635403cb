use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};

use crate::context::Caller;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub async fn whoami(Extension(caller): Extension<Caller>) -> impl IntoResponse {
    Json(serde_json::json!({
        "userId": caller.user_id().to_string(),
        "role": caller.role().as_str(),
    }))
}
