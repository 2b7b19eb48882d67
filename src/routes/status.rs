use axum::{extract::Extension, http::StatusCode, routing::post, Router};

use super::User;
use crate::{error::AppResult, state::Chat};

pub fn router() -> Router {
    Router::new().route("/status", post(heartbeat))
}

async fn heartbeat(Extension(chat): Extension<Chat>, User(user): User) -> AppResult<StatusCode> {
    chat.registry.heartbeat(&user).await?;
    Ok(StatusCode::OK)
}
