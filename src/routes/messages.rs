use axum::{
    extract::{rejection::JsonRejection, Extension, Json, Path, Query},
    http::StatusCode,
    routing::{delete, get},
    Router,
};
use serde::Deserialize;

use super::User;
use crate::{
    error::AppResult,
    model::Message,
    state::Chat,
    validate::{self, MessageInput},
};

#[derive(Deserialize)]
struct ListQuery {
    limit: Option<String>,
}

pub fn router() -> Router {
    Router::new()
        .route("/messages", get(list).post(post_message))
        .route("/messages/:id", delete(remove))
}

async fn post_message(
    Extension(chat): Extension<Chat>,
    User(user): User,
    payload: Result<Json<MessageInput>, JsonRejection>,
) -> AppResult<StatusCode> {
    let input = super::body(payload)?;
    chat.log.append(&user, input).await?;
    Ok(StatusCode::CREATED)
}

async fn list(
    Extension(chat): Extension<Chat>,
    User(user): User,
    Query(q): Query<ListQuery>,
) -> AppResult<Json<Vec<Message>>> {
    let limit = validate::limit(q.limit.as_deref())?;
    Ok(Json(chat.log.list(&user, limit).await?))
}

async fn remove(
    Extension(chat): Extension<Chat>,
    User(user): User,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    chat.log.delete(&user, &id).await?;
    Ok(StatusCode::OK)
}
