use axum::{
    extract::{rejection::JsonRejection, Extension, Json},
    http::StatusCode,
    routing::get,
    Router,
};

use crate::{
    error::AppResult,
    model::Participant,
    state::Chat,
    validate::ParticipantInput,
};

pub fn router() -> Router {
    Router::new().route("/participants", get(list).post(register))
}

/* ---------------- Register ---------------- */
async fn register(
    Extension(chat): Extension<Chat>,
    payload: Result<Json<ParticipantInput>, JsonRejection>,
) -> AppResult<StatusCode> {
    let input = super::body(payload)?;
    chat.registry.register(&input).await?;
    Ok(StatusCode::CREATED)
}

/* ---------------- List ---------------- */
async fn list(Extension(chat): Extension<Chat>) -> AppResult<Json<Vec<Participant>>> {
    Ok(Json(chat.registry.list().await?))
}
