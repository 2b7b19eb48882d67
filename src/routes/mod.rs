use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequestParts},
    http::request::Parts,
    Json, Router,
};
use std::convert::Infallible;

use crate::{
    error::{AppErr, AppResult},
    validate::ValidationError,
};

pub mod messages;
pub mod participants;
pub mod status;

pub fn router() -> Router {
    Router::new()
        .merge(participants::router())
        .merge(messages::router())
        .merge(status::router())
}

/// Caller identity from the `user` header; empty when absent or not UTF-8.
pub struct User(pub String);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for User {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _: &S) -> Result<Self, Self::Rejection> {
        let name = parts.headers
            .get("user")
            .and_then(|v| std::str::from_utf8(v.as_bytes()).ok())
            .unwrap_or_default();
        Ok(User(name.to_owned()))
    }
}

/* ── malformed bodies are validation failures, not framework 400/415 ── */
pub(crate) fn body<T>(payload: Result<Json<T>, JsonRejection>) -> AppResult<T> {
    match payload {
        Ok(Json(v)) => Ok(v),
        // the body itself could not be read, e.g. over the size limit
        Err(JsonRejection::BytesRejection(e)) => Err(AppErr::Body(e.status(), e.body_text())),
        Err(e) => Err(ValidationError::new(e.body_text()).into()),
    }
}
