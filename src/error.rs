use axum::{http::StatusCode, response::IntoResponse};

use crate::{store::StoreError, validate::ValidationError};

pub type AppResult<T> = Result<T, AppErr>;

#[derive(thiserror::Error, Debug)]
pub enum AppErr {
    #[error("{0}")]
    Invalid(#[from] ValidationError),

    #[error("participant {0} already exists")]
    Conflict(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("message {0} belongs to someone else")]
    Unauthorized(String),

    #[error("{1}")]
    Body(StatusCode, String),

    #[error("store: {0}")]
    Store(#[from] StoreError),
}

impl IntoResponse for AppErr {
    fn into_response(self) -> axum::response::Response {
        let code = match &self {
            AppErr::Invalid(_)      => StatusCode::UNPROCESSABLE_ENTITY,
            AppErr::Conflict(_)     => StatusCode::CONFLICT,
            AppErr::NotFound(_)     => StatusCode::NOT_FOUND,
            AppErr::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppErr::Body(code, _)   => *code,
            AppErr::Store(e) => {
                tracing::error!(error = %e, "store operation failed");
                return (StatusCode::INTERNAL_SERVER_ERROR, "internal error").into_response();
            }
        };
        (code, self.to_string()).into_response()
    }
}
