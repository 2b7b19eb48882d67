pub mod clock;
pub mod config;
pub mod error;
pub mod messages;
pub mod model;
pub mod registry;
pub mod routes;
pub mod state;
pub mod store;
pub mod sweeper;
pub mod validate;

use axum::{extract::DefaultBodyLimit, Extension, Router};
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};

use crate::state::Chat;

/// Full HTTP surface with its middleware stack.
pub fn app(chat: Chat, body_limit: usize) -> Router {
    routes::router()
        .layer(Extension(chat))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
