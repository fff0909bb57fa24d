//! HTTP API for stored Game of Life boards.
//!
//! Request validation, step clamping and JSON/HTML encoding live here; board
//! semantics live in the `life` crate.

pub mod config;
pub mod routes;
pub mod state;
pub mod view;

use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the full application: routes plus panic recovery, request tracing and
/// permissive CORS.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    routes::router()
        .layer(CatchPanicLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
