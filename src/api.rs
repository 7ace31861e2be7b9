//! HTTP surface of the game backend.
//!
//! `POST /api/load`, `POST /api/save` and `GET /api/leaderboard` each map to
//! exactly one [`GameDb`] call. Every other path is served from the
//! frontend directory, falling back to its `index.html` so the client can do
//! its own routing.

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
};

use std::path::Path;
use std::sync::Arc;

use crate::gamedb::GameDb;

pub mod error;
pub mod handlers;


pub use error::ApiError;

/// Shared between all requests.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<GameDb>,
}

/// Builds the application router around an open database and the directory
/// holding the client bundle.
pub fn router(db: Arc<GameDb>, frontend_dir: &Path) -> Router {
    let client = ServeDir::new(frontend_dir)
        .fallback(ServeFile::new(frontend_dir.join("index.html")));

    Router::new()
        .route("/api/load", post(handlers::load))
        .route("/api/save", post(handlers::save))
        .route("/api/leaderboard", get(handlers::leaderboard))
        .fallback_service(client)
        .with_state(AppState { db })
        .layer(CorsLayer::permissive())
}
