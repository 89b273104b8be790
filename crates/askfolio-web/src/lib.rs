pub mod error;
pub mod routes;
pub mod store;

use std::path::Path;
use std::sync::Arc;

use askfolio_core::config::ServerConfig;
use axum::http::{header, Method};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::store::JsonArrayFile;

pub struct AppState {
    pub sessions: JsonArrayFile,
    pub ratings: JsonArrayFile,
}

impl AppState {
    pub fn new(sessions: impl AsRef<Path>, ratings: impl AsRef<Path>) -> Self {
        Self {
            sessions: JsonArrayFile::new(sessions.as_ref()),
            ratings: JsonArrayFile::new(ratings.as_ref()),
        }
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(&config.sessions_file, &config.ratings_file)
    }
}

/// Full application: routes, CORS (any origin, POST/OPTIONS, Content-Type)
/// and request tracing.
pub fn app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    routes::router()
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
