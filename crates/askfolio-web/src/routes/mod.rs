pub mod ratings;
pub mod sessions;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{ConnectInfo, Request};
use axum::http::{header, StatusCode};
use axum::response::Json;
use axum::routing::get;
use axum::Router;

use crate::error::ApiError;
use crate::AppState;

/// Request bodies above this size are rejected.
const MAX_BODY_BYTES: usize = 1024 * 1024;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health))
        .merge(sessions::routes())
        .merge(ratings::routes())
        .fallback(not_found)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn not_found() -> ApiError {
    ApiError::not_found("Not found")
}

/// Plain OPTIONS requests; CORS preflights are answered by the CORS layer.
async fn preflight() -> StatusCode {
    StatusCode::OK
}

async fn method_not_allowed() -> ApiError {
    ApiError::method_not_allowed()
}

/// Caller address and user agent, then the body parsed as a JSON object.
/// Anything that is not a JSON object comes back as `None`.
async fn read_request(
    request: Request,
) -> Result<(String, String, Option<serde_json::Map<String, serde_json::Value>>), ApiError> {
    let ip = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string());
    let user_agent = request
        .headers()
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();

    let body = axum::body::to_bytes(request.into_body(), MAX_BODY_BYTES)
        .await
        .map_err(|_| ApiError::bad_request("Request body too large"))?;

    let object = match serde_json::from_slice(&body) {
        Ok(serde_json::Value::Object(map)) => Some(map),
        _ => None,
    };
    Ok((ip, user_agent, object))
}

/// Present and not null.
fn has_fields(object: &serde_json::Map<String, serde_json::Value>, fields: &[&str]) -> bool {
    fields
        .iter()
        .all(|f| object.get(*f).is_some_and(|v| !v.is_null()))
}
