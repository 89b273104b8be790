use std::sync::Arc;

use axum::extract::{Request, State};
use axum::response::Json;
use axum::routing::post;
use axum::Router;
use serde_json::{json, Value};

use super::{has_fields, method_not_allowed, preflight, read_request};
use crate::error::ApiError;
use crate::store::Upsert;
use crate::AppState;

const REQUIRED: &[&str] = &["sessionId", "name", "questions"];

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route(
        "/user-sessions",
        post(save_session)
            .options(preflight)
            .fallback(method_not_allowed),
    )
}

/// Upsert a session by `sessionId`, filling in defaults the client left out.
async fn save_session(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<Value>, ApiError> {
    let (ip, user_agent, input) = read_request(request).await?;
    let input = input
        .filter(|o| has_fields(o, REQUIRED))
        .ok_or_else(|| ApiError::bad_request("Missing required fields: sessionId, name, questions"))?;

    let now = chrono::Utc::now().to_rfc3339();
    let present = |key: &str| input.get(key).filter(|v| !v.is_null()).cloned();

    let total_questions = present("totalQuestions").unwrap_or_else(|| {
        json!(input["questions"].as_array().map_or(0, |q| q.len()))
    });

    let record = json!({
        "sessionId": input["sessionId"],
        "name": input["name"],
        "timestamp": present("timestamp").unwrap_or_else(|| json!(now)),
        "questions": input["questions"],
        "totalQuestions": total_questions,
        "sessionStatus": present("sessionStatus").unwrap_or_else(|| json!("incomplete")),
        "ip": ip,
        "userAgent": user_agent,
        "savedAt": now,
    });

    let outcome = state
        .sessions
        .upsert("sessionId", record.clone())
        .await
        .map_err(|e| {
            tracing::error!(path = %state.sessions.path().display(), error = %e, "failed to write sessions file");
            ApiError::internal("Failed to save session data")
        })?;

    let message = match outcome {
        Upsert::Updated => "Session updated successfully",
        Upsert::Inserted => "Session saved successfully",
    };
    tracing::info!(
        session_id = %record["sessionId"],
        total = %record["totalQuestions"],
        status = %record["sessionStatus"],
        "{message}"
    );

    Ok(Json(json!({
        "success": true,
        "message": message,
        "sessionId": record["sessionId"],
        "totalQuestions": record["totalQuestions"],
    })))
}
