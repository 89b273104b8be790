use std::sync::Arc;

use askfolio_core::model::validate_rating;
use axum::extract::{Request, State};
use axum::response::Json;
use axum::routing::post;
use axum::Router;
use serde_json::{json, Value};

use super::{has_fields, method_not_allowed, preflight, read_request};
use crate::error::ApiError;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route(
        "/ratings",
        post(save_rating)
            .options(preflight)
            .fallback(method_not_allowed),
    )
}

async fn save_rating(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<Value>, ApiError> {
    let (ip, _, input) = read_request(request).await?;
    let input = input
        .filter(|o| has_fields(o, &["rating", "sessionId"]))
        .ok_or_else(|| ApiError::bad_request("Missing required fields: rating, sessionId"))?;

    let rating = input["rating"]
        .as_u64()
        .and_then(|r| u8::try_from(r).ok())
        .ok_or_else(|| ApiError::bad_request("rating must be an integer between 1 and 5"))?;
    validate_rating(rating)?;

    let now = chrono::Utc::now().to_rfc3339();
    let record = json!({
        "rating": rating,
        "timestamp": input.get("timestamp").filter(|v| !v.is_null()).cloned().unwrap_or_else(|| json!(now)),
        "sessionId": input["sessionId"],
        "ip": ip,
        "savedAt": now,
    });

    let total = state.ratings.append(record).await.map_err(|e| {
        tracing::error!(path = %state.ratings.path().display(), error = %e, "failed to write ratings file");
        ApiError::internal("Failed to save rating")
    })?;
    tracing::info!(rating, total, "rating saved");

    Ok(Json(json!({
        "success": true,
        "message": "Rating saved successfully",
        "totalRatings": total,
    })))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;
    use tower::ServiceExt;

    use crate::routes::test_support::*;

    #[tokio::test]
    async fn test_rating_appended() {
        let (dir, state) = test_app_state();
        let app = test_router(state.clone());

        for (i, value) in [5, 3].into_iter().enumerate() {
            let body = json!({"rating": value, "sessionId": "s1"});
            let resp = app
                .clone()
                .oneshot(post_json("/ratings", &body))
                .await
                .unwrap();
            assert_eq!(resp.status(), StatusCode::OK);
            let json = body_json(resp.into_body()).await;
            assert_eq!(json["totalRatings"], i + 1);
        }

        let records = state.ratings.read_all().await;
        assert_eq!(records.len(), 2);
        assert_eq!(records[1]["rating"], 3);
        assert!(records[0]["timestamp"].is_string());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_rating_out_of_range_rejected() {
        let (dir, state) = test_app_state();
        let app = test_router(state.clone());

        for value in [json!(0), json!(6), json!(4.5), json!("five"), json!(-1)] {
            let body = json!({"rating": value, "sessionId": "s1"});
            let resp = app
                .clone()
                .oneshot(post_json("/ratings", &body))
                .await
                .unwrap();
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "rating {value}");
        }
        assert!(state.ratings.read_all().await.is_empty());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_rating_missing_session_rejected() {
        let (dir, state) = test_app_state();
        let resp = test_router(state)
            .oneshot(post_json("/ratings", &json!({"rating": 4})))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let json = body_json(resp.into_body()).await;
        assert_eq!(json["error"], "Missing required fields: rating, sessionId");

        std::fs::remove_dir_all(&dir).ok();
    }
}
