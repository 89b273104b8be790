//! Serves the real router on an ephemeral port and commits sessions to it
//! through the core library's HTTP remote.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use askfolio_core::model::SessionStatus;
use askfolio_core::ratings::{RatingClient, RatingLog};
use askfolio_core::session::{HttpSessionRemote, MemoryStore, SessionTracker};
use askfolio_web::AppState;

async fn spawn_server() -> (PathBuf, Arc<AppState>, String) {
    let dir = std::env::temp_dir().join(format!("askfolio-it-{}", uuid::Uuid::now_v7()));
    std::fs::create_dir_all(&dir).unwrap();
    let state = Arc::new(AppState::new(
        dir.join("user-sessions.json"),
        dir.join("ratings.json"),
    ));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = askfolio_web::app(state.clone());
    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .unwrap();
    });

    (dir, state, format!("http://{addr}"))
}

#[tokio::test]
async fn test_commit_reaches_server_and_upserts() {
    let (dir, state, base) = spawn_server().await;
    let tracker = SessionTracker::new(
        MemoryStore::new(),
        HttpSessionRemote::new(format!("{base}/user-sessions")),
    );

    let session = tracker.create_session("Ada");
    tracker.append_question("Tell me about your AI expertise");
    assert!(tracker.commit_session().await);
    assert_eq!(
        tracker.current_session().unwrap().session_status,
        SessionStatus::Complete
    );

    tracker.append_question("What's your design process?");
    assert!(tracker.commit_session().await);

    let records = state.sessions.read_all().await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["sessionId"], session.session_id.as_str());
    assert_eq!(records[0]["name"], "Ada");
    assert_eq!(records[0]["totalQuestions"], 2);
    assert_eq!(records[0]["questions"][1]["order"], 2);
    assert_eq!(records[0]["ip"], "127.0.0.1");

    std::fs::remove_dir_all(&dir).ok();
}

#[tokio::test]
async fn test_rejected_commit_leaves_session_incomplete() {
    let (dir, _state, base) = spawn_server().await;
    let tracker = SessionTracker::new(
        MemoryStore::new(),
        HttpSessionRemote::new(format!("{base}/does-not-exist")),
    );

    tracker.create_session("Ada");
    tracker.append_question("hi");
    assert!(!tracker.commit_session().await);
    assert_eq!(
        tracker.current_session().unwrap().session_status,
        SessionStatus::Incomplete
    );

    std::fs::remove_dir_all(&dir).ok();
}

#[tokio::test]
async fn test_rating_client_posts_to_server() {
    let (dir, state, base) = spawn_server().await;
    let client = RatingClient::new(
        RatingLog::new(dir.join("local-ratings.jsonl")),
        Some(format!("{base}/ratings")),
    );

    assert!(client.submit(5, "s1").await.unwrap());
    assert_eq!(client.log().read_all().len(), 1);

    let records = state.ratings.read_all().await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["rating"], 5);
    assert_eq!(records[0]["sessionId"], "s1");

    std::fs::remove_dir_all(&dir).ok();
}
