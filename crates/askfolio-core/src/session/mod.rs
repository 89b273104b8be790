//! The visitor's single active session and its 3-question quota.
//!
//! No public operation here returns an error: storage problems are logged and
//! commit failures come back as `false`, leaving the local session as the
//! source of truth.

mod flush;
mod remote;
mod store;

pub use flush::{AutoFlush, Visibility};
pub use remote::{HttpSessionRemote, NoRemote, Remote, SessionRemote};
pub use store::{FileStore, MemoryStore, SessionStore};

use crate::model::{Session, SessionStatus, QUESTION_LIMIT};

pub struct SessionTracker<S, R> {
    store: S,
    remote: R,
}

impl<S: SessionStore, R: SessionRemote> SessionTracker<S, R> {
    pub fn new(store: S, remote: R) -> Self {
        Self { store, remote }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }

    /// Start a fresh session, replacing any existing one.
    pub fn create_session(&self, name: &str) -> Session {
        let session = Session::new(name);
        if let Err(e) = self.store.save(&session) {
            tracing::warn!(session_id = %session.session_id, error = %e, "failed to store new session");
        } else {
            tracing::info!(session_id = %session.session_id, "session created");
        }
        session
    }

    pub fn current_session(&self) -> Option<Session> {
        self.store.load()
    }

    /// Record a question. `None` (and no write) when there is no session.
    pub fn append_question(&self, text: &str) -> Option<Session> {
        let mut session = self.current_session()?;
        session.push_question(text);

        if let Err(e) = self.store.save(&session) {
            tracing::warn!(session_id = %session.session_id, error = %e, "failed to store session");
        }
        tracing::debug!(
            session_id = %session.session_id,
            total = session.total_questions,
            status = %session.session_status,
            "question recorded"
        );
        Some(session)
    }

    pub fn has_reached_limit(&self) -> bool {
        self.current_session()
            .is_some_and(|s| s.has_reached_limit())
    }

    pub fn remaining_questions(&self) -> usize {
        self.current_session()
            .map_or(QUESTION_LIMIT, |s| s.remaining_questions())
    }

    /// Deliver the session to the remote endpoint. On success the stored
    /// session is marked complete; on failure it is left untouched so a later
    /// trigger can retry.
    pub async fn commit_session(&self) -> bool {
        let Some(session) = self.current_session() else {
            return false;
        };
        if session.total_questions == 0 {
            return false;
        }

        match self.remote.deliver(&session).await {
            Ok(()) => {
                // reload: questions may have been added while the request was in flight
                let mut latest = self
                    .current_session()
                    .filter(|s| s.session_id == session.session_id)
                    .unwrap_or(session);
                latest.session_status = SessionStatus::Complete;
                if let Err(e) = self.store.save(&latest) {
                    tracing::warn!(session_id = %latest.session_id, error = %e, "failed to store committed session");
                }
                tracing::info!(
                    session_id = %latest.session_id,
                    total = latest.total_questions,
                    "session committed"
                );
                true
            }
            Err(e) => {
                tracing::warn!(
                    session_id = %session.session_id,
                    error = %e,
                    "session commit failed, kept locally"
                );
                false
            }
        }
    }

    /// Forget the stored session.
    pub fn clear_session(&self) {
        if let Err(e) = self.store.clear() {
            tracing::warn!(error = %e, "failed to clear session");
        }
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::{CountingStore, MockRemote};
    use super::*;

    fn tracker(remote: MockRemote) -> SessionTracker<CountingStore, MockRemote> {
        SessionTracker::new(CountingStore::default(), remote)
    }

    #[test]
    fn test_create_session_is_fresh_and_stored() {
        let t = tracker(MockRemote::ok());
        assert!(t.current_session().is_none());

        let session = t.create_session("Ada");
        assert_eq!(session.name, "Ada");
        assert_eq!(session.total_questions, 0);
        assert_eq!(session.session_status, SessionStatus::Incomplete);
        assert_eq!(t.current_session().unwrap(), session);
    }

    #[test]
    fn test_create_session_overwrites_previous() {
        let t = tracker(MockRemote::ok());
        let first = t.create_session("Ada");
        t.append_question("hi");
        let second = t.create_session("Grace");

        let current = t.current_session().unwrap();
        assert_ne!(first.session_id, second.session_id);
        assert_eq!(current.name, "Grace");
        assert!(current.questions.is_empty());
    }

    #[test]
    fn test_append_without_session_writes_nothing() {
        let t = tracker(MockRemote::ok());
        assert!(t.append_question("hello?").is_none());
        assert_eq!(t.store().saves(), 0);
    }

    #[test]
    fn test_append_keeps_count_in_sync() {
        let t = tracker(MockRemote::ok());
        t.create_session("Ada");
        for i in 1..=4 {
            let s = t.append_question(&format!("q{i}")).unwrap();
            assert_eq!(s.total_questions, s.questions.len());
            assert_eq!(s.questions.last().unwrap().order, i);
        }
    }

    #[test]
    fn test_status_completes_at_limit_and_never_reverts() {
        let t = tracker(MockRemote::ok());
        t.create_session("Ada");

        let s = t.append_question("q1").unwrap();
        assert_eq!(s.session_status, SessionStatus::Incomplete);
        let s = t.append_question("q2").unwrap();
        assert_eq!(s.session_status, SessionStatus::Incomplete);
        let s = t.append_question("q3").unwrap();
        assert_eq!(s.session_status, SessionStatus::Complete);
        let s = t.append_question("q4").unwrap();
        assert_eq!(s.session_status, SessionStatus::Complete);
    }

    #[test]
    fn test_limit_and_remaining() {
        let t = tracker(MockRemote::ok());
        assert!(!t.has_reached_limit());
        assert_eq!(t.remaining_questions(), QUESTION_LIMIT);

        t.create_session("Ada");
        assert!(!t.has_reached_limit());

        let mut previous = t.remaining_questions();
        for q in ["q1", "q2", "q3", "q4"] {
            t.append_question(q);
            let remaining = t.remaining_questions();
            assert!(remaining <= previous);
            previous = remaining;
        }
        assert!(t.has_reached_limit());
        assert_eq!(t.remaining_questions(), 0);
    }

    #[tokio::test]
    async fn test_commit_without_session_or_questions_makes_no_call() {
        let t = tracker(MockRemote::ok());
        assert!(!t.commit_session().await);

        t.create_session("Ada");
        assert!(!t.commit_session().await);
        assert_eq!(t.remote().calls(), 0);
    }

    #[tokio::test]
    async fn test_commit_failure_leaves_status_unchanged() {
        let t = tracker(MockRemote::failing());
        t.create_session("Ada");
        t.append_question("q1");

        assert!(!t.commit_session().await);
        assert_eq!(t.remote().calls(), 1);
        assert_eq!(
            t.current_session().unwrap().session_status,
            SessionStatus::Incomplete
        );
    }

    #[tokio::test]
    async fn test_commit_success_marks_complete() {
        let t = tracker(MockRemote::ok());
        t.create_session("Ada");
        t.append_question("q1");

        assert!(t.commit_session().await);
        let session = t.current_session().unwrap();
        assert_eq!(session.session_status, SessionStatus::Complete);
        assert_eq!(session.total_questions, 1);
    }

    #[tokio::test]
    async fn test_failed_commit_can_be_retried() {
        let t = SessionTracker::new(MemoryStore::new(), MockRemote::failing());
        t.create_session("Ada");
        t.append_question("q1");
        assert!(!t.commit_session().await);
        assert!(!t.commit_session().await);
        assert_eq!(t.remote().calls(), 2);
    }

    #[test]
    fn test_clear_session() {
        let t = tracker(MockRemote::ok());
        t.create_session("Ada");
        t.clear_session();
        assert!(t.current_session().is_none());
        assert_eq!(t.remaining_questions(), QUESTION_LIMIT);
    }
}
