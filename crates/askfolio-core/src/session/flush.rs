use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::task::JoinHandle;

use super::{SessionRemote, SessionStore, SessionTracker};
use crate::beacon::BestEffortSender;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    Hidden,
}

/// Commits the session when the host goes away or is hidden. Both triggers
/// are best-effort and nothing waits on them.
pub struct AutoFlush<S, R, B> {
    tracker: Arc<SessionTracker<S, R>>,
    sender: B,
    attached: AtomicBool,
}

impl<S, R, B> AutoFlush<S, R, B>
where
    S: SessionStore + 'static,
    R: SessionRemote + 'static,
    B: BestEffortSender,
{
    pub fn attach(tracker: Arc<SessionTracker<S, R>>, sender: B) -> Self {
        Self {
            tracker,
            sender,
            attached: AtomicBool::new(true),
        }
    }

    /// Teardown trigger. Hands the session to the sender without awaiting;
    /// returns whether anything was sent.
    pub fn page_unload(&self) -> bool {
        if !self.is_attached() {
            return false;
        }
        let Some(session) = self.tracker.current_session() else {
            return false;
        };
        if session.total_questions == 0 {
            return false;
        }
        let Some(url) = self.tracker.remote().endpoint() else {
            tracing::debug!(session_id = %session.session_id, "no commit endpoint, unload beacon skipped");
            return false;
        };

        match serde_json::to_value(&session) {
            Ok(payload) => {
                tracing::debug!(session_id = %session.session_id, "sending unload beacon");
                self.sender.send(url, payload);
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to encode session for beacon");
                false
            }
        }
    }

    /// Visibility trigger. `Hidden` starts a commit on the runtime and returns
    /// its handle; `Visible` does nothing.
    pub fn visibility_changed(&self, visibility: Visibility) -> Option<JoinHandle<bool>> {
        if !self.is_attached() || visibility == Visibility::Visible {
            return None;
        }
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            tracing::warn!("no async runtime available, visibility commit skipped");
            return None;
        };

        let tracker = Arc::clone(&self.tracker);
        Some(handle.spawn(async move { tracker.commit_session().await }))
    }

    /// Disable both triggers.
    pub fn detach(&self) {
        self.attached.store(false, Ordering::SeqCst);
    }

    pub fn is_attached(&self) -> bool {
        self.attached.load(Ordering::SeqCst)
    }
}
