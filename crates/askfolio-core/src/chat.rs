//! Chat controller: the greeting → open → exhausted flow around the session
//! tracker and the resolver.
//!
//! View state sits behind a mutex that is never held across an await, so a
//! second `send` issued while one is in flight sees the loading flag and is
//! ignored.

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::task::JoinHandle;

use crate::config::ContactConfig;
use crate::llm::CompletionClient;
use crate::model::ChatMessage;
use crate::resolver::{AnswerSource, Resolver};
use crate::session::{SessionRemote, SessionStore, SessionTracker};

pub const DEFAULT_WELCOME: &str = "Hi! I'm here to share some of my experience, projects, or approach to bring ideas to products. What would you like to know?";

pub const SUGGESTED_QUESTIONS: &[&str] = &[
    "Tell me about your AI expertise",
    "How do you bring ideas to products?",
    "What's your design process?",
    "What else can you do besides work?",
    "What technologies do you understand?",
    "Tell me about your learning journey",
];

pub const NOT_CONFIGURED_BANNER: &str =
    "AI service is not configured. Please set up your OpenAI API key.";

pub const INPUT_PLACEHOLDER: &str = "Ask me about my experience, projects, or process...";
pub const EXHAUSTED_PLACEHOLDER: &str = "Connect with me on LinkedIn or X!";

/// Personalised welcome shown once a name is given.
pub fn greeting(name: &str) -> String {
    format!(
        "Hi {name}! I'm here to answer any questions about Siva's experience, projects, or approach to bring ideas to products. What would you like to know?"
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatState {
    Closed,
    /// Waiting for the visitor's name.
    Greeting,
    Open,
}

/// Everything a front end needs to render the chat.
#[derive(Debug, Clone)]
pub struct ChatView {
    pub state: ChatState,
    pub messages: Vec<ChatMessage>,
    pub input: String,
    pub loading: bool,
    pub exhausted: bool,
    pub banner: Option<String>,
    pub show_suggestions: bool,
}

impl Default for ChatView {
    fn default() -> Self {
        Self {
            state: ChatState::Closed,
            messages: vec![ChatMessage::bot(DEFAULT_WELCOME)],
            input: String::new(),
            loading: false,
            exhausted: false,
            banner: None,
            show_suggestions: true,
        }
    }
}

/// Result of an accepted `send`.
#[derive(Debug, Clone)]
pub struct Reply {
    pub message: ChatMessage,
    pub source: AnswerSource,
    /// `Some` when the question used up the quota and a commit was attempted.
    pub committed: Option<bool>,
}

pub struct ChatController<S, R, C> {
    tracker: Arc<SessionTracker<S, R>>,
    resolver: Arc<Resolver<C>>,
    contact: ContactConfig,
    view: Mutex<ChatView>,
}

impl<S, R, C> ChatController<S, R, C>
where
    S: SessionStore + 'static,
    R: SessionRemote + 'static,
    C: CompletionClient,
{
    /// Restores the exhausted flag from an existing session.
    pub fn new(
        tracker: Arc<SessionTracker<S, R>>,
        resolver: Arc<Resolver<C>>,
        contact: ContactConfig,
    ) -> Self {
        let view = ChatView {
            exhausted: tracker.has_reached_limit(),
            ..Default::default()
        };
        Self {
            tracker,
            resolver,
            contact,
            view: Mutex::new(view),
        }
    }

    pub fn tracker(&self) -> &Arc<SessionTracker<S, R>> {
        &self.tracker
    }

    fn view(&self) -> MutexGuard<'_, ChatView> {
        self.view.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn snapshot(&self) -> ChatView {
        self.view().clone()
    }

    pub fn state(&self) -> ChatState {
        self.view().state
    }

    pub fn is_exhausted(&self) -> bool {
        self.view().exhausted
    }

    pub fn remaining_questions(&self) -> usize {
        self.tracker.remaining_questions()
    }

    /// Closed → Greeting for a first-time visitor, Closed → Open otherwise.
    pub fn open(&self) -> ChatState {
        let session = self.tracker.current_session();
        let mut view = self.view();
        if view.state != ChatState::Closed {
            return view.state;
        }

        match session {
            None => view.state = ChatState::Greeting,
            Some(session) => {
                view.state = ChatState::Open;
                view.exhausted = session.has_reached_limit();
                if session.total_questions == 0 {
                    view.show_suggestions = true;
                }
            }
        }
        view.state
    }

    /// Greeting → Open. Blank names are rejected.
    pub fn submit_name(&self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() || self.state() != ChatState::Greeting {
            return false;
        }

        self.tracker.create_session(name);

        let mut view = self.view();
        view.messages = vec![ChatMessage::bot(greeting(name))];
        view.exhausted = false;
        view.state = ChatState::Open;
        true
    }

    pub fn set_input(&self, text: impl Into<String>) {
        self.view().input = text.into();
    }

    /// Put one of [`SUGGESTED_QUESTIONS`] into the input box.
    pub fn choose_suggestion(&self, index: usize) -> bool {
        match SUGGESTED_QUESTIONS.get(index) {
            Some(q) => {
                self.set_input(*q);
                true
            }
            None => false,
        }
    }

    pub fn placeholder(&self) -> &'static str {
        if self.is_exhausted() {
            EXHAUSTED_PLACEHOLDER
        } else {
            INPUT_PLACEHOLDER
        }
    }

    /// Ask the current input. `None` when the send was ignored: chat not
    /// open, blank input, a request already in flight, or quota used up.
    pub async fn send(&self) -> Option<Reply> {
        let (text, history) = {
            let mut view = self.view();
            let text = view.input.trim().to_string();
            if view.state != ChatState::Open || text.is_empty() || view.loading || view.exhausted
            {
                return None;
            }
            let history = view.messages.clone();
            view.messages.push(ChatMessage::user(text.clone()));
            view.input.clear();
            view.loading = true;
            view.banner = None;
            (text, history)
        };

        let updated = self.tracker.append_question(&text);
        let reached_limit = updated.as_ref().is_some_and(|s| s.has_reached_limit());
        if reached_limit {
            self.view().exhausted = true;
        }

        let resolution = self.resolver.resolve_detailed(&text, &history).await;
        let message = ChatMessage::bot(resolution.answer);

        {
            let mut view = self.view();
            view.messages.push(message.clone());
            view.show_suggestions = false;
            if !self.resolver.is_configured() {
                view.banner = Some(NOT_CONFIGURED_BANNER.to_string());
            }
            view.loading = false;
        }

        let committed = if reached_limit {
            Some(self.tracker.commit_session().await)
        } else {
            None
        };

        Some(Reply {
            message,
            source: resolution.source,
            committed,
        })
    }

    /// Open → Closed. Starts a detached commit and hands back its handle;
    /// callers are free to drop it.
    pub fn close(&self) -> Option<JoinHandle<bool>> {
        {
            let mut view = self.view();
            if view.state == ChatState::Closed {
                return None;
            }
            view.state = ChatState::Closed;
        }

        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            tracing::warn!("no async runtime available, close commit skipped");
            return None;
        };
        let tracker = Arc::clone(&self.tracker);
        Some(handle.spawn(async move { tracker.commit_session().await }))
    }

    /// Contact details, only offered once the quota is used up.
    pub fn contact(&self) -> Option<&ContactConfig> {
        self.is_exhausted().then_some(&self.contact)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use super::*;
    use crate::error::{AskfolioError, Result};
    use crate::llm::CompletionRequest;
    use crate::model::SessionStatus;
    use crate::persona::Persona;
    use crate::session::test_support::MockRemote;
    use crate::session::MemoryStore;

    struct MockClient {
        configured: bool,
        delay: Duration,
        calls: AtomicUsize,
    }

    impl MockClient {
        fn new() -> Self {
            Self {
                configured: true,
                delay: Duration::ZERO,
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl CompletionClient for MockClient {
        fn is_configured(&self) -> bool {
            self.configured
        }

        async fn complete(&self, request: &CompletionRequest) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            match request.messages.last() {
                Some(m) if m.content.contains("fail") => {
                    Err(AskfolioError::Completion("boom".into()))
                }
                Some(m) => Ok(format!("answer to {}", m.content)),
                None => Ok("answer".into()),
            }
        }
    }

    type Controller = ChatController<MemoryStore, MockRemote, MockClient>;

    fn controller_with(client: MockClient, remote: MockRemote) -> Controller {
        let tracker = Arc::new(SessionTracker::new(MemoryStore::new(), remote));
        let resolver = Arc::new(Resolver::new(client, Persona::default()));
        ChatController::new(tracker, resolver, ContactConfig::default())
    }

    fn controller() -> Controller {
        controller_with(MockClient::new(), MockRemote::ok())
    }

    #[test]
    fn test_first_visit_goes_through_greeting() {
        let c = controller();
        assert_eq!(c.state(), ChatState::Closed);
        assert_eq!(c.open(), ChatState::Greeting);

        assert!(!c.submit_name("   "));
        assert_eq!(c.state(), ChatState::Greeting);

        assert!(c.submit_name(" Ada "));
        let view = c.snapshot();
        assert_eq!(view.state, ChatState::Open);
        assert_eq!(view.messages.len(), 1);
        assert!(view.messages[0].text.starts_with("Hi Ada! "));
        assert_eq!(c.tracker().current_session().unwrap().name, "Ada");
    }

    #[test]
    fn test_returning_visitor_opens_directly() {
        let c = controller();
        c.tracker().create_session("Ada");
        assert_eq!(c.open(), ChatState::Open);
    }

    #[tokio::test]
    async fn test_send_guards() {
        let c = controller();
        c.set_input("hello");
        // not open yet
        assert!(c.send().await.is_none());

        c.open();
        c.submit_name("Ada");
        c.set_input("   ");
        assert!(c.send().await.is_none());
        assert_eq!(c.remaining_questions(), 3);
    }

    #[tokio::test]
    async fn test_send_appends_messages_and_clears_input() {
        let c = controller();
        c.open();
        c.submit_name("Ada");
        c.set_input("Where did you grow up?");

        let reply = c.send().await.unwrap();
        assert_eq!(reply.source, AnswerSource::Completion);
        assert_eq!(reply.message.text, "answer to Where did you grow up?");
        assert!(reply.committed.is_none());

        let view = c.snapshot();
        assert!(view.input.is_empty());
        assert!(!view.loading);
        assert!(!view.show_suggestions);
        let texts: Vec<&str> = view.messages.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts[1], "Where did you grow up?");
        assert!(view.messages[1].is_user);
        assert_eq!(c.remaining_questions(), 2);
    }

    #[tokio::test]
    async fn test_failed_completion_still_answers() {
        let c = controller();
        c.open();
        c.submit_name("Ada");
        c.set_input("please fail now");
        let reply = c.send().await.unwrap();
        assert!(!reply.message.text.is_empty());
        assert_ne!(reply.source, AnswerSource::Completion);
    }

    #[tokio::test]
    async fn test_second_send_ignored_while_in_flight() {
        let client = MockClient {
            delay: Duration::from_millis(100),
            ..MockClient::new()
        };
        let c = controller_with(client, MockRemote::ok());
        c.open();
        c.submit_name("Ada");
        c.set_input("Where did you grow up?");

        let (first, second) = tokio::join!(c.send(), async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            c.set_input("Where do you live?");
            c.send().await
        });
        assert!(first.is_some());
        assert!(second.is_none());
        assert_eq!(c.tracker().current_session().unwrap().total_questions, 1);
    }

    #[tokio::test]
    async fn test_not_configured_sets_banner_but_answers() {
        let client = MockClient {
            configured: false,
            ..MockClient::new()
        };
        let c = controller_with(client, MockRemote::ok());
        c.open();
        c.submit_name("Ada");
        c.set_input("What's your salary?");

        let reply = c.send().await.unwrap();
        assert_eq!(reply.source, AnswerSource::Fallback);
        assert_eq!(
            c.snapshot().banner.as_deref(),
            Some(NOT_CONFIGURED_BANNER)
        );
    }

    #[tokio::test]
    async fn test_ada_end_to_end() {
        let c = controller();
        assert_eq!(c.open(), ChatState::Greeting);
        assert!(c.submit_name("Ada"));

        let questions = [
            "Tell me about your AI expertise",
            "Where did you grow up?",
            "What's next for you?",
        ];
        let mut replies = Vec::new();
        for q in questions {
            c.set_input(q);
            replies.push(c.send().await.unwrap());
        }

        assert_eq!(replies[0].source, AnswerSource::Cache);
        assert!(replies[..2].iter().all(|r| r.committed.is_none()));
        assert_eq!(replies[2].committed, Some(true));

        let session = c.tracker().current_session().unwrap();
        assert_eq!(session.session_status, SessionStatus::Complete);
        assert_eq!(session.total_questions, 3);
        assert_eq!(c.remaining_questions(), 0);
        assert_eq!(c.tracker().remote().calls(), 1);

        // input disabled
        assert!(c.is_exhausted());
        assert_eq!(c.placeholder(), EXHAUSTED_PLACEHOLDER);
        c.set_input("One more?");
        assert!(c.send().await.is_none());
        assert_eq!(c.tracker().current_session().unwrap().total_questions, 3);

        let contact = c.contact().unwrap();
        assert!(contact.links.iter().any(|l| l.label == "LinkedIn"));
    }

    #[tokio::test]
    async fn test_failed_final_commit_still_exhausts_quota() {
        let c = controller_with(MockClient::new(), MockRemote::failing());
        c.open();
        c.submit_name("Ada");
        for q in ["q one", "q two", "q three"] {
            c.set_input(q);
            c.send().await.unwrap();
        }
        // reaching the limit completes the session even though the commit failed
        let session = c.tracker().current_session().unwrap();
        assert_eq!(session.session_status, SessionStatus::Complete);
        assert!(c.is_exhausted());
    }

    #[tokio::test]
    async fn test_close_commits_in_background() {
        let c = controller();
        c.open();
        c.submit_name("Ada");
        c.set_input("Where did you grow up?");
        c.send().await.unwrap();

        let handle = c.close().unwrap();
        assert_eq!(c.state(), ChatState::Closed);
        assert!(handle.await.unwrap());
        assert_eq!(c.tracker().remote().calls(), 1);
        assert!(c.close().is_none());
    }

    #[tokio::test]
    async fn test_reopen_restores_exhausted_flag() {
        let c = controller();
        c.tracker().create_session("Ada");
        for q in ["a", "b", "c"] {
            c.tracker().append_question(q);
        }
        assert_eq!(c.open(), ChatState::Open);
        assert!(c.is_exhausted());
        assert!(c.contact().is_some());
    }

    #[test]
    fn test_choose_suggestion() {
        let c = controller();
        assert!(c.choose_suggestion(2));
        assert_eq!(c.snapshot().input, "What's your design process?");
        assert!(!c.choose_suggestion(SUGGESTED_QUESTIONS.len()));
    }
}
