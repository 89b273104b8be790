//! Question → answer resolution.
//!
//! Precedence is strict: canonical table (exact, then substring either way),
//! keyword rules, completion service, fallback table, topic rules, apology.
//! Everything before the completion call is local and never touches the
//! network.

mod tables;

pub use tables::{
    Keywords, CANONICAL_ANSWERS, FALLBACK_ANSWERS, GENERIC_APOLOGY, KEYWORD_RULES, TOPIC_RULES,
};

use crate::llm::{CompletionClient, CompletionRequest, PromptMessage};
use crate::model::ChatMessage;
use crate::persona::Persona;

/// Default number of prior messages sent along with a question.
pub const DEFAULT_HISTORY_WINDOW: usize = 3;

/// Which stage produced an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerSource {
    Cache,
    Completion,
    Fallback,
    Apology,
}

impl std::fmt::Display for AnswerSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cache => write!(f, "cache"),
            Self::Completion => write!(f, "completion"),
            Self::Fallback => write!(f, "fallback"),
            Self::Apology => write!(f, "apology"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub answer: String,
    pub source: AnswerSource,
}

impl Resolution {
    fn new(answer: impl Into<String>, source: AnswerSource) -> Self {
        Self {
            answer: answer.into(),
            source,
        }
    }
}

/// Lowercase and trim.
pub fn normalize(question: &str) -> String {
    question.trim().to_lowercase()
}

/// Steps 2-4: canonical table and keyword rules. `None` means the completion
/// service has to be asked.
pub fn cached_answer(question: &str) -> Option<&'static str> {
    let normalized = normalize(question);

    if let Some((_, answer)) = CANONICAL_ANSWERS.iter().find(|(q, _)| *q == normalized) {
        return Some(*answer);
    }

    if let Some((_, answer)) = CANONICAL_ANSWERS
        .iter()
        .find(|(q, _)| normalized.contains(q) || q.contains(normalized.as_str()))
    {
        return Some(*answer);
    }

    KEYWORD_RULES
        .iter()
        .find(|(rule, _)| rule.matches(&normalized))
        .and_then(|(_, key)| canonical(key))
}

/// Steps 7-8: the canned answer used when the completion service is
/// unavailable. Always returns something.
pub fn fallback_answer(question: &str) -> Resolution {
    let lowered = question.to_lowercase();

    if let Some((_, answer)) = FALLBACK_ANSWERS.iter().find(|(k, _)| lowered.contains(k)) {
        return Resolution::new(*answer, AnswerSource::Fallback);
    }

    if let Some((_, answer)) = TOPIC_RULES.iter().find(|(rule, _)| rule.matches(&lowered)) {
        return Resolution::new(*answer, AnswerSource::Fallback);
    }

    Resolution::new(GENERIC_APOLOGY, AnswerSource::Apology)
}

fn canonical(key: &str) -> Option<&'static str> {
    CANONICAL_ANSWERS
        .iter()
        .find(|(q, _)| *q == key)
        .map(|(_, a)| *a)
}

/// Answers questions. Holds the completion client and the system prompt,
/// both fixed at construction.
pub struct Resolver<C> {
    client: C,
    persona: Persona,
    history_window: usize,
}

impl<C: CompletionClient> Resolver<C> {
    pub fn new(client: C, persona: Persona) -> Self {
        Self {
            client,
            persona,
            history_window: DEFAULT_HISTORY_WINDOW,
        }
    }

    pub fn with_history_window(mut self, window: usize) -> Self {
        self.history_window = window;
        self
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn persona(&self) -> &Persona {
        &self.persona
    }

    pub fn is_configured(&self) -> bool {
        self.client.is_configured()
    }

    /// Never fails and never returns an empty string.
    pub async fn resolve(&self, question: &str, history: &[ChatMessage]) -> String {
        self.resolve_detailed(question, history).await.answer
    }

    pub async fn resolve_detailed(&self, question: &str, history: &[ChatMessage]) -> Resolution {
        if let Some(answer) = cached_answer(question) {
            tracing::debug!(source = %AnswerSource::Cache, "answered from canonical table");
            return Resolution::new(answer, AnswerSource::Cache);
        }

        if !self.client.is_configured() {
            let resolution = fallback_answer(question);
            tracing::debug!(
                source = %resolution.source,
                "completion service not configured, using canned answer"
            );
            return resolution;
        }

        let request = self.build_request(question, history);
        match self.client.complete(&request).await {
            Ok(text) if !text.trim().is_empty() => {
                tracing::debug!(source = %AnswerSource::Completion, "answered by completion service");
                Resolution::new(text, AnswerSource::Completion)
            }
            Ok(_) => {
                tracing::warn!("completion service returned empty text, using canned answer");
                fallback_answer(question)
            }
            Err(e) => {
                tracing::warn!(error = %e, "completion failed, using canned answer");
                fallback_answer(question)
            }
        }
    }

    /// System prompt, the last `history_window` messages, then the question.
    pub fn build_request(&self, question: &str, history: &[ChatMessage]) -> CompletionRequest {
        let start = history.len().saturating_sub(self.history_window);
        let mut messages: Vec<PromptMessage> = history[start..]
            .iter()
            .map(|m| {
                if m.is_user {
                    PromptMessage::user(m.text.clone())
                } else {
                    PromptMessage::assistant(m.text.clone())
                }
            })
            .collect();
        messages.push(PromptMessage::user(question));

        CompletionRequest {
            system: self.persona.system_prompt().to_string(),
            messages,
        }
    }
}
