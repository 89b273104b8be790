use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Number of questions a visitor may ask in one session.
pub const QUESTION_LIMIT: usize = 3;

/// A visitor's chat session. Serialized in camelCase because the same JSON is
/// both the stored value and the body POSTed to the session-commit endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub session_id: String,
    pub name: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub questions: Vec<Question>,
    #[serde(default)]
    pub total_questions: usize,
    #[serde(default)]
    pub session_status: SessionStatus,
}

impl Session {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            session_id: generate_session_id(),
            name: name.into(),
            timestamp: Utc::now(),
            questions: Vec::new(),
            total_questions: 0,
            session_status: SessionStatus::Incomplete,
        }
    }

    /// Append a question, keeping `total_questions` in step with `questions`
    /// and completing the session once the limit is reached.
    pub fn push_question(&mut self, text: impl Into<String>) {
        let order = self.questions.len() + 1;
        self.questions.push(Question {
            question: text.into(),
            order,
            timestamp: Utc::now(),
        });
        self.total_questions = self.questions.len();
        if self.total_questions >= QUESTION_LIMIT {
            self.session_status = SessionStatus::Complete;
        }
    }

    pub fn has_reached_limit(&self) -> bool {
        self.total_questions >= QUESTION_LIMIT
    }

    pub fn remaining_questions(&self) -> usize {
        QUESTION_LIMIT.saturating_sub(self.total_questions)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub question: String,
    pub order: usize,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    #[default]
    Incomplete,
    Complete,
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Incomplete => write!(f, "incomplete"),
            Self::Complete => write!(f, "complete"),
        }
    }
}

impl std::str::FromStr for SessionStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "incomplete" => Ok(Self::Incomplete),
            "complete" => Ok(Self::Complete),
            _ => Err(format!("unknown session status: {s}")),
        }
    }
}

/// Opaque session token: a time-ordered UUID without hyphens.
pub fn generate_session_id() -> String {
    Uuid::now_v7().simple().to_string()
}
