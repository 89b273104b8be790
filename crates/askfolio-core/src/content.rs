//! Typed portfolio content that can be folded into the system prompt.
//!
//! Sections are supplied explicitly (from a JSON file or by the embedding
//! application) rather than scraped from a rendered page.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{AskfolioError, Result};

/// Cleaned section text is capped at this many characters.
pub const MAX_SECTION_CHARS: usize = 1000;
/// Each section contributes at most this many characters to the prompt.
pub const PROMPT_SECTION_CHARS: usize = 300;
/// Formatted content shorter than this is not worth adding to the prompt.
pub const MIN_FORMATTED_CHARS: usize = 100;

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static DISALLOWED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w\s.,!?-]").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Project,
    Experience,
    Skill,
    Learning,
    General,
}

impl std::fmt::Display for SectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Project => write!(f, "project"),
            Self::Experience => write!(f, "experience"),
            Self::Skill => write!(f, "skill"),
            Self::Learning => write!(f, "learning"),
            Self::General => write!(f, "general"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentSection {
    #[serde(rename = "type")]
    pub kind: SectionKind,
    pub title: String,
    pub content: String,
}

impl ContentSection {
    /// Build a section, cleaning the content on the way in.
    pub fn new(kind: SectionKind, title: impl Into<String>, content: &str) -> Self {
        Self {
            kind,
            title: title.into(),
            content: clean_text(content),
        }
    }
}

/// Collapse whitespace, drop characters outside word characters and common
/// punctuation, and cap the length.
pub fn clean_text(text: &str) -> String {
    let collapsed = WHITESPACE.replace_all(text, " ");
    let stripped = DISALLOWED.replace_all(collapsed.trim(), "");
    truncate_chars(&stripped, MAX_SECTION_CHARS).to_string()
}

/// Render sections for the system prompt, grouped by kind in order of first
/// appearance.
pub fn format_sections(sections: &[ContentSection]) -> String {
    let mut out = String::from("\n\nADDITIONAL WEBSITE CONTENT:\n");

    for (kind, items) in group_by_kind(sections) {
        out.push_str(&format!(
            "\n{} INFORMATION:\n",
            kind.to_string().to_uppercase()
        ));
        for item in items {
            let snippet = truncate_chars(&item.content, PROMPT_SECTION_CHARS);
            let ellipsis = if snippet.len() < item.content.len() {
                "..."
            } else {
                ""
            };
            out.push_str(&format!("- {}: {snippet}{ellipsis}\n", item.title));
        }
    }

    out
}

/// Human-readable count of sections per kind.
pub fn summary(sections: &[ContentSection]) -> String {
    let count = |kind: SectionKind| sections.iter().filter(|s| s.kind == kind).count();
    format!(
        "Content Summary:\n\
         - Total sections: {}\n\
         - Projects: {}\n\
         - Experience: {}\n\
         - Skills: {}\n\
         - Learning: {}\n\
         - General: {}",
        sections.len(),
        count(SectionKind::Project),
        count(SectionKind::Experience),
        count(SectionKind::Skill),
        count(SectionKind::Learning),
        count(SectionKind::General),
    )
}

/// Read a JSON array of sections. Content is cleaned after loading.
pub fn load_sections(path: &Path) -> Result<Vec<ContentSection>> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        AskfolioError::Config(format!(
            "failed to read content sections from {}: {e}",
            path.display()
        ))
    })?;
    let sections: Vec<ContentSection> = serde_json::from_str(&raw)?;
    Ok(sections
        .into_iter()
        .map(|s| ContentSection {
            content: clean_text(&s.content),
            ..s
        })
        .collect())
}

fn group_by_kind(sections: &[ContentSection]) -> Vec<(SectionKind, Vec<&ContentSection>)> {
    let mut groups: Vec<(SectionKind, Vec<&ContentSection>)> = Vec::new();
    for section in sections {
        match groups.iter_mut().find(|(kind, _)| *kind == section.kind) {
            Some((_, items)) => items.push(section),
            None => groups.push((section.kind, vec![section])),
        }
    }
    groups
}

fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
