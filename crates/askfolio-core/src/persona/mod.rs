//! System prompt assembly.
//!
//! A [`Persona`] is built once and never changes afterwards; every resolver
//! call reads the same prompt.

use std::path::Path;

use crate::config::PersonaConfig;
use crate::content::{self, ContentSection, MIN_FORMATTED_CHARS};
use crate::error::{AskfolioError, Result};

/// Built-in persona and facts block.
pub const BASE_CONTEXT: &str = include_str!("base.txt");

/// Appended to every system prompt.
pub const RESPONSE_GUIDELINES: &str = "

RESPONSE GUIDELINES:
- Keep responses to 2-3 sentences maximum
- Be specific and actionable
- If asked about something not in your knowledge base, briefly acknowledge and suggest discussing further
- Always maintain a helpful, professional tone
- Use \"I\" statements as you are representing Siva Tayi

IMPORTANT: Keep your response concise and to the point.";

/// Topics not covered by the base context: (topic, facts).
pub const CUSTOM_TOPICS: &[(&str, &str)] = &[
    (
        "Design Systems",
        "- Built design system for 50+ component library at enterprise scale
- Implemented token-based design system with automated code generation
- Created design system governance and adoption strategies
- Experience with Design Tokens, Storybook, and Figma variants
- Led design system migration for 15+ product teams",
    ),
    (
        "AI in Design",
        "- Advocate for human-centered AI that enhances rather than replaces creativity
- Experience designing AI transparency and explainability features
- Created ethical AI guidelines for design teams
- Designed AI-powered design tools and automation workflows
- Expert in prompt engineering for design applications",
    ),
    (
        "Voice UI Design",
        "- Designed voice interfaces for smart home and automotive applications
- Created conversational design frameworks for chatbots and voice assistants
- Experience with speech recognition UX and multimodal interactions
- Designed for accessibility in voice interfaces (screen readers, voice control)",
    ),
    (
        "Accessibility",
        "- WCAG 2.1 AA compliance expert with certification
- Conducted accessibility audits for Fortune 500 companies
- Designed inclusive experiences for users with disabilities
- Created accessibility testing frameworks and training programs
- Experience with screen readers, keyboard navigation, and assistive technologies",
    ),
    (
        "User Research",
        "- Led user research for 20+ products across different industries
- Expert in ethnographic research, usability testing, and behavioral analytics
- Created research operations frameworks for scaling research teams
- Experience with quantitative and qualitative research methodologies",
    ),
    (
        "Startup Experience",
        "- Advised 10+ startups on product strategy and design
- Experience building products from 0 to 1 with limited resources
- Created MVP strategies and rapid validation frameworks
- Expert in lean startup methodology and design sprints",
    ),
];

/// Immutable system prompt.
#[derive(Debug, Clone, PartialEq)]
pub struct Persona {
    system_prompt: String,
    section_count: usize,
}

impl Persona {
    pub fn builder() -> PersonaBuilder {
        PersonaBuilder::default()
    }

    /// Persona assembled from configuration: base (or override file),
    /// optional content sections, optional built-in custom topics.
    pub fn from_config(config: &PersonaConfig) -> Result<Self> {
        let mut builder = Self::builder();

        if let Some(ref path) = config.context_file {
            let text = std::fs::read_to_string(Path::new(path)).map_err(|e| {
                AskfolioError::Config(format!("failed to read persona context {path}: {e}"))
            })?;
            builder = builder.context(text);
        }

        if let Some(ref path) = config.sections_file {
            let sections = content::load_sections(Path::new(path))?;
            tracing::debug!("{}", content::summary(&sections));
            builder = builder.content_sections(sections);
        }

        if config.custom_topics {
            for &(topic, facts) in CUSTOM_TOPICS {
                builder = builder.custom_context(topic, facts);
            }
        }

        Ok(builder.build())
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// Number of content sections that made it into the prompt.
    pub fn section_count(&self) -> usize {
        self.section_count
    }
}

impl Default for Persona {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[derive(Debug, Clone)]
pub struct PersonaBuilder {
    context: String,
    updates: Vec<String>,
    custom: Vec<(String, String)>,
    sections: Vec<ContentSection>,
}

impl Default for PersonaBuilder {
    fn default() -> Self {
        Self {
            context: BASE_CONTEXT.to_string(),
            updates: Vec::new(),
            custom: Vec::new(),
            sections: Vec::new(),
        }
    }
}

impl PersonaBuilder {
    /// Replace the base persona text.
    pub fn context(mut self, text: impl Into<String>) -> Self {
        self.context = text.into();
        self
    }

    /// Add a free-form "ADDITIONAL CONTEXT" block after the base text.
    pub fn update_context(mut self, info: impl Into<String>) -> Self {
        self.updates.push(info.into());
        self
    }

    /// Add a topic block rendered as "ADDITIONAL CONTEXT - <TOPIC>".
    pub fn custom_context(mut self, topic: impl Into<String>, content: impl Into<String>) -> Self {
        self.custom.push((topic.into(), content.into()));
        self
    }

    pub fn content_sections(mut self, sections: Vec<ContentSection>) -> Self {
        self.sections.extend(sections);
        self
    }

    pub fn build(self) -> Persona {
        let mut prompt = self.context;
        let mut section_count = 0;

        if !self.sections.is_empty() {
            let formatted = content::format_sections(&self.sections);
            if formatted.len() > MIN_FORMATTED_CHARS {
                prompt.push_str(&formatted);
                section_count = self.sections.len();
            } else {
                tracing::debug!(
                    chars = formatted.len(),
                    "content sections too short, left out of prompt"
                );
            }
        }

        for info in &self.updates {
            prompt.push_str(&format!("\n\nADDITIONAL CONTEXT:\n{info}"));
        }

        for (topic, content) in &self.custom {
            prompt.push_str(&format!(
                "\n\nADDITIONAL CONTEXT - {}:\n{content}",
                topic.to_uppercase()
            ));
        }

        prompt.push_str(RESPONSE_GUIDELINES);

        Persona {
            system_prompt: prompt,
            section_count,
        }
    }
}
