use crate::error::{AskfolioError, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AskfolioConfig {
    #[serde(default)]
    pub completion: CompletionConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub ratings: RatingsConfig,
    #[serde(default)]
    pub persona: PersonaConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub contact: ContactConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionConfig {
    #[serde(default = "default_completion_provider")]
    pub provider: String,
    #[serde(default = "default_completion_model")]
    pub model: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub env_var: Option<String>,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Number of prior chat messages sent along with a new question.
    #[serde(default = "default_history_window")]
    pub history_window: usize,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            provider: default_completion_provider(),
            model: default_completion_model(),
            api_key: None,
            base_url: None,
            env_var: None,
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            history_window: default_history_window(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Where finished sessions are POSTed. `None` keeps sessions local.
    #[serde(default = "default_commit_url")]
    pub commit_url: Option<String>,
    /// File used by the CLI to keep the current session between runs.
    /// Defaults to `~/.config/askfolio/session.json`.
    #[serde(default)]
    pub store_path: Option<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            commit_url: default_commit_url(),
            store_path: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RatingsConfig {
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Local JSONL log. Defaults to `~/.config/askfolio/ratings.jsonl`.
    #[serde(default)]
    pub log_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonaConfig {
    /// Replaces the built-in persona and facts block.
    #[serde(default)]
    pub context_file: Option<String>,
    /// JSON array of content sections appended to the system prompt.
    #[serde(default)]
    pub sections_file: Option<String>,
    #[serde(default = "default_true")]
    pub custom_topics: bool,
}

impl Default for PersonaConfig {
    fn default() -> Self {
        Self {
            context_file: None,
            sections_file: None,
            custom_topics: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
    #[serde(default = "default_sessions_file")]
    pub sessions_file: String,
    #[serde(default = "default_ratings_file")]
    pub ratings_file: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            sessions_file: default_sessions_file(),
            ratings_file: default_ratings_file(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactConfig {
    #[serde(default = "default_contact_message")]
    pub message: String,
    #[serde(default = "default_contact_links")]
    pub links: Vec<ContactLink>,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            message: default_contact_message(),
            links: default_contact_links(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactLink {
    pub label: String,
    pub url: String,
}

/// Valid completion provider names.
pub const VALID_COMPLETION_PROVIDERS: &[&str] = &["openai", "anthropic", "claude", "ollama"];

/// Value shipped in example env files; treated the same as no key at all.
pub const PLACEHOLDER_API_KEY: &str = "your-openai-api-key-here";

// -- Defaults --

fn default_completion_provider() -> String {
    "openai".to_string()
}
fn default_completion_model() -> String {
    "gpt-3.5-turbo".to_string()
}
fn default_max_tokens() -> usize {
    200
}
fn default_temperature() -> f32 {
    0.7
}
fn default_history_window() -> usize {
    3
}
fn default_commit_url() -> Option<String> {
    Some(format!(
        "http://{}:{}/user-sessions",
        default_server_host(),
        default_server_port()
    ))
}
fn default_server_host() -> String {
    "127.0.0.1".to_string()
}
fn default_server_port() -> u16 {
    37740
}
fn default_sessions_file() -> String {
    "user-sessions.json".to_string()
}
fn default_ratings_file() -> String {
    "ratings.json".to_string()
}
fn default_true() -> bool {
    true
}
fn default_contact_message() -> String {
    "Looks like you want to know more about me - or just connect to bounce off thoughts and ideas"
        .to_string()
}
fn default_contact_links() -> Vec<ContactLink> {
    vec![
        ContactLink {
            label: "LinkedIn".to_string(),
            url: "https://www.linkedin.com/in/siva-tayi/".to_string(),
        },
        ContactLink {
            label: "X".to_string(),
            url: "https://x.com/siva_tayi".to_string(),
        },
    ]
}

impl AskfolioConfig {
    /// Load configuration with three-layer TOML merge plus environment:
    /// 1. ~/.config/askfolio/config.toml (global)
    /// 2. .askfolio/config.toml (project)
    /// 3. .askfolio/config.local.toml (local, gitignored)
    /// 4. `ASKFOLIO__SECTION__KEY` environment variables
    pub fn load(project_dir: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        // Layer 1: Global config
        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                builder = builder.add_source(File::from(global_path).required(false));
            }
        }

        // Layer 2: Project config
        if let Some(dir) = project_dir {
            let project_config = dir.join(".askfolio").join("config.toml");
            if project_config.exists() {
                builder = builder.add_source(File::from(project_config).required(false));
            }

            // Layer 3: Local config (gitignored)
            let local_config = dir.join(".askfolio").join("config.local.toml");
            if local_config.exists() {
                builder = builder.add_source(File::from(local_config).required(false));
            }
        }

        // Layer 4: Environment
        builder = builder.add_source(
            Environment::with_prefix("ASKFOLIO")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder
            .build()
            .map_err(|e| AskfolioError::Config(e.to_string()))?;

        let mut cfg: Self = config
            .try_deserialize()
            .map_err(|e| AskfolioError::Config(e.to_string()))?;

        cfg.validate();
        Ok(cfg)
    }

    /// Load with defaults only (no files).
    pub fn default_config() -> Self {
        Self::default()
    }

    /// Validate config values, clamping out-of-range values and logging warnings.
    pub fn validate(&mut self) -> Vec<String> {
        let mut warnings = Vec::new();

        if !VALID_COMPLETION_PROVIDERS.contains(&self.completion.provider.as_str()) {
            warnings.push(format!(
                "unknown completion provider '{}', valid: {}",
                self.completion.provider,
                VALID_COMPLETION_PROVIDERS.join(", ")
            ));
        }

        if self.completion.max_tokens == 0 {
            warnings.push(format!(
                "completion.max_tokens = 0, setting to {}",
                default_max_tokens()
            ));
            self.completion.max_tokens = default_max_tokens();
        }

        let temp = self.completion.temperature;
        if !(0.0..=2.0).contains(&temp) || temp.is_nan() {
            warnings.push(format!(
                "completion.temperature = {temp} out of range [0.0, 2.0], clamping"
            ));
            self.completion.temperature = if temp.is_nan() {
                default_temperature()
            } else {
                temp.clamp(0.0, 2.0)
            };
        }

        if matches!(self.session.commit_url.as_deref(), Some(url) if url.trim().is_empty()) {
            warnings.push("session.commit_url is empty, sessions stay local".to_string());
            self.session.commit_url = None;
        }

        if matches!(self.ratings.endpoint.as_deref(), Some(url) if url.trim().is_empty()) {
            self.ratings.endpoint = None;
        }

        for w in &warnings {
            tracing::warn!("config: {}", w);
        }

        warnings
    }

    /// Render the effective configuration as TOML, with the API key masked.
    pub fn to_toml_masked(&self) -> Result<String> {
        let mut copy = self.clone();
        if copy.completion.api_key.is_some() {
            copy.completion.api_key = Some("********".to_string());
        }
        toml::to_string_pretty(&copy)
            .map_err(|e| AskfolioError::Config(format!("failed to serialize config: {e}")))
    }
}

fn global_config_path() -> Option<PathBuf> {
    config_dir().map(|p| p.join("config.toml"))
}

/// `~/.config/askfolio`
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("askfolio"))
}

/// Resolve an API key: check config field first, then environment variable.
/// Returns `None` when no usable key exists (the "not configured" mode).
pub fn resolve_api_key(
    api_key: Option<&str>,
    env_var_override: Option<&str>,
    default_env_var: &str,
) -> Option<String> {
    if let Some(key) = api_key {
        if is_usable_key(key) {
            return Some(key.to_string());
        }
    }

    let env_var_name = env_var_override.unwrap_or(default_env_var);
    std::env::var(env_var_name)
        .ok()
        .filter(|key| is_usable_key(key))
}

fn is_usable_key(key: &str) -> bool {
    let key = key.trim();
    !key.is_empty() && key != PLACEHOLDER_API_KEY
}
