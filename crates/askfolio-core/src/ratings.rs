//! Visitor ratings.
//!
//! Every rating is appended to a local JSONL log at
//! `~/.config/askfolio/ratings.jsonl`; the remote endpoint is optional and
//! only ever gets one attempt.

use std::io::Write;
use std::path::PathBuf;

use crate::config::RatingsConfig;
use crate::error::{AskfolioError, Result};
use crate::model::{Rating, RatingSummary};

/// Append-only JSONL log of ratings.
#[derive(Debug, Clone)]
pub struct RatingLog {
    path: PathBuf,
}

impl RatingLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn default_path() -> PathBuf {
        crate::config::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("ratings.jsonl")
    }

    pub fn from_config(config: &RatingsConfig) -> Self {
        match config.log_path {
            Some(ref p) => Self::new(p),
            None => Self::new(Self::default_path()),
        }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    pub fn append(&self, rating: &Rating) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let line = serde_json::to_string(rating)?;
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| {
                AskfolioError::Storage(format!(
                    "failed to open rating log {}: {e}",
                    self.path.display()
                ))
            })?;
        writeln!(file, "{line}")?;
        Ok(())
    }

    /// All ratings in file order. Unparseable lines are skipped.
    pub fn read_all(&self) -> Vec<Rating> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(_) => return Vec::new(),
        };
        content
            .lines()
            .filter(|l| !l.trim().is_empty())
            .filter_map(|l| match serde_json::from_str(l) {
                Ok(r) => Some(r),
                Err(e) => {
                    tracing::debug!("ratings: skipping bad line: {e}");
                    None
                }
            })
            .collect()
    }

    pub fn summary(&self) -> RatingSummary {
        RatingSummary::from_ratings(&self.read_all())
    }
}

/// Records ratings locally and forwards them to the rating endpoint when one
/// is configured.
#[derive(Debug, Clone)]
pub struct RatingClient {
    log: RatingLog,
    endpoint: Option<String>,
    client: reqwest::Client,
}

impl RatingClient {
    pub fn new(log: RatingLog, endpoint: Option<String>) -> Self {
        Self {
            log,
            endpoint: endpoint.filter(|e| !e.trim().is_empty()),
            client: reqwest::Client::new(),
        }
    }

    pub fn from_config(config: &RatingsConfig) -> Self {
        Self::new(RatingLog::from_config(config), config.endpoint.clone())
    }

    pub fn log(&self) -> &RatingLog {
        &self.log
    }

    /// Validate, log locally, then try the endpoint. `Ok(false)` means the
    /// rating was only stored locally. Out-of-range values are rejected
    /// before anything is written.
    pub async fn submit(&self, value: u8, session_id: &str) -> Result<bool> {
        let rating = Rating::new(value, session_id)?;

        if let Err(e) = self.log.append(&rating) {
            tracing::warn!(error = %e, "failed to write rating log");
        }

        let Some(ref url) = self.endpoint else {
            tracing::debug!("no rating endpoint configured, stored locally");
            return Ok(false);
        };

        match self.client.post(url).json(&rating).send().await {
            Ok(resp) if resp.status().is_success() => {
                tracing::info!(session_id, rating = value, "rating submitted");
                Ok(true)
            }
            Ok(resp) => {
                tracing::warn!(status = %resp.status(), "rating endpoint rejected rating, stored locally");
                Ok(false)
            }
            Err(e) => {
                tracing::warn!(error = %e, "rating endpoint unreachable, stored locally");
                Ok(false)
            }
        }
    }
}
