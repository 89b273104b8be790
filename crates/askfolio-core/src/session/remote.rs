use std::future::Future;

use crate::config::SessionConfig;
use crate::error::{AskfolioError, Result};
use crate::model::Session;

/// Where finished sessions are delivered. One attempt per call, no retry.
pub trait SessionRemote: Send + Sync {
    /// URL used for unload beacons. `None` when delivery is disabled.
    fn endpoint(&self) -> Option<&str>;

    fn deliver(&self, session: &Session) -> impl Future<Output = Result<()>> + Send;
}

/// POSTs the session as JSON. Any non-2xx status is a failure.
#[derive(Debug, Clone)]
pub struct HttpSessionRemote {
    url: String,
    client: reqwest::Client,
}

impl HttpSessionRemote {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::new(),
        }
    }
}

impl SessionRemote for HttpSessionRemote {
    fn endpoint(&self) -> Option<&str> {
        Some(&self.url)
    }

    async fn deliver(&self, session: &Session) -> Result<()> {
        let resp = self.client.post(&self.url).json(session).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(AskfolioError::Remote(format!(
                "session commit rejected with {status}: {text}"
            )));
        }
        Ok(())
    }
}

/// Used when no commit endpoint is configured. Every delivery fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRemote;

impl SessionRemote for NoRemote {
    fn endpoint(&self) -> Option<&str> {
        None
    }

    async fn deliver(&self, _session: &Session) -> Result<()> {
        Err(AskfolioError::NotConfigured(
            "session commit endpoint not configured".into(),
        ))
    }
}

/// Enum wrapper picking a remote from configuration.
/// Using an enum instead of `Box<dyn SessionRemote>` because the trait uses RPITIT.
#[derive(Debug, Clone)]
pub enum Remote {
    Http(HttpSessionRemote),
    Disabled(NoRemote),
}

impl Remote {
    pub fn from_config(config: &SessionConfig) -> Self {
        match config.commit_url.as_deref() {
            Some(url) if !url.trim().is_empty() => Remote::Http(HttpSessionRemote::new(url)),
            _ => Remote::Disabled(NoRemote),
        }
    }
}

impl SessionRemote for Remote {
    fn endpoint(&self) -> Option<&str> {
        match self {
            Remote::Http(r) => r.endpoint(),
            Remote::Disabled(r) => r.endpoint(),
        }
    }

    async fn deliver(&self, session: &Session) -> Result<()> {
        match self {
            Remote::Http(r) => r.deliver(session).await,
            Remote::Disabled(r) => r.deliver(session).await,
        }
    }
}
