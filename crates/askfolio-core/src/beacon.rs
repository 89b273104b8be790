//! Fire-and-forget delivery for teardown paths.

/// Sends a payload without waiting for, or reporting, the outcome.
pub trait BestEffortSender: Send + Sync {
    fn send(&self, url: &str, payload: serde_json::Value);
}

/// POSTs on a detached tokio task. Outside a runtime the payload is dropped.
#[derive(Debug, Clone, Default)]
pub struct DetachedSender {
    client: reqwest::Client,
}

impl DetachedSender {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BestEffortSender for DetachedSender {
    fn send(&self, url: &str, payload: serde_json::Value) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            tracing::warn!(url, "no async runtime available, beacon dropped");
            return;
        };

        let client = self.client.clone();
        let url = url.to_string();
        handle.spawn(async move {
            match client.post(&url).json(&payload).send().await {
                Ok(resp) if resp.status().is_success() => {
                    tracing::debug!(url = %url, status = %resp.status(), "beacon delivered");
                }
                Ok(resp) => {
                    tracing::warn!(url = %url, status = %resp.status(), "beacon rejected");
                }
                Err(e) => {
                    tracing::warn!(url = %url, error = %e, "beacon failed");
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_outside_runtime_is_silent() {
        DetachedSender::new().send("http://127.0.0.1:9/user-sessions", serde_json::json!({}));
    }

    #[tokio::test]
    async fn test_send_returns_immediately() {
        let sender = DetachedSender::new();
        let started = std::time::Instant::now();
        sender.send(
            "http://127.0.0.1:9/user-sessions",
            serde_json::json!({"sessionId": "abc"}),
        );
        assert!(started.elapsed() < std::time::Duration::from_millis(500));
    }
}
