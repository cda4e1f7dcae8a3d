//! Best-effort failure reporting to an operator webhook.

use serde_json::json;
use tracing::warn;

/// Long-lived webhook client, constructed once at startup and reused for
/// every report. With no webhook configured, reporting is a no-op.
#[derive(Clone)]
pub struct Notifier {
    client: reqwest::Client,
    webhook_url: Option<String>,
}

impl Notifier {
    pub fn new(webhook_url: Option<String>) -> Self {
        Notifier {
            client: reqwest::Client::new(),
            webhook_url,
        }
    }

    pub fn disabled() -> Self {
        Notifier::new(None)
    }

    /// Report an unexpected failure. Fire-and-forget: the send happens on a
    /// spawned task and never delays or fails the caller's response; a
    /// delivery failure is logged and swallowed.
    pub fn report(&self, operation: &'static str, detail: String) {
        let Some(url) = self.webhook_url.clone() else {
            return;
        };
        let client = self.client.clone();

        tokio::spawn(async move {
            let payload = json!({
                "service": "pastr",
                "operation": operation,
                "detail": detail,
            });
            let result = client
                .post(&url)
                .json(&payload)
                .send()
                .await
                .and_then(|response| response.error_for_status());
            if let Err(err) = result {
                warn!("failed to deliver failure notification: {err}");
            }
        });
    }
}
