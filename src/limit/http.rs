//! Client for an external rate-limit counter service.
//!
//! The service owns the counters; this client only asks. Protocol: POST the
//! check endpoint with `{"identity": "..."}`, the service answers
//! `{"allowed": bool}`. Unavailability is treated per the configured
//! fail-open/fail-closed policy; the default is fail-closed, since allowing
//! unlimited writes while the limiter is down would defeat it.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{Decision, Limiter};

#[derive(Clone)]
pub struct HttpLimiter {
    client: reqwest::Client,
    url: String,
    fail_open: bool,
}

#[derive(Serialize)]
struct CheckRequest<'a> {
    identity: &'a str,
}

#[derive(Deserialize)]
struct CheckResponse {
    allowed: bool,
}

impl HttpLimiter {
    pub fn new(url: String, fail_open: bool, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(HttpLimiter {
            client,
            url,
            fail_open,
        })
    }

    async fn ask(&self, identity: &str) -> reqwest::Result<bool> {
        let response = self
            .client
            .post(&self.url)
            .json(&CheckRequest { identity })
            .send()
            .await?
            .error_for_status()?
            .json::<CheckResponse>()
            .await?;
        Ok(response.allowed)
    }
}

impl Limiter for HttpLimiter {
    async fn check(&self, identity: &str) -> crate::AppResult<Decision> {
        match self.ask(identity).await {
            Ok(true) => Ok(Decision::Allowed),
            Ok(false) => Ok(Decision::Limited),
            Err(err) => {
                warn!("rate limiter unreachable: {err}");
                if self.fail_open {
                    Ok(Decision::Allowed)
                } else {
                    Ok(Decision::Limited)
                }
            }
        }
    }
}
