use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use super::{Decision, Limiter};

/// Bucket count past which expired windows are swept on the next check.
const SWEEP_THRESHOLD: usize = 1024;

/// In-process fixed-window counter, one window per identity.
///
/// Suits a single-node deployment; multi-node setups should point at a
/// shared counter service via [`super::http::HttpLimiter`] instead.
#[derive(Clone)]
pub struct WindowLimiter {
    max_requests: u32,
    window: Duration,
    buckets: Arc<Mutex<HashMap<String, Window>>>,
}

struct Window {
    started: Instant,
    count: u32,
}

impl WindowLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        WindowLimiter {
            max_requests,
            window,
            buckets: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl Limiter for WindowLimiter {
    async fn check(&self, identity: &str) -> crate::AppResult<Decision> {
        let now = Instant::now();
        let mut buckets = self
            .buckets
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if buckets.len() > SWEEP_THRESHOLD {
            buckets.retain(|_, window| now.duration_since(window.started) < self.window);
        }

        let window = buckets.entry(identity.to_owned()).or_insert(Window {
            started: now,
            count: 0,
        });

        if now.duration_since(window.started) >= self.window {
            window.started = now;
            window.count = 0;
        }

        window.count += 1;
        if window.count > self.max_requests {
            Ok(Decision::Limited)
        } else {
            Ok(Decision::Allowed)
        }
    }
}
