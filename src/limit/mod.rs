//! Rate limiting ahead of the paste pipelines.
//!
//! Identities are deliberately content-derived, not client-derived:
//! creations bucket by a fixed-length prefix of the submitted text,
//! retrievals by the requested key. The limiter is always consulted before
//! any store access.

use std::time::Duration;

use anyhow::Context;

use crate::config::{self, LimiterKind};

pub mod http;
pub mod window;

/// How many leading bytes of content form a creation identity.
const IDENTITY_PREFIX_LEN: usize = 20;

/// Outcome of a rate limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allowed,
    Limited,
}

pub trait Limiter {
    /// Check whether the given identity may proceed.
    async fn check(&self, identity: &str) -> crate::AppResult<Decision>;
}

#[derive(Clone)]
pub enum AnyLimiter {
    Http(http::HttpLimiter),
    Window(window::WindowLimiter),
}

impl AnyLimiter {
    pub fn from_config(config: &config::RateLimiter) -> anyhow::Result<AnyLimiter> {
        match config.kind {
            LimiterKind::Window => Ok(window::WindowLimiter::new(
                config.max_requests,
                Duration::from_secs(config.window_secs),
            )
            .into()),
            LimiterKind::Http => {
                let url = config
                    .url
                    .clone()
                    .context("rate_limiter.url is required for the http limiter")?;
                Ok(http::HttpLimiter::new(
                    url,
                    config.fail_open,
                    Duration::from_millis(config.timeout_ms),
                )?
                .into())
            }
        }
    }
}

impl Limiter for AnyLimiter {
    async fn check(&self, identity: &str) -> crate::AppResult<Decision> {
        match self {
            AnyLimiter::Http(http) => http.check(identity).await,
            AnyLimiter::Window(window) => window.check(identity).await,
        }
    }
}

impl From<http::HttpLimiter> for AnyLimiter {
    fn from(value: http::HttpLimiter) -> Self {
        AnyLimiter::Http(value)
    }
}

impl From<window::WindowLimiter> for AnyLimiter {
    fn from(value: window::WindowLimiter) -> Self {
        AnyLimiter::Window(value)
    }
}

/// Identity for a creation request: a fixed-length prefix of the validated
/// content. Requests with identical leading content share a bucket.
pub fn create_identity(content: &str) -> &str {
    // validated content is ASCII, so byte slicing cannot split a character
    &content[..content.len().min(IDENTITY_PREFIX_LEN)]
}

/// Identity for a retrieval request: the requested key itself. This bounds
/// repeated lookups of a single paste, not per-client throughput.
pub fn fetch_identity(key: &str) -> &str {
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_identity_is_a_fixed_prefix() {
        let content = "this content is longer than twenty bytes";
        assert_eq!(create_identity(content), "this content is long");
    }

    #[test]
    fn short_content_is_its_own_identity() {
        assert_eq!(create_identity("tiny"), "tiny");
    }

    #[test]
    fn fetch_identity_is_the_key() {
        assert_eq!(fetch_identity("abc123"), "abc123");
    }
}
