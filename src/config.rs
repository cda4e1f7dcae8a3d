use std::path::{Path, PathBuf};

use anyhow::Context;
use directories_next::ProjectDirs;
use serde::Deserialize;

use crate::keys::KeyStyle;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub port: u16,
    pub database: Database,
    pub limits: Limits,
    pub rate_limiter: RateLimiter,
    pub notifier: Notifier,
    pub keys: Keys,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            database: Database::default(),
            limits: Limits::default(),
            rate_limiter: RateLimiter::default(),
            notifier: Notifier::default(),
            keys: Keys::default(),
        }
    }
}

impl Config {
    /// Load configuration from the given file, `./config.toml`, or the
    /// platform config directory, in that order. With no file present, the
    /// defaults stand.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Config> {
        let path = match path {
            Some(path) => Some(path.to_owned()),
            None => [Some(PathBuf::from("config.toml")), default_path()]
                .into_iter()
                .flatten()
                .find(|candidate| candidate.exists()),
        };

        let Some(path) = path else {
            return Ok(Config::default());
        };

        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&raw).context("failed to deserialize config")
    }
}

fn default_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "pastr").map(|dirs| dirs.config_dir().join("config.toml"))
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Database {
    pub url: String,
}

impl Default for Database {
    fn default() -> Self {
        Database {
            url: "sqlite:pastr.db".to_owned(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Limits {
    pub max_upload_size: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_upload_size: 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RateLimiter {
    pub kind: LimiterKind,
    /// Check endpoint of the external counter service (`http` kind only).
    pub url: Option<String>,
    pub max_requests: u32,
    pub window_secs: u64,
    pub timeout_ms: u64,
    /// Whether limiter unavailability lets requests through. Off by default:
    /// an unreachable limiter rejects.
    pub fail_open: bool,
}

impl Default for RateLimiter {
    fn default() -> Self {
        RateLimiter {
            kind: LimiterKind::default(),
            url: None,
            max_requests: 30,
            window_secs: 60,
            timeout_ms: 1000,
            fail_open: false,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LimiterKind {
    #[default]
    Window,
    Http,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Notifier {
    pub webhook_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Keys {
    pub style: KeyStyle,
}
