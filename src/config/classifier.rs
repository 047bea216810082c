// src/config/classifier.rs
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{env, fs};

use crate::analyze::remote::DEFAULT_ENDPOINT;
use crate::analyze::FallbackStrategy;

pub const DEFAULT_CONFIG_PATH: &str = "config/classifier.json";
pub const ENV_CONFIG_PATH: &str = "CLASSIFIER_CONFIG_PATH";
pub const ENV_API_KEY: &str = "HUGGINGFACE_API_KEY";
pub const ENV_FALLBACK: &str = "FALLBACK_STRATEGY";
/// `mock` | `error`: swap the remote provider for a deterministic stub.
pub const ENV_TEST_MODE: &str = "CLASSIFIER_TEST_MODE";

const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 4;

fn default_enabled() -> bool {
    true
}
fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}
fn default_api_key() -> String {
    "ENV".to_string()
}
fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}
fn default_connect_timeout_secs() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_SECS
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// When false, every check is scored by the local heuristic.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Literal token, or "ENV" to read `HUGGINGFACE_API_KEY`.
    #[serde(default = "default_api_key")]
    pub api_key: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default)]
    pub fallback: FallbackStrategy,
    /// Optional TOML keyword set replacing the built-in lists.
    #[serde(default)]
    pub keywords_path: Option<PathBuf>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            endpoint: default_endpoint(),
            api_key: default_api_key(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            fallback: FallbackStrategy::default(),
            keywords_path: None,
        }
    }
}

impl ClassifierConfig {
    pub fn from_json_str(s: &str) -> anyhow::Result<Self> {
        let cfg: ClassifierConfig = serde_json::from_str(s)?;
        cfg.resolve()
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)
            .with_context(|| format!("reading classifier config at {}", path.display()))?;
        Self::from_json_str(&data)
            .with_context(|| format!("parsing classifier config at {}", path.display()))
    }

    /// `$CLASSIFIER_CONFIG_PATH`, else `config/classifier.json`. A missing
    /// file yields defaults; a broken one is an error.
    pub fn load() -> anyhow::Result<Self> {
        let path = env::var(ENV_CONFIG_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));
        if path.exists() {
            Self::load_from_file(&path)
        } else {
            Self::default().resolve()
        }
    }

    /// Apply environment overrides and sanitize values.
    pub fn resolve(mut self) -> anyhow::Result<Self> {
        // Missing key is not fatal: the remote call fails and falls back.
        if self.api_key.trim().eq_ignore_ascii_case("env") {
            self.api_key = env::var(ENV_API_KEY).unwrap_or_default();
        }

        if let Ok(raw) = env::var(ENV_FALLBACK) {
            self.fallback = raw.parse()?;
        }

        if self.timeout_secs == 0 {
            self.timeout_secs = DEFAULT_TIMEOUT_SECS;
        }
        if self.connect_timeout_secs == 0 {
            self.connect_timeout_secs = DEFAULT_CONNECT_TIMEOUT_SECS;
        }
        if self.connect_timeout_secs > self.timeout_secs {
            self.connect_timeout_secs = self.timeout_secs;
        }

        Ok(self)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}
