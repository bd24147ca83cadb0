//! Run configuration.
//!
//! Every value can come from a flag or from the environment, so the same
//! settings work for the CLI and for harnesses that only set variables.

use std::ffi::OsString;
use std::time::Duration;

use clap::{ArgAction, Args, Parser};

use crate::error::{E2eError, Result};
use crate::namespace::WorkerId;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5173";
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_SHORT_TIMEOUT_MS: u64 = 1_000;

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct E2eConfig {
    /// Base URL of the application under test
    #[arg(long, env = "E2E_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Budget in milliseconds for result-bearing assertions
    #[arg(long = "timeout-ms", env = "E2E_TIMEOUT", default_value_t = DEFAULT_TIMEOUT_MS)]
    pub timeout_ms: u64,

    /// Budget in milliseconds for best-effort interactions
    #[arg(
        long = "short-timeout-ms",
        env = "E2E_SHORT_TIMEOUT",
        default_value_t = DEFAULT_SHORT_TIMEOUT_MS
    )]
    pub short_timeout_ms: u64,

    /// Worker identity appended to map names (empty when not parallel)
    #[arg(long, env = "E2E_WORKER_ID", default_value = "")]
    pub worker_id: String,

    /// Run the browser without a window
    #[arg(long, env = "E2E_HEADLESS", default_value_t = true, action = ArgAction::Set)]
    pub headless: bool,
}

#[derive(Parser, Debug)]
#[command(name = "plant-e2e")]
struct ConfigOnly {
    #[command(flatten)]
    config: E2eConfig,
}

impl Default for E2eConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            short_timeout_ms: DEFAULT_SHORT_TIMEOUT_MS,
            worker_id: String::new(),
            headless: true,
        }
    }
}

impl E2eConfig {
    /// Reads the configuration from environment variables alone.
    pub fn from_env() -> Result<Self> {
        Self::from_args(["plant-e2e"])
    }

    pub fn from_args<I, T>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let parsed = ConfigOnly::try_parse_from(args)
            .map_err(|e| E2eError::Config(e.to_string()))?;
        parsed.config.validated()
    }

    /// Normalizes the base URL and rejects unusable budgets.
    pub fn validated(mut self) -> Result<Self> {
        let trimmed = self.base_url.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(E2eError::Config("base url must not be empty".into()));
        }
        self.base_url = trimmed.to_string();
        if self.timeout_ms == 0 || self.short_timeout_ms == 0 {
            return Err(E2eError::Config("timeouts must be positive".into()));
        }
        Ok(self)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn short_timeout(&self) -> Duration {
        Duration::from_millis(self.short_timeout_ms)
    }

    pub fn worker(&self) -> WorkerId {
        WorkerId::new(self.worker_id.clone())
    }

    /// Joins `path` onto the base URL.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub fn with_worker(mut self, worker: &WorkerId) -> Self {
        self.worker_id = worker.to_string();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let config = E2eConfig::from_args([
            "plant-e2e",
            "--base-url",
            "https://dev.permaplant.net/",
            "--timeout-ms",
            "30000",
            "--worker-id",
            "gw2",
            "--headless",
            "false",
        ])
        .unwrap();

        assert_eq!(config.base_url, "https://dev.permaplant.net");
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.worker(), WorkerId::new("gw2"));
        assert!(!config.headless);
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let err = E2eConfig::from_args(["plant-e2e", "--timeout-ms", "0"]).unwrap_err();
        assert!(matches!(err, E2eError::Config(_)));
    }

    #[test]
    fn url_joining() {
        let config = E2eConfig::default();
        assert_eq!(config.url("/maps"), "http://localhost:5173/maps");
        assert_eq!(config.url("maps/"), "http://localhost:5173/maps/");
    }

    #[test]
    fn worker_override() {
        let config = E2eConfig::default().with_worker(&WorkerId::indexed(1));
        assert_eq!(config.worker_id, "gw1");
    }
}
