use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{MaskDriftError, Result};

pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 9;
pub const DEFAULT_POLL_TIMEOUT_SECS: u64 = 7200;

/// Runtime configuration for one workflow invocation. There are no
/// process-wide globals; this object is passed by reference everywhere.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Compliance engine hostname (no scheme; the port probe decides that).
    pub host: String,
    pub username: String,
    pub password: String,

    /// Verify the engine's TLS certificate. On by default; the legacy
    /// scripts ran with verification off.
    #[serde(default = "default_verify_tls")]
    pub verify_tls: bool,

    /// Directory the mismatch report files are appended under.
    #[serde(default = "default_report_dir")]
    pub report_dir: PathBuf,

    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,

    /// Ceiling on how long one execution may stay RUNNING before the
    /// workflow gives up. The legacy scripts polled forever.
    #[serde(default = "default_poll_timeout")]
    pub poll_timeout_secs: u64,

    #[serde(default)]
    pub profiling_jobs: Vec<i64>,

    #[serde(default)]
    pub masking_jobs: Vec<i64>,
}

fn default_verify_tls() -> bool {
    true
}

fn default_report_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_poll_interval() -> u64 {
    DEFAULT_POLL_INTERVAL_SECS
}

fn default_poll_timeout() -> u64 {
    DEFAULT_POLL_TIMEOUT_SECS
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.host.is_empty() {
            return Err(MaskDriftError::Config("engine host is required".into()));
        }
        if self.username.is_empty() {
            return Err(MaskDriftError::Config("engine username is required".into()));
        }
        if self.poll_interval_secs == 0 {
            return Err(MaskDriftError::Config(
                "poll interval must be at least one second".into(),
            ));
        }
        Ok(())
    }
}
