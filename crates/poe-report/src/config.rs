//! Environment-sourced configuration.
//!
//! Everything comes from `MERAKI_*` environment variables via figment's Env
//! provider. The API key and organization name are required; absence of
//! either fails the run before any network call.

use std::path::PathBuf;
use std::time::Duration;

use figment::{Figment, providers::Env};
use secrecy::SecretString;
use serde::Deserialize;

use crate::error::CliError;

/// Fixed name of the output workbook when `MERAKI_OUTPUT` is not set.
pub const DEFAULT_WORKBOOK: &str = "poe_switches.xlsx";

#[derive(Debug, Deserialize)]
pub struct Config {
    /// Dashboard API key (`MERAKI_API_KEY`). Required.
    pub api_key: SecretString,

    /// Display name of the organization to report on (`MERAKI_ORG_NAME`).
    /// Required; matched exactly against the organizations the key can see.
    pub org_name: String,

    /// API base URL (`MERAKI_BASE_URL`).
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds (`MERAKI_TIMEOUT`).
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Output workbook path (`MERAKI_OUTPUT`).
    #[serde(default = "default_output")]
    pub output: PathBuf,
}

fn default_base_url() -> String {
    "https://api.meraki.com/api/v1/".into()
}

fn default_timeout() -> u64 {
    30
}

fn default_output() -> PathBuf {
    PathBuf::from(DEFAULT_WORKBOOK)
}

impl Config {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

/// Load and validate configuration from the environment.
pub fn load() -> Result<Config, CliError> {
    let config: Config = Figment::new()
        .merge(Env::prefixed("MERAKI_"))
        .extract()
        .map_err(|e| CliError::Config(Box::new(e)))?;

    Ok(config)
}
