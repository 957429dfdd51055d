//! Adapter configuration.
//!
//! Values are layered from an optional TOML file and `ADAPTER_`-prefixed
//! environment variables (`ADAPTER_API_KEY`, `ADAPTER_CHAINLINK_SERVICE_URL`,
//! `ADAPTER_PORT`, ...), environment winning.

use std::{fmt, path::Path, time::Duration};

use kyc_core::{AddressMatch, SchemaSelector};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const ENV_PREFIX: &str = "ADAPTER";

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to load configuration: {0}")]
  Load(#[from] config::ConfigError),

  #[error("`{0}` must not be empty")]
  Empty(&'static str),

  #[error("`request_timeout_secs` must be greater than zero")]
  ZeroTimeout,

  #[error("invalid `chainlink_service_url` {url:?}: {reason}")]
  InvalidUrl { url: String, reason: String },
}

/// Where the requested address goes in the upstream URL.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UrlLayout {
  /// `{base}{address}` — the base carries its own trailing separator.
  #[default]
  Concat,
  /// `{base}/{address}`
  Segment,
  /// `{base}/status/{address}`
  StatusSegment,
}

impl UrlLayout {
  pub fn url(self, base: &str, address: &str) -> String {
    match self {
      UrlLayout::Concat => format!("{base}{address}"),
      UrlLayout::Segment => format!("{}/{address}", base.trim_end_matches('/')),
      UrlLayout::StatusSegment => {
        format!("{}/status/{address}", base.trim_end_matches('/'))
      }
    }
  }
}

/// Runtime configuration, deserialised from file and environment.
#[derive(Clone, Deserialize)]
pub struct AdapterConfig {
  /// Credential sent upstream in `X-Api-Key`.
  pub api_key:               String,
  #[serde(alias = "chainlink_service_addr")]
  pub chainlink_service_url: String,
  pub port:                  u16,
  #[serde(default = "default_host")]
  pub host:                  String,
  #[serde(default = "default_timeout_secs")]
  pub request_timeout_secs:  u64,
  #[serde(default)]
  pub schema:                SchemaSelector,
  #[serde(default)]
  pub url_layout:            UrlLayout,
  #[serde(default)]
  pub address_match:         AddressMatch,
}

fn default_host() -> String { "0.0.0.0".to_string() }

fn default_timeout_secs() -> u64 { 30 }

impl AdapterConfig {
  /// Load from `path` (if it exists) and the environment, then validate.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    Self::layered(
      config::File::from(path).required(false),
      config::Environment::with_prefix(ENV_PREFIX),
    )
  }

  /// Layer `env` over `file`, then deserialize and validate.
  fn layered<F>(file: F, env: config::Environment) -> Result<Self, ConfigError>
  where
    F: config::Source + Send + Sync + 'static,
  {
    let settings = config::Config::builder().add_source(file).add_source(env).build()?;
    Self::from_settings(settings)
  }

  pub fn from_settings(settings: config::Config) -> Result<Self, ConfigError> {
    let cfg: Self = settings.try_deserialize()?;
    cfg.validate()?;
    Ok(cfg)
  }

  pub fn validate(&self) -> Result<(), ConfigError> {
    if self.api_key.trim().is_empty() {
      return Err(ConfigError::Empty("api_key"));
    }
    if self.chainlink_service_url.trim().is_empty() {
      return Err(ConfigError::Empty("chainlink_service_url"));
    }
    if let Err(e) = Url::parse(&self.chainlink_service_url) {
      return Err(ConfigError::InvalidUrl {
        url:    self.chainlink_service_url.clone(),
        reason: e.to_string(),
      });
    }
    if self.request_timeout_secs == 0 {
      return Err(ConfigError::ZeroTimeout);
    }
    Ok(())
  }

  pub fn request_timeout(&self) -> Duration {
    Duration::from_secs(self.request_timeout_secs)
  }
}

impl fmt::Debug for AdapterConfig {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("AdapterConfig")
      .field("api_key", &"<redacted>")
      .field("chainlink_service_url", &self.chainlink_service_url)
      .field("port", &self.port)
      .field("host", &self.host)
      .field("request_timeout_secs", &self.request_timeout_secs)
      .field("schema", &self.schema)
      .field("url_layout", &self.url_layout)
      .field("address_match", &self.address_match)
      .finish()
  }
}
