//! The upstream identity service.
//!
//! [`IdentitySource`] is the seam between the query handler and the network;
//! [`HttpSource`] is the production implementation over `reqwest`.

use std::future::Future;

use bytes::Bytes;
use reqwest::Client;
use thiserror::Error;

use crate::config::{AdapterConfig, UrlLayout};

pub const API_KEY_HEADER: &str = "X-Api-Key";

/// The upstream could not be reached or did not answer with a 2xx.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
  #[error("upstream request timed out")]
  Timeout,

  #[error("upstream answered HTTP {0}")]
  Status(u16),

  #[error("upstream request failed: {0}")]
  Request(String),
}

impl From<reqwest::Error> for TransportError {
  fn from(e: reqwest::Error) -> Self {
    if e.is_timeout() {
      TransportError::Timeout
    } else {
      TransportError::Request(e.to_string())
    }
  }
}

/// Something that can fetch the raw verification body for an address.
///
/// Implementations perform exactly one attempt; retries are not their
/// concern.
pub trait IdentitySource: Send + Sync {
  fn fetch<'a>(
    &'a self,
    address: &'a str,
  ) -> impl Future<Output = Result<Bytes, TransportError>> + Send + 'a;
}

/// HTTP client for the upstream identity service.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct HttpSource {
  client:   Client,
  base_url: String,
  api_key:  String,
  layout:   UrlLayout,
}

impl HttpSource {
  pub fn new(config: &AdapterConfig) -> reqwest::Result<Self> {
    let client = Client::builder().timeout(config.request_timeout()).build()?;
    Ok(Self {
      client,
      base_url: config.chainlink_service_url.clone(),
      api_key: config.api_key.clone(),
      layout: config.url_layout,
    })
  }

  pub fn url(&self, address: &str) -> String { self.layout.url(&self.base_url, address) }
}

impl IdentitySource for HttpSource {
  fn fetch<'a>(
    &'a self,
    address: &'a str,
  ) -> impl Future<Output = Result<Bytes, TransportError>> + Send + 'a {
    async move {
      let resp = self
        .client
        .get(self.url(address))
        .header(API_KEY_HEADER, &self.api_key)
        .send()
        .await?;

      let status = resp.status();
      if !status.is_success() {
        return Err(TransportError::Status(status.as_u16()));
      }
      Ok(resp.bytes().await?)
    }
  }
}
