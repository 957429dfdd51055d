//! The query handler: one address in, one validated answer out.
//!
//! A query moves strictly forward through
//! `request sent → response received → parsed → validated → mapped`, and any
//! failure after the request is sent ends it with a [`QueryError`]. Nothing is
//! retried and nothing is kept between queries.

use kyc_core::{
  Address, AddressMatch, Output, SchemaSelector, output::to_output, parse::parse,
  validate::validate,
};
use tracing::{debug, info, instrument, warn};

use crate::{config::AdapterConfig, error::QueryError, upstream::IdentitySource};

/// Decoding and validation choices for a deployment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Settings {
  pub schema:        SchemaSelector,
  pub address_match: AddressMatch,
}

impl From<&AdapterConfig> for Settings {
  fn from(cfg: &AdapterConfig) -> Self {
    Self { schema: cfg.schema, address_match: cfg.address_match }
  }
}

/// Answers queries using an injected [`IdentitySource`].
pub struct QueryHandler<S> {
  source:   S,
  settings: Settings,
}

impl<S: IdentitySource> QueryHandler<S> {
  pub fn new(source: S, settings: Settings) -> Self { Self { source, settings } }

  /// Run one query for `address` as supplied by the caller.
  #[instrument(name = "query", skip(self))]
  pub async fn query(&self, address: &str) -> Result<Output, QueryError> {
    match self.run(address.trim()).await {
      Ok(output) => {
        info!(
          status = %output.status,
          kyc_timestamp = output.kyc_timestamp,
          "query answered"
        );
        Ok(output)
      }
      Err(e) => {
        warn!(kind = e.kind(), error = %e, "query failed");
        Err(e)
      }
    }
  }

  async fn run(&self, address: &str) -> Result<Output, QueryError> {
    Address::parse(address).map_err(|e| {
      QueryError::InvalidRequest(format!("invalid address {address:?}: {e}"))
    })?;

    debug!("sending upstream request");
    let body = self.source.fetch(address).await?;

    debug!(bytes = body.len(), "upstream response received");
    let envelope = parse(&body, self.settings.schema)?;

    debug!(success = envelope.success, "upstream response parsed");
    let record = validate(envelope, address, self.settings.address_match)?;

    debug!(status = %record.status(), schema = %record.schema(), "record validated");
    Ok(to_output(&record))
  }
}
