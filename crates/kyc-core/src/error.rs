//! Error types for `kyc-core`.

use thiserror::Error;

use crate::{record::Status, validate::Rule};

/// A textual address that is not a 20-byte hex account identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
  #[error("address must be 40 hex digits, got {0}")]
  InvalidLength(usize),

  #[error("address contains non-hex characters")]
  InvalidHex,
}

/// The upstream body could not be decoded into a response envelope.
#[derive(Debug, Error)]
pub enum ParseError {
  #[error("malformed payload: {0}")]
  MalformedPayload(String),
}

impl From<serde_json::Error> for ParseError {
  fn from(e: serde_json::Error) -> Self { Self::MalformedPayload(e.to_string()) }
}

/// A decoded envelope that cannot be turned into a trustworthy record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
  #[error("upstream reported an error: {message}")]
  UpstreamReported { message: String },

  #[error("inconsistent {status} record: {rule}")]
  InconsistentRecord { rule: Rule, status: Status },

  #[error("upstream echoed address {echoed}, expected {requested}")]
  AddressMismatch { requested: String, echoed: String },

  #[error("upstream echoed the zero address")]
  ZeroAddress,
}
