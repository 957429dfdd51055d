//! Decoding of upstream response bodies.
//!
//! The upstream wraps every answer in an envelope:
//!
//! ```json
//! { "success": true, "error": "", "data": { ... } }
//! ```
//!
//! `data` comes in one of two shapes depending on the deployment, see
//! [`Payload`]. The shape is either fixed by configuration or sniffed from
//! the keys present in `data`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{error::ParseError, record::{Schema, Status}};

// ─── Schema selection ────────────────────────────────────────────────────────

/// How to pick the [`Payload`] shape for a response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaSelector {
  Status,
  Flags,
  /// Inspect the keys of `data`.
  #[default]
  Auto,
}

// ─── Payload shapes ──────────────────────────────────────────────────────────

/// `data` carrying an explicit status.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StatusPayload {
  #[serde(default)]
  pub address:       Option<String>,
  #[serde(default)]
  pub status:        Status,
  #[serde(default)]
  pub creation_date: Option<DateTime<Utc>>,
  #[serde(default)]
  pub kyc_date:      Option<DateTime<Utc>>,
}

/// `data` carrying boolean flags instead of a status.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FlagsPayload {
  #[serde(default)]
  pub address:             Option<String>,
  #[serde(rename = "isHumanAndUniqueUser", default)]
  pub is_human_and_unique: bool,
  #[serde(rename = "isKYCUser", default)]
  pub is_kyc_user:         bool,
  #[serde(rename = "KYCDate", default)]
  pub kyc_date:            Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
  Status(StatusPayload),
  Flags(FlagsPayload),
}

impl Payload {
  pub fn schema(&self) -> Schema {
    match self {
      Payload::Status(_) => Schema::Status,
      Payload::Flags(_) => Schema::Flags,
    }
  }
}

// ─── Envelope ────────────────────────────────────────────────────────────────

/// A decoded upstream response.
///
/// `data` is `Some` exactly when `success` is true; on failure the payload is
/// never decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseEnvelope {
  pub success: bool,
  pub error:   String,
  pub data:    Option<Payload>,
}

impl ResponseEnvelope {
  pub fn ok(payload: Payload) -> Self {
    Self { success: true, error: String::new(), data: Some(payload) }
  }

  pub fn failed(message: impl Into<String>) -> Self {
    Self { success: false, error: message.into(), data: None }
  }
}

#[derive(Deserialize)]
struct RawEnvelope {
  success: bool,
  #[serde(default)]
  error:   Option<String>,
  #[serde(default)]
  data:    Option<Value>,
}

/// Decode `raw` into an envelope.
///
/// Fails with [`ParseError::MalformedPayload`] if the body is not a JSON
/// object, lacks a boolean `success`, or carries a `data` that is neither an
/// object nor `null`. A successful response must also have object `data`; a
/// failed one may omit it, and its contents are not decoded.
pub fn parse(raw: &[u8], selector: SchemaSelector) -> Result<ResponseEnvelope, ParseError> {
  let value: Value = serde_json::from_slice(raw)?;
  if !value.is_object() {
    return Err(ParseError::MalformedPayload(
      "response body is not a JSON object".to_string(),
    ));
  }

  let envelope: RawEnvelope = serde_json::from_value(value)?;
  let error = envelope.error.unwrap_or_default();

  let data = match envelope.data {
    Some(Value::Object(map)) => Some(map),
    Some(Value::Null) | None => None,
    Some(_) => {
      return Err(ParseError::MalformedPayload(
        "data is not a JSON object".to_string(),
      ));
    }
  };

  if !envelope.success {
    return Ok(ResponseEnvelope::failed(error));
  }

  let Some(data) = data else {
    return Err(ParseError::MalformedPayload(
      "successful response has no data".to_string(),
    ));
  };

  let schema = match selector {
    SchemaSelector::Status => Schema::Status,
    SchemaSelector::Flags => Schema::Flags,
    SchemaSelector::Auto => sniff(&data)?,
  };

  let payload = match schema {
    Schema::Status => Payload::Status(serde_json::from_value(Value::Object(data))?),
    Schema::Flags => Payload::Flags(serde_json::from_value(Value::Object(data))?),
  };

  Ok(ResponseEnvelope { success: true, error, data: Some(payload) })
}

fn sniff(data: &Map<String, Value>) -> Result<Schema, ParseError> {
  if data.contains_key("status") {
    Ok(Schema::Status)
  } else if data.contains_key("isHumanAndUniqueUser") || data.contains_key("isKYCUser") {
    Ok(Schema::Flags)
  } else {
    Err(ParseError::MalformedPayload(
      "data matches no known schema".to_string(),
    ))
  }
}
