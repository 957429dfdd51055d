//! The identity record — one upstream verification result for one address.
//!
//! Records are built once per query from a decoded [`Payload`] and never
//! mutated afterwards. Timestamps are normalised on construction: a zero
//! value (Unix epoch 0 or the year-1 "zero time") is stored as absent.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use strum::{AsRefStr, Display, EnumString};

use crate::{classify::classify, parse::Payload};

/// Unix seconds of `0001-01-01T00:00:00Z`, the zero time some upstreams emit
/// for unset dates.
const YEAR_ONE_ZERO: i64 = -62_135_596_800;

// ─── Status ──────────────────────────────────────────────────────────────────

/// Canonical verification status of an address.
///
/// The `Display`/`AsRef<str>` form is the wire name sent to clients.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum Status {
  #[strum(to_string = "KYC_USER", serialize = "kyc-user")]
  KycUser,
  #[strum(to_string = "HUMAN_AND_UNIQUE", serialize = "human-unique")]
  HumanUnique,
  #[strum(to_string = "NOT_FOUND", serialize = "not-found")]
  NotFound,
  /// Never a valid final answer; marks an upstream contract violation.
  #[default]
  #[strum(to_string = "UNDEFINED", serialize = "undefined")]
  Undefined,
}

impl Status {
  /// Map an integer status code. Unknown codes are [`Status::Undefined`].
  pub fn from_code(code: i64) -> Self {
    match code {
      1 => Self::KycUser,
      2 => Self::HumanUnique,
      3 => Self::NotFound,
      _ => Self::Undefined,
    }
  }
}

impl Serialize for Status {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(self.as_ref())
  }
}

/// Accepts a wire name, a lowercase name, or an integer code. Anything
/// unrecognised (including `null`) becomes [`Status::Undefined`] so that the
/// validator, not the decoder, reports it.
impl<'de> Deserialize<'de> for Status {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
      Code(i64),
      Name(String),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
      Some(Raw::Code(code)) => Status::from_code(code),
      Some(Raw::Name(name)) => name.trim().parse().unwrap_or(Status::Undefined),
      None => Status::Undefined,
    })
  }
}

// ─── Schema ──────────────────────────────────────────────────────────────────

/// Which upstream payload shape a record was decoded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Schema {
  /// Explicit status field plus creation and KYC dates.
  Status,
  /// Boolean flags plus a KYC date; no creation date is ever reported.
  Flags,
}

impl Schema {
  pub fn reports_creation_date(self) -> bool { matches!(self, Self::Status) }
}

// ─── Record ──────────────────────────────────────────────────────────────────

/// A single upstream verification result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityRecord {
  address:       Option<String>,
  status:        Status,
  creation_date: Option<DateTime<Utc>>,
  kyc_date:      Option<DateTime<Utc>>,
  schema:        Schema,
}

impl IdentityRecord {
  pub fn new(
    schema: Schema,
    status: Status,
    creation_date: Option<DateTime<Utc>>,
    kyc_date: Option<DateTime<Utc>>,
  ) -> Self {
    Self {
      address: None,
      status,
      creation_date: creation_date.filter(|t| !is_zero_time(t)),
      kyc_date: kyc_date.filter(|t| !is_zero_time(t)),
      schema,
    }
  }

  /// Attach the address the upstream echoed back, as sent.
  pub fn with_address(self, address: impl Into<String>) -> Self {
    Self { address: Some(address.into()), ..self }
  }

  /// Build the canonical record from either payload shape. Flag payloads are
  /// classified into a [`Status`] first.
  pub fn from_payload(payload: Payload) -> Self {
    let (record, address) = match payload {
      Payload::Status(p) => (
        Self::new(Schema::Status, p.status, p.creation_date, p.kyc_date),
        p.address,
      ),
      Payload::Flags(p) => {
        let status = classify(p.is_human_and_unique, p.is_kyc_user, p.kyc_date);
        (Self::new(Schema::Flags, status, None, p.kyc_date), p.address)
      }
    };
    match address.filter(|a| !a.trim().is_empty()) {
      Some(a) => record.with_address(a),
      None => record,
    }
  }

  /// The address echoed by the upstream, if any, exactly as received.
  pub fn address(&self) -> Option<&str> { self.address.as_deref() }

  pub fn status(&self) -> Status { self.status }

  pub fn creation_date(&self) -> Option<DateTime<Utc>> { self.creation_date }

  pub fn kyc_date(&self) -> Option<DateTime<Utc>> { self.kyc_date }

  pub fn schema(&self) -> Schema { self.schema }
}

/// True for the values upstreams use to mean "no date". Only the exact
/// instants count; a sub-second offset from either is a real date.
pub fn is_zero_time(t: &DateTime<Utc>) -> bool {
  let secs = t.timestamp();
  t.timestamp_subsec_nanos() == 0 && (secs == 0 || secs == YEAR_ONE_ZERO)
}
