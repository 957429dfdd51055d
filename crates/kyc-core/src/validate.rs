//! Consistency validation of decoded envelopes.
//!
//! A record is accepted only when its status agrees with the presence of its
//! dates:
//!
//! | Status             | KYC date | Creation date |
//! |--------------------|----------|---------------|
//! | `KYC_USER`         | present  | present       |
//! | `HUMAN_AND_UNIQUE` | absent   | present       |
//! | `NOT_FOUND`        | absent   | absent        |
//! | `UNDEFINED`        | rejected | rejected      |
//!
//! Creation-date rules are skipped for
//! [`Schema::Flags`](crate::record::Schema::Flags) records, which never carry
//! a creation date. Flag payloads must also not set the KYC flag without the
//! human flag. Inconsistent records are rejected, never repaired.

use serde::{Deserialize, Serialize};
use strum::Display;

use crate::{
  address::Address,
  classify::classify,
  error::ValidationError,
  parse::{FlagsPayload, Payload, ResponseEnvelope},
  record::{IdentityRecord, Status},
};

/// A single status/date invariant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Rule {
  #[strum(to_string = "KYC users must have a KYC date")]
  KycUserHasKycDate,
  #[strum(to_string = "KYC users must have a creation date")]
  KycUserHasCreationDate,
  #[strum(to_string = "human-unique users must not have a KYC date")]
  HumanUniqueHasNoKycDate,
  #[strum(to_string = "human-unique users must have a creation date")]
  HumanUniqueHasCreationDate,
  #[strum(to_string = "unknown addresses must not have a KYC date")]
  NotFoundHasNoKycDate,
  #[strum(to_string = "unknown addresses must not have a creation date")]
  NotFoundHasNoCreationDate,
  #[strum(to_string = "status must be defined")]
  StatusDefined,
  #[strum(to_string = "KYC users must be human and unique")]
  KycUserIsHuman,
}

/// How an echoed address is compared with the requested one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressMatch {
  /// Compare the parsed 20-byte values; letter case is irrelevant.
  #[default]
  Normalized,
  /// Compare the raw strings exactly.
  Exact,
}

/// Turn a decoded envelope into a validated record.
///
/// `requested` is the address parameter of the query as the caller sent it.
pub fn validate(
  envelope: ResponseEnvelope,
  requested: &str,
  mode: AddressMatch,
) -> Result<IdentityRecord, ValidationError> {
  let payload = match envelope {
    ResponseEnvelope { success: true, data: Some(payload), .. } => payload,
    ResponseEnvelope { error, .. } => {
      return Err(ValidationError::UpstreamReported { message: error });
    }
  };

  if let Payload::Flags(flags) = &payload {
    check_flags(flags)?;
  }
  let record = IdentityRecord::from_payload(payload);
  check_invariants(&record)?;
  check_address(&record, requested, mode)?;
  Ok(record)
}

/// Check the status/date table for `record`. Within a status the KYC-date
/// rule is checked before the creation-date rule.
pub fn check_invariants(record: &IdentityRecord) -> Result<(), ValidationError> {
  let kyc = record.kyc_date().is_some();
  let created = record.creation_date().is_some();
  let tracks_creation = record.schema().reports_creation_date();

  let violation = match record.status() {
    Status::KycUser => first_broken(&[
      (Rule::KycUserHasKycDate, kyc),
      (Rule::KycUserHasCreationDate, created || !tracks_creation),
    ]),
    Status::HumanUnique => first_broken(&[
      (Rule::HumanUniqueHasNoKycDate, !kyc),
      (Rule::HumanUniqueHasCreationDate, created || !tracks_creation),
    ]),
    Status::NotFound => first_broken(&[
      (Rule::NotFoundHasNoKycDate, !kyc),
      (Rule::NotFoundHasNoCreationDate, !created),
    ]),
    Status::Undefined => Some(Rule::StatusDefined),
  };

  match violation {
    Some(rule) => Err(ValidationError::InconsistentRecord { rule, status: record.status() }),
    None => Ok(()),
  }
}

/// Reject flag pairs no classification can make consistent: the KYC flag
/// without the human flag.
pub fn check_flags(flags: &FlagsPayload) -> Result<(), ValidationError> {
  if flags.is_kyc_user && !flags.is_human_and_unique {
    return Err(ValidationError::InconsistentRecord {
      rule:   Rule::KycUserIsHuman,
      status: classify(flags.is_human_and_unique, flags.is_kyc_user, flags.kyc_date),
    });
  }
  Ok(())
}

/// Require an echoed address, when there is one, to be non-zero and to match
/// `requested`.
pub fn check_address(
  record: &IdentityRecord,
  requested: &str,
  mode: AddressMatch,
) -> Result<(), ValidationError> {
  let Some(echoed) = record.address() else {
    return Ok(());
  };

  if Address::parse(echoed).is_ok_and(|a| a.is_zero()) {
    return Err(ValidationError::ZeroAddress);
  }

  let matches = match mode {
    AddressMatch::Exact => echoed == requested,
    AddressMatch::Normalized => matches!(
      (Address::parse(echoed), Address::parse(requested)),
      (Ok(a), Ok(b)) if a == b
    ),
  };

  if matches {
    Ok(())
  } else {
    Err(ValidationError::AddressMismatch {
      requested: requested.to_string(),
      echoed:    echoed.to_string(),
    })
  }
}

fn first_broken(rules: &[(Rule, bool)]) -> Option<Rule> {
  rules.iter().find(|(_, holds)| !holds).map(|(rule, _)| *rule)
}
