//! The minimal answer returned to the oracle node.

use serde::Serialize;

use crate::record::{IdentityRecord, Status};

/// `{"status": "KYC_USER", "kyc_timestamp": 1672531200}`
///
/// `kyc_timestamp` is `0` when the record has no KYC date. Zero is a sentinel
/// for "absent", not a real epoch-zero date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Output {
  pub status:        Status,
  pub kyc_timestamp: i64,
}

/// Map a validated record to its output. Total.
pub fn to_output(record: &IdentityRecord) -> Output {
  Output {
    status:        record.status(),
    kyc_timestamp: record.kyc_date().map_or(0, |d| d.timestamp()),
  }
}
