//! Status classification for upstreams that report boolean flags.

use chrono::{DateTime, Utc};

use crate::record::Status;

/// Derive a [`Status`] from a flag payload.
///
/// Total over all inputs and never yields [`Status::Undefined`]. The KYC date
/// is accepted alongside the flags but plays no part in the result; a date
/// that disagrees with the classified status is rejected later by
/// [`crate::validate`].
pub fn classify(
  is_human_and_unique: bool,
  is_kyc_user: bool,
  _kyc_date: Option<DateTime<Utc>>,
) -> Status {
  match (is_human_and_unique, is_kyc_user) {
    (false, _) => Status::NotFound,
    (true, false) => Status::HumanUnique,
    (true, true) => Status::KycUser,
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;

  #[test]
  fn truth_table() {
    assert_eq!(classify(false, false, None), Status::NotFound);
    assert_eq!(classify(false, true, None), Status::NotFound);
    assert_eq!(classify(true, false, None), Status::HumanUnique);
    assert_eq!(classify(true, true, None), Status::KycUser);
  }

  #[test]
  fn date_does_not_change_the_result() {
    let date = Some(Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap());
    for human in [false, true] {
      for kyc in [false, true] {
        assert_eq!(classify(human, kyc, date), classify(human, kyc, None));
      }
    }
  }

  #[test]
  fn never_undefined() {
    for human in [false, true] {
      for kyc in [false, true] {
        assert_ne!(classify(human, kyc, None), Status::Undefined);
      }
    }
  }
}
