//! End-to-end tests: raw upstream bytes through parse, validate and map.

use crate::{
  AddressMatch, Output, ParseError, Rule, SchemaSelector, Status, ValidationError,
  output::to_output,
  parse::parse,
  validate::validate,
};

const ADDR: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";

#[derive(Debug)]
enum Failure {
  Parse(ParseError),
  Validation(ValidationError),
}

fn run(raw: &str) -> Result<Output, Failure> {
  run_with(raw, SchemaSelector::Auto, AddressMatch::Normalized)
}

fn run_with(
  raw: &str,
  selector: SchemaSelector,
  mode: AddressMatch,
) -> Result<Output, Failure> {
  let envelope = parse(raw.as_bytes(), selector).map_err(Failure::Parse)?;
  let record = validate(envelope, ADDR, mode).map_err(Failure::Validation)?;
  Ok(to_output(&record))
}

// ─── Reference scenarios ─────────────────────────────────────────────────────

#[test]
fn kyc_user_maps_to_kyc_timestamp() {
  let out = run(
    r#"{"success":true,"data":{"status":"KYC_USER","kyc_date":"2023-01-01T00:00:00Z","creation_date":"2022-01-01T00:00:00Z"}}"#,
  )
  .unwrap();
  assert_eq!(out, Output { status: Status::KycUser, kyc_timestamp: 1_672_531_200 });
}

#[test]
fn human_unique_maps_to_zero_timestamp() {
  let out = run(
    r#"{"success":true,"data":{"status":"HUMAN_AND_UNIQUE","kyc_date":null,"creation_date":"2022-01-01T00:00:00Z"}}"#,
  )
  .unwrap();
  assert_eq!(out, Output { status: Status::HumanUnique, kyc_timestamp: 0 });
}

#[test]
fn kyc_user_without_kyc_date_is_inconsistent() {
  let err = run(
    r#"{"success":true,"data":{"status":"KYC_USER","kyc_date":null,"creation_date":"2022-01-01T00:00:00Z"}}"#,
  )
  .unwrap_err();
  assert!(matches!(
    err,
    Failure::Validation(ValidationError::InconsistentRecord {
      rule:   Rule::KycUserHasKycDate,
      status: Status::KycUser,
    })
  ));
}

#[test]
fn upstream_error_is_propagated() {
  let err = run(r#"{"success":false,"error":"address not found"}"#).unwrap_err();
  match err {
    Failure::Validation(ValidationError::UpstreamReported { message }) => {
      assert_eq!(message, "address not found");
    }
    other => panic!("unexpected failure: {other:?}"),
  }
}

// ─── Properties ──────────────────────────────────────────────────────────────

#[test]
fn every_valid_status_maps_deterministically() {
  let cases = [
    (
      r#"{"success":true,"data":{"status":"KYC_USER","kyc_date":"2023-01-01T00:00:00Z","creation_date":"2022-01-01T00:00:00Z"}}"#,
      Status::KycUser,
      1_672_531_200,
    ),
    (
      r#"{"success":true,"data":{"status":"HUMAN_AND_UNIQUE","creation_date":"2022-01-01T00:00:00Z"}}"#,
      Status::HumanUnique,
      0,
    ),
    (r#"{"success":true,"data":{"status":"NOT_FOUND"}}"#, Status::NotFound, 0),
  ];
  for (raw, status, ts) in cases {
    let first = run(raw).unwrap();
    let second = run(raw).unwrap();
    assert_eq!(first, second);
    assert_eq!(first, Output { status, kyc_timestamp: ts });
  }
}

#[test]
fn zero_time_dates_count_as_absent() {
  // A KYC user whose dates were left at the zero time is inconsistent.
  let err = run(
    r#"{"success":true,"data":{"status":1,"kyc_date":"0001-01-01T00:00:00Z","creation_date":"2022-01-01T00:00:00Z"}}"#,
  )
  .unwrap_err();
  assert!(matches!(
    err,
    Failure::Validation(ValidationError::InconsistentRecord { rule: Rule::KycUserHasKycDate, .. })
  ));

  // A not-found record with zero-time dates is fine.
  let out = run(
    r#"{"success":true,"data":{"status":3,"kyc_date":"0001-01-01T00:00:00Z","creation_date":"1970-01-01T00:00:00Z"}}"#,
  )
  .unwrap();
  assert_eq!(out, Output { status: Status::NotFound, kyc_timestamp: 0 });
}

#[test]
fn missing_status_is_undefined_and_rejected() {
  let err = run_with(
    r#"{"success":true,"data":{"creation_date":"2022-01-01T00:00:00Z"}}"#,
    SchemaSelector::Status,
    AddressMatch::Normalized,
  )
  .unwrap_err();
  assert!(matches!(
    err,
    Failure::Validation(ValidationError::InconsistentRecord {
      rule:   Rule::StatusDefined,
      status: Status::Undefined,
    })
  ));
}

#[test]
fn flag_schema_end_to_end() {
  let out = run(
    r#"{"success":true,"data":{"isHumanAndUniqueUser":true,"isKYCUser":true,"KYCDate":"2023-01-01T00:00:00Z"}}"#,
  )
  .unwrap();
  assert_eq!(out, Output { status: Status::KycUser, kyc_timestamp: 1_672_531_200 });

  let out = run(r#"{"success":true,"data":{"isHumanAndUniqueUser":false,"isKYCUser":false}}"#)
    .unwrap();
  assert_eq!(out, Output { status: Status::NotFound, kyc_timestamp: 0 });

  let err = run(
    r#"{"success":true,"data":{"isHumanAndUniqueUser":true,"isKYCUser":false,"KYCDate":"2023-01-01T00:00:00Z"}}"#,
  )
  .unwrap_err();
  assert!(matches!(
    err,
    Failure::Validation(ValidationError::InconsistentRecord {
      rule: Rule::HumanUniqueHasNoKycDate,
      ..
    })
  ));
}

#[test]
fn kyc_flag_without_human_flag_is_rejected() {
  let err = run(r#"{"success":true,"data":{"isHumanAndUniqueUser":false,"isKYCUser":true,"KYCDate":null}}"#)
    .unwrap_err();
  assert!(matches!(
    err,
    Failure::Validation(ValidationError::InconsistentRecord { rule: Rule::KycUserIsHuman, .. })
  ));
}

#[test]
fn echoed_address_is_checked() {
  let raw = format!(
    r#"{{"success":true,"data":{{"address":"{}","status":"NOT_FOUND"}}}}"#,
    ADDR.to_uppercase().replace("0X", "0x")
  );
  assert!(run_with(&raw, SchemaSelector::Auto, AddressMatch::Normalized).is_ok());
  assert!(matches!(
    run_with(&raw, SchemaSelector::Auto, AddressMatch::Exact),
    Err(Failure::Validation(ValidationError::AddressMismatch { .. }))
  ));
}

#[test]
fn malformed_bodies_never_reach_validation() {
  for raw in ["<html>502</html>", "{}", r#"{"success":true}"#, r#"{"data":{}}"#] {
    assert!(
      matches!(run(raw), Err(Failure::Parse(ParseError::MalformedPayload(_)))),
      "input {raw}"
    );
  }
}
