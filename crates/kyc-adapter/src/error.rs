//! Query failure taxonomy and its bridge-protocol rendering.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use kyc_core::{ParseError, ValidationError};
use thiserror::Error;

use crate::{bridge::JobResponse, upstream::TransportError};

/// Every way a single query can fail. All are terminal for that query.
#[derive(Debug, Error)]
pub enum QueryError {
  #[error("invalid request: {0}")]
  InvalidRequest(String),

  #[error(transparent)]
  Transport(#[from] TransportError),

  #[error(transparent)]
  MalformedPayload(#[from] ParseError),

  #[error(transparent)]
  Validation(#[from] ValidationError),

  #[error("internal adapter error")]
  Internal,
}

impl QueryError {
  /// Stable, machine-friendly name of the failure kind, used in logs.
  pub fn kind(&self) -> &'static str {
    match self {
      QueryError::InvalidRequest(_) => "invalid_request",
      QueryError::Transport(_) => "transport_error",
      QueryError::MalformedPayload(_) => "malformed_payload",
      QueryError::Validation(ValidationError::UpstreamReported { .. }) => {
        "upstream_reported_error"
      }
      QueryError::Validation(ValidationError::InconsistentRecord { .. }) => {
        "inconsistent_record"
      }
      QueryError::Validation(ValidationError::AddressMismatch { .. }) => {
        "address_mismatch"
      }
      QueryError::Validation(ValidationError::ZeroAddress) => "zero_address",
      QueryError::Internal => "internal_error",
    }
  }

  /// HTTP status reported to the oracle node. Anything that went wrong
  /// upstream of the adapter is a bad gateway.
  pub fn status_code(&self) -> StatusCode {
    match self {
      QueryError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
      QueryError::Transport(_)
      | QueryError::MalformedPayload(_)
      | QueryError::Validation(_) => StatusCode::BAD_GATEWAY,
      QueryError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

/// A [`QueryError`] tied to the job run it failed, so the errored body can
/// carry the job id back.
#[derive(Debug)]
pub struct JobError {
  pub job_run_id: String,
  pub error:      QueryError,
}

impl JobError {
  pub fn new(job_run_id: String, error: QueryError) -> Self { Self { job_run_id, error } }
}

impl IntoResponse for JobError {
  fn into_response(self) -> Response {
    let body = JobResponse::errored(self.job_run_id, self.error.to_string());
    (self.error.status_code(), Json(body)).into_response()
  }
}
