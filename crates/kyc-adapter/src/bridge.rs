//! The oracle node's external-adapter ("bridge") protocol.
//!
//! | Method | Path      | Notes |
//! |--------|-----------|-------|
//! | `POST` | `/`       | Body: `{"id":"<job run>","data":{"address":"0x…"}}` |
//! | `GET`  | `/health` | Liveness probe |
//!
//! Every answer to `POST /` carries the job run id back:
//!
//! ```json
//! {"jobRunID":"1","status":"success","data":{"status":"KYC_USER","kyc_timestamp":1672531200},"error":null,"pending":false}
//! {"jobRunID":"1","status":"errored","data":null,"error":"upstream answered HTTP 503","pending":false}
//! ```

use std::sync::Arc;

use axum::{Json, extract::State};
use bytes::Bytes;
use kyc_core::Output;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use tracing::Instrument as _;
use uuid::Uuid;

use crate::{
  error::{JobError, QueryError},
  handler::QueryHandler,
  upstream::IdentitySource,
};

/// Parameter key holding the queried address.
pub const ADDRESS_PARAM: &str = "address";

// ─── Wire types ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct JobRequest {
  #[serde(default)]
  pub id:   Option<String>,
  #[serde(default)]
  pub data: Map<String, Value>,
}

impl JobRequest {
  pub fn address(&self) -> Option<&str> {
    self.data.get(ADDRESS_PARAM).and_then(Value::as_str)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
  Success,
  Errored,
}

#[derive(Debug, Serialize)]
pub struct JobResponse {
  #[serde(rename = "jobRunID")]
  pub job_run_id: String,
  pub status:     JobStatus,
  pub data:       Option<Output>,
  pub error:      Option<String>,
  pub pending:    bool,
}

impl JobResponse {
  pub fn success(job_run_id: String, output: Output) -> Self {
    Self {
      job_run_id,
      status: JobStatus::Success,
      data: Some(output),
      error: None,
      pending: false,
    }
  }

  pub fn errored(job_run_id: String, error: impl Into<String>) -> Self {
    Self {
      job_run_id,
      status: JobStatus::Errored,
      data: None,
      error: Some(error.into()),
      pending: false,
    }
  }
}

// ─── Handlers ─────────────────────────────────────────────────────────────────

/// `POST /`
///
/// The query runs on its own task so that a panic inside it still ends in an
/// errored answer carrying the job id.
pub async fn run_job<S>(
  State(handler): State<Arc<QueryHandler<S>>>,
  body: Bytes,
) -> Result<Json<JobResponse>, JobError>
where
  S: IdentitySource + 'static,
{
  let request: JobRequest = serde_json::from_slice(&body).map_err(|e| {
    JobError::new(new_job_id(), QueryError::InvalidRequest(format!("request body: {e}")))
  })?;

  let job_run_id = request.id.clone().unwrap_or_else(new_job_id);
  let span = tracing::info_span!("job", job_run_id = %job_run_id);

  let Some(address) = request.address().map(str::to_string) else {
    let err = QueryError::InvalidRequest(format!("missing `{ADDRESS_PARAM}` parameter"));
    span.in_scope(|| tracing::warn!(kind = err.kind(), "rejected job"));
    return Err(JobError::new(job_run_id, err));
  };

  let task = tokio::spawn(async move { handler.query(&address).await }.instrument(span));
  match task.await {
    Ok(Ok(output)) => Ok(Json(JobResponse::success(job_run_id, output))),
    Ok(Err(err)) => Err(JobError::new(job_run_id, err)),
    Err(e) => {
      tracing::error!(%job_run_id, error = %e, "query task failed");
      Err(JobError::new(job_run_id, QueryError::Internal))
    }
  }
}

/// `GET /health`
pub async fn health() -> Json<Value> { Json(json!({ "status": "ok" })) }

fn new_job_id() -> String { Uuid::new_v4().to_string() }
