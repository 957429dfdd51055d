//! HTTP surface of the KYC status adapter.
//!
//! Exposes an axum [`Router`] speaking the oracle node's bridge protocol and
//! answering each job by querying an [`IdentitySource`] through a
//! [`QueryHandler`].

pub mod bridge;
pub mod config;
pub mod error;
pub mod handler;
pub mod upstream;

#[cfg(test)]
mod testing;

pub use crate::config::AdapterConfig;
pub use error::QueryError;
pub use handler::{QueryHandler, Settings};
pub use upstream::{HttpSource, IdentitySource, TransportError};

use std::{any::Any, sync::Arc};

use axum::{
  Json, Router,
  http::StatusCode,
  response::{IntoResponse, Response},
  routing::{get, post},
};
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

use bridge::JobResponse;

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the adapter [`Router`] around `handler`.
///
/// A panic inside a request is caught and answered with `500`; the process
/// keeps serving. Panics during a query are answered by [`bridge::run_job`]
/// with the job id; anything caught here has no job context and reports an
/// empty `jobRunID`.
pub fn router<S>(handler: Arc<QueryHandler<S>>) -> Router
where
  S: IdentitySource + 'static,
{
  Router::new()
    .route("/",       post(bridge::run_job::<S>))
    .route("/health", get(bridge::health))
    .with_state(handler)
    .layer(CatchPanicLayer::custom(panic_response))
    .layer(TraceLayer::new_for_http())
}

fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
  let detail = if let Some(s) = panic.downcast_ref::<String>() {
    s.clone()
  } else if let Some(s) = panic.downcast_ref::<&str>() {
    s.to_string()
  } else {
    "unknown panic payload".to_string()
  };
  tracing::error!(%detail, "request handler panicked");

  (
    StatusCode::INTERNAL_SERVER_ERROR,
    Json(JobResponse::errored(String::new(), QueryError::Internal.to_string())),
  )
    .into_response()
}

// ─── Integration tests ────────────────────────────────────────────────────────
