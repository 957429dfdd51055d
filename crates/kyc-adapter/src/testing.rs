//! Canned [`IdentitySource`]s for handler and router tests.

use std::{
  future::Future,
  sync::{Arc, Mutex},
};

use bytes::Bytes;

use crate::upstream::{IdentitySource, TransportError};

#[derive(Clone)]
pub struct StaticSource {
  response: Result<Bytes, TransportError>,
  seen:     Arc<Mutex<Vec<String>>>,
}

impl StaticSource {
  pub fn body(body: &str) -> Self {
    Self { response: Ok(Bytes::from(body.to_string())), seen: Arc::default() }
  }

  pub fn failing(err: TransportError) -> Self {
    Self { response: Err(err), seen: Arc::default() }
  }

  pub fn calls(&self) -> usize { self.seen.lock().unwrap().len() }

  pub fn last_address(&self) -> Option<String> {
    self.seen.lock().unwrap().last().cloned()
  }
}

impl IdentitySource for StaticSource {
  fn fetch<'a>(
    &'a self,
    address: &'a str,
  ) -> impl Future<Output = Result<Bytes, TransportError>> + Send + 'a {
    self.seen.lock().unwrap().push(address.to_string());
    let response = self.response.clone();
    async move { response }
  }
}

/// Panics on every fetch.
pub struct PanickingSource;

impl IdentitySource for PanickingSource {
  fn fetch<'a>(
    &'a self,
    _address: &'a str,
  ) -> impl Future<Output = Result<Bytes, TransportError>> + Send + 'a {
    async move { panic!("upstream client blew up") }
  }
}
