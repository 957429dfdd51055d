//! Core types and validation logic for the KYC status adapter.
//!
//! This crate is deliberately free of HTTP and async dependencies. It turns
//! the raw bytes of an upstream identity-service response into a validated
//! [`IdentityRecord`] and maps that record onto the adapter's output
//! contract.
//!
//! ```
//! use kyc_core::{AddressMatch, SchemaSelector, output, parse, validate};
//!
//! let body = br#"{"success":true,"data":{"status":"HUMAN_AND_UNIQUE",
//!   "creation_date":"2022-01-01T00:00:00Z"}}"#;
//! let envelope = parse::parse(body, SchemaSelector::Auto).unwrap();
//! let address = "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed";
//! let record = validate::validate(envelope, address, AddressMatch::Normalized).unwrap();
//! assert_eq!(output::to_output(&record).kyc_timestamp, 0);
//! ```

pub mod address;
pub mod classify;
pub mod error;
pub mod output;
pub mod parse;
pub mod record;
pub mod validate;

pub use address::Address;
pub use error::{AddressError, ParseError, ValidationError};
pub use output::Output;
pub use parse::{Payload, ResponseEnvelope, SchemaSelector};
pub use record::{IdentityRecord, Schema, Status};
pub use validate::{AddressMatch, Rule};

#[cfg(test)]
mod tests;
