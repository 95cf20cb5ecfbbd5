//! Shared test utilities for the booking API conformance harness.
//!
//! This crate provides:
//! - A recording report sink and a wiremock stub of the booking API
//! - Fixture tables for the create and update suites
//! - Proptest generators for bookings, tokens and statuses

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod mocks;

pub use fixtures::*;
pub use generators::*;
pub use mocks::*;
