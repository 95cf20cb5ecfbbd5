//! Authenticated request execution and soft-assertion validation for the
//! booking API conformance suites.
//!
//! A [`Session`] is built once per run from a [`HarnessConfig`]. It owns the
//! single cached token and resends a state-changing request once, after
//! re-authenticating, when the API answers 403. Validators in [`validators`]
//! check responses through [`SoftAssertions`], which collects every field
//! mismatch of a response before failing once.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod assertions;
pub mod booking;
pub mod config;
pub mod executor;
pub mod payloads;
pub mod response;
pub mod token;
pub mod validators;

pub use assertions::{AssertionFailure, AssertionResult, SoftAssertions, mask_token};
pub use booking::{Booking, BookingData, BookingDates, BookingId, BookingResponse};
pub use config::HarnessConfig;
pub use executor::{AuthenticatedOperation, Session};
pub use response::RawResponse;
pub use token::{AuthResult, Authenticator, TokenCache};

pub use booker_common::{HarnessError, HarnessResult, RetryOutcome};
pub use reqwest::{Method, StatusCode};
