//! Response validators.
//!
//! Multi-field validators run through [`SoftAssertions`] and fail at most once
//! per response. The error-envelope and token validators are hard-fail: they
//! stop at the first mismatch, report it and return it.

use crate::{
    assertions::{AssertionFailure, AssertionResult, SoftAssertions, mask_token},
    booking::{Booking, BookingId, BookingResponse},
    response::RawResponse,
};
use booker_common::{HarnessResult, ReportSink};
use reqwest::StatusCode;
use serde::Deserialize;
use std::fmt::Display;

const STATUS_LABEL: &str = "Validating http status code";

/// Check a booking against the expected one: status 200 and all seven
/// booking fields.
///
/// A booking that failed to decode counts as one failed extraction per field.
///
/// # Errors
///
/// Returns one [`AssertionFailure`] listing every mismatch.
pub fn assert_booking_response(
    report: &dyn ReportSink,
    status: StatusCode,
    actual: &HarnessResult<Booking>,
    expected: &Booking,
) -> AssertionResult {
    let mut batch = SoftAssertions::new(report);
    batch.check_eq(STATUS_LABEL, &200, &status.as_u16());

    let actual = actual.as_ref().map_err(ToString::to_string);
    let field = |f: fn(&Booking) -> String| actual.clone().map(f);

    batch.check_field(
        "Validating First Name",
        &expected.firstname,
        field(|b| b.firstname.clone()),
    );
    batch.check_field(
        "Validating Last Name",
        &expected.lastname,
        field(|b| b.lastname.clone()),
    );
    batch.check_field(
        "Validating Total Price",
        &expected.totalprice,
        actual.clone().map(|b| b.totalprice),
    );
    batch.check_field(
        "Validating Deposit Paid",
        &expected.depositpaid,
        actual.clone().map(|b| b.depositpaid),
    );
    batch.check_field(
        "Validating Check-in date",
        &expected.bookingdates.checkin,
        field(|b| b.bookingdates.checkin.clone()),
    );
    batch.check_field(
        "Validating Check-out date",
        &expected.bookingdates.checkout,
        field(|b| b.bookingdates.checkout.clone()),
    );
    batch.check_field(
        "Validating Additionalneeds",
        &display_needs(expected.additionalneeds.as_deref()),
        field(|b| display_needs(b.additionalneeds.as_deref())),
    );

    batch.finish()
}

/// [`assert_booking_response`] for a `GET` or `PUT` reply whose body is the
/// booking itself.
///
/// # Errors
///
/// Returns one [`AssertionFailure`] listing every mismatch.
pub fn assert_booking_reply(
    report: &dyn ReportSink,
    response: &RawResponse,
    expected: &Booking,
) -> AssertionResult {
    assert_booking_response(report, response.status(), &response.json(), expected)
}

/// Validate a `POST /booking` reply and return the new booking id.
///
/// The echoed booking goes through [`assert_booking_response`] first, so an
/// undecodable reply still reports its status and one failure per field.
/// The id check is hard-fail and runs only once the booking passed.
///
/// # Errors
///
/// Returns the aggregated failure of the echoed booking, or an
/// [`AssertionFailure`] for a non-positive id.
pub fn assert_created_booking(
    report: &dyn ReportSink,
    response: &RawResponse,
    expected: &Booking,
) -> Result<i64, AssertionFailure> {
    let (bookingid, booking) = match response.json::<BookingResponse>() {
        Ok(created) => (created.bookingid, Ok(created.booking)),
        Err(err) => (0, Err(err)),
    };
    assert_booking_response(report, response.status(), &booking, expected)?;

    if bookingid <= 0 {
        let message =
            format!("Validating booking id ==> expected: positive id but was: <{bookingid}>");
        report.log_fail(&format!("FAIL: {message}"));
        return Err(AssertionFailure::single(message));
    }
    report.log_pass(&format!("PASS: Booking created with id {bookingid}"));
    Ok(bookingid)
}

/// Check a booking id list: status 200, list present, list not empty.
///
/// # Errors
///
/// Returns one [`AssertionFailure`] listing every mismatch.
pub fn assert_booking_id_list(
    report: &dyn ReportSink,
    status: StatusCode,
    ids: &HarnessResult<Vec<BookingId>>,
) -> AssertionResult {
    let mut batch = SoftAssertions::new(report);
    batch.check_eq(STATUS_LABEL, &200, &status.as_u16());

    batch.check_true("Validating bookingId list not null", ids.is_ok());
    let count = ids.as_ref().map_or(0, Vec::len);
    if batch.check_true("Validating bookingId list not empty", count > 0) {
        batch.note_pass(&format!(
            "PASS: Booking ID list is not empty. Found {count} booking IDs."
        ));
    }

    batch.finish()
}

/// [`assert_booking_id_list`] for a raw `GET /booking` reply.
///
/// # Errors
///
/// Returns one [`AssertionFailure`] listing every mismatch.
pub fn assert_booking_id_list_reply(
    report: &dyn ReportSink,
    response: &RawResponse,
) -> AssertionResult {
    assert_booking_id_list(report, response.status(), &response.json())
}

/// Check that a delete answered 201.
///
/// # Errors
///
/// Returns an [`AssertionFailure`] for any other status.
pub fn assert_delete_response(report: &dyn ReportSink, response: &RawResponse) -> AssertionResult {
    let mut batch = SoftAssertions::new(report);
    batch.check_eq(STATUS_LABEL, &201, &response.status_code());
    batch.finish()
}

/// Hard-fail check of an error reply: exact status and exact body text.
///
/// # Errors
///
/// Returns the first mismatch.
pub fn assert_error_response(
    report: &dyn ReportSink,
    response: &RawResponse,
    expected_status: u16,
    expected_body: &str,
) -> AssertionResult {
    hard_eq(report, STATUS_LABEL, expected_status, response.status_code())?;
    hard_eq(report, "Validating error message", expected_body, response.body())?;

    report.log_pass(&format!(
        "PASS: Error response validated successfully. Status Code: {expected_status}, Message: {expected_body}"
    ));
    Ok(())
}

/// Hard-fail check of a JSON reply: exact status and exact string at `field`.
///
/// # Errors
///
/// Returns the first mismatch, or a failure if the body is not JSON.
pub fn assert_json_field_response(
    report: &dyn ReportSink,
    response: &RawResponse,
    expected_status: u16,
    field: &str,
    expected_value: &str,
) -> AssertionResult {
    hard_eq(report, STATUS_LABEL, expected_status, response.status_code())?;

    let actual = match response.string_field(field) {
        Ok(value) => value.unwrap_or_else(|| "null".to_string()),
        Err(err) => return Err(hard_fail(report, &format!("Body is not JSON: {err}"))),
    };
    hard_eq(report, "Validating error message", expected_value, actual.as_str())?;

    report.log_pass(&format!(
        "PASS: Error response validated successfully. Status Code: {expected_status}, Message: {expected_value}"
    ));
    Ok(())
}

/// Hard-fail check of a rejected authentication: status and `reason` field.
///
/// # Errors
///
/// Returns the first mismatch.
pub fn assert_auth_error_response(
    report: &dyn ReportSink,
    response: &RawResponse,
    expected_status: u16,
    expected_reason: &str,
) -> AssertionResult {
    assert_json_field_response(report, response, expected_status, "reason", expected_reason)
}

#[derive(Deserialize)]
struct TokenBody {
    token: Option<String>,
}

/// Hard-fail check of a successful authentication.
///
/// The token must be present and not blank, and the typed decode of the
/// body must agree with the raw field lookup. Only the masked token is
/// reported.
///
/// # Errors
///
/// Returns the first failed check.
pub fn assert_auth_valid_response(
    report: &dyn ReportSink,
    response: &RawResponse,
    expected_status: u16,
) -> AssertionResult {
    hard_eq(report, STATUS_LABEL, expected_status, response.status_code())?;

    let field = response
        .string_field("token")
        .map_err(|err| hard_fail(report, &format!("Body is not JSON: {err}")))?;
    let decoded = response
        .json::<TokenBody>()
        .map_err(|err| hard_fail(report, &format!("Body is not a token envelope: {err}")))?
        .token;

    let Some(token) = field else {
        return Err(hard_fail(report, "Token should not be null"));
    };
    if token.trim().is_empty() {
        return Err(hard_fail(report, "Token should not be empty"));
    }
    let masked = mask_token(&token);
    hard_eq(
        report,
        "Validating token message",
        masked.as_str(),
        decoded.as_deref().map_or_else(|| "null".to_string(), mask_token).as_str(),
    )?;

    report.log_pass(&format!(
        "PASS: Token response validated successfully. Status Code: {expected_status}, Actual Token : {masked}"
    ));
    Ok(())
}

fn display_needs(needs: Option<&str>) -> String {
    needs.unwrap_or("null").to_string()
}

fn hard_eq<T>(report: &dyn ReportSink, label: &str, expected: T, actual: T) -> AssertionResult
where
    T: PartialEq + Display,
{
    if expected == actual {
        return Ok(());
    }
    Err(hard_fail(
        report,
        &format!("{label} ==> expected: <{expected}> but was: <{actual}>"),
    ))
}

fn hard_fail(report: &dyn ReportSink, message: &str) -> AssertionFailure {
    report.log_fail(&format!("FAIL: Response validation failed. {message}"));
    AssertionFailure::single(message)
}
