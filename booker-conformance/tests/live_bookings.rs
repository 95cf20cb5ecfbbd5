//! Create, read and list suites against the live API.

use anyhow::Result;
use booker_conformance::live_session;
use booker_harness::{
    Booking, Method, SoftAssertions,
    api::{BOOKING_PATH, booking_path},
    payloads::{invalid_booking_payload, named_booking_payload},
    validators::{
        assert_booking_id_list_reply, assert_booking_reply, assert_created_booking,
        assert_error_response,
    },
};
use serde_json::Value;
use test_utils::create_booking_data;
use tracing::info;

#[tokio::test]
async fn create_booking_from_fixtures() -> Result<()> {
    let session = live_session("create-booking")?;

    for row in create_booking_data() {
        info!(testcase = %row, "Running create case");
        let expected = row.to_booking();

        let response = session.create_booking(&expected).await?;
        session.log_request_details(&Method::POST, BOOKING_PATH);
        let id = assert_created_booking(session.report(), &response, &expected)?;

        session
            .report()
            .log_info(&format!("Create booking response: {}", response.body()));
        session.report().log_info(&format!(
            "Response field validation for Booking ID {id} completed successfully."
        ));
    }
    Ok(())
}

#[tokio::test]
async fn create_with_null_names_is_server_error() -> Result<()> {
    let session = live_session("create-booking")?;

    let response = session
        .create_booking_payload(named_booking_payload(None, None))
        .await?;

    session.log_request_details(&Method::POST, BOOKING_PATH);
    assert_error_response(session.report(), &response, 500, "Internal Server Error")?;
    Ok(())
}

#[tokio::test]
async fn create_with_invalid_types_is_coerced() -> Result<()> {
    let session = live_session("create-booking")?;

    let response = session
        .create_booking_payload(invalid_booking_payload())
        .await?;
    session.log_request_details(&Method::POST, BOOKING_PATH);

    let mut batch = SoftAssertions::new(session.report());
    batch.check_field(
        "Validating Deposit Paid",
        &true,
        response
            .field("booking.depositpaid")
            .map(|v| v.and_then(|v| v.as_bool()).unwrap_or(false)),
    );
    batch.check_field(
        "Validating Total Price",
        &Value::Null,
        response
            .field("booking.totalprice")
            .map(Option::unwrap_or_default),
    );
    for field in ["checkin", "checkout"] {
        batch.check_field(
            &format!("Validating {field} date"),
            &"0NaN-aN-aN".to_string(),
            response
                .string_field(&format!("booking.bookingdates.{field}"))
                .map(Option::unwrap_or_default),
        );
    }
    batch.finish()?;
    Ok(())
}

#[tokio::test]
async fn get_specific_booking() -> Result<()> {
    let session = live_session("get-booking")?;
    let expected = Booking::sample();

    let created = session.create_booking(&expected).await?;
    let id = assert_created_booking(session.report(), &created, &expected)?;

    let path = booking_path(&id.to_string());
    let response = session.get_booking(&id.to_string()).await?;
    session.log_request_details(&Method::GET, &path);
    assert_booking_reply(session.report(), &response, &expected)?;
    Ok(())
}

#[tokio::test]
async fn get_booking_with_invalid_id_is_not_found() -> Result<()> {
    let session = live_session("get-booking")?;

    let response = session.get_booking("abc").await?;
    session.log_request_details(&Method::GET, &booking_path("abc"));
    assert_error_response(session.report(), &response, 404, "Not Found")?;
    Ok(())
}

#[tokio::test]
async fn get_all_booking_ids() -> Result<()> {
    let session = live_session("get-booking-ids")?;

    for json_headers in [true, false] {
        let response = session.list_booking_ids(json_headers).await?;
        session.log_request_details(&Method::GET, BOOKING_PATH);
        assert_booking_id_list_reply(session.report(), &response)?;
    }
    Ok(())
}
