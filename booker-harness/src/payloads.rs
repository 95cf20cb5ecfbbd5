//! Request bodies for `POST /booking` and `PUT /booking/{id}`.

use crate::booking::Booking;
use serde_json::{Value, json};

/// Body for a well-formed booking.
#[must_use]
pub fn booking_payload(booking: &Booking) -> Value {
    json!({
        "firstname": booking.firstname,
        "lastname": booking.lastname,
        "totalprice": booking.totalprice,
        "depositpaid": booking.depositpaid,
        "bookingdates": {
            "checkin": booking.bookingdates.checkin,
            "checkout": booking.bookingdates.checkout,
        },
        "additionalneeds": booking.additionalneeds,
    })
}

/// Body for [`Booking::sample`] with the given names; `None` is sent as JSON
/// `null`.
#[must_use]
pub fn named_booking_payload(firstname: Option<&str>, lastname: Option<&str>) -> Value {
    let mut payload = booking_payload(&Booking::sample());
    payload["firstname"] = firstname.map_or(Value::Null, Value::from);
    payload["lastname"] = lastname.map_or(Value::Null, Value::from);
    payload
}

/// Body whose price, deposit flag and dates have the wrong types or formats.
///
/// The public API stores `totalprice` as null, coerces `depositpaid` to
/// `true` and stores both dates as `0NaN-aN-aN`.
#[must_use]
pub fn invalid_booking_payload() -> Value {
    json!({
        "firstname": "John",
        "lastname": "Doe",
        "totalprice": "totalPrice",
        "depositpaid": "depositPaid",
        "bookingdates": {
            "checkin": "invalid check-in",
            "checkout": "invalid check-out",
        },
        "additionalneeds": "Breakfast",
    })
}
