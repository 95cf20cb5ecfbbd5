//! Shared proptest generators for the harness crates.

use booker_harness::{Booking, BookingData, BookingDates};
use proptest::prelude::*;

/// Generate guest names.
pub fn name_strategy() -> impl Strategy<Value = String> {
    "[A-Z][a-z]{1,11}"
}

/// Generate `YYYY-MM-DD` dates.
pub fn date_strategy() -> impl Strategy<Value = String> {
    (2020u32..2031, 1u32..13, 1u32..29)
        .prop_map(|(year, month, day)| format!("{year:04}-{month:02}-{day:02}"))
}

/// Generate well-formed bookings.
pub fn booking_strategy() -> impl Strategy<Value = Booking> {
    (
        name_strategy(),
        name_strategy(),
        0i64..10_000,
        any::<bool>(),
        date_strategy(),
        date_strategy(),
        proptest::option::of("[A-Za-z ]{1,20}"),
    )
        .prop_map(
            |(firstname, lastname, totalprice, depositpaid, checkin, checkout, additionalneeds)| {
                Booking {
                    firstname,
                    lastname,
                    totalprice,
                    depositpaid,
                    bookingdates: BookingDates { checkin, checkout },
                    additionalneeds,
                }
            },
        )
}

/// Generate fixture rows.
pub fn booking_data_strategy() -> impl Strategy<Value = BookingData> {
    ("[a-z ]{5,30}", booking_strategy()).prop_map(|(testcase, booking)| BookingData {
        testcase,
        firstname: booking.firstname,
        lastname: booking.lastname,
        totalprice: booking.totalprice,
        depositpaid: booking.depositpaid,
        checkin: booking.bookingdates.checkin,
        checkout: booking.bookingdates.checkout,
        additionalneeds: booking.additionalneeds.unwrap_or_default(),
    })
}

/// Generate opaque tokens as issued by the booking API.
pub fn token_strategy() -> impl Strategy<Value = String> {
    "[a-f0-9]{15}"
}

/// Generate error statuses that must never trigger a retry.
pub fn non_forbidden_error_status_strategy() -> impl Strategy<Value = u16> {
    (400u16..600).prop_filter("403 triggers re-authentication", |status| *status != 403)
}
