//! Fixture tables for the parameterized create and update suites.
//!
//! Row `n` of [`update_booking_data`] is applied to the booking created from
//! row `n` of [`create_booking_data`].

use booker_harness::BookingData;

fn row(
    testcase: &str,
    (firstname, lastname): (&str, &str),
    totalprice: i64,
    depositpaid: bool,
    (checkin, checkout): (&str, &str),
    additionalneeds: &str,
) -> BookingData {
    BookingData {
        testcase: testcase.to_string(),
        firstname: firstname.to_string(),
        lastname: lastname.to_string(),
        totalprice,
        depositpaid,
        checkin: checkin.to_string(),
        checkout: checkout.to_string(),
        additionalneeds: additionalneeds.to_string(),
    }
}

/// Bookings created by the create and update suites.
#[must_use]
pub fn create_booking_data() -> Vec<BookingData> {
    vec![
        row(
            "Create booking with breakfast",
            ("Jim", "Brown"),
            111,
            true,
            ("2023-01-01", "2023-01-02"),
            "Breakfast",
        ),
        row(
            "Create booking without deposit",
            ("Sally", "Ericsson"),
            450,
            false,
            ("2024-03-10", "2024-03-15"),
            "Late checkout",
        ),
        row(
            "Create long stay booking",
            ("Aroha", "Ngata"),
            2390,
            true,
            ("2024-11-01", "2024-11-29"),
            "Airport transfer",
        ),
        row(
            "Create zero price booking",
            ("Mark", "Wilson"),
            0,
            false,
            ("2025-06-01", "2025-06-02"),
            "None",
        ),
    ]
}

/// Updates applied to the bookings of [`create_booking_data`], row by row.
#[must_use]
pub fn update_booking_data() -> Vec<BookingData> {
    vec![
        row(
            "Update names and needs",
            ("James", "Browne"),
            111,
            true,
            ("2023-01-01", "2023-01-02"),
            "Dinner",
        ),
        row(
            "Update deposit and price",
            ("Sally", "Ericsson"),
            500,
            true,
            ("2024-03-10", "2024-03-15"),
            "Late checkout",
        ),
        row(
            "Update stay dates",
            ("Aroha", "Ngata"),
            2390,
            true,
            ("2024-12-01", "2024-12-20"),
            "Airport transfer",
        ),
        row(
            "Update every field",
            ("Marcus", "Wilkins"),
            75,
            true,
            ("2025-07-04", "2025-07-06"),
            "Parking",
        ),
    ]
}

/// Create rows paired with the update applied to each.
#[must_use]
pub fn paired_booking_data() -> Vec<(BookingData, BookingData)> {
    create_booking_data()
        .into_iter()
        .zip(update_booking_data())
        .collect()
}

/// A token long enough to be masked partially.
pub const SAMPLE_TOKEN: &str = "abc123def456ghi";
