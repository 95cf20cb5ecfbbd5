//! Booking resource models.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Check-in and check-out dates, as `YYYY-MM-DD` strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingDates {
    /// Check-in date
    pub checkin: String,
    /// Check-out date
    pub checkout: String,
}

/// A booking as sent to and returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    /// Guest first name
    pub firstname: String,
    /// Guest last name
    pub lastname: String,
    /// Total price in whole currency units
    pub totalprice: i64,
    /// Whether the deposit was paid
    pub depositpaid: bool,
    /// Stay dates
    pub bookingdates: BookingDates,
    /// Free-text extras; absent on decode is `None`, sent as `null`
    #[serde(default)]
    pub additionalneeds: Option<String>,
}

impl Booking {
    /// The booking most suites create: Jim Brown, 111, deposit paid,
    /// 2023-01-01 to 2023-01-02, breakfast.
    #[must_use]
    pub fn sample() -> Self {
        Self::with_names("Jim", "Brown")
    }

    /// [`Booking::sample`] with different guest names.
    #[must_use]
    pub fn with_names(firstname: impl Into<String>, lastname: impl Into<String>) -> Self {
        Self {
            firstname: firstname.into(),
            lastname: lastname.into(),
            totalprice: 111,
            depositpaid: true,
            bookingdates: BookingDates {
                checkin: "2023-01-01".to_string(),
                checkout: "2023-01-02".to_string(),
            },
            additionalneeds: Some("Breakfast".to_string()),
        }
    }
}

/// Body of a successful `POST /booking`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingResponse {
    /// Server-assigned id
    pub bookingid: i64,
    /// Echo of the stored booking
    pub booking: Booking,
}

/// One element of `GET /booking`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingId {
    /// Booking id
    pub bookingid: i64,
}

/// One fixture row: a named test case and the booking it sends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingData {
    /// Test case name
    pub testcase: String,
    /// Guest first name
    pub firstname: String,
    /// Guest last name
    pub lastname: String,
    /// Total price
    pub totalprice: i64,
    /// Whether the deposit was paid
    pub depositpaid: bool,
    /// Check-in date
    pub checkin: String,
    /// Check-out date
    pub checkout: String,
    /// Free-text extras
    pub additionalneeds: String,
}

impl BookingData {
    /// The booking this row describes.
    #[must_use]
    pub fn to_booking(&self) -> Booking {
        Booking {
            firstname: self.firstname.clone(),
            lastname: self.lastname.clone(),
            totalprice: self.totalprice,
            depositpaid: self.depositpaid,
            bookingdates: BookingDates {
                checkin: self.checkin.clone(),
                checkout: self.checkout.clone(),
            },
            additionalneeds: Some(self.additionalneeds.clone()),
        }
    }
}

impl fmt::Display for BookingData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.testcase)
    }
}
