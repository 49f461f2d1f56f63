use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{BookingId, FlightId};
use super::timestamp;
use crate::pii::Masked;

/// Booking lifecycle. `Pending -> Confirmed` happens through payment;
/// cancellation is owned by the backend. Statuses the client does not know,
/// or a missing status, decode as `Unknown` so one odd row never sinks a list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BookingStatus {
    #[serde(alias = "PENDING", alias = "pending")]
    Pending,
    #[serde(alias = "CONFIRMED", alias = "confirmed")]
    Confirmed,
    #[serde(alias = "CANCELLED", alias = "cancelled", alias = "Canceled")]
    Cancelled,
    #[default]
    #[serde(other)]
    Unknown,
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookingStatus::Pending => write!(f, "Pending"),
            BookingStatus::Confirmed => write!(f, "Confirmed"),
            BookingStatus::Cancelled => write!(f, "Cancelled"),
            BookingStatus::Unknown => write!(f, "Unknown"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: BookingId,
    /// Absent in the owner view, where bookings are nested under their flight.
    #[serde(default)]
    pub flight_id: Option<FlightId>,
    #[serde(default)]
    pub flight_number: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub seat_numbers: Option<Vec<String>>,
    /// The passenger listing calls this `bookingStatus`, the owner view `status`.
    #[serde(default, alias = "bookingStatus")]
    pub status: BookingStatus,
    #[serde(default, alias = "createdAt", deserialize_with = "timestamp::deserialize_option")]
    pub booking_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub passenger_name: Option<String>,
    #[serde(default)]
    pub passenger_email: Option<Masked<String>>,
    #[serde(default)]
    pub passenger_phone: Option<Masked<String>>,
    #[serde(default)]
    pub user_id: Option<i64>,
}

impl Booking {
    pub fn seat_numbers(&self) -> &[String] {
        self.seat_numbers.as_deref().unwrap_or_default()
    }

    pub fn is_pending(&self) -> bool {
        self.status == BookingStatus::Pending
    }
}

/// Payload for `POST Bookings`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub flight_id: FlightId,
    pub seat_numbers: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_passenger_listing_uses_booking_status() {
        let json = r#"
            {
                "id": 41,
                "flightId": 11,
                "flightNumber": "6E101",
                "source": "Chennai",
                "destination": "Delhi",
                "seatNumbers": ["12A", "12B"],
                "bookingStatus": "Pending",
                "bookingDate": "2025-02-20T10:00:00",
                "passengerEmail": "asha@example.com"
            }
        "#;
        let booking: Booking = serde_json::from_str(json).expect("Failed to deserialize");
        assert_eq!(booking.status, BookingStatus::Pending);
        assert_eq!(booking.seat_numbers(), ["12A".to_string(), "12B".to_string()]);
        assert!(booking.booking_date.is_some());
        assert!(!format!("{:?}", booking).contains("asha@example.com"));
    }

    #[test]
    fn test_owner_view_uses_status_and_null_seats() {
        let json = r#"{"id": 7, "status": "Cancelled", "seatNumbers": null}"#;
        let booking: Booking = serde_json::from_str(json).unwrap();
        assert_eq!(booking.status, BookingStatus::Cancelled);
        assert!(booking.seat_numbers().is_empty());
        assert!(!booking.is_pending());
    }

    #[test]
    fn test_unrecognised_or_missing_status_keeps_the_list() {
        let json = r#"
            [
                {"id": 1, "bookingStatus": "Pending"},
                {"id": 2, "bookingStatus": "Refunded"},
                {"id": 3}
            ]
        "#;
        let bookings: Vec<Booking> = serde_json::from_str(json).unwrap();
        let statuses: Vec<BookingStatus> = bookings.iter().map(|b| b.status).collect();
        assert_eq!(
            statuses,
            [BookingStatus::Pending, BookingStatus::Unknown, BookingStatus::Unknown]
        );
        assert!(!bookings[1].is_pending());
        assert_eq!(bookings[2].status.to_string(), "Unknown");
    }

    #[test]
    fn test_create_booking_request_wire_shape() {
        let req = CreateBookingRequest {
            flight_id: FlightId(11),
            seat_numbers: vec!["12A".to_string()],
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value, serde_json::json!({"flightId": 11, "seatNumbers": ["12A"]}));
    }
}
