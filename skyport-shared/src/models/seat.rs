use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seat {
    pub seat_number: String,
    #[serde(default)]
    pub is_booked: bool,
}

impl Seat {
    pub fn available(seat_number: &str) -> Self {
        Self {
            seat_number: seat_number.to_string(),
            is_booked: false,
        }
    }

    pub fn booked(seat_number: &str) -> Self {
        Self {
            seat_number: seat_number.to_string(),
            is_booked: true,
        }
    }
}

/// Body of `GET Bookings/flight/{id}/seats`. Despite the field name it lists
/// every seat, booked or not.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatMap {
    #[serde(default)]
    pub available_seats: Vec<Seat>,
}
