use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::booking::Booking;
use super::ids::{AirlineId, FlightId, RouteId};
use super::timestamp;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flight {
    pub id: FlightId,
    #[serde(default)]
    pub flight_number: String,
    #[serde(default)]
    pub airline_id: Option<AirlineId>,
    #[serde(default)]
    pub airline_name: String,
    #[serde(default, alias = "routeId")]
    pub flight_route_id: Option<RouteId>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub total_seats: u32,
    #[serde(default, deserialize_with = "timestamp::deserialize_option")]
    pub departure_time: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp::deserialize_option")]
    pub arrival_time: Option<DateTime<Utc>>,
}

impl Flight {
    /// True when the flight advertises exactly these endpoints. Flights that
    /// omit source or destination never match.
    pub fn connects(&self, source: &str, destination: &str) -> bool {
        self.source.as_deref() == Some(source) && self.destination.as_deref() == Some(destination)
    }
}

/// Payload for `POST Flights` (owner flight creation).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFlight {
    pub flight_number: String,
    pub airline_id: AirlineId,
    pub airline_name: String,
    pub flight_route_id: RouteId,
    pub total_seats: u32,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
}

/// One row of the owner's "flights with bookings" view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerFlight {
    #[serde(alias = "id")]
    pub flight_id: FlightId,
    #[serde(default)]
    pub flight_number: String,
    #[serde(default)]
    pub airline_name: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub destination: String,
    #[serde(default, deserialize_with = "timestamp::deserialize_option")]
    pub departure_time: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp::deserialize_option")]
    pub arrival_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub total_seats: u32,
    #[serde(default)]
    pub bookings: Vec<Booking>,
}
