use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ids::RouteId;

/// A source/destination pair with its base fare per seat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub id: RouteId,
    pub source: String,
    pub destination: String,
    /// Base fare per seat. Routes without a fare are valid and render as
    /// "fare unavailable".
    #[serde(default)]
    pub fare: Option<Decimal>,
    #[serde(default)]
    pub baggage_check_in_kg: Option<u32>,
    #[serde(default)]
    pub cabin_bag_kg: Option<u32>,
}

impl Route {
    pub fn new(id: RouteId, source: &str, destination: &str, fare: Option<Decimal>) -> Self {
        Self {
            id,
            source: source.to_string(),
            destination: destination.to_string(),
            fare,
            baggage_check_in_kg: None,
            cabin_bag_kg: None,
        }
    }

    /// Exact match on both endpoints.
    pub fn serves(&self, source: &str, destination: &str) -> bool {
        self.source == source && self.destination == destination
    }
}
