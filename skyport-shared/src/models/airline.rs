use serde::{Deserialize, Serialize};

use super::ids::AirlineId;

/// The flight owner's airline. Owners must create one before adding flights.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Airline {
    pub id: AirlineId,
    pub airline_name: String,
}
