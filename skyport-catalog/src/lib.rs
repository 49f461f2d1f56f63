pub mod fare;
pub mod fleet;
pub mod loader;
pub mod seats;

pub use fare::{booking_amount, total_fare, FareQuote};
pub use fleet::{FleetDesk, FleetOverview, FlightForm};
pub use loader::{RouteListing, RouteLoad, RouteLoader};
pub use seats::{SeatSelection, SeatState, Toggle};
