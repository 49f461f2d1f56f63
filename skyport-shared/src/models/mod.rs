pub mod airline;
pub mod booking;
pub mod flight;
pub mod ids;
pub mod payment;
pub mod route;
pub mod seat;
pub mod timestamp;

pub use airline::Airline;
pub use booking::{Booking, BookingStatus, CreateBookingRequest};
pub use flight::{Flight, NewFlight, OwnerFlight};
pub use ids::{AirlineId, BookingId, FlightId, RouteId};
pub use payment::{PaymentMethod, PaymentReceipt, PaymentRequest};
pub use route::Route;
pub use seat::{Seat, SeatMap};
