pub mod booking;
pub mod owner;
pub mod payment;

pub use booking::{BookingConfirmation, BookingDesk, NextStep};
pub use owner::{BookingTally, FlightBookings, OwnerBoard};
pub use payment::{FareSource, PaymentDesk, PendingBooking, DEFAULT_FALLBACK_FARE};
