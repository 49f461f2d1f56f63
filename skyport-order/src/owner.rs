use skyport_core::repository::FlightRepository;
use skyport_core::session::Session;
use skyport_core::{CoreError, CoreResult};
use skyport_shared::{Booking, BookingStatus, FlightId, OwnerFlight};

/// Booking counts for one flight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BookingTally {
    pub pending: usize,
    pub confirmed: usize,
    pub cancelled: usize,
    /// Seats held by bookings that are not cancelled.
    pub seats_held: usize,
}

impl BookingTally {
    pub fn from_bookings(bookings: &[Booking]) -> Self {
        bookings.iter().fold(Self::default(), |mut tally, booking| {
            match booking.status {
                BookingStatus::Pending => tally.pending += 1,
                BookingStatus::Confirmed => tally.confirmed += 1,
                BookingStatus::Cancelled => tally.cancelled += 1,
                BookingStatus::Unknown => return tally,
            }
            if booking.status != BookingStatus::Cancelled {
                tally.seats_held += booking.seat_numbers().len();
            }
            tally
        })
    }

    pub fn total(&self) -> usize {
        self.pending + self.confirmed + self.cancelled
    }

    fn add(mut self, other: Self) -> Self {
        self.pending += other.pending;
        self.confirmed += other.confirmed;
        self.cancelled += other.cancelled;
        self.seats_held += other.seats_held;
        self
    }
}

#[derive(Debug, Clone)]
pub struct FlightBookings {
    pub flight: OwnerFlight,
    pub tally: BookingTally,
}

impl FlightBookings {
    pub fn new(flight: OwnerFlight) -> Self {
        let tally = BookingTally::from_bookings(&flight.bookings);
        Self { flight, tally }
    }

    /// Fraction of seats held, `None` for flights reporting no capacity.
    pub fn occupancy(&self) -> Option<f64> {
        if self.flight.total_seats == 0 {
            return None;
        }
        Some(self.tally.seats_held as f64 / self.flight.total_seats as f64)
    }
}

/// The owner's flights with their bookings, one flight expanded at a time.
#[derive(Debug, Clone, Default)]
pub struct OwnerBoard {
    flights: Vec<FlightBookings>,
    expanded: Option<FlightId>,
}

impl OwnerBoard {
    pub async fn load(repo: &dyn FlightRepository, session: &Session) -> CoreResult<Self> {
        let flights = repo
            .owner_flights_with_bookings(session)
            .await
            .map_err(|e| CoreError::fetch("flight bookings", e))?;

        Ok(Self {
            flights: flights.into_iter().map(FlightBookings::new).collect(),
            expanded: None,
        })
    }

    /// Expand `flight_id`, or collapse it when it is already expanded.
    pub fn toggle_expand(&mut self, flight_id: FlightId) {
        self.expanded = if self.expanded == Some(flight_id) {
            None
        } else {
            Some(flight_id)
        };
    }

    pub fn expanded(&self) -> Option<&FlightBookings> {
        let id = self.expanded?;
        self.flights.iter().find(|f| f.flight.flight_id == id)
    }

    pub fn is_expanded(&self, flight_id: FlightId) -> bool {
        self.expanded == Some(flight_id)
    }

    pub fn flights(&self) -> &[FlightBookings] {
        &self.flights
    }

    pub fn totals(&self) -> BookingTally {
        self.flights
            .iter()
            .fold(BookingTally::default(), |acc, f| acc.add(f.tally))
    }
}
