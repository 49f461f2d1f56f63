use skyport_core::repository::SeatRepository;
use skyport_core::session::Session;
use skyport_core::{CoreError, CoreResult};
use skyport_shared::{Flight, FlightId, Route, Seat};

use crate::fare::FareQuote;

/// Outcome of a seat toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Selected,
    Deselected,
    /// Booked or unknown seat; the selection is unchanged.
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeatState {
    Available,
    Selected,
    Booked,
}

/// Seat selection for the currently open flight.
///
/// The selection never holds a booked seat and is cleared whenever a flight
/// is (re)opened. Order of `selected` is insertion order, for display only.
#[derive(Debug, Clone, Default)]
pub struct SeatSelection {
    open_flight: Option<Flight>,
    available: Vec<Seat>,
    selected: Vec<String>,
}

impl SeatSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open seat selection for `flight_id`, which must be one of the loaded
    /// `flights`. On a failed seat fetch the previous state is kept.
    pub async fn open_seats_for(
        &mut self,
        repo: &dyn SeatRepository,
        session: &Session,
        flights: &[Flight],
        flight_id: FlightId,
    ) -> CoreResult<()> {
        let flight = flights
            .iter()
            .find(|f| f.id == flight_id)
            .ok_or_else(|| {
                CoreError::validation(format!("Flight {} is not offered on this route.", flight_id))
            })?;

        let seats = repo
            .seats_for_flight(session, flight_id)
            .await
            .map_err(|e| CoreError::fetch("seat information", e))?;

        tracing::debug!(flight_id = %flight_id, seats = seats.len(), "Opened seat map");
        self.replace(flight.clone(), seats);
        Ok(())
    }

    /// Install a freshly fetched seat map for `flight`, dropping the selection.
    pub fn replace(&mut self, flight: Flight, seats: Vec<Seat>) {
        self.open_flight = Some(flight);
        self.available = seats;
        self.clear();
    }

    pub fn toggle(&mut self, seat_number: &str) -> Toggle {
        let Some(seat) = self.seat(seat_number) else {
            return Toggle::Ignored;
        };
        if seat.is_booked {
            return Toggle::Ignored;
        }

        if let Some(pos) = self.selected.iter().position(|s| s == seat_number) {
            self.selected.remove(pos);
            Toggle::Deselected
        } else {
            self.selected.push(seat_number.to_string());
            Toggle::Selected
        }
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    pub fn open_flight(&self) -> Option<&Flight> {
        self.open_flight.as_ref()
    }

    pub fn seats(&self) -> &[Seat] {
        &self.available
    }

    pub fn seat(&self, seat_number: &str) -> Option<&Seat> {
        self.available.iter().find(|s| s.seat_number == seat_number)
    }

    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    pub fn is_selected(&self, seat_number: &str) -> bool {
        self.selected.iter().any(|s| s == seat_number)
    }

    pub fn seat_state(&self, seat: &Seat) -> SeatState {
        if seat.is_booked {
            SeatState::Booked
        } else if self.is_selected(&seat.seat_number) {
            SeatState::Selected
        } else {
            SeatState::Available
        }
    }

    pub fn quote(&self, route: Option<&Route>) -> FareQuote {
        FareQuote::new(route.and_then(|r| r.fare), self.selected.len())
    }
}
