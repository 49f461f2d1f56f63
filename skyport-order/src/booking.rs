use std::sync::Arc;

use skyport_catalog::seats::SeatSelection;
use skyport_core::repository::BookingRepository;
use skyport_core::session::Session;
use skyport_core::{CoreError, CoreResult};
use skyport_shared::{Booking, CreateBookingRequest, FlightId};

/// Where the caller should send the user after a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextStep {
    Payment,
}

#[derive(Debug, Clone)]
pub struct BookingConfirmation {
    /// Server record, when the backend echoes one.
    pub booking: Option<Booking>,
    pub flight_id: FlightId,
    pub seat_numbers: Vec<String>,
    pub next: NextStep,
}

/// Submits the current seat selection as a booking
#[derive(Clone)]
pub struct BookingDesk {
    bookings: Arc<dyn BookingRepository>,
}

impl BookingDesk {
    pub fn new(bookings: Arc<dyn BookingRepository>) -> Self {
        Self { bookings }
    }

    /// Client-side checks, run before any request is made.
    pub fn validate(
        selection: &SeatSelection,
        flight_id: FlightId,
    ) -> CoreResult<CreateBookingRequest> {
        match selection.open_flight() {
            Some(open) if open.id == flight_id => {}
            _ => {
                return Err(CoreError::validation(
                    "Please select a flight and at least one seat.",
                ))
            }
        }

        if selection.selected().is_empty() {
            return Err(CoreError::validation(
                "Please select a flight and at least one seat.",
            ));
        }

        for seat_number in selection.selected() {
            match selection.seat(seat_number) {
                Some(seat) if !seat.is_booked => {}
                Some(_) => {
                    return Err(CoreError::validation(format!(
                        "Seat {} is already booked.",
                        seat_number
                    )))
                }
                None => {
                    return Err(CoreError::validation(format!(
                        "Seat {} is not on this flight.",
                        seat_number
                    )))
                }
            }
        }

        Ok(CreateBookingRequest {
            flight_id,
            seat_numbers: selection.selected().to_vec(),
        })
    }

    /// Post the selection. The selection is only borrowed, so it survives a
    /// failed submission for a retry.
    pub async fn submit(
        &self,
        session: &Session,
        selection: &SeatSelection,
        flight_id: FlightId,
    ) -> CoreResult<BookingConfirmation> {
        let request = Self::validate(selection, flight_id)?;

        let booking = self
            .bookings
            .create_booking(session, &request)
            .await
            .map_err(CoreError::submission)?;

        tracing::info!(
            flight_id = %flight_id,
            seats = request.seat_numbers.len(),
            booking_id = ?booking.as_ref().map(|b| b.id),
            "Booking submitted"
        );

        Ok(BookingConfirmation {
            booking,
            flight_id,
            seat_numbers: request.seat_numbers,
            next: NextStep::Payment,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skyport_shared::{BookingStatus, RouteId, Seat};
    use skyport_store::memory::{fixtures, Endpoint, InMemoryBackend};

    fn selection_on(flight_id: i64) -> SeatSelection {
        let mut selection = SeatSelection::new();
        selection.replace(
            fixtures::flight(flight_id, "6E101", RouteId(3)),
            vec![Seat::available("12A"), Seat::available("12B"), Seat::booked("12C")],
        );
        selection
    }

    #[tokio::test]
    async fn test_submit_posts_selection_and_points_to_payment() {
        let backend = Arc::new(InMemoryBackend::new());
        let desk = BookingDesk::new(backend.clone());
        let mut selection = selection_on(11);
        selection.toggle("12B");
        selection.toggle("12A");

        let confirmation = desk
            .submit(&fixtures::session(), &selection, FlightId(11))
            .await
            .unwrap();

        assert_eq!(confirmation.next, NextStep::Payment);
        assert_eq!(confirmation.seat_numbers, vec!["12B".to_string(), "12A".to_string()]);
        let booking = confirmation.booking.unwrap();
        assert_eq!(booking.status, BookingStatus::Pending);
        assert_eq!(backend.calls(Endpoint::CreateBooking).await, 1);
    }

    #[tokio::test]
    async fn test_validation_makes_no_request() {
        let backend = Arc::new(InMemoryBackend::new());
        let desk = BookingDesk::new(backend.clone());
        let session = fixtures::session();

        let empty = selection_on(11);
        let err = desk.submit(&session, &empty, FlightId(11)).await.unwrap_err();
        assert!(matches!(err, CoreError::ValidationError(_)));

        let mut other_flight = selection_on(11);
        other_flight.toggle("12A");
        let err = desk.submit(&session, &other_flight, FlightId(12)).await.unwrap_err();
        assert!(matches!(err, CoreError::ValidationError(_)));

        let err = desk
            .submit(&session, &SeatSelection::new(), FlightId(11))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::ValidationError(_)));

        assert_eq!(backend.calls(Endpoint::CreateBooking).await, 0);
    }

    #[tokio::test]
    async fn test_failed_submission_keeps_selection() {
        let backend = Arc::new(InMemoryBackend::new());
        backend.fail(Endpoint::CreateBooking).await;
        let desk = BookingDesk::new(backend.clone());
        let mut selection = selection_on(11);
        selection.toggle("12A");

        let err = desk
            .submit(&fixtures::session(), &selection, FlightId(11))
            .await
            .unwrap_err();

        assert!(matches!(err, CoreError::SubmissionError(_)));
        assert!(err.is_retryable());
        assert_eq!(selection.selected(), ["12A".to_string()]);
    }

    #[tokio::test]
    async fn test_expired_session_is_an_auth_error() {
        let backend = Arc::new(InMemoryBackend::new());
        let desk = BookingDesk::new(backend.clone());
        let mut selection = selection_on(11);
        selection.toggle("12A");

        let err = desk
            .submit(&Session::anonymous(), &selection, FlightId(11))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::AuthError(_)));
    }
}
