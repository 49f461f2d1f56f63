//! In-memory backend for tests and offline demos.
//!
//! Implements every port over seeded data, with per-endpoint failure injection
//! and call counters. Calls made without a usable session are rejected before
//! they are counted, the way the HTTP adapter never reaches the network.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use skyport_core::payment::PaymentGateway;
use skyport_core::repository::{
    AirlineRepository, BookingRepository, FlightRepository, RouteRepository, SeatRepository,
    ServiceError, ServiceResult,
};
use skyport_core::session::Session;
use skyport_shared::{
    Airline, Booking, BookingId, BookingStatus, CreateBookingRequest, Flight, FlightId,
    NewFlight, OwnerFlight, PaymentReceipt, PaymentRequest, Route, RouteId, Seat,
};

/// One backend endpoint, for failure injection and call counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    GetRoute,
    ListRoutes,
    GetFlight,
    FlightsForRoute,
    ListFlights,
    FlightsByRouteParam,
    CreateFlight,
    OwnerFlights,
    Seats,
    CreateBooking,
    ListBookings,
    MyAirline,
    CreatePayment,
}

#[derive(Default)]
struct Inner {
    routes: Vec<Route>,
    flights: Vec<Flight>,
    seats: HashMap<FlightId, Vec<Seat>>,
    bookings: Vec<Booking>,
    owner_flights: Vec<OwnerFlight>,
    airline: Option<Airline>,
    payments: Vec<PaymentRequest>,
    failures: HashMap<Endpoint, ServiceError>,
    calls: HashMap<Endpoint, usize>,
    next_id: i64,
}

impl Inner {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        1000 + self.next_id
    }
}

#[derive(Clone, Default)]
pub struct InMemoryBackend {
    inner: Arc<RwLock<Inner>>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_route(&self, route: Route) {
        self.inner.write().await.routes.push(route);
    }

    pub async fn insert_flight(&self, flight: Flight) {
        self.inner.write().await.flights.push(flight);
    }

    pub async fn insert_seats(&self, flight_id: FlightId, seats: Vec<Seat>) {
        self.inner.write().await.seats.insert(flight_id, seats);
    }

    pub async fn insert_booking(&self, booking: Booking) {
        self.inner.write().await.bookings.push(booking);
    }

    pub async fn insert_owner_flight(&self, flight: OwnerFlight) {
        self.inner.write().await.owner_flights.push(flight);
    }

    pub async fn set_airline(&self, airline: Airline) {
        self.inner.write().await.airline = Some(airline);
    }

    /// Make `endpoint` fail with a 503 until [`InMemoryBackend::recover`].
    pub async fn fail(&self, endpoint: Endpoint) {
        self.fail_with(
            endpoint,
            ServiceError::Status {
                status: 503,
                message: "service unavailable".to_string(),
            },
        )
        .await;
    }

    pub async fn fail_with(&self, endpoint: Endpoint, error: ServiceError) {
        self.inner.write().await.failures.insert(endpoint, error);
    }

    pub async fn recover(&self, endpoint: Endpoint) {
        self.inner.write().await.failures.remove(&endpoint);
    }

    pub async fn calls(&self, endpoint: Endpoint) -> usize {
        self.inner
            .read()
            .await
            .calls
            .get(&endpoint)
            .copied()
            .unwrap_or(0)
    }

    pub async fn bookings(&self) -> Vec<Booking> {
        self.inner.read().await.bookings.clone()
    }

    pub async fn flights(&self) -> Vec<Flight> {
        self.inner.read().await.flights.clone()
    }

    pub async fn payments(&self) -> Vec<PaymentRequest> {
        self.inner.read().await.payments.clone()
    }

    /// Session check, call count and injected failure, in that order.
    async fn enter(&self, session: &Session, endpoint: Endpoint) -> ServiceResult<()> {
        session.bearer()?;
        let mut inner = self.inner.write().await;
        *inner.calls.entry(endpoint).or_insert(0) += 1;
        match inner.failures.get(&endpoint) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    async fn flights_on_route(&self, route_id: RouteId) -> Vec<Flight> {
        self.inner
            .read()
            .await
            .flights
            .iter()
            .filter(|f| f.flight_route_id == Some(route_id))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl RouteRepository for InMemoryBackend {
    async fn get_route(&self, session: &Session, id: RouteId) -> ServiceResult<Route> {
        self.enter(session, Endpoint::GetRoute).await?;
        self.inner
            .read()
            .await
            .routes
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| ServiceError::NotFound(format!("FlightRoutes/{}", id)))
    }

    async fn list_routes(&self, session: &Session) -> ServiceResult<Vec<Route>> {
        self.enter(session, Endpoint::ListRoutes).await?;
        Ok(self.inner.read().await.routes.clone())
    }
}

#[async_trait]
impl FlightRepository for InMemoryBackend {
    async fn get_flight(&self, session: &Session, id: FlightId) -> ServiceResult<Flight> {
        self.enter(session, Endpoint::GetFlight).await?;
        self.inner
            .read()
            .await
            .flights
            .iter()
            .find(|f| f.id == id)
            .cloned()
            .ok_or_else(|| ServiceError::NotFound(format!("Flights/{}", id)))
    }

    async fn flights_for_route(
        &self,
        session: &Session,
        route_id: RouteId,
    ) -> ServiceResult<Vec<Flight>> {
        self.enter(session, Endpoint::FlightsForRoute).await?;
        Ok(self.flights_on_route(route_id).await)
    }

    async fn list_flights(&self, session: &Session) -> ServiceResult<Vec<Flight>> {
        self.enter(session, Endpoint::ListFlights).await?;
        Ok(self.inner.read().await.flights.clone())
    }

    async fn list_flights_by_route_param(
        &self,
        session: &Session,
        route_id: RouteId,
    ) -> ServiceResult<Vec<Flight>> {
        self.enter(session, Endpoint::FlightsByRouteParam).await?;
        Ok(self.flights_on_route(route_id).await)
    }

    async fn create_flight(
        &self,
        session: &Session,
        flight: &NewFlight,
    ) -> ServiceResult<Option<Flight>> {
        self.enter(session, Endpoint::CreateFlight).await?;
        let mut inner = self.inner.write().await;
        let route = inner
            .routes
            .iter()
            .find(|r| r.id == flight.flight_route_id)
            .cloned();
        let created = Flight {
            id: FlightId(inner.next_id()),
            flight_number: flight.flight_number.clone(),
            airline_id: Some(flight.airline_id),
            airline_name: flight.airline_name.clone(),
            flight_route_id: Some(flight.flight_route_id),
            source: route.as_ref().map(|r| r.source.clone()),
            destination: route.map(|r| r.destination),
            total_seats: flight.total_seats,
            departure_time: Some(flight.departure_time),
            arrival_time: Some(flight.arrival_time),
        };
        inner.flights.push(created.clone());
        Ok(Some(created))
    }

    async fn owner_flights_with_bookings(
        &self,
        session: &Session,
    ) -> ServiceResult<Vec<OwnerFlight>> {
        self.enter(session, Endpoint::OwnerFlights).await?;
        Ok(self.inner.read().await.owner_flights.clone())
    }
}

#[async_trait]
impl SeatRepository for InMemoryBackend {
    async fn seats_for_flight(
        &self,
        session: &Session,
        flight_id: FlightId,
    ) -> ServiceResult<Vec<Seat>> {
        self.enter(session, Endpoint::Seats).await?;
        self.inner
            .read()
            .await
            .seats
            .get(&flight_id)
            .cloned()
            .ok_or_else(|| ServiceError::NotFound(format!("Bookings/flight/{}/seats", flight_id)))
    }
}

#[async_trait]
impl BookingRepository for InMemoryBackend {
    /// Records a pending booking and marks its seats booked.
    async fn create_booking(
        &self,
        session: &Session,
        request: &CreateBookingRequest,
    ) -> ServiceResult<Option<Booking>> {
        self.enter(session, Endpoint::CreateBooking).await?;
        let mut inner = self.inner.write().await;

        let flight = inner
            .flights
            .iter()
            .find(|f| f.id == request.flight_id)
            .cloned();
        if let Some(seats) = inner.seats.get_mut(&request.flight_id) {
            for seat in seats
                .iter_mut()
                .filter(|s| request.seat_numbers.contains(&s.seat_number))
            {
                seat.is_booked = true;
            }
        }

        let booking = Booking {
            id: BookingId(inner.next_id()),
            flight_id: Some(request.flight_id),
            flight_number: flight.as_ref().map(|f| f.flight_number.clone()),
            source: flight.as_ref().and_then(|f| f.source.clone()),
            destination: flight.and_then(|f| f.destination),
            seat_numbers: Some(request.seat_numbers.clone()),
            status: BookingStatus::Pending,
            booking_date: Some(chrono::Utc::now()),
            passenger_name: None,
            passenger_email: None,
            passenger_phone: None,
            user_id: None,
        };
        inner.bookings.push(booking.clone());
        Ok(Some(booking))
    }

    async fn list_bookings(&self, session: &Session) -> ServiceResult<Vec<Booking>> {
        self.enter(session, Endpoint::ListBookings).await?;
        Ok(self.inner.read().await.bookings.clone())
    }
}

#[async_trait]
impl AirlineRepository for InMemoryBackend {
    async fn my_airline(&self, session: &Session) -> ServiceResult<Option<Airline>> {
        self.enter(session, Endpoint::MyAirline).await?;
        Ok(self.inner.read().await.airline.clone())
    }
}

#[async_trait]
impl PaymentGateway for InMemoryBackend {
    /// Confirms the booking, as the backend does on a successful payment.
    async fn create_payment(
        &self,
        session: &Session,
        request: &PaymentRequest,
    ) -> ServiceResult<PaymentReceipt> {
        self.enter(session, Endpoint::CreatePayment).await?;
        let mut inner = self.inner.write().await;

        let booking = inner
            .bookings
            .iter_mut()
            .find(|b| b.id == request.booking_id)
            .ok_or_else(|| ServiceError::NotFound(format!("booking {}", request.booking_id)))?;
        booking.status = BookingStatus::Confirmed;

        inner.payments.push(request.clone());
        let id = inner.next_id();
        Ok(PaymentReceipt {
            id: Some(id),
            booking_id: Some(request.booking_id),
            amount: None,
            status: Some("Completed".to_string()),
            payment_method: Some(request.payment_method.label().to_string()),
        })
    }
}

/// Builders for seeding the in-memory backend.
pub mod fixtures {
    use rust_decimal::Decimal;
    use skyport_core::session::Session;
    use skyport_shared::{
        Airline, AirlineId, Booking, BookingId, BookingStatus, Flight, FlightId, Route, RouteId,
    };

    pub const TOKEN: &str = "test-token";

    pub fn session() -> Session {
        Session::from_token(TOKEN)
    }

    pub fn route(id: i64, source: &str, destination: &str, fare: Option<Decimal>) -> Route {
        Route::new(RouteId(id), source, destination, fare)
    }

    /// A flight that does not advertise its endpoints.
    pub fn flight(id: i64, flight_number: &str, route_id: RouteId) -> Flight {
        Flight {
            id: FlightId(id),
            flight_number: flight_number.to_string(),
            airline_id: Some(AirlineId(1)),
            airline_name: "IndiGo".to_string(),
            flight_route_id: Some(route_id),
            source: None,
            destination: None,
            total_seats: 180,
            departure_time: None,
            arrival_time: None,
        }
    }

    pub fn flight_between(
        id: i64,
        flight_number: &str,
        route_id: RouteId,
        source: &str,
        destination: &str,
    ) -> Flight {
        Flight {
            source: Some(source.to_string()),
            destination: Some(destination.to_string()),
            ..flight(id, flight_number, route_id)
        }
    }

    pub fn booking(id: i64, flight_id: FlightId, seats: &[&str], status: BookingStatus) -> Booking {
        Booking {
            id: BookingId(id),
            flight_id: Some(flight_id),
            flight_number: None,
            source: None,
            destination: None,
            seat_numbers: Some(seats.iter().map(|s| s.to_string()).collect()),
            status,
            booking_date: None,
            passenger_name: None,
            passenger_email: None,
            passenger_phone: None,
            user_id: None,
        }
    }

    pub fn booking_between(
        id: i64,
        flight_id: FlightId,
        seats: &[&str],
        status: BookingStatus,
        source: &str,
        destination: &str,
    ) -> Booking {
        Booking {
            source: Some(source.to_string()),
            destination: Some(destination.to_string()),
            ..booking(id, flight_id, seats, status)
        }
    }

    pub fn airline(id: i64, name: &str) -> Airline {
        Airline {
            id: AirlineId(id),
            airline_name: name.to_string(),
        }
    }
}
