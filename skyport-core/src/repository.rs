use async_trait::async_trait;
use skyport_shared::{
    Airline, Booking, CreateBookingRequest, Flight, FlightId, NewFlight, OwnerFlight, Route,
    RouteId, Seat,
};

use crate::session::Session;

/// Failure of a single backend call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("backend returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("request failed: {0}")]
    Transport(String),
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl ServiceError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ServiceError::Unauthorized(_))
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Route data access
#[async_trait]
pub trait RouteRepository: Send + Sync {
    async fn get_route(&self, session: &Session, id: RouteId) -> ServiceResult<Route>;

    async fn list_routes(&self, session: &Session) -> ServiceResult<Vec<Route>>;
}

/// Flight data access. The route-scoped lookups are known to be unreliable,
/// which is why callers combine several of them.
#[async_trait]
pub trait FlightRepository: Send + Sync {
    async fn get_flight(&self, session: &Session, id: FlightId) -> ServiceResult<Flight>;

    async fn flights_for_route(
        &self,
        session: &Session,
        route_id: RouteId,
    ) -> ServiceResult<Vec<Flight>>;

    async fn list_flights(&self, session: &Session) -> ServiceResult<Vec<Flight>>;

    /// Full flight collection filtered server-side by a `routeId` parameter.
    async fn list_flights_by_route_param(
        &self,
        session: &Session,
        route_id: RouteId,
    ) -> ServiceResult<Vec<Flight>>;

    /// Returns the created flight when the backend echoes it.
    async fn create_flight(
        &self,
        session: &Session,
        flight: &NewFlight,
    ) -> ServiceResult<Option<Flight>>;

    async fn owner_flights_with_bookings(
        &self,
        session: &Session,
    ) -> ServiceResult<Vec<OwnerFlight>>;
}

/// Seat availability
#[async_trait]
pub trait SeatRepository: Send + Sync {
    async fn seats_for_flight(&self, session: &Session, flight_id: FlightId)
        -> ServiceResult<Vec<Seat>>;
}

/// Booking data access for the signed-in passenger
#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn create_booking(
        &self,
        session: &Session,
        request: &CreateBookingRequest,
    ) -> ServiceResult<Option<Booking>>;

    async fn list_bookings(&self, session: &Session) -> ServiceResult<Vec<Booking>>;
}

#[async_trait]
pub trait AirlineRepository: Send + Sync {
    /// `None` when the owner has not created an airline yet.
    async fn my_airline(&self, session: &Session) -> ServiceResult<Option<Airline>>;
}
