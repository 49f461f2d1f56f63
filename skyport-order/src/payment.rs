//! Payment reconciliation: list unpaid bookings with a fare for each, and pay
//! them one at a time.
//!
//! Bookings do not carry their fare, so it is re-derived per booking from the
//! flight's route, then from a route matching the booking's endpoints, and
//! finally from a configured fallback fare.

use async_trait::async_trait;
use futures_util::future::join_all;
use rust_decimal::Decimal;
use std::fmt;
use std::sync::Arc;

use skyport_catalog::fare::booking_amount;
use skyport_core::fallback::{first_success, Strategy};
use skyport_core::payment::PaymentGateway;
use skyport_core::repository::{
    BookingRepository, FlightRepository, RouteRepository, ServiceError, ServiceResult,
};
use skyport_core::session::Session;
use skyport_core::{CoreError, CoreResult};
use skyport_shared::{
    Booking, BookingId, Flight, PaymentMethod, PaymentReceipt, PaymentRequest, Route,
};

/// Fare applied when no route can be found for a booking.
pub const DEFAULT_FALLBACK_FARE: Decimal = Decimal::from_parts(2500, 0, 0, false, 0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FareSource {
    FlightRoute,
    MatchedRoute,
    Fallback,
}

impl fmt::Display for FareSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FareSource::FlightRoute => write!(f, "flight route"),
            FareSource::MatchedRoute => write!(f, "matched route"),
            FareSource::Fallback => write!(f, "fallback fare"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PendingBooking {
    pub booking: Booking,
    pub fare: Decimal,
    pub fare_source: FareSource,
    pub route: Option<Route>,
    pub flight: Option<Flight>,
}

impl PendingBooking {
    /// Bookings without seat numbers count as one seat.
    pub fn seat_count(&self) -> usize {
        self.booking.seat_numbers().len().max(1)
    }

    pub fn total_amount(&self) -> Decimal {
        booking_amount(self.fare, self.booking.seat_numbers().len())
    }
}

struct FareMatch {
    fare: Decimal,
    route: Route,
    flight: Option<Flight>,
}

fn priced(route: Route) -> ServiceResult<Decimal> {
    match route.fare {
        Some(fare) if !fare.is_zero() => Ok(fare),
        _ => Err(ServiceError::NotFound(format!("route {} has no fare", route.id))),
    }
}

/// Booking -> flight -> route by the flight's route id.
struct FareViaFlight<'a> {
    flights: &'a dyn FlightRepository,
    routes: &'a dyn RouteRepository,
    session: &'a Session,
}

#[async_trait]
impl Strategy<Booking, FareMatch> for FareViaFlight<'_> {
    fn name(&self) -> &'static str {
        "fare-via-flight"
    }

    async fn attempt(&self, booking: &Booking) -> ServiceResult<FareMatch> {
        let flight_id = booking
            .flight_id
            .ok_or_else(|| ServiceError::NotFound(format!("booking {} has no flight", booking.id)))?;
        let flight = self.flights.get_flight(self.session, flight_id).await?;
        let route_id = flight
            .flight_route_id
            .ok_or_else(|| ServiceError::NotFound(format!("flight {} has no route", flight.id)))?;
        let route = self.routes.get_route(self.session, route_id).await?;
        let fare = priced(route.clone())?;

        Ok(FareMatch {
            fare,
            route,
            flight: Some(flight),
        })
    }
}

/// Route whose endpoints equal the booking's.
struct FareByEndpoints<'a> {
    routes: &'a dyn RouteRepository,
    session: &'a Session,
}

#[async_trait]
impl Strategy<Booking, FareMatch> for FareByEndpoints<'_> {
    fn name(&self) -> &'static str {
        "fare-by-endpoints"
    }

    async fn attempt(&self, booking: &Booking) -> ServiceResult<FareMatch> {
        let (Some(source), Some(destination)) = (&booking.source, &booking.destination) else {
            return Err(ServiceError::NotFound(format!(
                "booking {} has no endpoints",
                booking.id
            )));
        };

        let route = self
            .routes
            .list_routes(self.session)
            .await?
            .into_iter()
            .find(|route| route.serves(source, destination))
            .ok_or_else(|| {
                ServiceError::NotFound(format!("no route from {} to {}", source, destination))
            })?;
        let fare = priced(route.clone())?;

        Ok(FareMatch {
            fare,
            route,
            flight: None,
        })
    }
}

pub struct PaymentDesk {
    bookings: Arc<dyn BookingRepository>,
    flights: Arc<dyn FlightRepository>,
    routes: Arc<dyn RouteRepository>,
    payments: Arc<dyn PaymentGateway>,
    fallback_fare: Decimal,
    pending: Vec<PendingBooking>,
}

impl PaymentDesk {
    pub fn new(
        bookings: Arc<dyn BookingRepository>,
        flights: Arc<dyn FlightRepository>,
        routes: Arc<dyn RouteRepository>,
        payments: Arc<dyn PaymentGateway>,
    ) -> Self {
        Self {
            bookings,
            flights,
            routes,
            payments,
            fallback_fare: DEFAULT_FALLBACK_FARE,
            pending: Vec::new(),
        }
    }

    pub fn with_fallback_fare(mut self, fare: Decimal) -> Self {
        self.fallback_fare = fare;
        self
    }

    pub fn fallback_fare(&self) -> Decimal {
        self.fallback_fare
    }

    pub fn pending(&self) -> &[PendingBooking] {
        &self.pending
    }

    /// Fetch the passenger's bookings and price every pending one. Fares are
    /// resolved concurrently and kept in booking order.
    pub async fn load_pending(&mut self, session: &Session) -> CoreResult<&[PendingBooking]> {
        let bookings = self
            .bookings
            .list_bookings(session)
            .await
            .map_err(|e| CoreError::fetch("bookings", e))?;

        let resolutions = join_all(
            bookings
                .into_iter()
                .filter(Booking::is_pending)
                .map(|booking| self.resolve_fare(session, booking)),
        )
        .await;

        self.pending = resolutions.into_iter().collect::<CoreResult<Vec<_>>>()?;
        tracing::debug!(pending = self.pending.len(), "Loaded pending bookings");
        Ok(&self.pending)
    }

    /// Price a single booking. Only an authentication failure is an error;
    /// every other failure ends at the fallback fare.
    pub async fn resolve_fare(
        &self,
        session: &Session,
        booking: Booking,
    ) -> CoreResult<PendingBooking> {
        let via_flight = FareViaFlight {
            flights: self.flights.as_ref(),
            routes: self.routes.as_ref(),
            session,
        };
        let by_endpoints = FareByEndpoints {
            routes: self.routes.as_ref(),
            session,
        };
        let chain: [&dyn Strategy<Booking, FareMatch>; 2] = [&via_flight, &by_endpoints];

        match first_success(&booking, &chain).await {
            Ok(resolved) => {
                let fare_source = if resolved.value.flight.is_some() {
                    FareSource::FlightRoute
                } else {
                    FareSource::MatchedRoute
                };
                Ok(PendingBooking {
                    fare: resolved.value.fare,
                    fare_source,
                    route: Some(resolved.value.route),
                    flight: resolved.value.flight,
                    booking,
                })
            }
            Err(exhausted) => {
                if let Some(err) = exhausted
                    .failures
                    .into_iter()
                    .map(|failure| failure.error)
                    .find(ServiceError::is_unauthorized)
                {
                    return Err(CoreError::fetch("fare", err));
                }
                tracing::warn!(
                    booking_id = %booking.id,
                    fallback_fare = %self.fallback_fare,
                    "No route found for booking, applying fallback fare"
                );
                Ok(PendingBooking {
                    fare: self.fallback_fare,
                    fare_source: FareSource::Fallback,
                    route: None,
                    flight: None,
                    booking,
                })
            }
        }
    }

    /// Pay one pending booking. On success exactly that booking leaves the
    /// pending list; nothing is refetched.
    pub async fn submit_payment(
        &mut self,
        session: &Session,
        booking_id: BookingId,
        method: PaymentMethod,
    ) -> CoreResult<PaymentReceipt> {
        let position = self
            .pending
            .iter()
            .position(|p| p.booking.id == booking_id)
            .ok_or_else(|| {
                CoreError::validation(format!("Booking {} is not awaiting payment.", booking_id))
            })?;

        let request = PaymentRequest {
            booking_id,
            payment_method: method,
        };
        let receipt = self
            .payments
            .create_payment(session, &request)
            .await
            .map_err(CoreError::submission)?;

        let paid = self.pending.remove(position);
        tracing::info!(
            booking_id = %booking_id,
            method = %method,
            amount = %paid.total_amount(),
            "Payment submitted"
        );
        Ok(receipt)
    }
}
