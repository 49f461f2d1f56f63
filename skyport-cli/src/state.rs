use anyhow::Context;
use rust_decimal::Decimal;
use std::sync::Arc;

use skyport_catalog::{FleetDesk, RouteLoader};
use skyport_core::payment::PaymentGateway;
use skyport_core::repository::{
    AirlineRepository, BookingRepository, FlightRepository, RouteRepository, SeatRepository,
};
use skyport_core::session::Session;
use skyport_order::{BookingDesk, PaymentDesk};
use skyport_store::app_config::Config;
use skyport_store::http::HttpBackend;

/// Backend ports plus the session every command runs with.
#[derive(Clone)]
pub struct AppState {
    pub routes: Arc<dyn RouteRepository>,
    pub flights: Arc<dyn FlightRepository>,
    pub seats: Arc<dyn SeatRepository>,
    pub bookings: Arc<dyn BookingRepository>,
    pub airlines: Arc<dyn AirlineRepository>,
    pub payments: Arc<dyn PaymentGateway>,
    pub session: Session,
    pub fallback_fare: Decimal,
}

impl AppState {
    /// Wire every port to a single backend.
    pub fn new<B>(backend: Arc<B>, session: Session, fallback_fare: Decimal) -> Self
    where
        B: RouteRepository
            + FlightRepository
            + SeatRepository
            + BookingRepository
            + AirlineRepository
            + PaymentGateway
            + 'static,
    {
        Self {
            routes: backend.clone(),
            flights: backend.clone(),
            seats: backend.clone(),
            bookings: backend.clone(),
            airlines: backend.clone(),
            payments: backend,
            session,
            fallback_fare,
        }
    }

    /// HTTP-backed state. `token` wins over the configured session token.
    pub fn from_config(config: &Config, token: Option<&str>) -> anyhow::Result<Self> {
        let backend = HttpBackend::from_config(&config.backend)
            .context("Failed to build HTTP client")?;

        let token = token
            .map(str::to_string)
            .or_else(|| config.session.token.as_ref().map(|t| t.expose().clone()));
        let session = match token {
            Some(token) => Session::from_token(token),
            None => Session::anonymous(),
        };
        if let Some(expiry) = session.expires_at() {
            tracing::debug!(expires_at = %expiry, "Session token loaded");
        }

        tracing::debug!(base_url = backend.base_url(), "Using backend");
        Ok(Self::new(
            Arc::new(backend),
            session,
            config.fares.fallback_fare,
        ))
    }

    pub fn route_loader(&self) -> RouteLoader {
        RouteLoader::new(self.routes.clone(), self.flights.clone())
    }

    pub fn booking_desk(&self) -> BookingDesk {
        BookingDesk::new(self.bookings.clone())
    }

    pub fn payment_desk(&self) -> PaymentDesk {
        PaymentDesk::new(
            self.bookings.clone(),
            self.flights.clone(),
            self.routes.clone(),
            self.payments.clone(),
        )
        .with_fallback_fare(self.fallback_fare)
    }

    pub fn fleet_desk(&self) -> FleetDesk {
        FleetDesk::new(
            self.flights.clone(),
            self.routes.clone(),
            self.airlines.clone(),
        )
    }
}
