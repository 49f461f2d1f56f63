//! Flight-owner fleet management: list flights and routes, add flights.

use chrono::{DateTime, Utc};
use std::sync::Arc;

use skyport_core::repository::{AirlineRepository, FlightRepository, RouteRepository};
use skyport_core::session::Session;
use skyport_core::{CoreError, CoreResult};
use skyport_shared::{Airline, Flight, NewFlight, Route, RouteId};

pub const MAX_TOTAL_SEATS: u32 = 500;

#[derive(Debug, Clone, Default)]
pub struct FleetOverview {
    pub airline: Option<Airline>,
    pub flights: Vec<Flight>,
    pub routes: Vec<Route>,
}

impl FleetOverview {
    pub fn route(&self, id: RouteId) -> Option<&Route> {
        self.routes.iter().find(|route| route.id == id)
    }

    pub fn route_for(&self, flight: &Flight) -> Option<&Route> {
        flight.flight_route_id.and_then(|id| self.route(id))
    }

    /// Owners without an airline can browse but not add flights.
    pub fn can_add_flights(&self) -> bool {
        self.airline.is_some()
    }
}

/// Raw owner input for a new flight.
#[derive(Debug, Clone, Default)]
pub struct FlightForm {
    pub flight_number: String,
    pub route_id: Option<RouteId>,
    pub total_seats: Option<u32>,
    pub departure: Option<DateTime<Utc>>,
    pub arrival: Option<DateTime<Utc>>,
}

impl FlightForm {
    pub fn validate(&self, airline: &Airline, routes: &[Route]) -> CoreResult<NewFlight> {
        let flight_number = self.flight_number.trim();
        if flight_number.is_empty() {
            return Err(CoreError::validation("Flight number is required."));
        }

        let route_id = self
            .route_id
            .ok_or_else(|| CoreError::validation("Select a flight route."))?;
        if !routes.iter().any(|route| route.id == route_id) {
            return Err(CoreError::validation(format!(
                "Route {} does not exist.",
                route_id
            )));
        }

        let total_seats = match self.total_seats {
            Some(seats) if (1..=MAX_TOTAL_SEATS).contains(&seats) => seats,
            _ => {
                return Err(CoreError::validation(format!(
                    "Total seats must be between 1 and {}.",
                    MAX_TOTAL_SEATS
                )))
            }
        };

        let (departure_time, arrival_time) = match (self.departure, self.arrival) {
            (Some(departure), Some(arrival)) if arrival > departure => (departure, arrival),
            (Some(_), Some(_)) => {
                return Err(CoreError::validation(
                    "Arrival time must be after departure time.",
                ))
            }
            _ => {
                return Err(CoreError::validation(
                    "Departure and arrival times are required.",
                ))
            }
        };

        Ok(NewFlight {
            flight_number: flight_number.to_string(),
            airline_id: airline.id,
            airline_name: airline.airline_name.clone(),
            flight_route_id: route_id,
            total_seats,
            departure_time,
            arrival_time,
        })
    }
}

#[derive(Clone)]
pub struct FleetDesk {
    flights: Arc<dyn FlightRepository>,
    routes: Arc<dyn RouteRepository>,
    airlines: Arc<dyn AirlineRepository>,
}

impl FleetDesk {
    pub fn new(
        flights: Arc<dyn FlightRepository>,
        routes: Arc<dyn RouteRepository>,
        airlines: Arc<dyn AirlineRepository>,
    ) -> Self {
        Self {
            flights,
            routes,
            airlines,
        }
    }

    pub async fn overview(&self, session: &Session) -> CoreResult<FleetOverview> {
        let (flights, routes, airline) = tokio::try_join!(
            async {
                self.flights
                    .list_flights(session)
                    .await
                    .map_err(|e| CoreError::fetch("flights", e))
            },
            async {
                self.routes
                    .list_routes(session)
                    .await
                    .map_err(|e| CoreError::fetch("routes", e))
            },
            async {
                self.airlines
                    .my_airline(session)
                    .await
                    .map_err(|e| CoreError::fetch("airline", e))
            },
        )?;

        Ok(FleetOverview {
            airline,
            flights,
            routes,
        })
    }

    /// Create a flight for the owner's airline and refresh the flight list.
    pub async fn add_flight(
        &self,
        session: &Session,
        overview: &mut FleetOverview,
        form: &FlightForm,
    ) -> CoreResult<Option<Flight>> {
        let airline = overview.airline.as_ref().ok_or_else(|| {
            CoreError::validation("Please create an airline first before adding flights.")
        })?;
        let new_flight = form.validate(airline, &overview.routes)?;

        let created = self
            .flights
            .create_flight(session, &new_flight)
            .await
            .map_err(CoreError::submission)?;

        tracing::info!(
            flight_number = %new_flight.flight_number,
            route_id = %new_flight.flight_route_id,
            "Flight added"
        );

        match self.flights.list_flights(session).await {
            Ok(flights) => overview.flights = flights,
            Err(e) => tracing::warn!(error = %e, "Failed to refresh flights after adding one"),
        }

        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use rust_decimal_macros::dec;
    use skyport_shared::AirlineId;
    use skyport_store::memory::{fixtures, Endpoint, InMemoryBackend};

    fn desk(backend: &Arc<InMemoryBackend>) -> FleetDesk {
        FleetDesk::new(backend.clone(), backend.clone(), backend.clone())
    }

    fn airline() -> Airline {
        fixtures::airline(1, "IndiGo")
    }

    fn form() -> FlightForm {
        let departure = Utc.with_ymd_and_hms(2025, 3, 1, 6, 30, 0).unwrap();
        FlightForm {
            flight_number: " 6E777 ".to_string(),
            route_id: Some(RouteId(3)),
            total_seats: Some(180),
            departure: Some(departure),
            arrival: Some(departure + Duration::hours(2)),
        }
    }

    async fn seeded(with_airline: bool) -> Arc<InMemoryBackend> {
        let backend = Arc::new(InMemoryBackend::new());
        backend
            .insert_route(fixtures::route(3, "Chennai", "Delhi", Some(dec!(5000))))
            .await;
        backend
            .insert_flight(fixtures::flight(11, "6E101", RouteId(3)))
            .await;
        if with_airline {
            backend.set_airline(airline()).await;
        }
        backend
    }

    #[test]
    fn test_form_validation() {
        let routes = vec![fixtures::route(3, "Chennai", "Delhi", None)];
        let airline = airline();

        let new_flight = form().validate(&airline, &routes).unwrap();
        assert_eq!(new_flight.flight_number, "6E777");
        assert_eq!(new_flight.airline_id, AirlineId(1));
        assert_eq!(new_flight.airline_name, "IndiGo");

        let mut bad = form();
        bad.total_seats = Some(501);
        assert!(matches!(bad.validate(&airline, &routes), Err(CoreError::ValidationError(_))));

        let mut bad = form();
        bad.route_id = Some(RouteId(9));
        assert!(bad.validate(&airline, &routes).is_err());

        let mut bad = form();
        bad.arrival = bad.departure;
        assert!(bad.validate(&airline, &routes).is_err());

        let mut bad = form();
        bad.flight_number = "  ".to_string();
        assert!(bad.validate(&airline, &routes).is_err());
    }

    #[tokio::test]
    async fn test_overview_loads_all_three_collections() {
        let backend = seeded(true).await;
        let overview = desk(&backend).overview(&fixtures::session()).await.unwrap();

        assert!(overview.can_add_flights());
        assert_eq!(overview.flights.len(), 1);
        let route = overview.route_for(&overview.flights[0]).unwrap();
        assert_eq!(route.destination, "Delhi");
    }

    #[tokio::test]
    async fn test_overview_without_airline() {
        let backend = seeded(false).await;
        let overview = desk(&backend).overview(&fixtures::session()).await.unwrap();
        assert!(!overview.can_add_flights());
    }

    #[tokio::test]
    async fn test_overview_failure_is_a_fetch_error() {
        let backend = seeded(true).await;
        backend.fail(Endpoint::ListRoutes).await;

        let err = desk(&backend).overview(&fixtures::session()).await.unwrap_err();
        assert!(matches!(err, CoreError::FetchError { ref what, .. } if what == "routes"));
    }

    #[tokio::test]
    async fn test_add_flight_requires_airline() {
        let backend = seeded(false).await;
        let desk = desk(&backend);
        let session = fixtures::session();
        let mut overview = desk.overview(&session).await.unwrap();

        let err = desk.add_flight(&session, &mut overview, &form()).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation failed: Please create an airline first before adding flights."
        );
        assert_eq!(backend.calls(Endpoint::CreateFlight).await, 0);
    }

    #[tokio::test]
    async fn test_add_flight_refreshes_the_list() {
        let backend = seeded(true).await;
        let desk = desk(&backend);
        let session = fixtures::session();
        let mut overview = desk.overview(&session).await.unwrap();

        desk.add_flight(&session, &mut overview, &form()).await.unwrap();

        assert_eq!(overview.flights.len(), 2);
        assert!(overview.flights.iter().any(|f| f.flight_number == "6E777"));
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_previous_list() {
        let backend = seeded(true).await;
        let desk = desk(&backend);
        let session = fixtures::session();
        let mut overview = desk.overview(&session).await.unwrap();

        backend.fail(Endpoint::ListFlights).await;
        desk.add_flight(&session, &mut overview, &form()).await.unwrap();

        assert_eq!(overview.flights.len(), 1);
        assert_eq!(backend.calls(Endpoint::CreateFlight).await, 1);
    }

    #[tokio::test]
    async fn test_rejected_post_is_a_submission_error() {
        let backend = seeded(true).await;
        let desk = desk(&backend);
        let session = fixtures::session();
        let mut overview = desk.overview(&session).await.unwrap();

        backend.fail(Endpoint::CreateFlight).await;
        let err = desk.add_flight(&session, &mut overview, &form()).await.unwrap_err();
        assert!(matches!(err, CoreError::SubmissionError(_)));
    }
}
