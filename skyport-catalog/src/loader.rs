//! Route and flight loading for the flight list page.
//!
//! The route-scoped flight endpoint is unreliable, so flights are resolved by
//! an ordered chain of strategies. A route that cannot be resolved at all is
//! terminal; a route whose flights cannot be resolved is rendered empty.

use async_trait::async_trait;
use std::sync::Arc;

use skyport_core::fallback::{first_success, Exhausted, Failure, Strategy};
use skyport_core::repository::{FlightRepository, RouteRepository, ServiceError, ServiceResult};
use skyport_core::session::Session;
use skyport_core::{CoreError, CoreResult};
use skyport_shared::{Flight, FlightId, Route, RouteId};

pub const ROUTE_BY_ID: &str = "route-by-id";
pub const ROUTE_FROM_CATALOG: &str = "route-from-catalog";
pub const ROUTE_SCOPED_FLIGHTS: &str = "route-scoped-flights";
pub const ENDPOINT_MATCHED_FLIGHTS: &str = "endpoint-matched-flights";
pub const ROUTE_PARAM_FLIGHTS: &str = "route-param-flights";

struct RouteById<'a> {
    repo: &'a dyn RouteRepository,
    session: &'a Session,
}

#[async_trait]
impl Strategy<RouteId, Route> for RouteById<'_> {
    fn name(&self) -> &'static str {
        ROUTE_BY_ID
    }

    async fn attempt(&self, id: &RouteId) -> ServiceResult<Route> {
        self.repo.get_route(self.session, *id).await
    }
}

/// Full route list, matched on id.
struct RouteFromCatalog<'a> {
    repo: &'a dyn RouteRepository,
    session: &'a Session,
}

#[async_trait]
impl Strategy<RouteId, Route> for RouteFromCatalog<'_> {
    fn name(&self) -> &'static str {
        ROUTE_FROM_CATALOG
    }

    async fn attempt(&self, id: &RouteId) -> ServiceResult<Route> {
        self.repo
            .list_routes(self.session)
            .await?
            .into_iter()
            .find(|route| route.id == *id)
            .ok_or_else(|| ServiceError::NotFound(format!("route {} is not in the route list", id)))
    }
}

struct RouteScopedFlights<'a> {
    repo: &'a dyn FlightRepository,
    session: &'a Session,
}

#[async_trait]
impl Strategy<Route, Vec<Flight>> for RouteScopedFlights<'_> {
    fn name(&self) -> &'static str {
        ROUTE_SCOPED_FLIGHTS
    }

    async fn attempt(&self, route: &Route) -> ServiceResult<Vec<Flight>> {
        self.repo.flights_for_route(self.session, route.id).await
    }
}

/// Full flight list, keeping flights that fly the route's endpoints.
struct EndpointMatchedFlights<'a> {
    repo: &'a dyn FlightRepository,
    session: &'a Session,
}

#[async_trait]
impl Strategy<Route, Vec<Flight>> for EndpointMatchedFlights<'_> {
    fn name(&self) -> &'static str {
        ENDPOINT_MATCHED_FLIGHTS
    }

    async fn attempt(&self, route: &Route) -> ServiceResult<Vec<Flight>> {
        let flights = self.repo.list_flights(self.session).await?;
        Ok(flights
            .into_iter()
            .filter(|flight| flight.connects(&route.source, &route.destination))
            .collect())
    }
}

struct RouteParamFlights<'a> {
    repo: &'a dyn FlightRepository,
    session: &'a Session,
}

#[async_trait]
impl Strategy<Route, Vec<Flight>> for RouteParamFlights<'_> {
    fn name(&self) -> &'static str {
        ROUTE_PARAM_FLIGHTS
    }

    async fn attempt(&self, route: &Route) -> ServiceResult<Vec<Flight>> {
        self.repo
            .list_flights_by_route_param(self.session, route.id)
            .await
    }
}

#[derive(Debug)]
pub struct RouteListing {
    pub route: Route,
    pub flights: Vec<Flight>,
    /// Set when every flight strategy failed; `flights` is then empty.
    pub flights_error: Option<CoreError>,
    pub route_strategy: &'static str,
    pub flights_strategy: Option<&'static str>,
}

impl RouteListing {
    pub fn flight(&self, id: FlightId) -> Option<&Flight> {
        self.flights.iter().find(|flight| flight.id == id)
    }

    pub fn flights_unavailable(&self) -> bool {
        self.flights_error.is_some()
    }
}

#[derive(Debug)]
pub enum RouteLoad {
    /// No strategy could resolve the route. Terminal for the page.
    Missing { failures: Vec<Failure> },
    Found(RouteListing),
}

impl RouteLoad {
    pub fn listing(&self) -> Option<&RouteListing> {
        match self {
            RouteLoad::Found(listing) => Some(listing),
            RouteLoad::Missing { .. } => None,
        }
    }

    pub fn into_listing(self) -> Option<RouteListing> {
        match self {
            RouteLoad::Found(listing) => Some(listing),
            RouteLoad::Missing { .. } => None,
        }
    }
}

#[derive(Clone)]
pub struct RouteLoader {
    routes: Arc<dyn RouteRepository>,
    flights: Arc<dyn FlightRepository>,
}

impl RouteLoader {
    pub fn new(routes: Arc<dyn RouteRepository>, flights: Arc<dyn FlightRepository>) -> Self {
        Self { routes, flights }
    }

    /// Resolve the route and its flights. Only authentication failures are
    /// returned as `Err`; everything else is part of the `RouteLoad`.
    pub async fn load(&self, session: &Session, route_id: RouteId) -> CoreResult<RouteLoad> {
        session
            .bearer()
            .map_err(|e| CoreError::fetch("route", e))?;

        let by_id = RouteById {
            repo: self.routes.as_ref(),
            session,
        };
        let from_catalog = RouteFromCatalog {
            repo: self.routes.as_ref(),
            session,
        };
        let route_chain: [&dyn Strategy<RouteId, Route>; 2] = [&by_id, &from_catalog];

        let resolved = match first_success(&route_id, &route_chain).await {
            Ok(resolved) => resolved,
            Err(exhausted) => {
                if exhausted.is_unauthorized() {
                    return Err(auth_error(&exhausted));
                }
                tracing::warn!(route_id = %route_id, attempts = exhausted.failures.len(), "Route not found");
                return Ok(RouteLoad::Missing {
                    failures: exhausted.failures,
                });
            }
        };
        let route = resolved.value;
        let route_strategy = resolved.strategy;

        let scoped = RouteScopedFlights {
            repo: self.flights.as_ref(),
            session,
        };
        let matched = EndpointMatchedFlights {
            repo: self.flights.as_ref(),
            session,
        };
        let by_param = RouteParamFlights {
            repo: self.flights.as_ref(),
            session,
        };

        // A route recovered from the catalog skips the scoped lookup.
        let mut flight_chain: Vec<&dyn Strategy<Route, Vec<Flight>>> = Vec::with_capacity(3);
        if route_strategy == ROUTE_BY_ID {
            flight_chain.push(&scoped);
        }
        flight_chain.push(&matched);
        flight_chain.push(&by_param);

        let listing = match first_success(&route, &flight_chain).await {
            Ok(flights) => {
                tracing::debug!(
                    route_id = %route.id,
                    flights = flights.value.len(),
                    strategy = flights.strategy,
                    "Loaded flights"
                );
                RouteListing {
                    route,
                    flights: flights.value,
                    flights_error: None,
                    route_strategy,
                    flights_strategy: Some(flights.strategy),
                }
            }
            Err(exhausted) => {
                if exhausted.is_unauthorized() {
                    return Err(auth_error(&exhausted));
                }
                let error = exhausted
                    .last_error()
                    .cloned()
                    .unwrap_or_else(|| ServiceError::NotFound("no flight lookup succeeded".to_string()));
                tracing::warn!(route_id = %route.id, %error, "Flights unavailable for route");
                RouteListing {
                    route,
                    flights: Vec::new(),
                    flights_error: Some(CoreError::fetch("flights", error)),
                    route_strategy,
                    flights_strategy: None,
                }
            }
        };

        Ok(RouteLoad::Found(listing))
    }
}

fn auth_error(exhausted: &Exhausted) -> CoreError {
    let reason = exhausted
        .failures
        .iter()
        .find_map(|failure| match &failure.error {
            ServiceError::Unauthorized(reason) => Some(reason.clone()),
            _ => None,
        })
        .unwrap_or_else(|| "session rejected".to_string());
    CoreError::AuthError(reason)
}
