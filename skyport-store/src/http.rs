//! REST adapter for the booking backend.

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use uuid::Uuid;

use skyport_core::payment::PaymentGateway;
use skyport_core::repository::{
    AirlineRepository, BookingRepository, FlightRepository, RouteRepository, SeatRepository,
    ServiceError, ServiceResult,
};
use skyport_core::session::Session;
use skyport_shared::{
    Airline, Booking, CreateBookingRequest, Flight, FlightId, NewFlight, OwnerFlight,
    PaymentReceipt, PaymentRequest, Route, RouteId, Seat, SeatMap,
};

use crate::app_config::BackendConfig;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &BackendConfig) -> Result<Self, reqwest::Error> {
        Self::new(&config.base_url, config.timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Authorized request builder. Fails before any I/O when the session has
    /// no usable token.
    fn request(&self, session: &Session, method: Method, path: &str) -> ServiceResult<RequestBuilder> {
        let token = session.bearer()?;
        let request_id = Uuid::new_v4().to_string();
        tracing::debug!(%method, path, request_id = %request_id, "Backend request");

        Ok(self
            .client
            .request(method, format!("{}/{}", self.base_url, path))
            .bearer_auth(token)
            .header(REQUEST_ID_HEADER, request_id))
    }

    async fn send(&self, request: RequestBuilder, path: &str) -> ServiceResult<Response> {
        let response = request
            .send()
            .await
            .map_err(|e| ServiceError::Transport(e.to_string()))?;

        let status = response.status();
        tracing::debug!(path, status = status.as_u16(), "Backend response");
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(match status {
            StatusCode::UNAUTHORIZED => ServiceError::Unauthorized(if body.trim().is_empty() {
                "session rejected by backend".to_string()
            } else {
                body
            }),
            StatusCode::NOT_FOUND => ServiceError::NotFound(path.to_string()),
            status => ServiceError::Status {
                status: status.as_u16(),
                message: body,
            },
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, session: &Session, path: &str) -> ServiceResult<T> {
        let request = self.request(session, Method::GET, path)?;
        let response = self.send(request, path).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ServiceError::Decode(e.to_string()))
    }

    /// POST `body`; the response is decoded when it has the expected shape.
    async fn post_json<B, T>(&self, session: &Session, path: &str, body: &B) -> ServiceResult<Option<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.request(session, Method::POST, path)?.json(body);
        let response = self.send(request, path).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ServiceError::Transport(e.to_string()))?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        match serde_json::from_slice::<T>(&bytes) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                tracing::debug!(path, error = %e, "Ignoring unrecognised response body");
                Ok(None)
            }
        }
    }
}

#[async_trait]
impl RouteRepository for HttpBackend {
    async fn get_route(&self, session: &Session, id: RouteId) -> ServiceResult<Route> {
        self.get_json(session, &format!("FlightRoutes/{}", id)).await
    }

    async fn list_routes(&self, session: &Session) -> ServiceResult<Vec<Route>> {
        self.get_json(session, "FlightRoutes").await
    }
}

#[async_trait]
impl FlightRepository for HttpBackend {
    async fn get_flight(&self, session: &Session, id: FlightId) -> ServiceResult<Flight> {
        self.get_json(session, &format!("Flights/{}", id)).await
    }

    async fn flights_for_route(
        &self,
        session: &Session,
        route_id: RouteId,
    ) -> ServiceResult<Vec<Flight>> {
        self.get_json(session, &format!("Flights/route/{}", route_id))
            .await
    }

    async fn list_flights(&self, session: &Session) -> ServiceResult<Vec<Flight>> {
        self.get_json(session, "Flights").await
    }

    async fn list_flights_by_route_param(
        &self,
        session: &Session,
        route_id: RouteId,
    ) -> ServiceResult<Vec<Flight>> {
        let request = self
            .request(session, Method::GET, "Flights")?
            .query(&[("routeId", route_id.0)]);
        let response = self.send(request, "Flights?routeId").await?;
        response
            .json()
            .await
            .map_err(|e| ServiceError::Decode(e.to_string()))
    }

    async fn create_flight(
        &self,
        session: &Session,
        flight: &NewFlight,
    ) -> ServiceResult<Option<Flight>> {
        self.post_json(session, "Flights", flight).await
    }

    async fn owner_flights_with_bookings(
        &self,
        session: &Session,
    ) -> ServiceResult<Vec<OwnerFlight>> {
        self.get_json(session, "Flights/owner/flights-with-bookings")
            .await
    }
}

#[async_trait]
impl SeatRepository for HttpBackend {
    async fn seats_for_flight(
        &self,
        session: &Session,
        flight_id: FlightId,
    ) -> ServiceResult<Vec<Seat>> {
        let map: SeatMap = self
            .get_json(session, &format!("Bookings/flight/{}/seats", flight_id))
            .await?;
        Ok(map.available_seats)
    }
}

#[async_trait]
impl BookingRepository for HttpBackend {
    async fn create_booking(
        &self,
        session: &Session,
        request: &CreateBookingRequest,
    ) -> ServiceResult<Option<Booking>> {
        self.post_json(session, "Bookings", request).await
    }

    async fn list_bookings(&self, session: &Session) -> ServiceResult<Vec<Booking>> {
        self.get_json(session, "Bookings").await
    }
}

#[async_trait]
impl AirlineRepository for HttpBackend {
    async fn my_airline(&self, session: &Session) -> ServiceResult<Option<Airline>> {
        match self.get_json(session, "Airlines/my-airline").await {
            Ok(airline) => Ok(Some(airline)),
            Err(ServiceError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl PaymentGateway for HttpBackend {
    async fn create_payment(
        &self,
        session: &Session,
        request: &PaymentRequest,
    ) -> ServiceResult<PaymentReceipt> {
        let receipt: Option<PaymentReceipt> = self.post_json(session, "Payments", request).await?;
        Ok(receipt.unwrap_or_default())
    }
}
