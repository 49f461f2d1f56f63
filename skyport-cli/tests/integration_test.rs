use rust_decimal_macros::dec;
use std::sync::Arc;

use skyport_cli::cli::{Command, OwnerCommand};
use skyport_cli::commands::execute;
use skyport_cli::error::AppError;
use skyport_cli::state::AppState;
use skyport_core::session::Session;
use skyport_core::CoreError;
use skyport_shared::{
    Booking, BookingId, BookingStatus, FlightId, OwnerFlight, PaymentMethod, RouteId, Seat,
};
use skyport_store::memory::{fixtures, Endpoint, InMemoryBackend};

async fn seeded() -> InMemoryBackend {
    let backend = InMemoryBackend::new();
    backend
        .insert_route(fixtures::route(3, "Chennai", "Delhi", Some(dec!(5000))))
        .await;
    backend
        .insert_flight(fixtures::flight_between(11, "6E101", RouteId(3), "Chennai", "Delhi"))
        .await;
    backend
        .insert_seats(
            FlightId(11),
            vec![
                Seat::available("12A"),
                Seat::available("12B"),
                Seat::booked("12C"),
            ],
        )
        .await;
    backend
}

fn state(backend: &InMemoryBackend) -> AppState {
    AppState::new(Arc::new(backend.clone()), fixtures::session(), dec!(2500))
}

async fn run(state: &AppState, command: Command) -> (Result<(), AppError>, String) {
    let mut out = Vec::new();
    let result = execute(state, command, &mut out).await;
    (result, String::from_utf8(out).unwrap())
}

#[tokio::test]
async fn test_flights_lists_route_and_flights() {
    let backend = seeded().await;
    let (result, text) = run(&state(&backend), Command::Flights { route: RouteId(3) }).await;

    result.unwrap();
    assert!(text.contains("Chennai → Delhi"));
    assert!(text.contains("Base fare per seat: ₹5000"));
    assert!(text.contains("6E101"));
}

#[tokio::test]
async fn test_flights_unavailable_is_not_an_error() {
    let backend = seeded().await;
    backend.fail(Endpoint::FlightsForRoute).await;
    backend.fail(Endpoint::ListFlights).await;
    backend.fail(Endpoint::FlightsByRouteParam).await;

    let (result, text) = run(&state(&backend), Command::Flights { route: RouteId(3) }).await;

    result.unwrap();
    assert!(text.contains("Flights are unavailable right now"));
}

#[tokio::test]
async fn test_missing_route_exits_with_route_missing() {
    let backend = seeded().await;
    let (result, _) = run(&state(&backend), Command::Flights { route: RouteId(99) }).await;

    let err = result.unwrap_err();
    assert!(matches!(err, AppError::RouteMissing(RouteId(99))));
    assert_eq!(err.exit_code(), 4);
}

#[tokio::test]
async fn test_seat_map_marks_booked_seats() {
    let backend = seeded().await;
    let (result, text) = run(
        &state(&backend),
        Command::Seats {
            route: RouteId(3),
            flight: FlightId(11),
        },
    )
    .await;

    result.unwrap();
    assert!(text.contains("12Cx"));
    assert!(text.contains("2 of 3 seats available"));
}

#[tokio::test]
async fn test_book_then_pay_flow() {
    let backend = seeded().await;
    let state = state(&backend);

    let (result, text) = run(
        &state,
        Command::Book {
            route: RouteId(3),
            flight: FlightId(11),
            seats: vec!["12A".to_string(), "12B".to_string(), "12C".to_string()],
        },
    )
    .await;
    result.unwrap();
    assert!(text.contains("Seat 12C is already booked; skipped."));
    assert!(text.contains("Total: 2 seats × ₹5000 = ₹10000"));
    assert!(text.contains("skyport pending"));

    let booking_id = backend.bookings().await[0].id;
    let (result, text) = run(&state, Command::Pending).await;
    result.unwrap();
    assert!(text.contains(&format!("#{}", booking_id)));
    assert!(text.contains("= ₹10000"));

    let (result, text) = run(
        &state,
        Command::Pay {
            booking: booking_id,
            method: PaymentMethod::Upi,
        },
    )
    .await;
    result.unwrap();
    assert!(text.contains("Payment of ₹10000"));
    assert!(text.contains("0 booking(s) still awaiting payment."));
    assert_eq!(backend.bookings().await[0].status, BookingStatus::Confirmed);
}

#[tokio::test]
async fn test_book_with_repeated_seats_books_each_once() {
    let backend = seeded().await;
    let (result, text) = run(
        &state(&backend),
        Command::Book {
            route: RouteId(3),
            flight: FlightId(11),
            seats: vec!["12A".to_string(), "12B".to_string(), "12A".to_string()],
        },
    )
    .await;

    result.unwrap();
    assert!(text.contains("Selected seats: 12A, 12B"));
    assert!(text.contains("Total: 2 seats × ₹5000 = ₹10000"));
    assert_eq!(backend.calls(Endpoint::CreateBooking).await, 1);
    assert_eq!(
        backend.bookings().await[0].seat_numbers(),
        ["12A".to_string(), "12B".to_string()]
    );
}

#[tokio::test]
async fn test_book_same_seat_twice_still_books_it() {
    let backend = seeded().await;
    let (result, _) = run(
        &state(&backend),
        Command::Book {
            route: RouteId(3),
            flight: FlightId(11),
            seats: vec!["12A".to_string(), "12A".to_string()],
        },
    )
    .await;

    result.unwrap();
    assert_eq!(backend.bookings().await[0].seat_numbers(), ["12A".to_string()]);
}

#[tokio::test]
async fn test_book_with_only_booked_seats_is_a_validation_error() {
    let backend = seeded().await;
    let (result, _) = run(
        &state(&backend),
        Command::Book {
            route: RouteId(3),
            flight: FlightId(11),
            seats: vec!["12C".to_string()],
        },
    )
    .await;

    let err = result.unwrap_err();
    assert!(matches!(err, AppError::Core(CoreError::ValidationError(_))));
    assert_eq!(backend.calls(Endpoint::CreateBooking).await, 0);
}

#[tokio::test]
async fn test_paying_unknown_booking_is_rejected() {
    let backend = seeded().await;
    let (result, _) = run(
        &state(&backend),
        Command::Pay {
            booking: BookingId(77),
            method: PaymentMethod::CreditCard,
        },
    )
    .await;

    assert_eq!(result.unwrap_err().exit_code(), 2);
    assert_eq!(backend.calls(Endpoint::CreatePayment).await, 0);
}

#[tokio::test]
async fn test_anonymous_session_routes_to_sign_in() {
    let backend = seeded().await;
    let state = AppState::new(Arc::new(backend.clone()), Session::anonymous(), dec!(2500));

    let (result, _) = run(&state, Command::Pending).await;

    let err = result.unwrap_err();
    assert_eq!(err.exit_code(), 3);
    assert!(err.hint().unwrap().contains("Sign in again"));
    assert_eq!(backend.calls(Endpoint::ListBookings).await, 0);
}

#[tokio::test]
async fn test_owner_flights_without_airline() {
    let backend = seeded().await;
    let (result, text) = run(
        &state(&backend),
        Command::Owner {
            command: OwnerCommand::Flights,
        },
    )
    .await;

    result.unwrap();
    assert!(text.contains("create an airline first"));
    assert!(text.contains("[3] Chennai → Delhi (₹5000)"));
}

#[tokio::test]
async fn test_owner_bookings_expands_one_flight() {
    let backend = seeded().await;
    let mut booking: Booking =
        fixtures::booking(41, FlightId(11), &["12A"], BookingStatus::Pending);
    booking.passenger_name = Some("Asha".to_string());
    backend
        .insert_owner_flight(OwnerFlight {
            flight_id: FlightId(11),
            flight_number: "6E101".to_string(),
            airline_name: "IndiGo".to_string(),
            source: "Chennai".to_string(),
            destination: "Delhi".to_string(),
            departure_time: None,
            arrival_time: None,
            total_seats: 4,
            bookings: vec![booking],
        })
        .await;

    let (result, text) = run(
        &state(&backend),
        Command::Owner {
            command: OwnerCommand::Bookings {
                expand: Some(FlightId(11)),
            },
        },
    )
    .await;

    result.unwrap();
    assert!(text.contains("Bookings: 1 (1 pending, 0 confirmed, 0 cancelled)  25% full"));
    assert!(text.contains("#41 Asha"));
}
