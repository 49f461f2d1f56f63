use std::io::Write;

use skyport_catalog::{FlightForm, RouteListing, RouteLoad, SeatSelection, Toggle};
use skyport_order::OwnerBoard;
use skyport_shared::{BookingId, FlightId, PaymentMethod, RouteId};

use crate::cli::{Command, OwnerCommand};
use crate::error::AppError;
use crate::render;
use crate::state::AppState;

pub async fn execute<W: Write>(state: &AppState, command: Command, out: &mut W) -> Result<(), AppError> {
    match command {
        Command::Flights { route } => flights(state, route, out).await,
        Command::Seats { route, flight } => seats(state, route, flight, out).await,
        Command::Book {
            route,
            flight,
            seats,
        } => book(state, route, flight, &seats, out).await,
        Command::Pending => pending(state, out).await,
        Command::Pay { booking, method } => pay(state, booking, method, out).await,
        Command::Owner { command } => owner(state, command, out).await,
    }
}

async fn load_route(state: &AppState, route_id: RouteId) -> Result<RouteListing, AppError> {
    match state.route_loader().load(&state.session, route_id).await? {
        RouteLoad::Found(listing) => Ok(listing),
        RouteLoad::Missing { .. } => Err(AppError::RouteMissing(route_id)),
    }
}

async fn flights<W: Write>(state: &AppState, route_id: RouteId, out: &mut W) -> Result<(), AppError> {
    let listing = load_route(state, route_id).await?;
    render::route_listing(out, &listing)?;
    Ok(())
}

async fn open_seats(state: &AppState, listing: &RouteListing, flight_id: FlightId) -> Result<SeatSelection, AppError> {
    let mut selection = SeatSelection::new();
    selection
        .open_seats_for(state.seats.as_ref(), &state.session, &listing.flights, flight_id)
        .await?;
    Ok(selection)
}

async fn seats<W: Write>(
    state: &AppState,
    route_id: RouteId,
    flight_id: FlightId,
    out: &mut W,
) -> Result<(), AppError> {
    let listing = load_route(state, route_id).await?;
    let selection = open_seats(state, &listing, flight_id).await?;
    render::seat_map(out, &selection, &listing.route)?;
    Ok(())
}

async fn book<W: Write>(
    state: &AppState,
    route_id: RouteId,
    flight_id: FlightId,
    seats: &[String],
    out: &mut W,
) -> Result<(), AppError> {
    let listing = load_route(state, route_id).await?;
    let mut selection = open_seats(state, &listing, flight_id).await?;

    for seat in seats {
        let seat = seat.trim();
        // Repeating a seat on the command line must not deselect it.
        if selection.is_selected(seat) {
            continue;
        }
        if selection.toggle(seat) == Toggle::Ignored {
            match selection.seat(seat) {
                Some(_) => writeln!(out, "Seat {} is already booked; skipped.", seat)?,
                None => writeln!(out, "Seat {} is not on this flight; skipped.", seat)?,
            }
        }
    }

    render::selection_summary(out, &selection, &selection.quote(Some(&listing.route)))?;
    let confirmation = state
        .booking_desk()
        .submit(&state.session, &selection, flight_id)
        .await?;
    render::booking_confirmation(out, &confirmation)?;
    Ok(())
}

async fn pending<W: Write>(state: &AppState, out: &mut W) -> Result<(), AppError> {
    let mut desk = state.payment_desk();
    let pending = desk.load_pending(&state.session).await?;
    render::pending_bookings(out, pending)?;
    Ok(())
}

async fn pay<W: Write>(
    state: &AppState,
    booking_id: BookingId,
    method: PaymentMethod,
    out: &mut W,
) -> Result<(), AppError> {
    let mut desk = state.payment_desk();
    desk.load_pending(&state.session).await?;

    let paid = desk
        .pending()
        .iter()
        .find(|p| p.booking.id == booking_id)
        .cloned();
    let receipt = desk.submit_payment(&state.session, booking_id, method).await?;

    if let Some(paid) = paid {
        render::payment_receipt(out, &paid, &receipt, desk.pending().len())?;
    }
    Ok(())
}

async fn owner<W: Write>(state: &AppState, command: OwnerCommand, out: &mut W) -> Result<(), AppError> {
    match command {
        OwnerCommand::Flights => {
            let overview = state.fleet_desk().overview(&state.session).await?;
            render::fleet(out, &overview)?;
        }
        OwnerCommand::AddFlight {
            number,
            route,
            seats,
            departure,
            arrival,
        } => {
            let desk = state.fleet_desk();
            let mut overview = desk.overview(&state.session).await?;
            let form = FlightForm {
                flight_number: number,
                route_id: Some(route),
                total_seats: Some(seats),
                departure: Some(departure),
                arrival: Some(arrival),
            };
            desk.add_flight(&state.session, &mut overview, &form).await?;
            writeln!(out, "Flight added successfully!")?;
            render::fleet(out, &overview)?;
        }
        OwnerCommand::Bookings { expand } => {
            let mut board = OwnerBoard::load(state.flights.as_ref(), &state.session).await?;
            if let Some(flight_id) = expand {
                board.toggle_expand(flight_id);
            }
            render::owner_board(out, &board)?;
        }
    }
    Ok(())
}
