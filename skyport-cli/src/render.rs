//! Plain-text views of each page.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::io::{self, Write};

use skyport_catalog::{FareQuote, FleetOverview, RouteListing, SeatSelection, SeatState};
use skyport_order::{BookingConfirmation, FlightBookings, OwnerBoard, PendingBooking};
use skyport_shared::{Booking, Flight, PaymentReceipt, Route};

pub fn time(value: Option<DateTime<Utc>>) -> String {
    value
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

pub fn money(amount: Decimal) -> String {
    format!("₹{}", amount.normalize())
}

fn fare(route: &Route) -> String {
    match route.fare {
        Some(fare) if !fare.is_zero() => money(fare),
        _ => "fare unavailable".to_string(),
    }
}

pub fn route_header(out: &mut impl Write, route: &Route) -> io::Result<()> {
    writeln!(out, "{} → {}", route.source, route.destination)?;
    writeln!(out, "Base fare per seat: {}", fare(route))?;
    if let (Some(check_in), Some(cabin)) = (route.baggage_check_in_kg, route.cabin_bag_kg) {
        writeln!(out, "Baggage: {}kg + {}kg cabin", check_in, cabin)?;
    }
    Ok(())
}

fn flight_line(out: &mut impl Write, flight: &Flight) -> io::Result<()> {
    writeln!(
        out,
        "  [{}] {:<8} {:<16} departs {}  arrives {}  {} seats",
        flight.id,
        flight.flight_number,
        flight.airline_name,
        time(flight.departure_time),
        time(flight.arrival_time),
        flight.total_seats
    )
}

pub fn route_listing(out: &mut impl Write, listing: &RouteListing) -> io::Result<()> {
    route_header(out, &listing.route)?;
    writeln!(out)?;

    if let Some(err) = &listing.flights_error {
        writeln!(out, "Flights are unavailable right now: {}", err)?;
        writeln!(out, "Retry, or go back to the route list.")?;
        return Ok(());
    }
    if listing.flights.is_empty() {
        writeln!(out, "No flights are scheduled on this route.")?;
        return Ok(());
    }

    writeln!(out, "Available flights:")?;
    for flight in &listing.flights {
        flight_line(out, flight)?;
    }
    Ok(())
}

pub fn seat_map(out: &mut impl Write, selection: &SeatSelection, route: &Route) -> io::Result<()> {
    if let Some(flight) = selection.open_flight() {
        writeln!(out, "Seats on {} ({} → {})", flight.flight_number, route.source, route.destination)?;
    }

    let cells: Vec<String> = selection
        .seats()
        .iter()
        .map(|seat| match selection.seat_state(seat) {
            SeatState::Available => format!(" {} ", seat.seat_number),
            SeatState::Selected => format!("[{}]", seat.seat_number),
            SeatState::Booked => format!(" {}x", seat.seat_number),
        })
        .collect();
    for row in cells.chunks(6) {
        writeln!(out, "  {}", row.join(" "))?;
    }

    let open = selection
        .seats()
        .iter()
        .filter(|seat| !seat.is_booked)
        .count();
    writeln!(out, "{} of {} seats available (x = booked)", open, selection.seats().len())?;
    writeln!(out, "Fare per seat: {}", fare(route))
}

pub fn selection_summary(out: &mut impl Write, selection: &SeatSelection, quote: &FareQuote) -> io::Result<()> {
    writeln!(out, "Selected seats: {}", selection.selected().join(", "))?;
    writeln!(out, "Total: {}", quote)
}

pub fn booking_confirmation(out: &mut impl Write, confirmation: &BookingConfirmation) -> io::Result<()> {
    match &confirmation.booking {
        Some(booking) => writeln!(out, "Booking {} successful!", booking.id)?,
        None => writeln!(out, "Booking successful!")?,
    }
    writeln!(out, "Seats {} on flight {} are held pending payment.", confirmation.seat_numbers.join(", "), confirmation.flight_id)?;
    writeln!(out, "Next: run `skyport pending` to review and pay.")
}

pub fn pending_bookings(out: &mut impl Write, pending: &[PendingBooking]) -> io::Result<()> {
    if pending.is_empty() {
        return writeln!(out, "No bookings are awaiting payment.");
    }

    writeln!(out, "Bookings awaiting payment:")?;
    for item in pending {
        let booking = &item.booking;
        writeln!(
            out,
            "  #{} {} {} → {}  seats: {}",
            booking.id,
            booking.flight_number.as_deref().unwrap_or("-"),
            booking.source.as_deref().unwrap_or("?"),
            booking.destination.as_deref().unwrap_or("?"),
            seats(booking)
        )?;
        writeln!(
            out,
            "      {} × {} = {}  ({})",
            item.seat_count(),
            money(item.fare),
            money(item.total_amount()),
            item.fare_source
        )?;
    }
    Ok(())
}

fn seats(booking: &Booking) -> String {
    if booking.seat_numbers().is_empty() {
        "-".to_string()
    } else {
        booking.seat_numbers().join(", ")
    }
}

pub fn payment_receipt(
    out: &mut impl Write,
    paid: &PendingBooking,
    receipt: &PaymentReceipt,
    remaining: usize,
) -> io::Result<()> {
    let amount = receipt.amount.unwrap_or_else(|| paid.total_amount());
    writeln!(out, "Payment of {} for booking {} submitted.", money(amount), paid.booking.id)?;
    if let Some(status) = &receipt.status {
        writeln!(out, "Status: {}", status)?;
    }
    writeln!(out, "{} booking(s) still awaiting payment.", remaining)
}

/// Endpoints the flight advertises, else those of its route.
fn fleet_route(overview: &FleetOverview, flight: &Flight) -> String {
    if let (Some(source), Some(destination)) = (&flight.source, &flight.destination) {
        return format!("{} → {}", source, destination);
    }
    overview
        .route_for(flight)
        .map(|r| format!("{} → {}", r.source, r.destination))
        .unwrap_or_else(|| "unknown route".to_string())
}

pub fn fleet(out: &mut impl Write, overview: &FleetOverview) -> io::Result<()> {
    match &overview.airline {
        Some(airline) => writeln!(out, "Airline: {}", airline.airline_name)?,
        None => writeln!(
            out,
            "You need to create an airline first before managing flights."
        )?,
    }

    writeln!(out, "Flights:")?;
    if overview.flights.is_empty() {
        writeln!(out, "  none")?;
    }
    for flight in &overview.flights {
        let route = fleet_route(overview, flight);
        writeln!(
            out,
            "  [{}] {:<8} {}  departs {}  {} seats",
            flight.id,
            flight.flight_number,
            route,
            time(flight.departure_time),
            flight.total_seats
        )?;
    }

    writeln!(out, "Routes:")?;
    for route in &overview.routes {
        writeln!(out, "  [{}] {} → {} ({})", route.id, route.source, route.destination, fare(route))?;
    }
    Ok(())
}

fn owner_flight_line(out: &mut impl Write, row: &FlightBookings, expanded: bool) -> io::Result<()> {
    let occupancy = row
        .occupancy()
        .map(|o| format!("{:.0}% full", o * 100.0))
        .unwrap_or_else(|| "capacity unknown".to_string());
    writeln!(
        out,
        "{} {} - {} → {}  Bookings: {} ({} pending, {} confirmed, {} cancelled)  {}",
        if expanded { "v" } else { ">" },
        row.flight.flight_number,
        row.flight.source,
        row.flight.destination,
        row.tally.total(),
        row.tally.pending,
        row.tally.confirmed,
        row.tally.cancelled,
        occupancy
    )
}

fn owner_flight_details(out: &mut impl Write, row: &FlightBookings) -> io::Result<()> {
    let flight = &row.flight;
    writeln!(out, "    Airline: {}", flight.airline_name)?;
    writeln!(out, "    Departure: {}", time(flight.departure_time))?;
    writeln!(out, "    Arrival: {}", time(flight.arrival_time))?;
    writeln!(out, "    Total Seats: {}", flight.total_seats)?;

    if flight.bookings.is_empty() {
        return writeln!(out, "    No bookings for this flight.");
    }
    for booking in &flight.bookings {
        let contact = booking
            .passenger_email
            .as_ref()
            .or(booking.passenger_phone.as_ref())
            .map(|c| c.expose().as_str())
            .unwrap_or("-");
        writeln!(
            out,
            "    #{} {} <{}> {} seats: {} booked {}",
            booking.id,
            booking.passenger_name.as_deref().unwrap_or("-"),
            contact,
            booking.status,
            seats(booking),
            time(booking.booking_date)
        )?;
    }
    Ok(())
}

pub fn owner_board(out: &mut impl Write, board: &OwnerBoard) -> io::Result<()> {
    if board.flights().is_empty() {
        return writeln!(out, "You have no flights or bookings yet.");
    }

    for row in board.flights() {
        let expanded = board.is_expanded(row.flight.flight_id);
        owner_flight_line(out, row, expanded)?;
        if expanded {
            owner_flight_details(out, row)?;
        }
    }

    let totals = board.totals();
    writeln!(out, "Seats held across all flights: {}", totals.seats_held)
}
