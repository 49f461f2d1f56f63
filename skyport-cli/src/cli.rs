use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use skyport_shared::models::timestamp;
use skyport_shared::{BookingId, FlightId, PaymentMethod, RouteId};

#[derive(Parser, Debug)]
#[command(name = "skyport", author, version, about = "Book flights and manage an airline fleet", long_about = None)]
pub struct Cli {
    /// Bearer token; overrides `session.token` from configuration
    #[arg(long, global = true)]
    pub token: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show a route and the flights operating it
    Flights {
        route: RouteId,
    },

    /// Show the seat map of a flight on a route
    Seats {
        #[arg(long)]
        route: RouteId,
        #[arg(long)]
        flight: FlightId,
    },

    /// Select seats on a flight and book them
    Book {
        #[arg(long)]
        route: RouteId,
        #[arg(long)]
        flight: FlightId,
        /// Seat to select; repeat for several seats
        #[arg(long = "seat", required = true)]
        seats: Vec<String>,
    },

    /// List bookings awaiting payment
    Pending,

    /// Pay for a pending booking
    Pay {
        booking: BookingId,
        /// credit-card, debit-card or upi
        #[arg(long, default_value = "credit-card")]
        method: PaymentMethod,
    },

    /// Flight-owner pages
    Owner {
        #[command(subcommand)]
        command: OwnerCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum OwnerCommand {
    /// List the fleet and the available routes
    Flights,

    /// Add a flight to your airline
    AddFlight {
        #[arg(long)]
        number: String,
        #[arg(long)]
        route: RouteId,
        #[arg(long)]
        seats: u32,
        /// e.g. 2025-03-01T06:30
        #[arg(long, value_parser = parse_time)]
        departure: DateTime<Utc>,
        #[arg(long, value_parser = parse_time)]
        arrival: DateTime<Utc>,
    },

    /// Bookings per flight
    Bookings {
        /// Show the passenger list of this flight
        #[arg(long)]
        expand: Option<FlightId>,
    },
}

fn parse_time(raw: &str) -> Result<DateTime<Utc>, String> {
    timestamp::parse(raw).ok_or_else(|| format!("invalid date-time `{}`", raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_book_collects_repeated_seats() {
        let cli = Cli::try_parse_from([
            "skyport", "book", "--route", "3", "--flight", "11", "--seat", "12A", "--seat", "12B",
        ])
        .unwrap();

        match cli.command {
            Command::Book { route, flight, seats } => {
                assert_eq!(route, RouteId(3));
                assert_eq!(flight, FlightId(11));
                assert_eq!(seats, vec!["12A".to_string(), "12B".to_string()]);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_pay_method_and_global_token() {
        let cli = Cli::try_parse_from(["skyport", "pay", "41", "--method", "upi", "--token", "abc"])
            .unwrap();
        assert_eq!(cli.token.as_deref(), Some("abc"));
        assert!(matches!(
            cli.command,
            Command::Pay { booking: BookingId(41), method: PaymentMethod::Upi }
        ));

        assert!(Cli::try_parse_from(["skyport", "pay", "41", "--method", "cash"]).is_err());
    }

    #[test]
    fn test_add_flight_parses_times() {
        let cli = Cli::try_parse_from([
            "skyport",
            "owner",
            "add-flight",
            "--number",
            "6E777",
            "--route",
            "3",
            "--seats",
            "180",
            "--departure",
            "2025-03-01T06:30",
            "--arrival",
            "2025-03-01T09:15:00Z",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Command::Owner { command: OwnerCommand::AddFlight { seats: 180, .. } }
        ));
    }
}
