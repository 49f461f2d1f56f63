use rust_decimal::Decimal;
use std::fmt;

/// Total fare for `seat_count` seats at `base_fare` each.
///
/// Absent or zero fares and empty selections price at zero; a missing fare is
/// a displayable state, never an error.
pub fn total_fare(base_fare: Option<Decimal>, seat_count: usize) -> Decimal {
    match base_fare {
        Some(fare) if !fare.is_zero() && seat_count > 0 => fare * Decimal::from(seat_count),
        _ => Decimal::ZERO,
    }
}

/// Amount due for a recorded booking. A booking without seat numbers is billed
/// as a single seat.
pub fn booking_amount(fare: Decimal, seat_count: usize) -> Decimal {
    total_fare(Some(fare), seat_count.max(1))
}

/// Fare snapshot for the current selection. Recomputed on every render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FareQuote {
    pub per_seat: Option<Decimal>,
    pub seats: usize,
}

impl FareQuote {
    pub fn new(per_seat: Option<Decimal>, seats: usize) -> Self {
        Self { per_seat, seats }
    }

    pub fn total(&self) -> Decimal {
        total_fare(self.per_seat, self.seats)
    }

    pub fn is_available(&self) -> bool {
        self.per_seat.is_some_and(|fare| !fare.is_zero())
    }
}

impl fmt::Display for FareQuote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.seats == 0 {
            return write!(f, "no seats selected");
        }
        match self.per_seat {
            Some(fare) if self.is_available() => write!(
                f,
                "{} seat{} × ₹{} = ₹{}",
                self.seats,
                if self.seats == 1 { "" } else { "s" },
                fare.normalize(),
                self.total().normalize()
            ),
            _ => write!(f, "fare unavailable"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_total_fare_multiplies() {
        for fare in [dec!(0), dec!(1), dec!(2500), dec!(4999.50)] {
            for seats in 0..5usize {
                assert_eq!(total_fare(Some(fare), seats), fare * Decimal::from(seats));
            }
        }
    }

    #[test]
    fn test_total_fare_edge_cases() {
        assert_eq!(total_fare(None, 3), Decimal::ZERO);
        assert_eq!(total_fare(Some(dec!(5000)), 0), Decimal::ZERO);
        assert_eq!(total_fare(Some(Decimal::ZERO), 2), Decimal::ZERO);
    }

    #[test]
    fn test_booking_amount_bills_at_least_one_seat() {
        assert_eq!(booking_amount(dec!(2500), 0), dec!(2500));
        assert_eq!(booking_amount(dec!(2500), 3), dec!(7500));
    }

    #[test]
    fn test_quote_display() {
        let quote = FareQuote::new(Some(dec!(5000)), 2);
        assert_eq!(quote.total(), dec!(10000));
        assert_eq!(quote.to_string(), "2 seats × ₹5000 = ₹10000");

        assert_eq!(FareQuote::new(Some(dec!(5000)), 1).to_string(), "1 seat × ₹5000 = ₹5000");

        let missing = FareQuote::new(None, 2);
        assert!(!missing.is_available());
        assert_eq!(missing.total(), Decimal::ZERO);
        assert_eq!(missing.to_string(), "fare unavailable");
    }

    #[test]
    fn test_empty_quote_display() {
        let empty = FareQuote::new(Some(dec!(5000)), 0);
        assert_eq!(empty.total(), Decimal::ZERO);
        assert_eq!(empty.to_string(), "no seats selected");
        assert_eq!(FareQuote::new(None, 0).to_string(), "no seats selected");
    }
}
