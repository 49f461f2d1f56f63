use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::BookingId;

/// Payment method label. Passed through to the backend as-is; there is no
/// method-specific validation on the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[default]
    #[serde(rename = "Credit Card")]
    CreditCard,
    #[serde(rename = "Debit Card")]
    DebitCard,
    #[serde(rename = "UPI")]
    Upi,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 3] = [
        PaymentMethod::CreditCard,
        PaymentMethod::DebitCard,
        PaymentMethod::Upi,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::CreditCard => "Credit Card",
            PaymentMethod::DebitCard => "Debit Card",
            PaymentMethod::Upi => "UPI",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match normalized.as_str() {
            "creditcard" | "credit" => Ok(PaymentMethod::CreditCard),
            "debitcard" | "debit" => Ok(PaymentMethod::DebitCard),
            "upi" => Ok(PaymentMethod::Upi),
            _ => Err(format!(
                "unknown payment method `{}` (expected credit-card, debit-card or upi)",
                s
            )),
        }
    }
}

/// Payload for `POST Payments`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub booking_id: BookingId,
    pub payment_method: PaymentMethod,
}

/// Whatever the payment endpoint chose to echo back. Every field is optional;
/// an empty response body maps to `PaymentReceipt::default()`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentReceipt {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub booking_id: Option<BookingId>,
    #[serde(default)]
    pub amount: Option<Decimal>,
    #[serde(default, alias = "paymentStatus")]
    pub status: Option<String>,
    #[serde(default)]
    pub payment_method: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_method_wire_labels() {
        let req = PaymentRequest {
            booking_id: BookingId(41),
            payment_method: PaymentMethod::Upi,
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value, serde_json::json!({"bookingId": 41, "paymentMethod": "UPI"}));
        assert_eq!(
            serde_json::to_string(&PaymentMethod::DebitCard).unwrap(),
            "\"Debit Card\""
        );
    }

    #[test]
    fn test_payment_method_parsing() {
        assert_eq!("credit-card".parse::<PaymentMethod>(), Ok(PaymentMethod::CreditCard));
        assert_eq!("Debit Card".parse::<PaymentMethod>(), Ok(PaymentMethod::DebitCard));
        assert_eq!("upi".parse::<PaymentMethod>(), Ok(PaymentMethod::Upi));
        assert!("cash".parse::<PaymentMethod>().is_err());
    }

    #[test]
    fn test_receipt_tolerates_sparse_bodies() {
        let receipt: PaymentReceipt = serde_json::from_str(r#"{"bookingId": 41}"#).unwrap();
        assert_eq!(receipt.booking_id, Some(BookingId(41)));
        assert_eq!(receipt.amount, None);
    }
}
