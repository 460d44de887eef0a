use crate::error::FlowError;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A strictly positive monetary amount.
///
/// Used both for fiat invoice totals and for settlement amounts in the
/// settlement asset. Zero and negative values cannot be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Result<Self, FlowError> {
        if value > Decimal::ZERO {
            Ok(Self(value))
        } else {
            Err(FlowError::InvalidAmount(format!(
                "{value} is not a positive amount"
            )))
        }
    }

    /// Parses user input such as `" 145.67 "` into a positive amount.
    pub fn parse(input: &str) -> Result<Self, FlowError> {
        let trimmed = input.trim();
        let value = Decimal::from_str(trimmed)
            .map_err(|_| FlowError::InvalidAmount(format!("'{trimmed}' is not a decimal")))?;
        Self::new(value)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = FlowError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// The invoice being paid. Read-only for the payment flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub number: String,
    /// Total in fiat, expressed in `currency`.
    pub amount: Amount,
    /// ISO code of the fiat currency, e.g. `NGN`.
    pub currency: String,
    pub client: String,
    pub due_date: NaiveDate,
    /// Tax identifier. Opaque to the flow.
    pub gst_number: String,
    pub description: String,
}

impl Invoice {
    /// Memo attached to the transfer settling this invoice.
    pub fn transfer_memo(&self) -> String {
        format!("Invoice {}", self.number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_amount_validation() {
        assert!(Amount::new(dec!(0.00001)).is_ok());
        assert!(matches!(
            Amount::new(dec!(0)),
            Err(FlowError::InvalidAmount(_))
        ));
        assert!(matches!(
            Amount::new(dec!(-1.0)),
            Err(FlowError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_amount_parse() {
        assert_eq!(Amount::parse(" 145.67 ").unwrap().value(), dec!(145.67));
        assert!(matches!(
            Amount::parse("-5"),
            Err(FlowError::InvalidAmount(_))
        ));
        assert!(matches!(
            Amount::parse("abc"),
            Err(FlowError::InvalidAmount(_))
        ));
        assert!(matches!(Amount::parse(""), Err(FlowError::InvalidAmount(_))));
    }

    #[test]
    fn test_amount_deserialization_rejects_zero() {
        let ok: Amount = serde_json::from_str("\"12.5\"").unwrap();
        assert_eq!(ok.value(), dec!(12.5));
        assert!(serde_json::from_str::<Amount>("\"0\"").is_err());
    }

    #[test]
    fn test_transfer_memo() {
        let invoice = Invoice {
            number: "INV-001".to_string(),
            amount: Amount::new(dec!(125000)).unwrap(),
            currency: "NGN".to_string(),
            client: "Techpoint Africa".to_string(),
            due_date: NaiveDate::from_ymd_opt(2024, 1, 30).unwrap(),
            gst_number: "12ABCDE1234F1Z5".to_string(),
            description: "Software Development Services".to_string(),
        };
        assert_eq!(invoice.transfer_memo(), "Invoice INV-001");
    }
}
