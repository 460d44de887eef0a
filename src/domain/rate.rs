use rust_decimal::Decimal;
use serde::Serialize;

/// Price of one unit of the settlement asset in fiat, e.g. 1 XLM = 858.42 NGN.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExchangeRate {
    /// Fiat currency code.
    pub from: String,
    /// Settlement asset code.
    pub to: String,
    pub rate: Decimal,
}

/// Stellar amounts carry seven decimal places.
pub const ASSET_DECIMAL_PLACES: u32 = 7;

impl ExchangeRate {
    /// Fiat value of `asset_amount` at this rate. `None` on overflow.
    pub fn to_fiat(&self, asset_amount: Decimal) -> Option<Decimal> {
        asset_amount.checked_mul(self.rate)
    }

    /// Asset amount worth `fiat_amount`, rounded to asset precision.
    /// `None` on overflow or a zero rate.
    pub fn to_asset(&self, fiat_amount: Decimal) -> Option<Decimal> {
        fiat_amount
            .checked_div(self.rate)
            .map(|amount| amount.round_dp(ASSET_DECIMAL_PLACES))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn ngn_xlm() -> ExchangeRate {
        ExchangeRate {
            from: "NGN".to_string(),
            to: "XLM".to_string(),
            rate: dec!(858.42),
        }
    }

    #[test]
    fn test_conversions() {
        let rate = ngn_xlm();
        assert_eq!(rate.to_fiat(dec!(145.67)), Some(dec!(125046.0414)));
        assert_eq!(rate.to_asset(dec!(125000)), Some(dec!(145.6163649)));
    }

    #[test]
    fn test_conversions_overflow_to_none() {
        let rate = ngn_xlm();
        assert_eq!(rate.to_fiat(Decimal::MAX), None);

        let tiny = ExchangeRate {
            rate: dec!(0.0000000000000000000000001),
            ..ngn_xlm()
        };
        assert_eq!(tiny.to_asset(dec!(125000)), None);
    }
}
