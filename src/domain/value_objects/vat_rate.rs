//! VAT rate value object: a percentage in `[0, 100)`.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::error::ValidationError;

const HUNDRED: Decimal = dec!(100);

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct VatRate(Decimal);

impl VatRate {
    pub fn new(field: &'static str, percent: Decimal) -> Result<Self, ValidationError> {
        if percent < Decimal::ZERO || percent >= HUNDRED {
            return Err(ValidationError::RateOutOfRange { field, rate: percent });
        }
        Ok(Self(percent.normalize()))
    }

    /// Parses `"21"`, `"21%"` or `"25,5"`.
    pub fn parse(field: &'static str, input: &str) -> Result<Self, ValidationError> {
        let text = input.trim();
        let text = text.strip_suffix('%').unwrap_or(text).trim_end();
        let percent = Decimal::from_str(&text.replacen(',', ".", 1))
            .map_err(|_| ValidationError::MalformedAmount { field, input: input.to_string() })?;
        Self::new(field, percent)
    }

    /// Table entries are known to be in range.
    pub(crate) const fn standard(percent: Decimal) -> Self { Self(percent) }

    pub fn percent(&self) -> Decimal { self.0 }

    /// The rate as a multiplier, e.g. 21% -> 0.21.
    pub fn fraction(&self) -> Decimal { self.0 / HUNDRED }

    pub fn is_zero(&self) -> bool { self.0.is_zero() }
}

impl fmt::Display for VatRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}%", self.0) }
}

impl TryFrom<Decimal> for VatRate {
    type Error = ValidationError;
    fn try_from(percent: Decimal) -> Result<Self, Self::Error> { Self::new("vat_rate", percent) }
}

impl From<VatRate> for Decimal {
    fn from(rate: VatRate) -> Decimal { rate.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_is_half_open() {
        assert!(VatRate::new("vat_rate", dec!(0)).is_ok());
        assert!(VatRate::new("vat_rate", dec!(99.99)).is_ok());
        let err = VatRate::new("buyer_country_vat_rate", dec!(100)).unwrap_err();
        assert_eq!(err.code(), "rate_out_of_range");
        assert_eq!(err.field(), "buyer_country_vat_rate");
        assert!(VatRate::new("vat_rate", dec!(-0.5)).is_err());
    }

    #[test]
    fn test_parse_variants() {
        assert_eq!(VatRate::parse("vat_rate", "21").unwrap().percent(), dec!(21));
        assert_eq!(VatRate::parse("vat_rate", " 21 % ").unwrap().percent(), dec!(21));
        assert_eq!(VatRate::parse("vat_rate", "25,5").unwrap().percent(), dec!(25.5));
        assert_eq!(VatRate::parse("vat_rate", "abc").unwrap_err().code(), "malformed_amount");
        assert_eq!(VatRate::parse("vat_rate", "150").unwrap_err().code(), "rate_out_of_range");
    }

    #[test]
    fn test_fraction_and_display() {
        let rate = VatRate::new("vat_rate", dec!(21.00)).unwrap();
        assert_eq!(rate.fraction(), dec!(0.21));
        assert_eq!(rate.to_string(), "21%");
    }

    #[test]
    fn test_deserialize_validates() {
        assert!(serde_json::from_str::<VatRate>("\"27\"").is_ok());
        assert!(serde_json::from_str::<VatRate>("\"100\"").is_err());
    }
}
