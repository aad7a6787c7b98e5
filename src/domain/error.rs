//! Validation errors raised when pricing inputs violate domain invariants.

use rust_decimal::Decimal;
use thiserror::Error;

/// Input rejected by a value object constructor or by the pricing calculator.
///
/// Every variant carries a stable reason code (see [`ValidationError::code`])
/// that callers surface to the user unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A listed price or payout was below zero.
    #[error("{field} must not be negative, got {amount}")]
    NegativeAmount {
        field: &'static str,
        amount: Decimal,
    },

    /// Regular VAT with the refund included needs the buyer's country rate.
    #[error("buyer country VAT rate is required when the VAT refund is included")]
    MissingVatRate,

    /// A VAT rate outside `[0, 100)`.
    #[error("{field} must be within [0, 100), got {rate}")]
    RateOutOfRange {
        field: &'static str,
        rate: Decimal,
    },

    /// An amount whose magnitude exceeds [`MAX_AMOUNT`](crate::domain::value_objects::MAX_AMOUNT).
    #[error("{field} exceeds the maximum of {max}, got {amount}", max = crate::domain::value_objects::MAX_AMOUNT)]
    AmountTooLarge {
        field: &'static str,
        amount: Decimal,
    },

    /// Text that does not normalise to a number with at most two decimals.
    #[error("{field} is not a valid amount: {input:?}")]
    MalformedAmount {
        field: &'static str,
        input: String,
    },
}

impl ValidationError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::NegativeAmount { .. } => "negative_amount",
            Self::MissingVatRate => "missing_vat_rate",
            Self::RateOutOfRange { .. } => "rate_out_of_range",
            Self::AmountTooLarge { .. } => "amount_too_large",
            Self::MalformedAmount { .. } => "malformed_amount",
        }
    }

    /// Name of the offending input field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::NegativeAmount { field, .. }
            | Self::RateOutOfRange { field, .. }
            | Self::AmountTooLarge { field, .. }
            | Self::MalformedAmount { field, .. } => field,
            Self::MissingVatRate => "buyer_country_vat_rate",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn codes_are_stable() {
        let negative = ValidationError::NegativeAmount { field: "seller_payout", amount: dec!(-5) };
        assert_eq!(negative.code(), "negative_amount");
        assert_eq!(negative.field(), "seller_payout");
        assert_eq!(ValidationError::MissingVatRate.code(), "missing_vat_rate");
        assert_eq!(ValidationError::MissingVatRate.field(), "buyer_country_vat_rate");
    }

    #[test]
    fn display_names_the_field() {
        let err = ValidationError::RateOutOfRange { field: "seller_vat_rate", rate: dec!(100) };
        assert_eq!(err.to_string(), "seller_vat_rate must be within [0, 100), got 100");
        let err = ValidationError::AmountTooLarge { field: "listed_price", amount: dec!(2000000000) };
        assert_eq!(err.code(), "amount_too_large");
        assert_eq!(err.to_string(), "listed_price exceeds the maximum of 1000000000, got 2000000000");
    }
}
