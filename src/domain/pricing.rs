//! VAT payout calculator.
//!
//! Pure functions shared by every pricing call site: single-line pricing for a
//! WTB order, the bulk pricing table and the payout auto-fill. Arithmetic is
//! exact decimal; only the VAT amount is inexact and it is rounded once to
//! cents, so `seller_payout_with_vat = seller_payout + vat_amount` and
//! `profit = listed_price - seller_payout_with_vat` hold exactly.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::error::ValidationError;
use crate::domain::value_objects::{Money, VatRate, MAX_AMOUNT};

/// How the seller accounts for VAT on the item.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VatTreatment {
    /// VAT-registered seller, VAT on the full sale.
    #[default]
    Regular,
    /// Second-hand margin scheme; the payout is already net.
    Margin,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PricingInputFields")]
pub struct PricingInput {
    pub listed_price: Money,
    pub treatment: VatTreatment,
    /// Only meaningful for [`VatTreatment::Regular`].
    pub refund_included: bool,
    pub seller_payout: Money,
    /// Required for Regular with the refund included, ignored otherwise.
    pub buyer_country_vat_rate: Option<VatRate>,
}

/// Wire form of [`PricingInput`], validated field by field so errors carry
/// the real field name.
#[derive(Deserialize)]
struct PricingInputFields {
    listed_price: Decimal,
    treatment: VatTreatment,
    #[serde(default)]
    refund_included: bool,
    seller_payout: Decimal,
    #[serde(default)]
    buyer_country_vat_rate: Option<Decimal>,
}

impl TryFrom<PricingInputFields> for PricingInput {
    type Error = ValidationError;

    fn try_from(fields: PricingInputFields) -> Result<Self, Self::Error> {
        Ok(Self {
            listed_price: Money::try_from_decimal("listed_price", fields.listed_price)?,
            treatment: fields.treatment,
            refund_included: fields.refund_included,
            seller_payout: Money::try_from_decimal("seller_payout", fields.seller_payout)?,
            buyer_country_vat_rate: fields
                .buyer_country_vat_rate
                .map(|percent| VatRate::new("buyer_country_vat_rate", percent))
                .transpose()?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingResult {
    pub vat_amount: Money,
    pub seller_payout_with_vat: Money,
    pub profit: Money,
    /// The buyer rate actually applied; `None` when no VAT was added.
    pub vat_rate: Option<VatRate>,
}

/// Computes the seller payout including VAT and the marketplace profit.
///
/// | treatment | refund | vat_amount              | profit                          |
/// |-----------|--------|-------------------------|---------------------------------|
/// | Margin    | any    | 0                       | listed - payout                 |
/// | Regular   | false  | 0                       | listed - payout                 |
/// | Regular   | true   | payout * buyer rate/100 | listed - (payout + vat_amount)  |
///
/// Negative profit is a valid result. Negative inputs, amounts above
/// [`MAX_AMOUNT`] and a missing buyer rate are rejected, never coerced.
pub fn compute_pricing(input: &PricingInput) -> Result<PricingResult, ValidationError> {
    let listed = input.listed_price.ensure_non_negative("listed_price")?.ensure_within_bounds("listed_price")?;
    let payout = input.seller_payout.ensure_non_negative("seller_payout")?.ensure_within_bounds("seller_payout")?;

    let applied_rate = match (input.treatment, input.refund_included) {
        (VatTreatment::Regular, true) => {
            Some(input.buyer_country_vat_rate.ok_or(ValidationError::MissingVatRate)?)
        }
        _ => None,
    };

    let vat_amount = match applied_rate {
        Some(rate) => Money::round_from(payout.amount() * rate.percent() / dec!(100)),
        None => Money::zero(),
    };
    let seller_payout_with_vat = payout + vat_amount;

    Ok(PricingResult {
        vat_amount,
        seller_payout_with_vat,
        profit: listed - seller_payout_with_vat,
        vat_rate: applied_rate,
    })
}

/// Back-calculates a payout from a VAT-inclusive listed price using the
/// seller's own rate: `listed / (1 + rate/100)`, rounded to cents.
pub fn suggest_payout(listed_price: Money, seller_vat_rate: VatRate) -> Result<Money, ValidationError> {
    let listed = listed_price.ensure_non_negative("listed_price")?.ensure_within_bounds("listed_price")?;
    Ok(Money::round_from(listed.amount() / (Decimal::ONE + seller_vat_rate.fraction())))
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkPricing {
    pub lines: Vec<PricingResult>,
    pub listed_price_total: Money,
    pub vat_amount_total: Money,
    pub seller_payout_with_vat_total: Money,
    pub profit_total: Money,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("line {index}: {source}")]
pub struct BulkPricingError {
    pub index: usize,
    #[source]
    pub source: ValidationError,
}

/// Prices every line and totals the results. The first invalid line aborts.
pub fn compute_bulk_pricing(inputs: &[PricingInput]) -> Result<BulkPricing, BulkPricingError> {
    let lines = inputs
        .iter()
        .enumerate()
        .map(|(index, input)| compute_pricing(input).map_err(|source| BulkPricingError { index, source }))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(BulkPricing {
        listed_price_total: inputs.iter().map(|i| i.listed_price).sum(),
        vat_amount_total: lines.iter().map(|l| l.vat_amount).sum(),
        seller_payout_with_vat_total: lines.iter().map(|l| l.seller_payout_with_vat).sum(),
        profit_total: lines.iter().map(|l| l.profit).sum(),
        lines,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn money(text: &str) -> Money { Money::parse("amount", text).unwrap() }
    fn rate(percent: Decimal) -> VatRate { VatRate::new("buyer_country_vat_rate", percent).unwrap() }

    fn input(listed: &str, payout: &str, treatment: VatTreatment, refund: bool, vat: Option<Decimal>) -> PricingInput {
        PricingInput {
            listed_price: money(listed),
            treatment,
            refund_included: refund,
            seller_payout: money(payout),
            buyer_country_vat_rate: vat.map(rate),
        }
    }

    #[test]
    fn test_regular_with_refund_rounds_vat_half_up() {
        let result = compute_pricing(&input("170.00", "140.50", VatTreatment::Regular, true, Some(dec!(21)))).unwrap();
        assert_eq!(result.vat_amount, money("29.51"));
        assert_eq!(result.seller_payout_with_vat, money("170.01"));
        assert_eq!(result.profit, money("-0.01"));
        assert_eq!(result.vat_rate, Some(rate(dec!(21))));
    }

    #[test]
    fn test_margin_scheme() {
        let result = compute_pricing(&input("220.00", "180.00", VatTreatment::Margin, false, None)).unwrap();
        assert!(result.vat_amount.is_zero());
        assert_eq!(result.seller_payout_with_vat, money("180.00"));
        assert_eq!(result.profit, money("40.00"));
        assert_eq!(result.vat_rate, None);
    }

    #[test]
    fn test_margin_ignores_refund_flag_and_rate() {
        let plain = compute_pricing(&input("220", "180", VatTreatment::Margin, false, None)).unwrap();
        let flagged = compute_pricing(&input("220", "180", VatTreatment::Margin, true, Some(dec!(21)))).unwrap();
        assert_eq!(plain, flagged);
    }

    #[test]
    fn test_regular_without_refund_matches_margin() {
        let grid = [("0", "0"), ("100", "150"), ("220.00", "180.00"), ("99.99", "0.01"), ("1234.56", "999.99")];
        for (listed, payout) in grid {
            let margin = compute_pricing(&input(listed, payout, VatTreatment::Margin, false, None)).unwrap();
            let regular = compute_pricing(&input(listed, payout, VatTreatment::Regular, false, Some(dec!(21)))).unwrap();
            assert_eq!(margin, regular, "{listed}/{payout}");
            assert_eq!(margin.profit, money(listed) - money(payout));
            assert!(margin.vat_amount.is_zero());
        }
    }

    #[test]
    fn test_negative_profit_is_not_an_error() {
        let result = compute_pricing(&input("100", "150", VatTreatment::Margin, false, None)).unwrap();
        assert_eq!(result.profit, money("-50"));
    }

    #[test]
    fn test_zero_payout_keeps_listed_price_as_profit() {
        for (treatment, refund) in [(VatTreatment::Margin, false), (VatTreatment::Regular, false), (VatTreatment::Regular, true)] {
            let result = compute_pricing(&input("170.00", "0", treatment, refund, Some(dec!(27)))).unwrap();
            assert!(result.vat_amount.is_zero());
            assert_eq!(result.profit, money("170.00"));
        }
    }

    #[test]
    fn test_zero_buyer_rate_adds_no_vat() {
        let result = compute_pricing(&input("170.00", "140.50", VatTreatment::Regular, true, Some(dec!(0)))).unwrap();
        assert!(result.vat_amount.is_zero());
        assert_eq!(result.profit, money("29.50"));
    }

    #[test]
    fn test_regular_refund_identities_hold() {
        let payouts = ["0.01", "0.50", "19.99", "140.50", "333.33", "1000.00"];
        let rates = [dec!(17), dec!(19), dec!(21), dec!(25.5), dec!(27), dec!(1)];
        for payout in payouts {
            for vat in rates {
                let result = compute_pricing(&input("1.00", payout, VatTreatment::Regular, true, Some(vat))).unwrap();
                let exact = money(payout).amount() * vat / dec!(100);
                assert_eq!(result.vat_amount, Money::round_from(exact));
                assert_eq!(result.seller_payout_with_vat, money(payout) + result.vat_amount);
                assert_eq!(result.profit, money("1.00") - result.seller_payout_with_vat);
            }
        }
    }

    #[test]
    fn test_identical_input_yields_identical_output() {
        let i = input("170.00", "140.50", VatTreatment::Regular, true, Some(dec!(21)));
        let first = compute_pricing(&i).unwrap();
        let second = compute_pricing(&i).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.profit.to_string(), second.profit.to_string());
    }

    #[test]
    fn test_negative_payout_rejected() {
        let err = compute_pricing(&input("100", "-5", VatTreatment::Margin, false, None)).unwrap_err();
        assert_eq!(err.code(), "negative_amount");
        assert_eq!(err.field(), "seller_payout");
    }

    #[test]
    fn test_negative_listed_price_rejected() {
        let err = compute_pricing(&input("-1", "5", VatTreatment::Regular, false, None)).unwrap_err();
        assert_eq!(err, ValidationError::NegativeAmount { field: "listed_price", amount: dec!(-1.00) });
    }

    #[test]
    fn test_missing_buyer_rate_rejected() {
        let err = compute_pricing(&input("170", "140.50", VatTreatment::Regular, true, None)).unwrap_err();
        assert_eq!(err, ValidationError::MissingVatRate);
        assert_eq!(err.code(), "missing_vat_rate");
    }

    #[test]
    fn test_suggest_payout() {
        let twenty_one = VatRate::new("seller_vat_rate", dec!(21)).unwrap();
        assert_eq!(suggest_payout(money("121.00"), twenty_one).unwrap(), money("100.00"));
        assert_eq!(suggest_payout(money("170.00"), twenty_one).unwrap(), money("140.50"));
        let zero = VatRate::new("seller_vat_rate", dec!(0)).unwrap();
        assert_eq!(suggest_payout(money("99.99"), zero).unwrap(), money("99.99"));
        assert_eq!(suggest_payout(money("-1"), twenty_one).unwrap_err().code(), "negative_amount");
    }

    #[test]
    fn test_bulk_pricing_totals() {
        let bulk = compute_bulk_pricing(&[
            input("170.00", "140.50", VatTreatment::Regular, true, Some(dec!(21))),
            input("220.00", "180.00", VatTreatment::Margin, false, None),
        ])
        .unwrap();
        assert_eq!(bulk.lines.len(), 2);
        assert_eq!(bulk.listed_price_total, money("390.00"));
        assert_eq!(bulk.vat_amount_total, money("29.51"));
        assert_eq!(bulk.seller_payout_with_vat_total, money("350.01"));
        assert_eq!(bulk.profit_total, money("39.99"));
    }

    #[test]
    fn test_bulk_pricing_reports_failing_line() {
        let err = compute_bulk_pricing(&[
            input("220.00", "180.00", VatTreatment::Margin, false, None),
            input("170.00", "140.50", VatTreatment::Regular, true, None),
        ])
        .unwrap_err();
        assert_eq!(err.index, 1);
        assert_eq!(err.source, ValidationError::MissingVatRate);
    }

    #[test]
    fn test_bulk_pricing_empty() {
        let bulk = compute_bulk_pricing(&[]).unwrap();
        assert!(bulk.lines.is_empty());
        assert!(bulk.profit_total.is_zero());
    }

    #[test]
    fn test_amounts_beyond_the_maximum_are_rejected() {
        let huge = Money::from_minor(i64::MAX);
        let mut i = input("170.00", "140.50", VatTreatment::Regular, true, Some(dec!(21)));
        i.listed_price = huge;
        i.seller_payout = huge;
        let err = compute_pricing(&i).unwrap_err();
        assert_eq!(err.code(), "amount_too_large");
        assert_eq!(err.field(), "listed_price");

        i.listed_price = money("170.00");
        assert_eq!(compute_pricing(&i).unwrap_err().field(), "seller_payout");

        let twenty_one = VatRate::new("seller_vat_rate", dec!(21)).unwrap();
        assert_eq!(suggest_payout(huge, twenty_one).unwrap_err().code(), "amount_too_large");
    }

    #[test]
    fn test_maximum_amounts_price_exactly() {
        let max = Money::try_from_decimal("amount", MAX_AMOUNT).unwrap();
        let line = PricingInput {
            listed_price: max,
            treatment: VatTreatment::Regular,
            refund_included: true,
            seller_payout: max,
            buyer_country_vat_rate: Some(rate(dec!(99.99))),
        };
        let result = compute_pricing(&line).unwrap();
        assert_eq!(result.vat_amount, money("999900000.00"));
        assert_eq!(result.seller_payout_with_vat.amount(), dec!(1999900000.00));
        assert_eq!(result.profit.amount(), dec!(-999900000.00));
        assert_eq!(result.profit.to_string(), "-999900000.00");

        let bulk = compute_bulk_pricing(&vec![line; 200]).unwrap();
        assert_eq!(bulk.listed_price_total.amount(), dec!(200000000000.00));
        assert_eq!(bulk.seller_payout_with_vat_total.amount(), dec!(399980000000.00));
        assert_eq!(bulk.profit_total.amount(), dec!(-199980000000.00));
    }

    #[test]
    fn test_deserialize_errors_name_the_field() {
        let sub_cent = r#"{"listed_price":"170.00","treatment":"regular","seller_payout":"29.515"}"#;
        let err = serde_json::from_str::<PricingInput>(sub_cent).unwrap_err();
        assert!(err.to_string().contains("seller_payout"), "{err}");

        let out_of_range = r#"{"listed_price":"170.00","treatment":"regular","refund_included":true,"seller_payout":"140.50","buyer_country_vat_rate":"100"}"#;
        let err = serde_json::from_str::<PricingInput>(out_of_range).unwrap_err();
        assert!(err.to_string().contains("buyer_country_vat_rate"), "{err}");

        let huge = r#"{"listed_price":"79228162514264337593543950335","treatment":"margin","seller_payout":"0"}"#;
        let err = serde_json::from_str::<PricingInput>(huge).unwrap_err();
        assert!(err.to_string().contains("listed_price exceeds the maximum"), "{err}");
    }

    #[test]
    fn test_input_deserializes_from_form_json() {
        let json = r#"{"listed_price":"170.00","treatment":"regular","refund_included":true,"seller_payout":"140.50","buyer_country_vat_rate":"21"}"#;
        let parsed: PricingInput = serde_json::from_str(json).unwrap();
        assert_eq!(parsed, input("170.00", "140.50", VatTreatment::Regular, true, Some(dec!(21))));
    }
}
