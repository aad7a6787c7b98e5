//! Money value object
//!
//! Amounts are exact decimals held at minor-unit precision (cents). Form text
//! such as `"€1.234,50"` is normalised here, before anything reaches the
//! pricing calculator.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Sub};
use std::str::FromStr;

use crate::domain::error::ValidationError;

/// Decimal places of the minor currency unit (EUR/USD cents).
pub const MINOR_UNIT_SCALE: u32 = 2;

/// Largest magnitude accepted from callers. Every product and total the
/// calculator forms from amounts in this range stays well inside `Decimal`.
pub const MAX_AMOUNT: Decimal = dec!(1_000_000_000);

const CURRENCY_MARKERS: [&str; 6] = ["EUR", "USD", "GBP", "€", "$", "£"];

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Money(Decimal);

impl Money {
    pub fn zero() -> Self { Self::from_minor(0) }

    /// Builds an amount from minor units, e.g. `from_minor(14050)` is 140.50.
    pub fn from_minor(minor: i64) -> Self { Self(Decimal::new(minor, MINOR_UNIT_SCALE)) }

    /// Accepts any sign, but rejects sub-cent precision and amounts beyond
    /// [`MAX_AMOUNT`].
    pub fn try_from_decimal(field: &'static str, amount: Decimal) -> Result<Self, ValidationError> {
        if amount.normalize().scale() > MINOR_UNIT_SCALE {
            return Err(ValidationError::MalformedAmount { field, input: amount.to_string() });
        }
        Self::check_bounds(field, amount)?;
        Ok(Self::at_minor_scale(amount))
    }

    /// Parses user-entered amount text.
    ///
    /// Tolerates surrounding whitespace, a leading or trailing currency marker,
    /// thousands separators and a comma decimal separator. Empty text, `NaN`,
    /// stray characters and more than two decimals are all rejected.
    pub fn parse(field: &'static str, input: &str) -> Result<Self, ValidationError> {
        let malformed = || ValidationError::MalformedAmount { field, input: input.to_string() };

        let (outer_sign, text) = split_sign(input.trim());
        let (inner_sign, text) = split_sign(strip_currency(text));
        if outer_sign && inner_sign {
            return Err(malformed());
        }
        let digits = normalise_separators(text).ok_or_else(malformed)?;
        let mut amount = Decimal::from_str(&digits).map_err(|_| malformed())?;
        if amount.normalize().scale() > MINOR_UNIT_SCALE {
            return Err(malformed());
        }
        if outer_sign || inner_sign {
            amount = -amount;
        }
        Self::check_bounds(field, amount)?;
        Ok(Self::at_minor_scale(amount))
    }

    pub fn amount(&self) -> Decimal { self.0 }
    pub fn is_zero(&self) -> bool { self.0.is_zero() }
    pub fn is_negative(&self) -> bool { self.0 < Decimal::ZERO }

    pub fn ensure_non_negative(self, field: &'static str) -> Result<Self, ValidationError> {
        if self.is_negative() {
            return Err(ValidationError::NegativeAmount { field, amount: self.0 });
        }
        Ok(self)
    }

    /// Rejects amounts whose magnitude exceeds [`MAX_AMOUNT`].
    pub fn ensure_within_bounds(self, field: &'static str) -> Result<Self, ValidationError> {
        Self::check_bounds(field, self.0)?;
        Ok(self)
    }

    fn check_bounds(field: &'static str, amount: Decimal) -> Result<(), ValidationError> {
        if amount.abs() > MAX_AMOUNT {
            return Err(ValidationError::AmountTooLarge { field, amount });
        }
        Ok(())
    }

    /// Rounds an exact intermediate result to cents, half away from zero.
    pub(crate) fn round_from(exact: Decimal) -> Self {
        let rounded = exact.round_dp_with_strategy(MINOR_UNIT_SCALE, RoundingStrategy::MidpointAwayFromZero);
        if rounded.is_zero() {
            return Self::zero();
        }
        Self::at_minor_scale(rounded)
    }

    /// Callers keep `amount` far below `Decimal::MAX`, where `rescale` is exact.
    fn at_minor_scale(mut amount: Decimal) -> Self {
        if amount.is_zero() {
            return Self::zero();
        }
        amount.rescale(MINOR_UNIT_SCALE);
        Self(amount)
    }
}

impl Default for Money { fn default() -> Self { Self::zero() } }

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

impl Add for Money {
    type Output = Money;
    fn add(self, rhs: Money) -> Money { Money::at_minor_scale(self.0 + rhs.0) }
}

impl Sub for Money {
    type Output = Money;
    fn sub(self, rhs: Money) -> Money { Money::at_minor_scale(self.0 - rhs.0) }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money { iter.fold(Money::zero(), Add::add) }
}

impl TryFrom<Decimal> for Money {
    type Error = ValidationError;
    fn try_from(amount: Decimal) -> Result<Self, Self::Error> { Self::try_from_decimal("amount", amount) }
}

impl From<Money> for Decimal {
    fn from(money: Money) -> Decimal { money.0 }
}

fn split_sign(text: &str) -> (bool, &str) {
    match text.strip_prefix('-') {
        Some(rest) => (true, rest.trim_start()),
        None => (false, text),
    }
}

fn strip_currency(text: &str) -> &str {
    for marker in CURRENCY_MARKERS {
        let n = marker.len();
        if text.get(..n).is_some_and(|head| head.eq_ignore_ascii_case(marker)) {
            return text[n..].trim();
        }
        if text.len() >= n {
            let split = text.len() - n;
            if text.get(split..).is_some_and(|tail| tail.eq_ignore_ascii_case(marker)) {
                return text[..split].trim();
            }
        }
    }
    text
}

/// Rewrites `1.234,50` / `1,234.50` / `170,00` into a plain `1234.50` form.
fn normalise_separators(text: &str) -> Option<String> {
    if text.is_empty() || !text.chars().all(|c| c.is_ascii_digit() || c == '.' || c == ',') {
        return None;
    }
    let (decimal_at, thousands) = match (text.rfind('.'), text.rfind(',')) {
        (Some(dot), Some(comma)) if dot > comma => (Some(dot), Some(',')),
        (Some(_), Some(comma)) => (Some(comma), Some('.')),
        (Some(dot), None) if text.matches('.').count() == 1 => (Some(dot), None),
        (Some(_), None) => (None, Some('.')),
        (None, Some(comma)) if text.matches(',').count() == 1 && text.len() - comma - 1 <= 2 => (Some(comma), None),
        (None, Some(_)) => (None, Some(',')),
        (None, None) => (None, None),
    };
    let (int_part, frac_part) = match decimal_at {
        Some(at) => (&text[..at], Some(&text[at + 1..])),
        None => (text, None),
    };

    let mut normalised = String::with_capacity(text.len());
    match thousands {
        Some(sep) if int_part.contains(sep) => {
            let mut groups = int_part.split(sep);
            let first = groups.next()?;
            if first.is_empty() || first.len() > 3 { return None; }
            normalised.push_str(first);
            for group in groups {
                if group.len() != 3 { return None; }
                normalised.push_str(group);
            }
        }
        _ => normalised.push_str(int_part),
    }
    if normalised.is_empty() || !normalised.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if let Some(frac) = frac_part {
        if frac.is_empty() || !frac.bytes().all(|b| b.is_ascii_digit()) { return None; }
        normalised.push('.');
        normalised.push_str(frac);
    }
    Some(normalised)
}
