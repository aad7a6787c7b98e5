//! Standard VAT rates of the EU member states, keyed by buyer country.

use rust_decimal_macros::dec;

use crate::domain::value_objects::{CountryCode, VatRate};

static STANDARD_RATES: [(&str, VatRate); 27] = [
    ("AT", VatRate::standard(dec!(20))),
    ("BE", VatRate::standard(dec!(21))),
    ("BG", VatRate::standard(dec!(20))),
    ("CY", VatRate::standard(dec!(19))),
    ("CZ", VatRate::standard(dec!(21))),
    ("DE", VatRate::standard(dec!(19))),
    ("DK", VatRate::standard(dec!(25))),
    ("EE", VatRate::standard(dec!(24))),
    ("ES", VatRate::standard(dec!(21))),
    ("FI", VatRate::standard(dec!(25.5))),
    ("FR", VatRate::standard(dec!(20))),
    ("GR", VatRate::standard(dec!(24))),
    ("HR", VatRate::standard(dec!(25))),
    ("HU", VatRate::standard(dec!(27))),
    ("IE", VatRate::standard(dec!(23))),
    ("IT", VatRate::standard(dec!(22))),
    ("LT", VatRate::standard(dec!(21))),
    ("LU", VatRate::standard(dec!(17))),
    ("LV", VatRate::standard(dec!(21))),
    ("MT", VatRate::standard(dec!(18))),
    ("NL", VatRate::standard(dec!(21))),
    ("PL", VatRate::standard(dec!(23))),
    ("PT", VatRate::standard(dec!(23))),
    ("RO", VatRate::standard(dec!(21))),
    ("SE", VatRate::standard(dec!(25))),
    ("SI", VatRate::standard(dec!(22))),
    ("SK", VatRate::standard(dec!(23))),
];

/// Standard rate for `country`, or `None` outside the EU.
///
/// Greece is also accepted under its VAT prefix `EL`.
pub fn standard_rate(country: &CountryCode) -> Option<VatRate> {
    let code = match country.as_str() {
        "EL" => "GR",
        other => other,
    };
    STANDARD_RATES
        .binary_search_by(|(key, _)| (*key).cmp(code))
        .ok()
        .map(|i| STANDARD_RATES[i].1)
}

/// The whole table, sorted by country code.
pub fn all() -> &'static [(&'static str, VatRate)] { &STANDARD_RATES }
