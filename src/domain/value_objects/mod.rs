//! Value Objects for the admin backend

mod money;
mod vat_rate;

pub use money::{Money, MAX_AMOUNT, MINOR_UNIT_SCALE};
pub use vat_rate::VatRate;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Style code of a sneaker, e.g. `DD1391-100`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Sku(String);

impl Sku {
    pub fn new(value: impl Into<String>) -> Result<Self, SkuError> {
        let value = value.into().trim().to_uppercase();
        if value.is_empty() { return Err(SkuError::Empty); }
        if value.len() > 32 { return Err(SkuError::TooLong); }
        if let Some(c) = value.chars().find(|c| !c.is_ascii_alphanumeric() && *c != '-') {
            return Err(SkuError::InvalidCharacter(c));
        }
        Ok(Self(value))
    }
    pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for Sku {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

impl TryFrom<String> for Sku {
    type Error = SkuError;
    fn try_from(value: String) -> Result<Self, Self::Error> { Self::new(value) }
}

impl From<Sku> for String {
    fn from(sku: Sku) -> String { sku.0 }
}

#[derive(Debug, Clone, PartialEq, Eq)] pub enum SkuError { Empty, TooLong, InvalidCharacter(char) }
impl std::error::Error for SkuError {}
impl fmt::Display for SkuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "SKU empty"),
            Self::TooLong => write!(f, "SKU too long"),
            Self::InvalidCharacter(c) => write!(f, "SKU contains invalid character {c:?}"),
        }
    }
}

/// ISO 3166-1 alpha-2 country code, stored uppercase.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CountryCode(String);

impl CountryCode {
    pub fn new(value: impl AsRef<str>) -> Result<Self, CountryCodeError> {
        let value = value.as_ref().trim().to_ascii_uppercase();
        if value.len() != 2 || !value.bytes().all(|b| b.is_ascii_alphabetic()) {
            return Err(CountryCodeError(value));
        }
        Ok(Self(value))
    }
    pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

impl TryFrom<String> for CountryCode {
    type Error = CountryCodeError;
    fn try_from(value: String) -> Result<Self, Self::Error> { Self::new(value) }
}

impl From<CountryCode> for String {
    fn from(code: CountryCode) -> String { code.0 }
}

#[derive(Debug, Clone, PartialEq, Eq)] pub struct CountryCodeError(pub String);
impl std::error::Error for CountryCodeError {}
impl fmt::Display for CountryCodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "Invalid country code {:?}", self.0) }
}
