//! Seller Aggregate

use uuid::Uuid;
use crate::domain::error::ValidationError;
use crate::domain::pricing::{suggest_payout, VatTreatment};
use crate::domain::value_objects::{CountryCode, Money, VatRate};

/// A supplier the marketplace buys inventory from.
///
/// `vat_rate` is the seller's own jurisdiction rate. It only drives the payout
/// suggestion; order pricing always uses the buyer country's rate.
#[derive(Clone, Debug)]
pub struct Seller {
    id: String,
    name: String,
    country: CountryCode,
    treatment: VatTreatment,
    vat_rate: Option<VatRate>,
}

impl Seller {
    pub fn create(name: impl Into<String>, country: CountryCode, treatment: VatTreatment) -> Result<Self, SellerError> {
        let name = name.into();
        if name.trim().is_empty() { return Err(SellerError::MissingName); }
        Ok(Self {
            id: Uuid::now_v7().to_string(), name, country, treatment, vat_rate: None,
        })
    }

    pub fn with_vat_rate(mut self, rate: VatRate) -> Self { self.vat_rate = Some(rate); self }

    pub fn id(&self) -> &str { &self.id }
    pub fn name(&self) -> &str { &self.name }
    pub fn country(&self) -> &CountryCode { &self.country }
    pub fn treatment(&self) -> VatTreatment { self.treatment }
    pub fn vat_rate(&self) -> Option<VatRate> { self.vat_rate }

    /// Suggested payout for a listed price. Margin-scheme payouts are already
    /// net, so the listed price is suggested as-is; regular sellers get the
    /// price net of their own rate (or `default_rate` when they have none).
    pub fn suggested_payout(&self, listed_price: Money, default_rate: VatRate) -> Result<Money, ValidationError> {
        match self.treatment {
            VatTreatment::Margin => listed_price.ensure_non_negative("listed_price"),
            VatTreatment::Regular => suggest_payout(listed_price, self.vat_rate.unwrap_or(default_rate)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)] pub enum SellerError { MissingName }
impl std::error::Error for SellerError {}
impl std::fmt::Display for SellerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "Missing seller name") }
}
