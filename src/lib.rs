//! SneakerAsk Admin Backend
//!
//! Back-office service for the SneakerAsk resale marketplace.
//!
//! ## Features
//! - VAT payout calculator (regular and margin scheme, buyer VAT refund)
//! - Bulk pricing and payout auto-fill
//! - EU standard VAT rate reference table
//! - Want-to-Buy (WTB) order workflow and order submission payloads
//! - Domain events published to NATS

use thiserror::Error;

pub mod api;
pub mod config;
pub mod domain;

pub use domain::pricing::{compute_bulk_pricing, compute_pricing, suggest_payout, PricingInput, PricingResult, VatTreatment};
pub use domain::value_objects::{Money, VatRate};
pub use domain::ValidationError;

use domain::aggregates::{OrderError, SellerError};
use domain::pricing::BulkPricingError;
use domain::value_objects::{CountryCodeError, SkuError};

// =============================================================================
// Error Types
// =============================================================================

#[derive(Error, Debug)]
pub enum AdminError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    BulkPricing(#[from] BulkPricingError),

    #[error(transparent)]
    Order(#[from] OrderError),

    #[error(transparent)]
    Seller(#[from] SellerError),

    #[error("Invalid SKU: {0}")]
    Sku(#[from] SkuError),

    #[error(transparent)]
    Country(#[from] CountryCodeError),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("{0} not found")]
    NotFound(String),
}

pub type Result<T> = std::result::Result<T, AdminError>;
