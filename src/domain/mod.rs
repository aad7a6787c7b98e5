//! Domain layer: value objects, the VAT payout calculator and aggregates.
pub mod aggregates;
pub mod error;
pub mod events;
pub mod pricing;
pub mod value_objects;
pub mod vat_rates;

pub use error::ValidationError;
