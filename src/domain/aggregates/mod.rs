//! Aggregates module
pub mod product;
pub mod seller;
pub mod order;

pub use product::{Product, ProductError, ProductStatus};
pub use seller::{Seller, SellerError};
pub use order::{AssignedSeller, OrderError, ShipmentLabel, WtbOrder, WtbOrderStatus, WtbOrderSubmission};
