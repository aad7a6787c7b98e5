//! Domain events
use crate::domain::value_objects::{CountryCode, Money, Sku};
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "aggregate", rename_all = "snake_case")]
pub enum DomainEvent {
    Product(ProductEvent),
    WtbOrder(WtbOrderEvent),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ProductEvent {
    Created { product_id: String, sku: Sku },
    Published { product_id: String },
    PriceChanged { product_id: String, old_price: Money, new_price: Money },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum WtbOrderEvent {
    Created { order_id: String, customer_order_ref: String, buyer_country: CountryCode },
    Priced { order_id: String, seller_payout_with_vat: Money, profit: Money },
    Submitted { order_id: String, seller_id: String, profit: Money },
    LabelCreated { order_id: String, tracking_number: String },
    Cancelled { order_id: String },
}

impl DomainEvent {
    /// Subject suffix used when publishing, e.g. `wtb_order.submitted`.
    pub fn subject(&self) -> &'static str {
        match self {
            Self::Product(ProductEvent::Created { .. }) => "product.created",
            Self::Product(ProductEvent::Published { .. }) => "product.published",
            Self::Product(ProductEvent::PriceChanged { .. }) => "product.price_changed",
            Self::WtbOrder(WtbOrderEvent::Created { .. }) => "wtb_order.created",
            Self::WtbOrder(WtbOrderEvent::Priced { .. }) => "wtb_order.priced",
            Self::WtbOrder(WtbOrderEvent::Submitted { .. }) => "wtb_order.submitted",
            Self::WtbOrder(WtbOrderEvent::LabelCreated { .. }) => "wtb_order.label_created",
            Self::WtbOrder(WtbOrderEvent::Cancelled { .. }) => "wtb_order.cancelled",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn test_event_json_shape() {
        let event = DomainEvent::WtbOrder(WtbOrderEvent::Cancelled { order_id: "o-1".into() });
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["aggregate"], "wtb_order");
        assert_eq!(json["event"], "cancelled");
        assert_eq!(json["order_id"], "o-1");
        assert_eq!(event.subject(), "wtb_order.cancelled");
    }
}
