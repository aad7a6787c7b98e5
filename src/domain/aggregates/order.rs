//! WTB Order Aggregate
//!
//! A want-to-buy order: the marketplace buys one pair from a seller to fulfil
//! an existing customer order. The order walks
//! `Draft -> SellerAssigned -> Priced -> Submitted -> LabelCreated` and can be
//! cancelled any time before a label exists.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::domain::aggregates::Seller;
use crate::domain::error::ValidationError;
use crate::domain::events::{DomainEvent, WtbOrderEvent};
use crate::domain::pricing::{compute_pricing, PricingInput, PricingResult, VatTreatment};
use crate::domain::value_objects::{CountryCode, Money, Sku, VatRate};
use crate::domain::vat_rates;

#[derive(Clone, Debug)]
pub struct WtbOrder {
    id: String,
    customer_order_ref: String,
    sku: Sku,
    listed_price: Money,
    buyer_country: CountryCode,
    seller: Option<AssignedSeller>,
    refund_included: bool,
    pricing: Option<PricingResult>,
    label: Option<ShipmentLabel>,
    status: WtbOrderStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    events: Vec<DomainEvent>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)] pub struct AssignedSeller { pub seller_id: String, pub treatment: VatTreatment, pub payout: Money }

/// What the shipping provider hands back for a created label.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)] pub struct ShipmentLabel { pub carrier: String, pub tracking_number: String, pub label_url: String }

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WtbOrderStatus { #[default] Draft, SellerAssigned, Priced, Submitted, LabelCreated, Cancelled }

/// Order-creation payload sent to the backend. The pricing fields map 1:1 onto
/// the persisted order columns.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WtbOrderSubmission {
    pub order_id: String,
    pub customer_order_ref: String,
    pub sku: Sku,
    pub seller_id: String,
    pub buyer_country: CountryCode,
    pub vat_treatment: VatTreatment,
    pub vat_refund_included: bool,
    pub listed_price: Money,
    pub seller_payout_amount: Money,
    pub seller_payout_amount_with_vat: Money,
    pub vat_amount: Money,
    pub vat_rate: Option<VatRate>,
    /// Listed price minus the bare payout.
    pub profit_margin_gross: Money,
    /// Listed price minus the payout including VAT.
    pub profit_margin_net: Money,
    pub created_at: DateTime<Utc>,
}

impl WtbOrder {
    pub fn create(customer_order_ref: impl Into<String>, sku: Sku, listed_price: Money, buyer_country: CountryCode) -> Result<Self, OrderError> {
        let listed_price = listed_price.ensure_non_negative("listed_price")?;
        let id = Uuid::now_v7().to_string();
        let customer_order_ref = customer_order_ref.into();
        let now = Utc::now();
        let mut order = Self {
            id: id.clone(), customer_order_ref: customer_order_ref.clone(), sku, listed_price,
            buyer_country: buyer_country.clone(), seller: None, refund_included: false, pricing: None,
            label: None, status: WtbOrderStatus::Draft, created_at: now, updated_at: now, events: vec![],
        };
        order.raise_event(DomainEvent::WtbOrder(WtbOrderEvent::Created { order_id: id, customer_order_ref, buyer_country }));
        Ok(order)
    }

    pub fn id(&self) -> &str { &self.id }
    pub fn status(&self) -> WtbOrderStatus { self.status }
    pub fn listed_price(&self) -> Money { self.listed_price }
    pub fn buyer_country(&self) -> &CountryCode { &self.buyer_country }
    pub fn seller(&self) -> Option<&AssignedSeller> { self.seller.as_ref() }
    pub fn pricing(&self) -> Option<&PricingResult> { self.pricing.as_ref() }
    pub fn label(&self) -> Option<&ShipmentLabel> { self.label.as_ref() }

    /// Assigning (or re-assigning) a seller discards any earlier pricing.
    pub fn assign_seller(&mut self, seller: &Seller, payout: Money) -> Result<(), OrderError> {
        self.expect_status(&[WtbOrderStatus::Draft, WtbOrderStatus::SellerAssigned, WtbOrderStatus::Priced], "assign seller")?;
        let payout = payout.ensure_non_negative("seller_payout")?;
        self.seller = Some(AssignedSeller { seller_id: seller.id().to_string(), treatment: seller.treatment(), payout });
        self.pricing = None;
        self.status = WtbOrderStatus::SellerAssigned;
        self.touch();
        Ok(())
    }

    /// Prices the order with the buyer country's standard rate.
    pub fn price(&mut self, refund_included: bool) -> Result<&PricingResult, OrderError> {
        let rate = vat_rates::standard_rate(&self.buyer_country);
        self.price_with_rate(refund_included, rate)
    }

    /// Prices the order with an explicit buyer rate, e.g. one entered by hand
    /// for a country outside the reference table.
    pub fn price_with_rate(&mut self, refund_included: bool, buyer_country_vat_rate: Option<VatRate>) -> Result<&PricingResult, OrderError> {
        self.expect_status(&[WtbOrderStatus::SellerAssigned, WtbOrderStatus::Priced], "price")?;
        let seller = self.seller.as_ref().ok_or(OrderError::NoSeller)?;
        let result = compute_pricing(&PricingInput {
            listed_price: self.listed_price,
            treatment: seller.treatment,
            refund_included,
            seller_payout: seller.payout,
            buyer_country_vat_rate,
        })?;
        self.raise_event(DomainEvent::WtbOrder(WtbOrderEvent::Priced {
            order_id: self.id.clone(), seller_payout_with_vat: result.seller_payout_with_vat, profit: result.profit,
        }));
        self.refund_included = refund_included;
        self.status = WtbOrderStatus::Priced;
        self.touch();
        let stored: &PricingResult = self.pricing.insert(result);
        Ok(stored)
    }

    pub fn submit(&mut self) -> Result<WtbOrderSubmission, OrderError> {
        self.expect_status(&[WtbOrderStatus::Priced], "submit")?;
        let submission = self.submission().ok_or(OrderError::NotPriced)?;
        self.status = WtbOrderStatus::Submitted;
        self.touch();
        self.raise_event(DomainEvent::WtbOrder(WtbOrderEvent::Submitted {
            order_id: self.id.clone(), seller_id: submission.seller_id.clone(), profit: submission.profit_margin_net,
        }));
        Ok(submission)
    }

    /// Payload for the order-creation API, once the order has been priced.
    pub fn submission(&self) -> Option<WtbOrderSubmission> {
        let seller = self.seller.as_ref()?;
        let pricing = self.pricing.as_ref()?;
        Some(WtbOrderSubmission {
            order_id: self.id.clone(),
            customer_order_ref: self.customer_order_ref.clone(),
            sku: self.sku.clone(),
            seller_id: seller.seller_id.clone(),
            buyer_country: self.buyer_country.clone(),
            vat_treatment: seller.treatment,
            vat_refund_included: self.refund_included,
            listed_price: self.listed_price,
            seller_payout_amount: seller.payout,
            seller_payout_amount_with_vat: pricing.seller_payout_with_vat,
            vat_amount: pricing.vat_amount,
            vat_rate: pricing.vat_rate,
            profit_margin_gross: self.listed_price - seller.payout,
            profit_margin_net: pricing.profit,
            created_at: self.created_at,
        })
    }

    pub fn attach_label(&mut self, label: ShipmentLabel) -> Result<(), OrderError> {
        self.expect_status(&[WtbOrderStatus::Submitted], "attach label")?;
        self.raise_event(DomainEvent::WtbOrder(WtbOrderEvent::LabelCreated { order_id: self.id.clone(), tracking_number: label.tracking_number.clone() }));
        self.label = Some(label);
        self.status = WtbOrderStatus::LabelCreated;
        self.touch();
        Ok(())
    }

    pub fn cancel(&mut self) -> Result<(), OrderError> {
        if matches!(self.status, WtbOrderStatus::LabelCreated | WtbOrderStatus::Cancelled) { return Err(OrderError::CannotCancel); }
        self.status = WtbOrderStatus::Cancelled;
        self.touch();
        self.raise_event(DomainEvent::WtbOrder(WtbOrderEvent::Cancelled { order_id: self.id.clone() }));
        Ok(())
    }

    pub fn take_events(&mut self) -> Vec<DomainEvent> { std::mem::take(&mut self.events) }
    fn raise_event(&mut self, e: DomainEvent) { self.events.push(e); }
    fn touch(&mut self) { self.updated_at = Utc::now(); }

    fn expect_status(&self, allowed: &[WtbOrderStatus], action: &'static str) -> Result<(), OrderError> {
        if allowed.contains(&self.status) { return Ok(()); }
        Err(OrderError::InvalidTransition { from: self.status, action })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderError { InvalidTransition { from: WtbOrderStatus, action: &'static str }, NoSeller, NotPriced, CannotCancel, Pricing(ValidationError) }
impl std::error::Error for OrderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self { Self::Pricing(e) => Some(e), _ => None }
    }
}
impl std::fmt::Display for OrderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTransition { from, action } => write!(f, "Cannot {action} an order in status {from:?}"),
            Self::NoSeller => write!(f, "No seller assigned"),
            Self::NotPriced => write!(f, "Order not priced"),
            Self::CannotCancel => write!(f, "Cannot cancel"),
            Self::Pricing(e) => write!(f, "{e}"),
        }
    }
}
impl From<ValidationError> for OrderError { fn from(e: ValidationError) -> Self { Self::Pricing(e) } }
