//! Product Aggregate

use chrono::{DateTime, Utc};
use uuid::Uuid;
use crate::domain::value_objects::{Sku, Money};
use crate::domain::events::{DomainEvent, ProductEvent};

/// A sneaker listing: one style code in one size at one listed price.
#[derive(Clone, Debug)]
pub struct Product {
    id: String,
    sku: Sku,
    name: String,
    size: String,
    listed_price: Money,
    status: ProductStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    events: Vec<DomainEvent>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)] pub enum ProductStatus { #[default] Draft, Active, Archived }

impl Product {
    pub fn create(sku: Sku, name: impl Into<String>, size: impl Into<String>, listed_price: Money) -> Result<Self, ProductError> {
        if listed_price.is_negative() { return Err(ProductError::NegativePrice); }
        let id = Uuid::now_v7().to_string();
        let now = Utc::now();
        let mut product = Self {
            id: id.clone(), sku: sku.clone(), name: name.into(), size: size.into(),
            listed_price, status: ProductStatus::Draft, created_at: now, updated_at: now, events: vec![],
        };
        product.raise_event(DomainEvent::Product(ProductEvent::Created { product_id: id, sku }));
        Ok(product)
    }

    pub fn id(&self) -> &str { &self.id }
    pub fn sku(&self) -> &Sku { &self.sku }
    pub fn name(&self) -> &str { &self.name }
    pub fn size(&self) -> &str { &self.size }
    pub fn listed_price(&self) -> Money { self.listed_price }
    pub fn status(&self) -> &ProductStatus { &self.status }
    pub fn created_at(&self) -> DateTime<Utc> { self.created_at }
    pub fn updated_at(&self) -> DateTime<Utc> { self.updated_at }

    pub fn publish(&mut self) -> Result<(), ProductError> {
        if self.name.trim().is_empty() { return Err(ProductError::MissingName); }
        if self.size.trim().is_empty() { return Err(ProductError::MissingSize); }
        self.status = ProductStatus::Active;
        self.touch();
        self.raise_event(DomainEvent::Product(ProductEvent::Published { product_id: self.id.clone() }));
        Ok(())
    }

    pub fn archive(&mut self) { self.status = ProductStatus::Archived; self.touch(); }

    pub fn update_price(&mut self, new_price: Money) -> Result<(), ProductError> {
        if new_price.is_negative() { return Err(ProductError::NegativePrice); }
        if new_price == self.listed_price { return Ok(()); }
        let old_price = std::mem::replace(&mut self.listed_price, new_price);
        self.touch();
        self.raise_event(DomainEvent::Product(ProductEvent::PriceChanged { product_id: self.id.clone(), old_price, new_price }));
        Ok(())
    }

    pub fn take_events(&mut self) -> Vec<DomainEvent> { std::mem::take(&mut self.events) }
    fn raise_event(&mut self, e: DomainEvent) { self.events.push(e); }
    fn touch(&mut self) { self.updated_at = Utc::now(); }
}

#[derive(Debug, Clone, PartialEq, Eq)] pub enum ProductError { MissingName, MissingSize, NegativePrice }
impl std::error::Error for ProductError {}
impl std::fmt::Display for ProductError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingName => write!(f, "Missing name"),
            Self::MissingSize => write!(f, "Missing size"),
            Self::NegativePrice => write!(f, "Listed price cannot be negative"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn test_product_create() {
        let p = Product::create(Sku::new("DD1391-100").unwrap(), "Dunk Low Panda", "42", Money::from_minor(17000)).unwrap();
        assert_eq!(p.name(), "Dunk Low Panda");
        assert_eq!(p.sku().as_str(), "DD1391-100");
        assert_eq!(p.status(), &ProductStatus::Draft);
    }
    #[test]
    fn test_publish_and_reprice() {
        let mut p = Product::create(Sku::new("DD1391-100").unwrap(), "Dunk Low", "42", Money::from_minor(17000)).unwrap();
        p.publish().unwrap();
        assert_eq!(p.status(), &ProductStatus::Active);
        assert!(p.updated_at() >= p.created_at());
        p.update_price(Money::from_minor(18000)).unwrap();
        p.update_price(Money::from_minor(18000)).unwrap();
        assert_eq!(p.listed_price(), Money::from_minor(18000));
        let events = p.take_events();
        assert_eq!(events.len(), 3);
        assert!(matches!(events[2], DomainEvent::Product(ProductEvent::PriceChanged { .. })));
        assert_eq!(p.update_price(Money::from_minor(-1)), Err(ProductError::NegativePrice));
    }
    #[test]
    fn test_publish_requires_size() {
        let mut p = Product::create(Sku::new("FQ8138").unwrap(), "Samba OG", " ", Money::from_minor(12000)).unwrap();
        assert_eq!(p.publish(), Err(ProductError::MissingSize));
    }
}
