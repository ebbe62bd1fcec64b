//! Line-item total aggregator

use crate::error::{CabinetError, CabinetResult};
use crate::models::{CabinetService, Money, Product};

/// One billable line: a service, or a product with a quantity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItem {
    /// Catalog id of the service or product, when known
    pub source_id: Option<String>,
    pub label: String,
    pub price: Money,
    /// Units; `None` counts as one
    pub quantity: Option<u32>,
}

impl LineItem {
    pub fn new(label: impl Into<String>, price: Money) -> Self {
        Self {
            source_id: None,
            label: label.into(),
            price,
            quantity: None,
        }
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = Some(quantity);
        self
    }

    /// Product line for `quantity` units at the catalog price
    pub fn from_product(product: &Product, quantity: u32) -> Self {
        Self {
            source_id: product.product_id.as_ref().map(|id| id.to_string()),
            label: product.product_name.clone(),
            price: product.price,
            quantity: Some(quantity),
        }
    }

    pub fn quantity(&self) -> u32 {
        self.quantity.unwrap_or(1)
    }

    /// `price * quantity`
    ///
    /// Refused for a negative price or a product that does not fit in
    /// `Money`.
    pub fn subtotal(&self) -> CabinetResult<Money> {
        if self.price.is_negative() {
            return Err(CabinetError::Validation(format!(
                "price of '{}' must be non-negative",
                self.label
            )));
        }
        self.price
            .checked_mul(self.quantity())
            .ok_or_else(|| too_large(&self.label))
    }
}

impl From<&CabinetService> for LineItem {
    fn from(service: &CabinetService) -> Self {
        Self {
            source_id: service.service_id.as_ref().map(|id| id.to_string()),
            label: service.service_name.clone(),
            price: service.price,
            quantity: None,
        }
    }
}

fn too_large(label: &str) -> CabinetError {
    CabinetError::Validation(format!("total is too large after '{}'", label))
}

/// Sum of every line's subtotal; an empty list totals zero
pub fn aggregate(items: &[LineItem]) -> CabinetResult<Money> {
    items.iter().try_fold(Money::zero(), |total, item| {
        total
            .checked_add(item.subtotal()?)
            .ok_or_else(|| too_large(&item.label))
    })
}
