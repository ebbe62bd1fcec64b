//! Catalog models: billable medical services and inventory products

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::dates;
use super::ids::{ProductId, ServiceId};
use super::money::{self, Money};
use super::validation::FieldErrors;

/// A service offered by the office (consultation, cleaning, X-ray, ...)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CabinetService {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_id: Option<ServiceId>,

    #[serde(default)]
    pub service_name: String,

    #[serde(default, deserialize_with = "money::deserialize_nullable")]
    pub price: Money,
}

impl CabinetService {
    pub fn new(name: impl Into<String>, price: Money) -> Self {
        Self {
            service_id: None,
            service_name: name.into(),
            price,
        }
    }

    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.require(&self.service_name, "serviceName");
        errors.check(!self.price.is_negative(), "price", "must be non-negative");
        errors.into_result()
    }

    pub fn matches(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        needle.is_empty() || self.service_name.to_lowercase().contains(&needle)
    }
}

impl fmt::Display for CabinetService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.service_name, self.price)
    }
}

/// A stocked product (consumables, medication)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<ProductId>,

    #[serde(default)]
    pub product_name: String,

    #[serde(default, deserialize_with = "money::deserialize_nullable")]
    pub price: Money,

    /// Units currently in stock
    #[serde(default)]
    pub quantity: u32,

    /// Restock threshold
    #[serde(default)]
    pub minimum: u32,

    #[serde(
        default,
        with = "dates::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub date_updated: Option<NaiveDate>,
}

impl Product {
    pub fn new(name: impl Into<String>, price: Money, quantity: u32, minimum: u32) -> Self {
        Self {
            product_id: None,
            product_name: name.into(),
            price,
            quantity,
            minimum,
            date_updated: None,
        }
    }

    /// At or below the restock threshold
    pub fn is_low_stock(&self) -> bool {
        self.quantity <= self.minimum
    }

    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.require(&self.product_name, "productName");
        errors.check(!self.price.is_negative(), "price", "must be non-negative");
        errors.into_result()
    }

    pub fn matches(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        needle.is_empty() || self.product_name.to_lowercase().contains(&needle)
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} in stock)", self.product_name, self.quantity)
    }
}
