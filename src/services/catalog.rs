//! Catalog service: billable services and stocked products

use tracing::info;

use super::records::Records;
use super::Backend;
use crate::error::{CabinetError, CabinetResult};
use crate::models::{CabinetService, Product, ServiceId};

pub struct CatalogService<'a> {
    services: Records<'a, CabinetService>,
    products: Records<'a, Product>,
}

impl<'a> CatalogService<'a> {
    pub fn new(backend: &'a Backend) -> Self {
        Self {
            services: Records::new(backend),
            products: Records::new(backend),
        }
    }

    pub fn services(&self) -> &Records<'a, CabinetService> {
        &self.services
    }

    pub fn products(&self) -> &Records<'a, Product> {
        &self.products
    }

    pub fn list_services(&self, query: &str) -> CabinetResult<Vec<CabinetService>> {
        let mut services = self.services.search(query)?;
        services.sort_by_key(|s| s.service_name.to_lowercase());
        Ok(services)
    }

    pub fn list_products(&self, query: &str) -> CabinetResult<Vec<Product>> {
        let mut products = self.products.search(query)?;
        products.sort_by_key(|p| p.product_name.to_lowercase());
        Ok(products)
    }

    /// Look up services by id, in the order given
    ///
    /// Fails on the first id the catalog does not know.
    pub fn resolve_services(&self, ids: &[ServiceId]) -> CabinetResult<Vec<CabinetService>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let catalog = self.services.list()?;
        ids.iter()
            .map(|id| {
                catalog
                    .iter()
                    .find(|s| s.service_id.as_ref() == Some(id))
                    .cloned()
                    .ok_or_else(|| CabinetError::service_not_found(id.as_str()))
            })
            .collect()
    }

    /// Products at or below their restock threshold
    pub fn low_stock(&self) -> CabinetResult<Vec<Product>> {
        let mut products: Vec<Product> = self
            .products
            .list()?
            .into_iter()
            .filter(Product::is_low_stock)
            .collect();
        products.sort_by_key(|p| p.quantity);
        Ok(products)
    }

    /// Add `delta` units (negative to remove); stock never goes below zero
    pub fn adjust_stock(&self, id: &str, delta: i64) -> CabinetResult<Product> {
        let (product, _) = self.products.modify(id, |p| {
            let next = i64::from(p.quantity) + delta;
            if next < 0 {
                return Err(CabinetError::InsufficientStock {
                    product: p.product_name.clone(),
                    available: p.quantity,
                    requested: delta.unsigned_abs().min(u64::from(u32::MAX)) as u32,
                });
            }
            p.quantity = u32::try_from(next)
                .map_err(|_| CabinetError::Validation("quantity is too large".into()))?;
            p.date_updated = Some(chrono::Local::now().date_naive());
            Ok(())
        })?;
        info!(product = %product.product_name, quantity = product.quantity, "stock adjusted");
        Ok(product)
    }
}
