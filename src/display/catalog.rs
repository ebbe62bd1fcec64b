//! Catalog display formatting

use tabled::Tabled;

use super::{or_dash, render_table};
use crate::models::{CabinetService, Product};

#[derive(Tabled)]
struct ServiceRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Service")]
    name: String,
    #[tabled(rename = "Price")]
    price: String,
}

#[derive(Tabled)]
struct ProductRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Product")]
    name: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Stock")]
    quantity: u32,
    #[tabled(rename = "Min")]
    minimum: u32,
    #[tabled(rename = "")]
    flag: &'static str,
}

pub fn format_service_list(services: &[CabinetService]) -> String {
    let rows = services
        .iter()
        .map(|s| ServiceRow {
            id: or_dash(s.service_id.as_ref().map(|id| id.as_str())),
            name: s.service_name.clone(),
            price: s.price.to_string(),
        })
        .collect();
    render_table(rows, "No services found.")
}

/// Products table; low-stock rows are flagged when `flag_low` is set
pub fn format_product_list(products: &[Product], flag_low: bool) -> String {
    let rows = products
        .iter()
        .map(|p| ProductRow {
            id: or_dash(p.product_id.as_ref().map(|id| id.as_str())),
            name: p.product_name.clone(),
            price: p.price.to_string(),
            quantity: p.quantity,
            minimum: p.minimum,
            flag: if flag_low && p.is_low_stock() { "LOW" } else { "" },
        })
        .collect();
    render_table(rows, "No products found.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;

    #[test]
    fn test_low_flag() {
        let products = [Product::new("Gloves", Money::from_cents(100), 2, 5)];
        assert!(format_product_list(&products, true).contains("LOW"));
        assert!(!format_product_list(&products, false).contains("LOW"));
    }
}
