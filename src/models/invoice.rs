//! Invoice model and payment payloads

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::dates;
use super::ids::{AppointmentId, InvoiceId, PatientId, ProductId};
use super::money::{self, Money};
use crate::billing::balance;

/// How a payment was made
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    #[default]
    Cash,
    Card,
    BankTransfer,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 3] = [Self::Cash, Self::Card, Self::BankTransfer];

    /// Parse user input: "cash", "card", "bank_transfer", "bank-transfer"
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "cash" => Some(Self::Cash),
            "card" => Some(Self::Card),
            "bank_transfer" | "transfer" | "bank" => Some(Self::BankTransfer),
            _ => None,
        }
    }

    /// Wire name, e.g. "BANK_TRANSFER"
    pub fn code(&self) -> &'static str {
        match self {
            Self::Cash => "CASH",
            Self::Card => "CARD",
            Self::BankTransfer => "BANK_TRANSFER",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cash => write!(f, "Cash"),
            Self::Card => write!(f, "Card"),
            Self::BankTransfer => write!(f, "Bank transfer"),
        }
    }
}

/// Settlement state shared by appointments and invoices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    #[default]
    Pending,
    PartiallyPaid,
    Paid,
    Cancelled,
    /// Any status this client does not know about
    #[serde(other)]
    Unknown,
}

impl PaymentStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "pending" => Some(Self::Pending),
            "partially_paid" | "partial" => Some(Self::PartiallyPaid),
            "paid" => Some(Self::Paid),
            "cancelled" | "canceled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "Pending"),
            Self::PartiallyPaid => write!(f, "Partially paid"),
            Self::Paid => write!(f, "Paid"),
            Self::Cancelled => write!(f, "Cancelled"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

/// A product consumed during an appointment and billed on its invoice
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsedProduct {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub appointment_product_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub appointment_id: Option<AppointmentId>,

    pub product_id: ProductId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,

    pub quantity: u32,
}

impl UsedProduct {
    pub fn new(product_id: ProductId, quantity: u32) -> Self {
        Self {
            appointment_product_id: None,
            appointment_id: None,
            product_id,
            product_name: None,
            quantity,
        }
    }

    pub fn display_name(&self) -> &str {
        self.product_name
            .as_deref()
            .unwrap_or_else(|| self.product_id.as_str())
    }
}

/// An invoice issued against an appointment
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_id: Option<InvoiceId>,

    #[serde(default)]
    pub appointment_id: Option<AppointmentId>,

    #[serde(default)]
    pub patient_id: Option<PatientId>,

    #[serde(default, with = "dates::optional")]
    pub invoice_date: Option<NaiveDate>,

    #[serde(default, deserialize_with = "money::deserialize_nullable")]
    pub total_amount: Money,

    #[serde(default, deserialize_with = "money::deserialize_nullable")]
    pub paid_amount: Money,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_type: Option<PaymentMethod>,

    #[serde(default)]
    pub invoice_status: PaymentStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_status: Option<PaymentStatus>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_name: Option<String>,

    #[serde(default, with = "dates::optional")]
    pub appointment_date: Option<NaiveDate>,

    #[serde(default)]
    pub used_products: Vec<UsedProduct>,
}

impl Invoice {
    /// Amount still owed on this invoice
    pub fn remaining(&self) -> Money {
        balance::remaining(self.total_amount, self.paid_amount)
    }

    pub fn is_paid(&self) -> bool {
        self.invoice_status == PaymentStatus::Paid
    }

    /// Paid, or nothing left to pay
    pub fn is_settled(&self) -> bool {
        self.is_paid() || self.remaining().is_zero()
    }

    pub fn id_display(&self) -> String {
        self.invoice_id
            .as_ref()
            .map(|id| id.to_string())
            .unwrap_or_else(|| "-".to_string())
    }

    /// Short product summary, first two names then "..."
    pub fn products_summary(&self) -> String {
        if self.used_products.is_empty() {
            return "-".to_string();
        }
        let mut parts: Vec<String> = self
            .used_products
            .iter()
            .take(2)
            .map(|p| format!("{} ({})", p.display_name(), p.quantity))
            .collect();
        if self.used_products.len() > 2 {
            parts.push("...".to_string());
        }
        parts.join(", ")
    }

    /// Filter over id, patient name, status, payment type and products
    pub fn matches(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        let products: Vec<&str> = self.used_products.iter().map(|p| p.display_name()).collect();
        let haystack = format!(
            "{} {} {} {} {}",
            self.id_display(),
            self.patient_name.as_deref().unwrap_or_default(),
            self.invoice_status,
            self.payment_type.map(|m| m.code()).unwrap_or_default(),
            products.join(" "),
        )
        .to_lowercase();
        haystack.contains(&needle)
    }
}

/// Body of `PUT invoices/{id}/pay`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub payment_amount: Money,
    pub payment_type: PaymentMethod,
}

/// Body of `PUT invoices/{id}/payment`; absent fields are left unchanged
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoicePaymentUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_amount: Option<Money>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_type: Option<PaymentMethod>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub used_products: Option<Vec<UsedProduct>>,
}

impl InvoicePaymentUpdate {
    pub fn is_empty(&self) -> bool {
        self.paid_amount.is_none() && self.payment_type.is_none() && self.used_products.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_parse() {
        assert_eq!(PaymentMethod::parse("CASH"), Some(PaymentMethod::Cash));
        assert_eq!(PaymentMethod::parse("bank-transfer"), Some(PaymentMethod::BankTransfer));
        assert_eq!(PaymentMethod::parse("bank_transfer"), Some(PaymentMethod::BankTransfer));
        assert_eq!(PaymentMethod::parse("cheque"), None);
    }

    #[test]
    fn test_unknown_status_tolerated() {
        let inv: Invoice =
            serde_json::from_str(r#"{"invoiceId":"i1","invoiceStatus":"REFUNDED"}"#).unwrap();
        assert_eq!(inv.invoice_status, PaymentStatus::Unknown);
    }

    #[test]
    fn test_remaining_and_settled() {
        let inv: Invoice = serde_json::from_str(
            r#"{"invoiceId":"i1","totalAmount":100,"paidAmount":100,"invoiceStatus":"PARTIALLY_PAID"}"#,
        )
        .unwrap();
        assert_eq!(inv.remaining(), Money::zero());
        assert!(!inv.is_paid());
        assert!(inv.is_settled());
    }

    #[test]
    fn test_payment_request_wire_format() {
        let req = PaymentRequest {
            payment_amount: Money::from_cents(30000),
            payment_type: PaymentMethod::BankTransfer,
        };
        let json = serde_json::to_value(req).unwrap();
        assert_eq!(json["paymentAmount"], 300.0);
        assert_eq!(json["paymentType"], "BANK_TRANSFER");
    }

    #[test]
    fn test_update_omits_absent_fields() {
        let update = InvoicePaymentUpdate {
            paid_amount: Some(Money::from_cents(5000)),
            ..Default::default()
        };
        let json = serde_json::to_string(&update).unwrap();
        assert_eq!(json, r#"{"paidAmount":50.0}"#);
        assert!(InvoicePaymentUpdate::default().is_empty());
    }

    #[test]
    fn test_products_summary() {
        let mut inv = Invoice::default();
        assert_eq!(inv.products_summary(), "-");
        for (id, qty) in [("gauze", 2), ("gloves", 1), ("mask", 4)] {
            let mut p = UsedProduct::new(ProductId::new(id), qty);
            p.product_name = Some(id.to_string());
            inv.used_products.push(p);
        }
        assert_eq!(inv.products_summary(), "gauze (2), gloves (1), ...");
        assert!(inv.matches("mask"));
    }

    #[test]
    fn test_used_product_default_and_wire_format() {
        let blank = UsedProduct::default();
        assert_eq!(blank.product_id.as_str(), "");
        assert_eq!(blank.quantity, 0);

        let line = UsedProduct {
            product_id: ProductId::new("g1"),
            quantity: 2,
            ..Default::default()
        };
        let json = serde_json::to_string(&line).unwrap();
        assert_eq!(json, r#"{"productId":"g1","quantity":2}"#);
    }
}
