//! Invoice edit form
//!
//! Edits how much an invoice contributes to its appointment and which
//! products were used. The paid amount is capped at what the appointment
//! still needs once this invoice's previous contribution is taken out.

use super::balance;
use super::clamp::{clamp_payment_input, ClampOutcome};
use super::payment::FormNotice;
use crate::error::{CabinetError, CabinetResult};
use crate::models::{
    Appointment, AppointmentId, FieldErrors, Invoice, InvoiceId, InvoicePaymentUpdate, Money,
    PaymentMethod, Product, ProductId, UsedProduct,
};

const MIN_PAYMENT: Money = Money::from_cents(1);

#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceEditForm {
    invoice_id: Option<InvoiceId>,
    appointment_id: Option<AppointmentId>,
    original_paid: Money,
    appointment_total: Money,
    appointment_paid: Money,
    paid_text: String,
    paid_amount: Money,
    payment_type: Option<PaymentMethod>,
    used_products: Vec<UsedProduct>,
    notice: Option<FormNotice>,
}

impl InvoiceEditForm {
    pub fn new(invoice: &Invoice, appointment: &Appointment) -> Self {
        Self {
            invoice_id: invoice.invoice_id.clone(),
            appointment_id: invoice
                .appointment_id
                .clone()
                .or_else(|| appointment.appointment_id.clone()),
            original_paid: invoice.paid_amount,
            appointment_total: appointment.total_amount,
            appointment_paid: appointment.paid_amount,
            paid_text: invoice.paid_amount.to_string(),
            paid_amount: invoice.paid_amount,
            payment_type: invoice.payment_type,
            used_products: invoice.used_products.clone(),
            notice: None,
        }
    }

    pub fn invoice_id(&self) -> Option<&InvoiceId> {
        self.invoice_id.as_ref()
    }

    pub fn appointment_total(&self) -> Money {
        self.appointment_total
    }

    pub fn appointment_paid(&self) -> Money {
        self.appointment_paid
    }

    /// Balance of the appointment as currently recorded
    pub fn remaining_on_appointment(&self) -> Money {
        balance::remaining(self.appointment_total, self.appointment_paid)
    }

    /// Highest paid amount this invoice may carry
    pub fn cap(&self) -> Money {
        let paid_elsewhere = self.appointment_paid - self.original_paid;
        balance::remaining(self.appointment_total, paid_elsewhere)
    }

    pub fn paid_text(&self) -> &str {
        &self.paid_text
    }

    pub fn paid_amount(&self) -> Money {
        self.paid_amount
    }

    pub fn payment_type(&self) -> Option<PaymentMethod> {
        self.payment_type
    }

    pub fn used_products(&self) -> &[UsedProduct] {
        &self.used_products
    }

    pub fn notice(&self) -> Option<&FormNotice> {
        self.notice.as_ref()
    }

    pub fn set_payment_type(&mut self, method: Option<PaymentMethod>) {
        self.payment_type = method;
    }

    /// Apply new paid amount text, clamped to [`Self::cap`]
    pub fn input_paid(&mut self, raw: &str) -> Option<ClampOutcome> {
        if raw.trim().is_empty() {
            self.paid_amount = Money::zero();
            self.paid_text = String::new();
            self.notice = None;
            return None;
        }
        let outcome = clamp_payment_input(raw, self.cap());
        self.paid_amount = outcome.value();
        self.paid_text = if outcome.is_corrected() {
            self.paid_amount.to_string()
        } else {
            raw.to_string()
        };
        self.notice = outcome.message().map(|msg| {
            if outcome.is_rejected() {
                FormNotice::error(msg)
            } else {
                FormNotice::info(msg)
            }
        });
        Some(outcome)
    }

    /// Units of a product already on the invoice
    pub fn quantity_in_cart(&self, product_id: &ProductId) -> u32 {
        self.used_products
            .iter()
            .find(|p| &p.product_id == product_id)
            .map(|p| p.quantity)
            .unwrap_or(0)
    }

    /// Add units of a product, merging with an existing line
    ///
    /// Refused when the merged quantity exceeds the product's stock.
    pub fn add_product(&mut self, product: &Product, quantity: u32) -> CabinetResult<()> {
        if quantity < 1 {
            return Err(CabinetError::Validation(
                "quantity must be at least 1".into(),
            ));
        }
        let product_id = product
            .product_id
            .clone()
            .ok_or_else(|| CabinetError::Validation("product has no id".into()))?;

        let in_cart = self.quantity_in_cart(&product_id);
        let requested = in_cart.checked_add(quantity).ok_or_else(|| {
            CabinetError::Validation(format!(
                "quantity of '{}' is too large",
                product.product_name
            ))
        })?;
        if requested > product.quantity {
            return Err(CabinetError::InsufficientStock {
                product: product.product_name.clone(),
                available: product.quantity,
                requested,
            });
        }

        match self
            .used_products
            .iter_mut()
            .find(|p| p.product_id == product_id)
        {
            Some(existing) => existing.quantity = requested,
            None => self.used_products.push(UsedProduct {
                appointment_product_id: None,
                appointment_id: self.appointment_id.clone(),
                product_id,
                product_name: Some(product.product_name.clone()),
                quantity,
            }),
        }
        Ok(())
    }

    pub fn remove_product(&mut self, index: usize) -> Option<UsedProduct> {
        (index < self.used_products.len()).then(|| self.used_products.remove(index))
    }

    /// Build the update payload after validating every field
    pub fn to_update(&self) -> Result<InvoicePaymentUpdate, FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.check(
            self.paid_amount >= MIN_PAYMENT,
            "paidAmount",
            "must be at least 0.01",
        );
        errors.check(self.payment_type.is_some(), "paymentType", "is required");
        for product in &self.used_products {
            errors.check(product.quantity >= 1, "usedProducts", "quantities must be at least 1");
        }
        errors.into_result()?;

        Ok(InvoicePaymentUpdate {
            paid_amount: Some(self.paid_amount),
            payment_type: self.payment_type,
            used_products: (!self.used_products.is_empty()).then(|| self.used_products.clone()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> InvoiceEditForm {
        let appointment = Appointment {
            appointment_id: Some("a1".into()),
            total_amount: Money::from_cents(50000),
            paid_amount: Money::from_cents(30000),
            ..Appointment::default()
        };
        let invoice = Invoice {
            invoice_id: Some("i1".into()),
            appointment_id: Some("a1".into()),
            paid_amount: Money::from_cents(10000),
            payment_type: Some(PaymentMethod::Cash),
            ..Invoice::default()
        };
        InvoiceEditForm::new(&invoice, &appointment)
    }

    fn gloves(stock: u32) -> Product {
        let mut p = Product::new("Gloves", Money::from_cents(100), stock, 2);
        p.product_id = Some("g1".into());
        p
    }

    #[test]
    fn test_cap_excludes_own_contribution() {
        let form = setup();
        // 500 - (300 - 100)
        assert_eq!(form.cap(), Money::from_cents(30000));
        assert_eq!(form.remaining_on_appointment(), Money::from_cents(20000));
    }

    #[test]
    fn test_paid_capped() {
        let mut form = setup();
        assert_eq!(
            form.input_paid("400"),
            Some(ClampOutcome::Capped(Money::from_cents(30000)))
        );
        assert_eq!(form.paid_text(), "300.00");
    }

    #[test]
    fn test_products_merge_and_stock_check() {
        let mut form = setup();
        let product = gloves(5);
        form.add_product(&product, 2).unwrap();
        form.add_product(&product, 3).unwrap();
        assert_eq!(form.used_products().len(), 1);
        assert_eq!(form.quantity_in_cart(&"g1".into()), 5);

        let err = form.add_product(&product, 1).unwrap_err();
        assert!(matches!(
            err,
            CabinetError::InsufficientStock { available: 5, requested: 6, .. }
        ));
        assert_eq!(form.quantity_in_cart(&"g1".into()), 5);

        assert!(form.add_product(&product, 0).unwrap_err().is_validation());
    }

    #[test]
    fn test_quantity_overflow_refused() {
        let mut form = setup();
        let product = gloves(u32::MAX);
        form.add_product(&product, u32::MAX).unwrap();
        let err = form.add_product(&product, 1).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(form.quantity_in_cart(&"g1".into()), u32::MAX);
    }

    #[test]
    fn test_update_payload() {
        let mut form = setup();
        let update = form.to_update().unwrap();
        assert_eq!(update.paid_amount, Some(Money::from_cents(10000)));
        assert!(update.used_products.is_none());

        form.add_product(&gloves(9), 1).unwrap();
        let update = form.to_update().unwrap();
        let products = update.used_products.unwrap();
        assert_eq!(products[0].appointment_id, Some("a1".into()));

        form.remove_product(0);
        assert!(form.remove_product(0).is_none());
    }

    #[test]
    fn test_update_requires_amount_and_type() {
        let mut form = setup();
        form.set_payment_type(None);
        form.input_paid("0");
        let errors = form.to_update().unwrap_err();
        assert!(errors.has("paidAmount"));
        assert!(errors.has("paymentType"));
    }
}
