//! Invoice service: listing, payments and payment edits

use tracing::{info, warn};

use super::records::Records;
use super::Backend;
use crate::audit::{AuditEntry, EntityType};
use crate::billing::{FormNotice, InvoiceEditForm, PaymentDecision, PaymentForm};
use crate::error::{CabinetError, CabinetResult};
use crate::models::{
    Appointment, Invoice, InvoiceId, PatientId, PaymentMethod, PaymentStatus, Product, ProductId,
};

/// Result of a pay request
#[derive(Debug, Clone, PartialEq)]
pub enum PaymentOutcome {
    /// The backend recorded the payment; `notice` reports a corrected amount
    Paid {
        invoice: Invoice,
        notice: Option<FormNotice>,
    },
    /// Nothing was sent because nothing is owed
    Settled(String),
}

/// Changes to an invoice's payment details; unset fields stay as they are
#[derive(Debug, Clone, Default)]
pub struct InvoiceEdit {
    pub paid: Option<String>,
    pub method: Option<PaymentMethod>,
    pub add_products: Vec<(ProductId, u32)>,
    pub remove_products: Vec<ProductId>,
}

pub struct InvoiceService<'a> {
    backend: &'a Backend,
    records: Records<'a, Invoice>,
}

impl<'a> InvoiceService<'a> {
    pub fn new(backend: &'a Backend) -> Self {
        Self {
            backend,
            records: Records::new(backend),
        }
    }

    /// Invoices matching `query`, optionally by status, newest first
    pub fn list(&self, query: &str, status: Option<PaymentStatus>) -> CabinetResult<Vec<Invoice>> {
        let mut invoices: Vec<Invoice> = self
            .records
            .search(query)?
            .into_iter()
            .filter(|i| status.map_or(true, |s| i.invoice_status == s))
            .collect();
        invoices.sort_by(|a, b| b.invoice_date.cmp(&a.invoice_date));
        Ok(invoices)
    }

    pub fn get(&self, id: &str) -> CabinetResult<Invoice> {
        self.records.get(id)
    }

    pub fn for_patient(&self, patient: &PatientId) -> CabinetResult<Vec<Invoice>> {
        self.backend.api().invoices_for_patient(patient)
    }

    pub fn for_appointment(&self, appointment: &str) -> CabinetResult<Vec<Invoice>> {
        self.backend.api().invoices_for_appointment(&appointment.into())
    }

    pub fn create(&self, invoice: &Invoice) -> CabinetResult<String> {
        self.records.create(invoice)
    }

    pub fn delete(&self, id: &str) -> CabinetResult<String> {
        self.records.delete(id)
    }

    /// Pay on an invoice
    ///
    /// `amount` is raw user text; `None` pays the remaining balance. The
    /// method falls back to the configured default.
    pub fn pay(
        &self,
        id: &str,
        amount: Option<&str>,
        method: Option<PaymentMethod>,
    ) -> CabinetResult<PaymentOutcome> {
        let invoice = self.get(id)?;
        let method = method.unwrap_or(self.backend.settings().default_payment_method);
        let mut form = PaymentForm::for_invoice(&invoice, method);

        if let Some(raw) = amount.filter(|_| !form.is_disabled()) {
            if let Some(outcome) = form.input(raw) {
                if outcome.is_rejected() {
                    return Err(CabinetError::Payment(
                        outcome.message().unwrap_or_default(),
                    ));
                }
            }
        }

        let request = match form.prepare()? {
            PaymentDecision::Settled(message) => return Ok(PaymentOutcome::Settled(message)),
            PaymentDecision::Send(request) => request,
        };

        let invoice_id: InvoiceId = id.trim().into();
        let updated = self.backend.api().pay_invoice(&invoice_id, &request)?;
        info!(
            invoice = %invoice_id,
            amount = %request.payment_amount,
            method = %request.payment_type,
            "payment recorded"
        );
        self.backend.record(AuditEntry::payment(
            EntityType::Invoice,
            invoice_id.as_str(),
            invoice.patient_name.clone(),
            &request,
            format!("paid {} by {}", request.payment_amount, request.payment_type),
        ));

        Ok(PaymentOutcome::Paid {
            invoice: updated,
            notice: form.notice().cloned(),
        })
    }

    /// Change paid amount, method or used products of an invoice
    pub fn edit_payment(&self, id: &str, edit: &InvoiceEdit) -> CabinetResult<(Invoice, String)> {
        let before = self.get(id)?;
        let appointment_id = before.appointment_id.clone().ok_or_else(|| {
            CabinetError::Validation("Invoice is not linked to an appointment.".into())
        })?;
        let appointment: Appointment = self.backend.api().get(appointment_id.as_str())?;

        let mut form = InvoiceEditForm::new(&before, &appointment);
        if let Some(raw) = edit.paid.as_deref() {
            if let Some(outcome) = form.input_paid(raw) {
                if outcome.is_rejected() {
                    return Err(CabinetError::Payment(
                        outcome.message().unwrap_or_default(),
                    ));
                }
                if let Some(message) = outcome.message() {
                    warn!(invoice = id, "{}", message);
                }
            }
        }
        if let Some(method) = edit.method {
            form.set_payment_type(Some(method));
        }
        for product_id in &edit.remove_products {
            let index = form
                .used_products()
                .iter()
                .position(|p| &p.product_id == product_id)
                .ok_or_else(|| CabinetError::product_not_found(product_id.as_str()))?;
            form.remove_product(index);
        }
        for (product_id, quantity) in &edit.add_products {
            let product: Product = self.backend.api().get(product_id.as_str())?;
            form.add_product(&product, *quantity)?;
        }

        let update = form.to_update()?;
        let invoice_id: InvoiceId = id.trim().into();
        let message = self
            .backend
            .api()
            .update_invoice_payment(&invoice_id, &update)?;

        let mut after = before.clone();
        if let Some(paid) = update.paid_amount {
            after.paid_amount = paid;
        }
        after.payment_type = update.payment_type.or(after.payment_type);
        after.used_products = update.used_products.clone().unwrap_or_default();

        info!(invoice = %invoice_id, "payment details updated");
        self.backend.log_update(
            EntityType::Invoice,
            invoice_id.as_str(),
            after.patient_name.clone().unwrap_or_else(|| after.id_display()),
            &before,
            &after,
        );
        Ok((after, message))
    }
}
