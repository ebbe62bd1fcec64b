//! Invoice pay form
//!
//! Holds the amount being typed for a payment on one invoice. Every edit
//! goes through the clamp; a corrected value is written back into the field
//! text directly, so the clamp never sees its own output as a new edit.

use super::balance;
use super::clamp::{clamp_payment_input, ClampOutcome};
use crate::models::{FieldErrors, Invoice, InvoiceId, Money, PaymentMethod, PaymentRequest};

const MIN_PAYMENT: Money = Money::from_cents(1);

/// Severity of a form notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// Message raised by the last edit or submission attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormNotice {
    pub level: NoticeLevel,
    pub message: String,
}

impl FormNotice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// What submitting the form should do
#[derive(Debug, Clone, PartialEq)]
pub enum PaymentDecision {
    /// Send this payment
    Send(PaymentRequest),
    /// Nothing to send; tell the user why
    Settled(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaymentForm {
    invoice_id: Option<InvoiceId>,
    total: Money,
    paid: Money,
    already_paid: bool,
    amount_text: String,
    amount: Money,
    method: Option<PaymentMethod>,
    notice: Option<FormNotice>,
}

impl PaymentForm {
    /// Open the form on an invoice, prefilled with the remaining amount
    pub fn for_invoice(invoice: &Invoice, method: PaymentMethod) -> Self {
        let mut form = Self {
            invoice_id: invoice.invoice_id.clone(),
            total: invoice.total_amount,
            paid: invoice.paid_amount,
            already_paid: invoice.is_paid(),
            amount_text: String::new(),
            amount: Money::zero(),
            method: Some(method),
            notice: None,
        };
        form.amount = form.remaining();
        form.amount_text = form.amount.to_string();
        form
    }

    pub fn invoice_id(&self) -> Option<&InvoiceId> {
        self.invoice_id.as_ref()
    }

    pub fn total(&self) -> Money {
        self.total
    }

    pub fn paid(&self) -> Money {
        self.paid
    }

    /// Payable amount; zero once the invoice is marked paid
    pub fn remaining(&self) -> Money {
        if self.already_paid {
            Money::zero()
        } else {
            balance::remaining(self.total, self.paid)
        }
    }

    /// The amount field is locked at zero
    pub fn is_disabled(&self) -> bool {
        self.remaining().is_zero()
    }

    pub fn amount_text(&self) -> &str {
        &self.amount_text
    }

    pub fn amount(&self) -> Money {
        self.amount
    }

    pub fn method(&self) -> Option<PaymentMethod> {
        self.method
    }

    pub fn notice(&self) -> Option<&FormNotice> {
        self.notice.as_ref()
    }

    pub fn set_method(&mut self, method: Option<PaymentMethod>) {
        self.method = method;
    }

    /// Move to the next payment method
    pub fn cycle_method(&mut self) {
        let next = match self.method {
            None => PaymentMethod::Cash,
            Some(current) => {
                let pos = PaymentMethod::ALL.iter().position(|m| *m == current).unwrap_or(0);
                PaymentMethod::ALL[(pos + 1) % PaymentMethod::ALL.len()]
            }
        };
        self.method = Some(next);
    }

    /// Apply a new field text
    ///
    /// Blank text clears the field without a notice and returns `None`.
    pub fn input(&mut self, raw: &str) -> Option<ClampOutcome> {
        if raw.trim().is_empty() {
            self.amount = Money::zero();
            self.amount_text = String::new();
            self.notice = None;
            return None;
        }

        let outcome = clamp_payment_input(raw, self.remaining());
        self.amount = outcome.value();
        self.amount_text = if outcome.is_corrected() {
            self.amount.to_string()
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

    /// Decide what to send
    ///
    /// A paid invoice or a zero balance short-circuits with a notice. Otherwise
    /// the amount must be at least 0.01 and a method must be chosen.
    pub fn prepare(&self) -> Result<PaymentDecision, FieldErrors> {
        if self.already_paid {
            return Ok(PaymentDecision::Settled(
                "This invoice is already fully paid.".to_string(),
            ));
        }
        let remaining = self.remaining();
        if remaining.is_zero() {
            return Ok(PaymentDecision::Settled(
                "No remaining amount to pay for this invoice.".to_string(),
            ));
        }

        let mut errors = FieldErrors::new();
        errors.check(
            self.amount >= MIN_PAYMENT,
            "paymentAmount",
            "must be at least 0.01",
        );
        errors.check(self.method.is_some(), "paymentType", "is required");
        errors.into_result()?;

        match self.method {
            Some(payment_type) => Ok(PaymentDecision::Send(PaymentRequest {
                payment_amount: self.amount.min(remaining),
                payment_type,
            })),
            None => Err(FieldErrors::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PaymentStatus;

    fn invoice(total: i64, paid: i64) -> Invoice {
        Invoice {
            invoice_id: Some("inv-1".into()),
            total_amount: Money::from_cents(total),
            paid_amount: Money::from_cents(paid),
            invoice_status: PaymentStatus::PartiallyPaid,
            ..Invoice::default()
        }
    }

    #[test]
    fn test_prefilled_with_remaining() {
        let form = PaymentForm::for_invoice(&invoice(50000, 20000), PaymentMethod::Cash);
        assert_eq!(form.amount(), Money::from_cents(30000));
        assert_eq!(form.amount_text(), "300.00");
        assert!(!form.is_disabled());
    }

    #[test]
    fn test_over_remaining_is_written_back() {
        let mut form = PaymentForm::for_invoice(&invoice(50000, 20000), PaymentMethod::Cash);
        let outcome = form.input("450").unwrap();
        assert_eq!(outcome, ClampOutcome::Capped(Money::from_cents(30000)));
        assert_eq!(form.amount_text(), "300.00");
        assert_eq!(form.notice().unwrap().level, NoticeLevel::Info);

        // feeding the corrected text back changes nothing
        let text = form.amount_text().to_string();
        assert_eq!(form.input(&text), Some(ClampOutcome::Accepted(Money::from_cents(30000))));
        assert_eq!(form.amount_text(), "300.00");
        assert!(form.notice().is_none());
    }

    #[test]
    fn test_accepted_text_kept_verbatim() {
        let mut form = PaymentForm::for_invoice(&invoice(50000, 20000), PaymentMethod::Cash);
        form.input("12.");
        assert_eq!(form.amount_text(), "12.");
        assert_eq!(form.amount(), Money::from_cents(1200));
    }

    #[test]
    fn test_invalid_resets() {
        let mut form = PaymentForm::for_invoice(&invoice(50000, 20000), PaymentMethod::Cash);
        assert_eq!(form.input("-4"), Some(ClampOutcome::Invalid));
        assert_eq!(form.amount_text(), "0.00");
        assert_eq!(form.notice().unwrap().level, NoticeLevel::Error);
        assert!(form.prepare().unwrap_err().has("paymentAmount"));
    }

    #[test]
    fn test_blank_clears_quietly() {
        let mut form = PaymentForm::for_invoice(&invoice(50000, 20000), PaymentMethod::Cash);
        assert_eq!(form.input("  "), None);
        assert_eq!(form.amount(), Money::zero());
        assert!(form.notice().is_none());
    }

    #[test]
    fn test_fully_paid_is_disabled_and_rejects() {
        let mut form = PaymentForm::for_invoice(&invoice(10000, 10000), PaymentMethod::Card);
        assert!(form.is_disabled());
        assert_eq!(form.amount(), Money::zero());
        assert_eq!(form.input("5"), Some(ClampOutcome::NothingDue));
        assert_eq!(form.amount(), Money::zero());
        assert_eq!(form.notice().unwrap().level, NoticeLevel::Error);
        assert!(matches!(form.prepare(), Ok(PaymentDecision::Settled(_))));
    }

    #[test]
    fn test_paid_status_short_circuits() {
        let mut inv = invoice(50000, 20000);
        inv.invoice_status = PaymentStatus::Paid;
        let form = PaymentForm::for_invoice(&inv, PaymentMethod::Cash);
        assert!(form.is_disabled());
        match form.prepare().unwrap() {
            PaymentDecision::Settled(msg) => assert!(msg.contains("already")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_prepare_sends_request() {
        let mut form = PaymentForm::for_invoice(&invoice(50000, 20000), PaymentMethod::Cash);
        form.input("100");
        form.cycle_method();
        match form.prepare().unwrap() {
            PaymentDecision::Send(req) => {
                assert_eq!(req.payment_amount, Money::from_cents(10000));
                assert_eq!(req.payment_type, PaymentMethod::Card);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_method_required() {
        let mut form = PaymentForm::for_invoice(&invoice(50000, 20000), PaymentMethod::Cash);
        form.set_method(None);
        form.input("0");
        let errors = form.prepare().unwrap_err();
        assert!(errors.has("paymentType"));
        assert!(errors.has("paymentAmount"));
    }
}
