//! Billing rules applied while editing appointments and invoices
//!
//! Everything here is pure and synchronous: the forms hold the values being
//! edited and only turn into backend requests once submitted through the
//! service layer.

pub mod balance;
pub mod clamp;
pub mod invoice_edit;
pub mod line_items;
pub mod payment;
pub mod pricing;

pub use balance::remaining;
pub use clamp::{clamp_amount, clamp_payment_input, parse_leading_number, ClampOutcome};
pub use invoice_edit::InvoiceEditForm;
pub use line_items::{aggregate, LineItem};
pub use payment::{FormNotice, NoticeLevel, PaymentDecision, PaymentForm};
pub use pricing::PricingForm;
