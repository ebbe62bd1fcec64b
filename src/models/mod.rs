//! Core data models for cabinet-cli
//!
//! These mirror the records exchanged with the cabinet backend: patients,
//! staff, the service and product catalogs, appointments and invoices.

pub mod appointment;
pub mod catalog;
pub mod dates;
pub mod ids;
pub mod invoice;
pub mod money;
pub mod patient;
pub mod person;
pub mod staff;
pub mod validation;

pub use appointment::{Appointment, AppointmentStatus};
pub use catalog::{CabinetService, Product};
pub use ids::{AppointmentId, DoctorId, InvoiceId, PatientId, ProductId, ReceptionistId, ServiceId};
pub use invoice::{
    Invoice, InvoicePaymentUpdate, PaymentMethod, PaymentRequest, PaymentStatus, UsedProduct,
};
pub use money::Money;
pub use patient::Patient;
pub use person::Person;
pub use staff::{Doctor, Receptionist};
pub use validation::{FieldError, FieldErrors};
