//! Appointment model
//!
//! An appointment books a patient with a doctor for a time slot and carries
//! the billable services performed, the agreed total and how much of it has
//! been paid so far.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::catalog::CabinetService;
use super::dates;
use super::ids::{AppointmentId, DoctorId, InvoiceId, PatientId};
use super::invoice::{Invoice, PaymentStatus};
use super::money::{self, Money};
use super::validation::FieldErrors;
use crate::billing::{balance, LineItem};

/// Scheduling state of an appointment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppointmentStatus {
    #[default]
    Pending,
    Scheduled,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "scheduled" => Some(Self::Scheduled),
            "completed" | "done" => Some(Self::Completed),
            "cancelled" | "canceled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "Pending"),
            Self::Scheduled => write!(f, "Scheduled"),
            Self::Completed => write!(f, "Completed"),
            Self::Cancelled => write!(f, "Cancelled"),
        }
    }
}

/// A booked appointment
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub appointment_id: Option<AppointmentId>,

    #[serde(default)]
    pub patient_id: Option<PatientId>,

    #[serde(default)]
    pub doctor_id: Option<DoctorId>,

    #[serde(default, with = "dates::optional")]
    pub date_appointment: Option<NaiveDate>,

    /// Slot start, "HH:MM"
    #[serde(default)]
    pub start_time: String,

    /// Slot end, "HH:MM"
    #[serde(default)]
    pub end_time: String,

    #[serde(default)]
    pub appointment_status: AppointmentStatus,

    #[serde(default)]
    pub payment_status: PaymentStatus,

    #[serde(default)]
    pub description: String,

    #[serde(default, deserialize_with = "money::deserialize_nullable")]
    pub total_amount: Money,

    #[serde(default, deserialize_with = "money::deserialize_nullable")]
    pub paid_amount: Money,

    #[serde(default)]
    pub is_related: bool,

    /// When set, `total_amount` was typed in instead of summed from services
    #[serde(default)]
    pub is_custom_price: bool,

    #[serde(default)]
    pub services: Vec<CabinetService>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub invoices: Vec<Invoice>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_id: Option<InvoiceId>,

    /// Display-only names resolved by the backend
    #[serde(default, skip_serializing)]
    pub patient_name: Option<String>,

    #[serde(default, skip_serializing)]
    pub doctor_name: Option<String>,
}

impl Appointment {
    /// Create a new pending appointment
    pub fn new(
        patient_id: PatientId,
        doctor_id: DoctorId,
        date: NaiveDate,
        start_time: impl Into<String>,
        end_time: impl Into<String>,
    ) -> Self {
        Self {
            patient_id: Some(patient_id),
            doctor_id: Some(doctor_id),
            date_appointment: Some(date),
            start_time: start_time.into(),
            end_time: end_time.into(),
            ..Self::default()
        }
    }

    /// Amount still owed on this appointment
    pub fn remaining(&self) -> Money {
        balance::remaining(self.total_amount, self.paid_amount)
    }

    /// Selected services as pricing lines
    pub fn line_items(&self) -> Vec<LineItem> {
        self.services.iter().map(LineItem::from).collect()
    }

    pub fn is_fully_paid(&self) -> bool {
        self.payment_status == PaymentStatus::Paid || self.remaining().is_zero()
    }

    /// Validate before submission
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();

        errors.check(self.patient_id.is_some(), "patientId", "is required");
        errors.check(self.doctor_id.is_some(), "doctorId", "is required");
        errors.check(self.date_appointment.is_some(), "dateAppointment", "is required");

        let start = parse_time(&self.start_time);
        let end = parse_time(&self.end_time);
        errors.check(start.is_some(), "startTime", "must be a time like 09:30");
        errors.check(end.is_some(), "endTime", "must be a time like 10:00");
        if let (Some(start), Some(end)) = (start, end) {
            errors.check(start < end, "endTime", "must be after the start time");
        }

        errors.check(
            !self.total_amount.is_negative(),
            "totalAmount",
            "must be non-negative",
        );
        for service in &self.services {
            errors.check(service.service_id.is_some(), "services", "every line needs a service");
            errors.check(!service.price.is_negative(), "services", "prices must be non-negative");
        }

        errors.into_result()
    }

    /// Filter over patient/doctor names, description and status
    pub fn matches(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        let haystack = format!(
            "{} {} {} {} {}",
            self.patient_name.as_deref().unwrap_or_default(),
            self.doctor_name.as_deref().unwrap_or_default(),
            self.description,
            self.appointment_status,
            self.payment_status,
        )
        .to_lowercase();
        haystack.contains(&needle)
    }

    /// Id as display text, "-" before creation
    pub fn id_display(&self) -> String {
        self.appointment_id
            .as_ref()
            .map(|id| id.to_string())
            .unwrap_or_else(|| "-".to_string())
    }
}

/// Parse "HH:MM" or "HH:MM:SS"
pub fn parse_time(s: &str) -> Option<NaiveTime> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .ok()
}
