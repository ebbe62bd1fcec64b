//! Appointment service: booking, pricing and invoicing

use chrono::NaiveDate;
use tracing::info;

use super::catalog::CatalogService;
use super::records::Records;
use super::Backend;
use crate::audit::{AuditEntry, EntityType};
use crate::billing::PricingForm;
use crate::error::CabinetResult;
use crate::models::{
    Appointment, AppointmentId, AppointmentStatus, DoctorId, Invoice, Money, PatientId,
    PaymentStatus, ServiceId,
};

/// Everything needed to book an appointment
#[derive(Debug, Clone)]
pub struct AppointmentDraft {
    pub patient: PatientId,
    pub doctor: DoctorId,
    pub date: NaiveDate,
    pub start: String,
    pub end: String,
    pub service_ids: Vec<ServiceId>,
    /// Typed total replacing the sum of the services
    pub custom_total: Option<Money>,
    pub description: String,
}

/// How to price an appointment on reprice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceChange {
    Custom(Money),
    /// Drop the override and sum the services again
    Computed,
}

/// Criteria for listing appointments; unset fields match everything
#[derive(Debug, Clone, Default)]
pub struct AppointmentFilter {
    pub date: Option<NaiveDate>,
    pub status: Option<AppointmentStatus>,
    pub payment: Option<PaymentStatus>,
    pub doctor: Option<DoctorId>,
    pub patient: Option<PatientId>,
    pub query: String,
}

impl AppointmentFilter {
    pub fn matches(&self, appt: &Appointment) -> bool {
        self.date.map_or(true, |d| appt.date_appointment == Some(d))
            && self.status.map_or(true, |s| appt.appointment_status == s)
            && self.payment.map_or(true, |p| appt.payment_status == p)
            && self
                .doctor
                .as_ref()
                .map_or(true, |d| appt.doctor_id.as_ref() == Some(d))
            && self
                .patient
                .as_ref()
                .map_or(true, |p| appt.patient_id.as_ref() == Some(p))
            && appt.matches(&self.query)
    }
}

pub struct AppointmentService<'a> {
    backend: &'a Backend,
    records: Records<'a, Appointment>,
}

impl<'a> AppointmentService<'a> {
    pub fn new(backend: &'a Backend) -> Self {
        Self {
            backend,
            records: Records::new(backend),
        }
    }

    pub fn records(&self) -> &Records<'a, Appointment> {
        &self.records
    }

    /// Appointments matching `filter`, by date then start time
    pub fn list(&self, filter: &AppointmentFilter) -> CabinetResult<Vec<Appointment>> {
        let mut appointments: Vec<Appointment> = self
            .records
            .list()?
            .into_iter()
            .filter(|a| filter.matches(a))
            .collect();
        appointments.sort_by(|a, b| {
            a.date_appointment
                .cmp(&b.date_appointment)
                .then_with(|| a.start_time.cmp(&b.start_time))
        });
        Ok(appointments)
    }

    pub fn get(&self, id: &str) -> CabinetResult<Appointment> {
        self.records.get(id)
    }

    pub fn for_patient(&self, patient: &PatientId) -> CabinetResult<Vec<Appointment>> {
        self.backend.api().appointments_for_patient(patient)
    }

    /// Build the appointment a draft describes, pricing it from the catalog
    pub fn build(&self, draft: &AppointmentDraft) -> CabinetResult<Appointment> {
        let services = CatalogService::new(self.backend).resolve_services(&draft.service_ids)?;

        let mut appointment = Appointment::new(
            draft.patient.clone(),
            draft.doctor.clone(),
            draft.date,
            draft.start.trim(),
            draft.end.trim(),
        );
        appointment.description = draft.description.clone();

        let mut pricing = PricingForm::for_services(&services)?;
        if let Some(total) = draft.custom_total {
            pricing.set_custom_price(true);
            pricing.set_total(total)?;
        }
        pricing.apply_to(&mut appointment);
        appointment.services = services;
        Ok(appointment)
    }

    /// Book the appointment; returns what was sent and the confirmation
    pub fn create(&self, draft: &AppointmentDraft) -> CabinetResult<(Appointment, String)> {
        let appointment = self.build(draft)?;
        let message = self.records.create(&appointment)?;
        Ok((appointment, message))
    }

    /// Replace the services and/or change the price override
    pub fn reprice(
        &self,
        id: &str,
        service_ids: Option<&[ServiceId]>,
        price: Option<PriceChange>,
    ) -> CabinetResult<(Appointment, String)> {
        let services = match service_ids {
            Some(ids) => Some(CatalogService::new(self.backend).resolve_services(ids)?),
            None => None,
        };

        self.records.modify(id, |appt| {
            let mut pricing = PricingForm::from_appointment(appt)?;
            if let Some(services) = services {
                pricing.clear_lines();
                for service in &services {
                    pricing.add_service(service)?;
                }
                appt.services = services;
            }
            match price {
                Some(PriceChange::Custom(total)) => {
                    pricing.set_custom_price(true);
                    pricing.set_total(total)?;
                }
                Some(PriceChange::Computed) => pricing.set_custom_price(false),
                None => {}
            }
            pricing.apply_to(appt);
            Ok(())
        })
    }

    pub fn set_status(&self, id: &str, status: AppointmentStatus) -> CabinetResult<Appointment> {
        let (appointment, _) = self.records.modify(id, |appt| {
            appt.appointment_status = status;
            Ok(())
        })?;
        Ok(appointment)
    }

    /// Mark the whole appointment as paid
    pub fn mark_paid(&self, id: &AppointmentId) -> CabinetResult<Appointment> {
        let appointment = self.backend.api().mark_appointment_paid(id)?;
        info!(appointment = %id, "marked paid");
        self.backend.record(AuditEntry::payment(
            EntityType::Appointment,
            id.as_str(),
            appointment.patient_name.clone(),
            &serde_json::json!({ "paymentStatus": "PAID" }),
            "marked paid",
        ));
        Ok(appointment)
    }

    /// Issue an invoice for an appointment
    pub fn generate_invoice(&self, id: &AppointmentId) -> CabinetResult<Invoice> {
        let invoice = self.backend.api().generate_invoice(id)?;
        info!(appointment = %id, invoice = %invoice.id_display(), "invoice generated");
        self.backend.log_create(
            EntityType::Invoice,
            invoice.invoice_id.as_ref().map(|i| i.to_string()),
            invoice
                .patient_name
                .clone()
                .unwrap_or_else(|| format!("appointment {}", id)),
            &invoice,
        );
        Ok(invoice)
    }

    pub fn invoices(&self, id: &AppointmentId) -> CabinetResult<Vec<Invoice>> {
        self.backend.api().invoices_for_appointment(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::MockTransport;
    use crate::api::{Body, Method};
    use crate::audit::Operation;
    use crate::services::test_support::{audit_entries, backend};
    use serde_json::json;

    fn catalog(mock: &MockTransport) {
        mock.on_json(
            Method::Get,
            "services/",
            json!([
                {"serviceId": "s1", "serviceName": "Consultation", "price": 100},
                {"serviceId": "s2", "serviceName": "Cleaning", "price": 150}
            ]),
        );
    }

    fn draft() -> AppointmentDraft {
        AppointmentDraft {
            patient: "p1".into(),
            doctor: "d1".into(),
            date: NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
            start: "09:00".into(),
            end: "09:30".into(),
            service_ids: vec!["s1".into(), "s2".into()],
            custom_total: None,
            description: String::new(),
        }
    }

    fn sent_body(mock: &MockTransport) -> serde_json::Value {
        match mock.last_request().unwrap().body {
            Body::Json(body) => body,
            other => panic!("unexpected body {other:?}"),
        }
    }

    #[test]
    fn test_build_sums_services() {
        let mock = MockTransport::new();
        catalog(&mock);
        let (backend, _t) = backend(&mock);
        let appt = AppointmentService::new(&backend).build(&draft()).unwrap();
        assert_eq!(appt.total_amount, Money::from_cents(25000));
        assert!(!appt.is_custom_price);
        assert_eq!(appt.appointment_status, AppointmentStatus::Pending);
        assert_eq!(appt.payment_status, PaymentStatus::Pending);
    }

    #[test]
    fn test_create_with_custom_total() {
        let mock = MockTransport::new();
        catalog(&mock);
        mock.on(Method::Post, "api/appointments", 200, "Appointment created");
        let (backend, _t) = backend(&mock);

        let mut d = draft();
        d.custom_total = Some(Money::from_cents(99900));
        AppointmentService::new(&backend).create(&d).unwrap();

        let body = sent_body(&mock);
        assert_eq!(body["totalAmount"], 999.0);
        assert_eq!(body["isCustomPrice"], true);
        assert_eq!(body["services"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_create_rejects_end_before_start() {
        let mock = MockTransport::new();
        catalog(&mock);
        let (backend, _t) = backend(&mock);
        let mut d = draft();
        d.end = "08:00".into();
        let err = AppointmentService::new(&backend).create(&d).unwrap_err();
        assert!(err.to_string().contains("endTime"));
        assert_eq!(mock.count(Method::Post, "api/appointments"), 0);
    }

    #[test]
    fn test_reprice_back_to_computed() {
        let mock = MockTransport::new();
        mock.on_json(
            Method::Get,
            "appointments/a1",
            json!({
                "appointmentId": "a1", "patientId": "p1", "doctorId": "d1",
                "dateAppointment": "2025-06-02", "startTime": "09:00", "endTime": "09:30",
                "totalAmount": 999, "isCustomPrice": true,
                "services": [
                    {"serviceId": "s1", "serviceName": "Consultation", "price": 100},
                    {"serviceId": "s2", "serviceName": "Cleaning", "price": 150}
                ]
            }),
        );
        mock.on(Method::Put, "appointments/a1", 200, "Appointment updated");
        let (backend, _t) = backend(&mock);

        let (appt, _) = AppointmentService::new(&backend)
            .reprice("a1", None, Some(PriceChange::Computed))
            .unwrap();
        assert_eq!(appt.total_amount, Money::from_cents(25000));
        assert!(!appt.is_custom_price);
        assert_eq!(sent_body(&mock)["totalAmount"], 250.0);
    }

    #[test]
    fn test_filter() {
        let mut appt = Appointment::new(
            "p1".into(),
            "d1".into(),
            NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
            "09:00",
            "09:30",
        );
        appt.appointment_status = AppointmentStatus::Scheduled;

        let mut filter = AppointmentFilter {
            status: Some(AppointmentStatus::Scheduled),
            doctor: Some("d1".into()),
            ..Default::default()
        };
        assert!(filter.matches(&appt));
        filter.date = NaiveDate::from_ymd_opt(2025, 6, 3);
        assert!(!filter.matches(&appt));
    }

    #[test]
    fn test_generate_invoice_is_audited() {
        let mock = MockTransport::new();
        mock.on_json(
            Method::Post,
            "appointments/a1/invoices",
            json!({"invoiceId": "i1", "appointmentId": "a1", "totalAmount": 250}),
        );
        let (backend, _t) = backend(&mock);
        let invoice = AppointmentService::new(&backend)
            .generate_invoice(&"a1".into())
            .unwrap();
        assert_eq!(invoice.total_amount, Money::from_cents(25000));

        let entries = audit_entries(&backend);
        assert_eq!(entries[0].operation, Operation::Create);
        assert_eq!(entries[0].entity_type, EntityType::Invoice);
        assert_eq!(entries[0].entity_id, "i1");
    }
}
