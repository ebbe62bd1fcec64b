//! Endpoint descriptors per backend record type

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::audit::EntityType;
use crate::models::{
    Appointment, CabinetService, Doctor, FieldErrors, Invoice, Patient, Product, Receptionist,
};

/// A record type the backend exposes as a CRUD collection
///
/// Create, update and delete answer with a plain-text message; list and get
/// answer with JSON records.
pub trait Resource: Serialize + DeserializeOwned + Clone {
    const KIND: EntityType;

    /// `GET` path of the collection
    const LIST_PATH: &'static str;

    /// Prefix of `GET`/`PUT`/`DELETE` item paths
    const ITEM_PATH: &'static str;

    /// `POST` path for new records
    const CREATE_PATH: &'static str;

    /// Backend id, `None` before creation
    fn resource_id(&self) -> Option<String>;

    /// Name shown in messages and the audit log
    fn display_name(&self) -> String;

    fn check(&self) -> Result<(), FieldErrors>;

    /// Case-insensitive filter predicate
    fn matches_query(&self, query: &str) -> bool;

    fn item_path(id: &str) -> String {
        format!("{}/{}", Self::ITEM_PATH, id)
    }
}

impl Resource for Patient {
    const KIND: EntityType = EntityType::Patient;
    const LIST_PATH: &'static str = "patients/";
    const ITEM_PATH: &'static str = "patients";
    const CREATE_PATH: &'static str = "patients/add";

    fn resource_id(&self) -> Option<String> {
        self.patient_id.as_ref().map(|id| id.to_string())
    }

    fn display_name(&self) -> String {
        self.person.name.clone()
    }

    fn check(&self) -> Result<(), FieldErrors> {
        self.validate()
    }

    fn matches_query(&self, query: &str) -> bool {
        self.matches(query)
    }
}

impl Resource for Doctor {
    const KIND: EntityType = EntityType::Doctor;
    const LIST_PATH: &'static str = "admin/doctors";
    const ITEM_PATH: &'static str = "admin/doctors";
    const CREATE_PATH: &'static str = "admin/addDoctor";

    fn resource_id(&self) -> Option<String> {
        self.doctor_id.as_ref().map(|id| id.to_string())
    }

    fn display_name(&self) -> String {
        format!("Dr. {}", self.person.name)
    }

    fn check(&self) -> Result<(), FieldErrors> {
        self.validate()
    }

    fn matches_query(&self, query: &str) -> bool {
        self.matches(query)
    }
}

impl Resource for Receptionist {
    const KIND: EntityType = EntityType::Receptionist;
    const LIST_PATH: &'static str = "admin/receptionists";
    const ITEM_PATH: &'static str = "admin/receptionists";
    const CREATE_PATH: &'static str = "admin/addReceptionist";

    fn resource_id(&self) -> Option<String> {
        self.receptionist_id.as_ref().map(|id| id.to_string())
    }

    fn display_name(&self) -> String {
        self.person.name.clone()
    }

    fn check(&self) -> Result<(), FieldErrors> {
        self.validate()
    }

    fn matches_query(&self, query: &str) -> bool {
        self.matches(query)
    }
}

impl Resource for CabinetService {
    const KIND: EntityType = EntityType::Service;
    const LIST_PATH: &'static str = "services/";
    const ITEM_PATH: &'static str = "services";
    const CREATE_PATH: &'static str = "services/add";

    fn resource_id(&self) -> Option<String> {
        self.service_id.as_ref().map(|id| id.to_string())
    }

    fn display_name(&self) -> String {
        self.service_name.clone()
    }

    fn check(&self) -> Result<(), FieldErrors> {
        self.validate()
    }

    fn matches_query(&self, query: &str) -> bool {
        self.matches(query)
    }
}

impl Resource for Product {
    const KIND: EntityType = EntityType::Product;
    const LIST_PATH: &'static str = "products/";
    const ITEM_PATH: &'static str = "products";
    const CREATE_PATH: &'static str = "products/add";

    fn resource_id(&self) -> Option<String> {
        self.product_id.as_ref().map(|id| id.to_string())
    }

    fn display_name(&self) -> String {
        self.product_name.clone()
    }

    fn check(&self) -> Result<(), FieldErrors> {
        self.validate()
    }

    fn matches_query(&self, query: &str) -> bool {
        self.matches(query)
    }
}

impl Resource for Appointment {
    const KIND: EntityType = EntityType::Appointment;
    const LIST_PATH: &'static str = "appointments";
    const ITEM_PATH: &'static str = "appointments";
    const CREATE_PATH: &'static str = "appointments";

    fn resource_id(&self) -> Option<String> {
        self.appointment_id.as_ref().map(|id| id.to_string())
    }

    fn display_name(&self) -> String {
        let date = self
            .date_appointment
            .map(|d| d.to_string())
            .unwrap_or_default();
        match &self.patient_name {
            Some(name) => format!("{} {} {}", name, date, self.start_time),
            None => format!("{} {}", date, self.start_time),
        }
    }

    fn check(&self) -> Result<(), FieldErrors> {
        self.validate()
    }

    fn matches_query(&self, query: &str) -> bool {
        self.matches(query)
    }
}

impl Resource for Invoice {
    const KIND: EntityType = EntityType::Invoice;
    const LIST_PATH: &'static str = "invoices";
    const ITEM_PATH: &'static str = "invoices";
    const CREATE_PATH: &'static str = "invoices";

    fn resource_id(&self) -> Option<String> {
        self.invoice_id.as_ref().map(|id| id.to_string())
    }

    fn display_name(&self) -> String {
        self.patient_name
            .clone()
            .unwrap_or_else(|| self.id_display())
    }

    fn check(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.check(self.appointment_id.is_some(), "appointmentId", "is required");
        errors.check(!self.total_amount.is_negative(), "totalAmount", "must be non-negative");
        errors.check(!self.paid_amount.is_negative(), "paidAmount", "must be non-negative");
        errors.into_result()
    }

    fn matches_query(&self, query: &str) -> bool {
        self.matches(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_paths() {
        assert_eq!(Patient::item_path("p1"), "patients/p1");
        assert_eq!(Doctor::item_path("d1"), "admin/doctors/d1");
        assert_eq!(Receptionist::CREATE_PATH, "admin/addReceptionist");
        assert_eq!(Invoice::item_path("i1"), "invoices/i1");
    }

    #[test]
    fn test_display_names() {
        let doctor = Doctor::new("Karim Idrissi", "Dentist");
        assert_eq!(doctor.display_name(), "Dr. Karim Idrissi");
        assert_eq!(Invoice::default().display_name(), "-");
    }
}
