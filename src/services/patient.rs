//! Patient service

use std::cmp::Ordering;

use clap::ValueEnum;

use super::records::Records;
use super::Backend;
use crate::error::CabinetResult;
use crate::models::{Appointment, Invoice, Patient, PatientId};

/// Column to sort patients by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum PatientSort {
    #[default]
    Name,
    Cin,
    Age,
    Joined,
}

/// Sort in place; missing ages and dates sort last
pub fn sort_patients(patients: &mut [Patient], sort: PatientSort, descending: bool) {
    patients.sort_by(|a, b| {
        let ord = match sort {
            PatientSort::Name => a.name().to_lowercase().cmp(&b.name().to_lowercase()),
            PatientSort::Cin => a.cin.cmp(&b.cin),
            PatientSort::Age => cmp_missing_last(a.person.age, b.person.age),
            PatientSort::Joined => cmp_missing_last(a.person.date_joined, b.person.date_joined),
        };
        if descending {
            ord.reverse()
        } else {
            ord
        }
    });
}

fn cmp_missing_last<T: Ord>(a: Option<T>, b: Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Service for patient records
pub struct PatientService<'a> {
    backend: &'a Backend,
    records: Records<'a, Patient>,
}

impl<'a> PatientService<'a> {
    pub fn new(backend: &'a Backend) -> Self {
        Self {
            backend,
            records: Records::new(backend),
        }
    }

    /// Patients matching `query`, sorted
    pub fn list(&self, query: &str, sort: PatientSort, descending: bool) -> CabinetResult<Vec<Patient>> {
        let mut patients = self.records.search(query)?;
        sort_patients(&mut patients, sort, descending);
        Ok(patients)
    }

    pub fn get(&self, id: &str) -> CabinetResult<Patient> {
        self.records.get(id)
    }

    pub fn find_by_cin(&self, cin: &str) -> CabinetResult<Patient> {
        self.backend.api().patient_by_cin(cin.trim())
    }

    /// Resolve an id or a CIN
    pub fn find(&self, identifier: &str) -> CabinetResult<Patient> {
        match self.get(identifier) {
            Err(e) if e.is_not_found() => self.find_by_cin(identifier),
            other => other,
        }
    }

    pub fn create(&self, patient: &Patient) -> CabinetResult<String> {
        self.records.create(patient)
    }

    pub fn update(&self, id: &str, patient: &Patient) -> CabinetResult<String> {
        self.records.update(id, patient)
    }

    pub fn modify<F>(&self, id: &str, edit: F) -> CabinetResult<(Patient, String)>
    where
        F: FnOnce(&mut Patient) -> CabinetResult<()>,
    {
        self.records.modify(id, edit)
    }

    pub fn delete(&self, id: &str) -> CabinetResult<String> {
        self.records.delete(id)
    }

    pub fn appointments(&self, id: &PatientId) -> CabinetResult<Vec<Appointment>> {
        self.backend.api().appointments_for_patient(id)
    }

    pub fn invoices(&self, id: &PatientId) -> CabinetResult<Vec<Invoice>> {
        self.backend.api().invoices_for_patient(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::MockTransport;
    use crate::api::Method;
    use crate::services::test_support::backend;

    fn patient(name: &str, cin: &str, age: Option<u32>) -> Patient {
        let mut p = Patient::new(name, cin);
        p.person.age = age;
        p
    }

    #[test]
    fn test_sort_by_age_missing_last() {
        let mut patients = vec![
            patient("Sara", "C1", None),
            patient("Omar", "B1", Some(50)),
            patient("amina", "A1", Some(30)),
        ];
        sort_patients(&mut patients, PatientSort::Age, false);
        let names: Vec<&str> = patients.iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["amina", "Omar", "Sara"]);

        sort_patients(&mut patients, PatientSort::Name, true);
        assert_eq!(patients[0].name(), "Sara");
    }

    #[test]
    fn test_list_filters() {
        let mock = MockTransport::new();
        mock.on_json(
            Method::Get,
            "patients/",
            serde_json::json!([
                {"patientId": "p1", "name": "Amina Alaoui", "CIN": "AB1"},
                {"patientId": "p2", "name": "Omar Bennani", "CIN": "CD2", "phone": "0600112233"}
            ]),
        );
        let (backend, _t) = backend(&mock);
        let service = PatientService::new(&backend);

        assert_eq!(service.list("", PatientSort::Name, false).unwrap().len(), 2);
        let found = service.list("0600", PatientSort::Name, false).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].cin, "CD2");
    }

    #[test]
    fn test_find_falls_back_to_cin() {
        let mock = MockTransport::new();
        mock.on_json(
            Method::Get,
            "patients/cin/AB1",
            serde_json::json!({"patientId": "p1", "name": "Amina", "CIN": "AB1"}),
        );
        let (backend, _t) = backend(&mock);
        let patient = PatientService::new(&backend).find("AB1").unwrap();
        assert_eq!(patient.id_display(), "p1");
    }
}
