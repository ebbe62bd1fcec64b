//! Staff service: doctors and receptionists

use super::records::Records;
use super::Backend;
use crate::error::CabinetResult;
use crate::models::{Doctor, Receptionist};

pub struct StaffService<'a> {
    doctors: Records<'a, Doctor>,
    receptionists: Records<'a, Receptionist>,
}

impl<'a> StaffService<'a> {
    pub fn new(backend: &'a Backend) -> Self {
        Self {
            doctors: Records::new(backend),
            receptionists: Records::new(backend),
        }
    }

    pub fn doctors(&self) -> &Records<'a, Doctor> {
        &self.doctors
    }

    pub fn receptionists(&self) -> &Records<'a, Receptionist> {
        &self.receptionists
    }

    /// Doctors matching `query`, optionally only those not on leave
    pub fn list_doctors(&self, query: &str, available_only: bool) -> CabinetResult<Vec<Doctor>> {
        let mut doctors = self.doctors.search(query)?;
        if available_only {
            doctors.retain(Doctor::is_available);
        }
        doctors.sort_by_key(|d| d.name().to_lowercase());
        Ok(doctors)
    }

    pub fn list_receptionists(&self, query: &str) -> CabinetResult<Vec<Receptionist>> {
        let mut receptionists = self.receptionists.search(query)?;
        receptionists.sort_by_key(|r| r.name().to_lowercase());
        Ok(receptionists)
    }

    /// Put a doctor on leave or back on the roster
    pub fn set_on_leave(&self, id: &str, on_leave: bool) -> CabinetResult<Doctor> {
        let (doctor, _) = self.doctors.modify(id, |d| {
            d.on_leave = on_leave;
            Ok(())
        })?;
        Ok(doctor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::MockTransport;
    use crate::api::Method;
    use crate::audit::Operation;
    use crate::services::test_support::{audit_entries, backend};
    use serde_json::json;

    fn roster(mock: &MockTransport) {
        mock.on_json(
            Method::Get,
            "admin/doctors",
            json!([
                {"doctorId": "d1", "name": "Zineb", "specialization": "Dentist", "onLeave": true},
                {"doctorId": "d2", "name": "Karim", "specialization": "Orthodontist"}
            ]),
        );
    }

    #[test]
    fn test_available_only() {
        let mock = MockTransport::new();
        roster(&mock);
        let (backend, _t) = backend(&mock);
        let staff = StaffService::new(&backend);

        let all = staff.list_doctors("", false).unwrap();
        assert_eq!(all[0].name(), "Karim");
        assert_eq!(all.len(), 2);

        let available = staff.list_doctors("", true).unwrap();
        assert_eq!(available.len(), 1);
        assert_eq!(available[0].name(), "Karim");
    }

    #[test]
    fn test_set_on_leave_sends_update() {
        let mock = MockTransport::new();
        mock.on_json(
            Method::Get,
            "admin/doctors/d2",
            json!({"doctorId": "d2", "name": "Karim", "specialization": "Orthodontist"}),
        );
        mock.on(Method::Put, "admin/doctors/d2", 200, "Doctor updated");
        let (backend, _t) = backend(&mock);

        let doctor = StaffService::new(&backend).set_on_leave("d2", true).unwrap();
        assert!(!doctor.is_available());

        let entries = audit_entries(&backend);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].operation, Operation::Update);
        assert_eq!(entries[0].diff_summary.as_deref(), Some("onLeave: false -> true"));
    }
}
