//! Generic CRUD over one backend collection

use std::marker::PhantomData;

use tracing::info;

use super::Backend;
use crate::api::Resource;
use crate::error::{CabinetError, CabinetResult};

/// Validated, audited CRUD for records of type `R`
pub struct Records<'a, R: Resource> {
    backend: &'a Backend,
    _marker: PhantomData<R>,
}

impl<'a, R: Resource> Records<'a, R> {
    pub fn new(backend: &'a Backend) -> Self {
        Self {
            backend,
            _marker: PhantomData,
        }
    }

    pub fn list(&self) -> CabinetResult<Vec<R>> {
        self.backend.api().list()
    }

    /// Records matching `query`; an empty query returns everything
    pub fn search(&self, query: &str) -> CabinetResult<Vec<R>> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|r| r.matches_query(query))
            .collect())
    }

    pub fn get(&self, id: &str) -> CabinetResult<R> {
        let id = id.trim();
        if id.is_empty() {
            return Err(CabinetError::Validation(format!("{} id is required", R::KIND)));
        }
        self.backend.api().get(id)
    }

    /// Validate and create; returns the backend's confirmation
    pub fn create(&self, record: &R) -> CabinetResult<String> {
        record.check()?;
        let message = self.backend.api().create(record)?;
        info!(entity = %R::KIND, name = %record.display_name(), "created");
        self.backend
            .log_create(R::KIND, record.resource_id(), record.display_name(), record);
        Ok(message)
    }

    /// Validate and replace the record with id `id`
    pub fn update(&self, id: &str, record: &R) -> CabinetResult<String> {
        record.check()?;
        let before = self.get(id)?;
        let message = self.backend.api().update(id, record)?;
        info!(entity = %R::KIND, id, "updated");
        self.backend
            .log_update(R::KIND, id, record.display_name(), &before, record);
        Ok(message)
    }

    /// Load, change with `edit`, then update
    pub fn modify<F>(&self, id: &str, edit: F) -> CabinetResult<(R, String)>
    where
        F: FnOnce(&mut R) -> CabinetResult<()>,
    {
        let before = self.get(id)?;
        let mut after = before.clone();
        edit(&mut after)?;
        after.check()?;
        let message = self.backend.api().update(id, &after)?;
        info!(entity = %R::KIND, id, "updated");
        self.backend
            .log_update(R::KIND, id, after.display_name(), &before, &after);
        Ok((after, message))
    }

    pub fn delete(&self, id: &str) -> CabinetResult<String> {
        let before = self.get(id)?;
        let message = self.backend.api().delete::<R>(id)?;
        info!(entity = %R::KIND, id, "deleted");
        self.backend
            .log_delete(R::KIND, id, before.display_name(), &before);
        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::MockTransport;
    use crate::api::Method;
    use crate::audit::Operation;
    use crate::models::{Money, Product};
    use crate::services::test_support::{audit_entries, backend};

    #[test]
    fn test_create_validates_before_sending() {
        let mock = MockTransport::new();
        let (backend, _t) = backend(&mock);
        let products = Records::<Product>::new(&backend);

        let err = products
            .create(&Product::new("", Money::from_cents(-1), 1, 1))
            .unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("productName"));
        assert!(err.to_string().contains("price"));
        assert_eq!(mock.count(Method::Post, "products/add"), 0);
    }

    #[test]
    fn test_create_is_audited() {
        let mock = MockTransport::new();
        mock.on(Method::Post, "products/add", 200, "Product added");
        let (backend, _t) = backend(&mock);

        let msg = Records::<Product>::new(&backend)
            .create(&Product::new("Gloves", Money::from_cents(150), 20, 5))
            .unwrap();
        assert_eq!(msg, "Product added");

        let entries = audit_entries(&backend);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].operation, Operation::Create);
        assert_eq!(entries[0].user.as_deref(), Some("desk@clinic.ma"));
    }

    #[test]
    fn test_modify_logs_diff() {
        let mock = MockTransport::new();
        mock.on_json(
            Method::Get,
            "products/g1",
            serde_json::json!({"productId": "g1", "productName": "Gloves", "price": 1.5, "quantity": 20, "minimum": 5}),
        );
        mock.on(Method::Put, "products/g1", 200, "Product updated");
        let (backend, _t) = backend(&mock);

        let (after, _) = Records::<Product>::new(&backend)
            .modify("g1", |p| {
                p.quantity = 12;
                Ok(())
            })
            .unwrap();
        assert_eq!(after.quantity, 12);

        let entries = audit_entries(&backend);
        assert_eq!(entries[0].diff_summary.as_deref(), Some("quantity: 20 -> 12"));
    }

    #[test]
    fn test_failed_delete_not_audited() {
        let mock = MockTransport::new();
        mock.on_json(
            Method::Get,
            "products/g1",
            serde_json::json!({"productId": "g1", "productName": "Gloves"}),
        );
        mock.on(Method::Delete, "products/g1", 500, "boom");
        let (backend, _t) = backend(&mock);

        assert!(Records::<Product>::new(&backend).delete("g1").is_err());
        assert!(audit_entries(&backend).is_empty());
    }
}
