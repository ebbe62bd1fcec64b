//! Service layer for cabinet-cli
//!
//! Services validate input, call the backend through [`Backend`] and record
//! every accepted mutation in the audit log.

pub mod appointment;
pub mod catalog;
pub mod invoice;
pub mod patient;
pub mod records;
pub mod session;
pub mod staff;

pub use appointment::{AppointmentDraft, AppointmentFilter, AppointmentService, PriceChange};
pub use catalog::CatalogService;
pub use invoice::{InvoiceEdit, InvoiceService, PaymentOutcome};
pub use patient::{PatientService, PatientSort};
pub use records::Records;
pub use session::SessionService;
pub use staff::StaffService;

use std::time::Duration;

use serde::Serialize;
use tracing::warn;

use crate::api::{ApiClient, HttpTransport, Transport};
use crate::audit::{AuditEntry, AuditLogger, EntityType};
use crate::config::{CabinetPaths, Settings};
use crate::error::CabinetResult;

/// Authenticated backend access shared by every service
pub struct Backend {
    paths: CabinetPaths,
    settings: Settings,
    api: ApiClient,
    audit: AuditLogger,
    user: Option<String>,
}

impl Backend {
    /// Check the session and connect over HTTP
    pub fn connect(paths: &CabinetPaths, settings: &Settings) -> CabinetResult<Self> {
        let transport = HttpTransport::new(Duration::from_secs(settings.request_timeout_secs))?;
        Self::with_transport(paths, settings, Box::new(transport))
    }

    /// Check the session (refreshing it through `transport` if needed) and
    /// use `transport` for every backend call
    pub fn with_transport(
        paths: &CabinetPaths,
        settings: &Settings,
        transport: Box<dyn Transport>,
    ) -> CabinetResult<Self> {
        let session = SessionService::new(paths, settings, transport.as_ref()).ensure_valid()?;
        let api = ApiClient::new(transport, settings.api_base_url.clone())
            .with_token(session.id_token.clone());

        Ok(Self {
            paths: paths.clone(),
            settings: settings.clone(),
            api,
            audit: AuditLogger::new(paths.audit_log()),
            user: Some(session.email.clone()),
        })
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn paths(&self) -> &CabinetPaths {
        &self.paths
    }

    /// Email of the signed-in user
    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    /// Append to the audit log
    ///
    /// The backend already accepted the change, so a failed write is only
    /// warned about.
    pub fn record(&self, entry: AuditEntry) {
        let entry = entry.with_user(self.user.clone());
        if let Err(e) = self.audit.log(&entry) {
            warn!(error = %e, "failed to write audit entry");
        }
    }

    pub fn log_create<T: Serialize>(&self, kind: EntityType, id: Option<String>, name: String, record: &T) {
        self.record(AuditEntry::create(kind, id.unwrap_or_else(|| "-".into()), Some(name), record));
    }

    pub fn log_update<T: Serialize>(&self, kind: EntityType, id: &str, name: String, before: &T, after: &T) {
        self.record(AuditEntry::update(kind, id, Some(name), before, after));
    }

    pub fn log_delete<T: Serialize>(&self, kind: EntityType, id: &str, name: String, record: &T) {
        self.record(AuditEntry::delete(kind, id, Some(name), record));
    }
}
