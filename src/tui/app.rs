//! Application state for the TUI
//!
//! The App struct holds all state needed for rendering and handling events.
//! Section data is fetched on first visit and on refresh; every fetch or
//! mutation error becomes a toast instead of ending the session.

use std::collections::HashSet;

use chrono::Local;
use tracing::warn;

use crate::error::{CabinetError, CabinetResult};
use crate::models::{
    Appointment, AppointmentId, CabinetService, Doctor, Invoice, Patient, Product, Receptionist,
};
use crate::reports::DashboardReport;
use crate::services::{
    AppointmentFilter, AppointmentService, Backend, CatalogService, InvoiceService,
    PatientService, PatientSort, StaffService,
};

use super::dialogs::payment::PaymentDialogState;
use super::dialogs::pricing::PricingDialogState;
use super::widgets::{Notification, NotificationQueue, TextInput};

/// Sidebar sections, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Section {
    #[default]
    Dashboard,
    Patients,
    Doctors,
    Receptionists,
    Services,
    Products,
    Appointments,
    Invoices,
}

impl Section {
    pub const ALL: [Section; 8] = [
        Self::Dashboard,
        Self::Patients,
        Self::Doctors,
        Self::Receptionists,
        Self::Services,
        Self::Products,
        Self::Appointments,
        Self::Invoices,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Patients => "Patients",
            Self::Doctors => "Doctors",
            Self::Receptionists => "Receptionists",
            Self::Services => "Services",
            Self::Products => "Products",
            Self::Appointments => "Appointments",
            Self::Invoices => "Invoices",
        }
    }

    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|s| s == self).unwrap_or(0)
    }

    /// Section at `index`, clamped to the last one
    pub fn at(index: usize) -> Self {
        Self::ALL[index.min(Self::ALL.len() - 1)]
    }
}

/// Which panel currently has focus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusedPanel {
    #[default]
    Sidebar,
    Main,
}

/// Mode of input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    /// Typing into the `/` filter
    Filter,
}

/// Action waiting on a yes/no answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    GenerateInvoice(AppointmentId),
}

impl ConfirmAction {
    pub fn message(&self) -> String {
        match self {
            Self::GenerateInvoice(id) => format!("Generate an invoice for appointment {}?", id),
        }
    }
}

/// Currently active dialog (if any)
#[derive(Debug, Clone, Default)]
pub enum ActiveDialog {
    #[default]
    None,
    Help,
    Confirm(ConfirmAction),
    Payment(Box<PaymentDialogState>),
    Pricing(Box<PricingDialogState>),
}

/// Records fetched for each section
#[derive(Debug, Default)]
pub struct SectionData {
    pub dashboard: Option<DashboardReport>,
    pub patients: Vec<Patient>,
    pub doctors: Vec<Doctor>,
    pub receptionists: Vec<Receptionist>,
    pub services: Vec<CabinetService>,
    pub products: Vec<Product>,
    pub appointments: Vec<Appointment>,
    pub invoices: Vec<Invoice>,
}

fn filtered<'b, T>(items: &'b [T], query: &str, matches: impl Fn(&T, &str) -> bool) -> Vec<&'b T> {
    items.iter().filter(|item| matches(item, query)).collect()
}

/// Main application state
pub struct App<'a> {
    pub backend: &'a Backend,

    /// Whether the app should quit
    pub should_quit: bool,

    pub section: Section,

    /// Which panel is focused
    pub focused_panel: FocusedPanel,

    /// Current input mode
    pub input_mode: InputMode,

    /// Currently active dialog
    pub active_dialog: ActiveDialog,

    /// Incremental filter for the current section
    pub filter: TextInput,

    /// Selected row in the current section's filtered table
    pub selected_index: usize,

    pub data: SectionData,

    loaded: HashSet<Section>,

    /// Toast notifications
    pub notifications: NotificationQueue,
}

impl<'a> App<'a> {
    pub fn new(backend: &'a Backend) -> Self {
        Self {
            backend,
            should_quit: false,
            section: Section::default(),
            focused_panel: FocusedPanel::default(),
            input_mode: InputMode::default(),
            active_dialog: ActiveDialog::default(),
            filter: TextInput::new().label("Filter"),
            selected_index: 0,
            data: SectionData::default(),
            loaded: HashSet::new(),
            notifications: NotificationQueue::new(),
        }
    }

    pub fn currency(&self) -> &str {
        &self.backend.settings().currency_symbol
    }

    /// Request to quit the application
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn notify(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }

    /// Report a failed backend call as an error toast
    pub fn notify_error(&mut self, error: &CabinetError) {
        warn!(section = self.section.title(), error = %error, "action failed");
        self.notify(Notification::error(error.to_string()).with_duration(6));
    }

    /// Switch to a different section, loading it on first visit
    pub fn switch_section(&mut self, section: Section) {
        if self.section != section {
            self.section = section;
            self.selected_index = 0;
            self.filter.clear();
        }
        if !self.loaded.contains(&section) {
            self.refresh();
        }
    }

    /// Refetch the current section
    pub fn refresh(&mut self) {
        match self.load(self.section) {
            Ok(()) => {
                self.loaded.insert(self.section);
                self.clamp_selection();
            }
            Err(e) => self.notify_error(&e),
        }
    }

    fn load(&mut self, section: Section) -> CabinetResult<()> {
        let backend = self.backend;
        match section {
            Section::Dashboard => {
                let report = DashboardReport::generate(backend, Local::now().date_naive())?;
                self.data.dashboard = Some(report);
            }
            Section::Patients => {
                self.data.patients = PatientService::new(backend).list("", PatientSort::Name, false)?;
            }
            Section::Doctors => {
                self.data.doctors = StaffService::new(backend).list_doctors("", false)?;
            }
            Section::Receptionists => {
                self.data.receptionists = StaffService::new(backend).list_receptionists("")?;
            }
            Section::Services => {
                self.data.services = CatalogService::new(backend).list_services("")?;
            }
            Section::Products => {
                self.data.products = CatalogService::new(backend).list_products("")?;
            }
            Section::Appointments => {
                self.data.appointments =
                    AppointmentService::new(backend).list(&AppointmentFilter::default())?;
            }
            Section::Invoices => {
                self.data.invoices = InvoiceService::new(backend).list("", None)?;
            }
        }
        Ok(())
    }

    /// Mark every section stale so the next visit refetches it
    pub fn invalidate_all(&mut self) {
        self.loaded.clear();
    }

    pub fn query(&self) -> &str {
        self.filter.value()
    }

    pub fn visible_patients(&self) -> Vec<&Patient> {
        filtered(&self.data.patients, self.query(), Patient::matches)
    }

    pub fn visible_doctors(&self) -> Vec<&Doctor> {
        filtered(&self.data.doctors, self.query(), Doctor::matches)
    }

    pub fn visible_receptionists(&self) -> Vec<&Receptionist> {
        filtered(&self.data.receptionists, self.query(), Receptionist::matches)
    }

    pub fn visible_services(&self) -> Vec<&CabinetService> {
        filtered(&self.data.services, self.query(), CabinetService::matches)
    }

    pub fn visible_products(&self) -> Vec<&Product> {
        filtered(&self.data.products, self.query(), Product::matches)
    }

    pub fn visible_appointments(&self) -> Vec<&Appointment> {
        filtered(&self.data.appointments, self.query(), Appointment::matches)
    }

    pub fn visible_invoices(&self) -> Vec<&Invoice> {
        filtered(&self.data.invoices, self.query(), Invoice::matches)
    }

    /// Rows in the current section after filtering
    pub fn row_count(&self) -> usize {
        match self.section {
            Section::Dashboard => self
                .data
                .dashboard
                .as_ref()
                .map(|d| d.low_stock.len())
                .unwrap_or(0),
            Section::Patients => self.visible_patients().len(),
            Section::Doctors => self.visible_doctors().len(),
            Section::Receptionists => self.visible_receptionists().len(),
            Section::Services => self.visible_services().len(),
            Section::Products => self.visible_products().len(),
            Section::Appointments => self.visible_appointments().len(),
            Section::Invoices => self.visible_invoices().len(),
        }
    }

    pub fn selected_appointment(&self) -> Option<&Appointment> {
        if self.section != Section::Appointments {
            return None;
        }
        self.visible_appointments().get(self.selected_index).copied()
    }

    pub fn selected_invoice(&self) -> Option<&Invoice> {
        if self.section != Section::Invoices {
            return None;
        }
        self.visible_invoices().get(self.selected_index).copied()
    }

    /// Keep the selection inside the filtered table
    pub fn clamp_selection(&mut self) {
        let count = self.row_count();
        if self.selected_index >= count {
            self.selected_index = count.saturating_sub(1);
        }
    }

    /// Toggle focus between sidebar and main panel
    pub fn toggle_panel_focus(&mut self) {
        self.focused_panel = match self.focused_panel {
            FocusedPanel::Sidebar => FocusedPanel::Main,
            FocusedPanel::Main => FocusedPanel::Sidebar,
        };
    }

    /// Move selection up in the focused panel
    pub fn move_up(&mut self) {
        match self.focused_panel {
            FocusedPanel::Sidebar => {
                let index = self.section.index();
                if index > 0 {
                    self.switch_section(Section::at(index - 1));
                }
            }
            FocusedPanel::Main => {
                self.selected_index = self.selected_index.saturating_sub(1);
            }
        }
    }

    /// Move selection down in the focused panel
    pub fn move_down(&mut self) {
        match self.focused_panel {
            FocusedPanel::Sidebar => {
                let index = self.section.index();
                if index + 1 < Section::ALL.len() {
                    self.switch_section(Section::at(index + 1));
                }
            }
            FocusedPanel::Main => {
                if self.selected_index + 1 < self.row_count() {
                    self.selected_index += 1;
                }
            }
        }
    }

    /// Open a dialog
    pub fn open_dialog(&mut self, dialog: ActiveDialog) {
        self.active_dialog = dialog;
        self.input_mode = InputMode::Normal;
    }

    /// Close the current dialog
    pub fn close_dialog(&mut self) {
        self.active_dialog = ActiveDialog::None;
    }

    /// Check if a dialog is active
    pub fn has_dialog(&self) -> bool {
        !matches!(self.active_dialog, ActiveDialog::None)
    }

    /// Pay dialog on the selected invoice
    pub fn open_payment(&mut self) {
        let method = self.backend.settings().default_payment_method;
        match self.selected_invoice() {
            Some(invoice) => {
                let state = PaymentDialogState::new(invoice, method);
                self.open_dialog(ActiveDialog::Payment(Box::new(state)));
            }
            None => self.notify(Notification::info("Select an invoice to pay")),
        }
    }

    /// Pricing dialog on the selected appointment
    pub fn open_pricing(&mut self) {
        let Some(appointment) = self.selected_appointment().cloned() else {
            self.notify(Notification::info("Select an appointment to price"));
            return;
        };
        match CatalogService::new(self.backend).list_services("") {
            Ok(catalog) => match PricingDialogState::new(&appointment, catalog) {
                Ok(state) => self.open_dialog(ActiveDialog::Pricing(Box::new(state))),
                Err(e) => self.notify_error(&e),
            },
            Err(e) => self.notify_error(&e),
        }
    }

    /// Ask before issuing an invoice for the selected appointment
    pub fn confirm_generate_invoice(&mut self) {
        match self
            .selected_appointment()
            .and_then(|a| a.appointment_id.clone())
        {
            Some(id) => self.open_dialog(ActiveDialog::Confirm(ConfirmAction::GenerateInvoice(id))),
            None => self.notify(Notification::info("Select an appointment first")),
        }
    }

    pub fn run_confirmed(&mut self, action: ConfirmAction) {
        match action {
            ConfirmAction::GenerateInvoice(id) => {
                match AppointmentService::new(self.backend).generate_invoice(&id) {
                    Ok(invoice) => {
                        self.notify(Notification::success(format!(
                            "Invoice {} generated",
                            invoice.id_display()
                        )));
                        self.invalidate_all();
                        self.refresh();
                    }
                    Err(e) => self.notify_error(&e),
                }
            }
        }
    }
}
