//! Appointment pricing dialog
//!
//! Edits the service lines of an appointment and the custom price override.
//! With the override off the total follows the lines and cannot be typed.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::billing::PricingForm;
use crate::error::CabinetResult;
use crate::models::{Appointment, CabinetService, ServiceId};
use crate::services::{AppointmentService, PriceChange};
use crate::tui::app::{ActiveDialog, App};
use crate::tui::layout::centered_rect_fixed;
use crate::tui::widgets::{Notification, TextInput};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PricingFocus {
    #[default]
    Lines,
    Catalog,
    Total,
}

impl PricingFocus {
    fn next(self) -> Self {
        match self {
            Self::Lines => Self::Catalog,
            Self::Catalog => Self::Total,
            Self::Total => Self::Lines,
        }
    }
}

/// State for the pricing dialog
#[derive(Debug, Clone)]
pub struct PricingDialogState {
    pub appointment_id: String,
    pub patient: String,
    pub form: PricingForm,
    /// Services behind the form's lines, index for index
    pub services: Vec<CabinetService>,
    pub catalog: Vec<CabinetService>,
    pub focus: PricingFocus,
    pub line_index: usize,
    pub catalog_index: usize,
    pub total: TextInput,
    pub error: Option<String>,
    services_changed: bool,
}

impl PricingDialogState {
    pub fn new(appointment: &Appointment, catalog: Vec<CabinetService>) -> CabinetResult<Self> {
        let form = PricingForm::from_appointment(appointment)?;
        let total = TextInput::new().label("Total").content(form.total().to_string());
        Ok(Self {
            appointment_id: appointment.id_display(),
            patient: appointment
                .patient_name
                .clone()
                .unwrap_or_else(|| "-".into()),
            form,
            services: appointment.services.clone(),
            catalog,
            focus: PricingFocus::default(),
            line_index: 0,
            catalog_index: 0,
            total,
            error: None,
            services_changed: false,
        })
    }

    fn sync_total_text(&mut self) {
        let focused = self.focus == PricingFocus::Total;
        self.total = self
            .total
            .clone()
            .content(self.form.total().to_string())
            .focused(focused);
    }

    pub fn cycle_focus(&mut self) {
        self.focus = self.focus.next();
        self.total.focused = self.focus == PricingFocus::Total;
    }

    pub fn move_up(&mut self) {
        match self.focus {
            PricingFocus::Lines => self.line_index = self.line_index.saturating_sub(1),
            PricingFocus::Catalog => self.catalog_index = self.catalog_index.saturating_sub(1),
            PricingFocus::Total => {}
        }
    }

    pub fn move_down(&mut self) {
        match self.focus {
            PricingFocus::Lines => {
                if self.line_index + 1 < self.services.len() {
                    self.line_index += 1;
                }
            }
            PricingFocus::Catalog => {
                if self.catalog_index + 1 < self.catalog.len() {
                    self.catalog_index += 1;
                }
            }
            PricingFocus::Total => {}
        }
    }

    /// Add the highlighted catalog service as a line
    pub fn add_selected(&mut self) {
        let Some(service) = self.catalog.get(self.catalog_index).cloned() else {
            return;
        };
        if let Err(e) = self.form.add_service(&service) {
            self.error = Some(e.to_string());
            return;
        }
        self.services.push(service);
        self.services_changed = true;
        self.error = None;
        self.sync_total_text();
    }

    /// Drop the highlighted line
    pub fn remove_selected(&mut self) {
        if self.form.remove_line(self.line_index).is_none() {
            return;
        }
        self.services.remove(self.line_index);
        if self.line_index >= self.services.len() {
            self.line_index = self.services.len().saturating_sub(1);
        }
        self.services_changed = true;
        self.error = None;
        self.sync_total_text();
    }

    pub fn toggle_custom_price(&mut self) {
        self.form.set_custom_price(!self.form.is_custom_price());
        self.error = None;
        self.sync_total_text();
    }

    fn apply_total_text(&mut self) {
        self.error = self
            .form
            .set_total_input(self.total.value())
            .err()
            .map(|e| e.to_string());
    }

    pub fn type_char(&mut self, c: char) {
        if !self.form.is_custom_price() {
            self.error = Some("Enable custom price to edit the total".into());
            return;
        }
        self.total.insert(c);
        self.apply_total_text();
    }

    pub fn backspace(&mut self) {
        if !self.form.is_custom_price() {
            return;
        }
        self.total.backspace();
        self.apply_total_text();
    }

    /// Service ids to send, only when the lines were edited
    pub fn service_ids(&self) -> Option<Vec<ServiceId>> {
        self.services_changed.then(|| {
            self.services
                .iter()
                .filter_map(|s| s.service_id.clone())
                .collect()
        })
    }

    pub fn price_change(&self) -> PriceChange {
        if self.form.is_custom_price() {
            PriceChange::Custom(self.form.total())
        } else {
            PriceChange::Computed
        }
    }
}

fn service_list<'b>(
    title: &'b str,
    services: &'b [CabinetService],
    selected: usize,
    focused: bool,
) -> (List<'b>, ListState) {
    let items: Vec<ListItem> = services
        .iter()
        .map(|s| {
            ListItem::new(Line::from(vec![
                Span::styled(format!("{:<20}", s.service_name), Style::default().fg(Color::White)),
                Span::styled(format!("{:>10}", s.price.to_string()), Style::default().fg(Color::Green)),
            ]))
        })
        .collect();
    let border = if focused { Color::Cyan } else { Color::DarkGray };
    let list = List::new(items)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border)),
        )
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    if focused && !services.is_empty() {
        state.select(Some(selected));
    }
    (list, state)
}

/// Render the pricing dialog
pub fn render(frame: &mut Frame, state: &PricingDialogState, currency: &str) {
    let area = centered_rect_fixed(76, 22, frame.area());

    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(format!(" Pricing: appointment {} ", state.appointment_id))
        .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Patient
            Constraint::Min(6),    // Lines and catalog
            Constraint::Length(1), // Custom flag
            Constraint::Length(1), // Total
            Constraint::Length(1), // Computed
            Constraint::Length(1), // Error
            Constraint::Length(1), // Instructions
        ])
        .split(inner);

    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("Patient: ", Style::default().fg(Color::DarkGray)),
            Span::styled(state.patient.as_str(), Style::default().fg(Color::White)),
        ])),
        chunks[0],
    );

    render_lists(frame, state, chunks[1]);

    let custom = state.form.is_custom_price();
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("Custom price: ", Style::default().fg(Color::Cyan)),
            Span::styled(
                if custom { "on" } else { "off" },
                Style::default().fg(if custom { Color::Yellow } else { Color::White }),
            ),
        ])),
        chunks[2],
    );

    if custom {
        frame.render_widget(state.total.clone(), chunks[3]);
    } else {
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled("Total: ", Style::default().fg(Color::Cyan)),
                Span::styled(
                    state.form.total().format_with_symbol(currency),
                    Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                ),
            ])),
            chunks[3],
        );
    }

    frame.render_widget(
        Paragraph::new(Span::styled(
            format!(
                "Sum of lines: {}",
                state.form.computed_total().format_with_symbol(currency)
            ),
            Style::default().fg(Color::DarkGray),
        )),
        chunks[4],
    );

    if let Some(error) = &state.error {
        frame.render_widget(
            Paragraph::new(Span::styled(error.as_str(), Style::default().fg(Color::Red))),
            chunks[5],
        );
    }

    let instructions = Paragraph::new(Line::from(vec![
        Span::styled("[Tab]", Style::default().fg(Color::Cyan)),
        Span::raw(" Focus  "),
        Span::styled("[Enter]", Style::default().fg(Color::Green)),
        Span::raw(" Add/Save  "),
        Span::styled("[d]", Style::default().fg(Color::Red)),
        Span::raw(" Remove  "),
        Span::styled("[c]", Style::default().fg(Color::Yellow)),
        Span::raw(" Custom  "),
        Span::styled("[Esc]", Style::default().fg(Color::DarkGray)),
        Span::raw(" Cancel"),
    ]));
    frame.render_widget(instructions, chunks[6]);
}

fn render_lists(frame: &mut Frame, state: &PricingDialogState, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let (lines, mut lines_state) = service_list(
        " Lines ",
        &state.services,
        state.line_index,
        state.focus == PricingFocus::Lines,
    );
    frame.render_stateful_widget(lines, columns[0], &mut lines_state);

    let (catalog, mut catalog_state) = service_list(
        " Catalog ",
        &state.catalog,
        state.catalog_index,
        state.focus == PricingFocus::Catalog,
    );
    frame.render_stateful_widget(catalog, columns[1], &mut catalog_state);
}

/// Handle key input for the pricing dialog
pub fn handle_key(app: &mut App, key: KeyEvent) {
    let ActiveDialog::Pricing(state) = &mut app.active_dialog else {
        return;
    };
    let in_total = state.focus == PricingFocus::Total;

    match key.code {
        KeyCode::Esc => app.close_dialog(),
        KeyCode::Tab => state.cycle_focus(),
        KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => submit(app),
        KeyCode::Enter if state.focus == PricingFocus::Catalog => state.add_selected(),
        KeyCode::Enter => submit(app),
        KeyCode::Up => state.move_up(),
        KeyCode::Down => state.move_down(),
        KeyCode::Backspace if in_total => state.backspace(),
        KeyCode::Char(c) if in_total => state.type_char(c),
        KeyCode::Char('k') => state.move_up(),
        KeyCode::Char('j') => state.move_down(),
        KeyCode::Char('c') => state.toggle_custom_price(),
        KeyCode::Char('d') | KeyCode::Delete | KeyCode::Backspace
            if state.focus == PricingFocus::Lines =>
        {
            state.remove_selected()
        }
        _ => {}
    }
}

fn submit(app: &mut App) {
    let backend = app.backend;
    let ActiveDialog::Pricing(state) = &mut app.active_dialog else {
        return;
    };
    if let Some(error) = &state.error {
        let error = error.clone();
        app.notify(Notification::warning(error));
        return;
    }

    let ids = state.service_ids();
    let result = AppointmentService::new(backend).reprice(
        &state.appointment_id,
        ids.as_deref(),
        Some(state.price_change()),
    );
    match result {
        Ok((appointment, message)) => {
            app.close_dialog();
            app.notify(Notification::success(format!(
                "{} (total {})",
                message, appointment.total_amount
            )));
            app.invalidate_all();
            app.refresh();
        }
        Err(e) => {
            state.error = Some(e.to_string());
            app.notify_error(&e);
        }
    }
}
