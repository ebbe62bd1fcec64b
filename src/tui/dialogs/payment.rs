//! Invoice payment dialog
//!
//! Every keystroke in the amount field runs through the pay form's clamp, so
//! the field can never show more than the invoice still owes.

use crossterm::event::KeyCode;
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::billing::{NoticeLevel, PaymentDecision, PaymentForm};
use crate::models::{Invoice, PaymentMethod};
use crate::services::{InvoiceService, PaymentOutcome};
use crate::tui::app::{ActiveDialog, App};
use crate::tui::layout::centered_rect_fixed;
use crate::tui::widgets::{Notification, TextInput};

/// State for the payment dialog
#[derive(Debug, Clone)]
pub struct PaymentDialogState {
    pub form: PaymentForm,
    pub amount: TextInput,
    pub patient: String,
    /// Failure from the last submission
    pub error: Option<String>,
}

impl PaymentDialogState {
    pub fn new(invoice: &Invoice, method: PaymentMethod) -> Self {
        let form = PaymentForm::for_invoice(invoice, method);
        let amount = TextInput::new()
            .label("Amount")
            .focused(!form.is_disabled())
            .content(form.amount_text());
        Self {
            form,
            amount,
            patient: invoice.patient_name.clone().unwrap_or_else(|| "-".into()),
            error: None,
        }
    }

    /// Push the field text through the clamp and show what it kept
    fn apply_input(&mut self) {
        if self.form.is_disabled() {
            return;
        }
        let raw = self.amount.value().to_string();
        let outcome = self.form.input(&raw);
        if outcome.is_some_and(|o| o.is_corrected()) {
            self.amount = self.amount.clone().content(self.form.amount_text());
        }
        self.error = None;
    }

    pub fn type_char(&mut self, c: char) {
        if self.form.is_disabled() {
            return;
        }
        self.amount.insert(c);
        self.apply_input();
    }

    pub fn backspace(&mut self) {
        if self.form.is_disabled() {
            return;
        }
        self.amount.backspace();
        self.apply_input();
    }
}

/// Render the payment dialog
pub fn render(frame: &mut Frame, state: &PaymentDialogState, currency: &str) {
    let area = centered_rect_fixed(60, 15, frame.area());

    frame.render_widget(Clear, area);

    let title = format!(
        " Pay invoice {} ",
        state
            .form
            .invoice_id()
            .map(|id| id.to_string())
            .unwrap_or_else(|| "-".into())
    );
    let block = Block::default()
        .title(title)
        .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Patient
            Constraint::Length(3), // Totals
            Constraint::Length(2), // Amount
            Constraint::Length(2), // Method
            Constraint::Length(2), // Notice
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

    let money_line = |label: &str, value: String, color: Color| {
        Line::from(vec![
            Span::styled(format!("{:<11}", label), Style::default().fg(Color::DarkGray)),
            Span::styled(value, Style::default().fg(color)),
        ])
    };
    let remaining = state.form.remaining();
    let totals = Paragraph::new(vec![
        money_line("Total:", state.form.total().format_with_symbol(currency), Color::White),
        money_line("Paid:", state.form.paid().format_with_symbol(currency), Color::Green),
        money_line(
            "Remaining:",
            remaining.format_with_symbol(currency),
            if remaining.is_zero() { Color::Green } else { Color::Yellow },
        ),
    ]);
    frame.render_widget(totals, chunks[1]);

    if state.form.is_disabled() {
        frame.render_widget(
            Paragraph::new(Span::styled(
                "Amount: 0.00 (nothing left to pay)",
                Style::default().fg(Color::DarkGray),
            )),
            chunks[2],
        );
    } else {
        frame.render_widget(state.amount.clone(), chunks[2]);
    }

    let method = state
        .form
        .method()
        .map(|m| m.to_string())
        .unwrap_or_else(|| "(choose)".into());
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("Method: ", Style::default().fg(Color::Cyan)),
            Span::styled(method, Style::default().fg(Color::White)),
        ])),
        chunks[3],
    );

    let notice = match (&state.error, state.form.notice()) {
        (Some(error), _) => Some((error.clone(), Color::Red)),
        (None, Some(notice)) => Some((
            notice.message.clone(),
            match notice.level {
                NoticeLevel::Error => Color::Red,
                NoticeLevel::Info => Color::Yellow,
            },
        )),
        (None, None) => None,
    };
    if let Some((message, color)) = notice {
        frame.render_widget(
            Paragraph::new(Span::styled(message, Style::default().fg(color)))
                .wrap(Wrap { trim: true }),
            chunks[4],
        );
    }

    let instructions = Paragraph::new(Line::from(vec![
        Span::styled("[Enter]", Style::default().fg(Color::Green)),
        Span::raw(" Pay  "),
        Span::styled("[Tab]", Style::default().fg(Color::Cyan)),
        Span::raw(" Method  "),
        Span::styled("[Esc]", Style::default().fg(Color::DarkGray)),
        Span::raw(" Cancel"),
    ]));
    frame.render_widget(instructions, chunks[5]);
}

/// Handle key input for the payment dialog
pub fn handle_key(app: &mut App, key: KeyCode) {
    let ActiveDialog::Payment(state) = &mut app.active_dialog else {
        return;
    };
    match key {
        KeyCode::Esc => app.close_dialog(),
        KeyCode::Tab => state.form.cycle_method(),
        KeyCode::Backspace => state.backspace(),
        KeyCode::Char(c) => state.type_char(c),
        KeyCode::Enter => submit(app),
        _ => {}
    }
}

fn submit(app: &mut App) {
    let backend = app.backend;
    let ActiveDialog::Payment(state) = &mut app.active_dialog else {
        return;
    };

    let request = match state.form.prepare() {
        Err(errors) => {
            state.error = Some(errors.to_string());
            return;
        }
        Ok(PaymentDecision::Settled(message)) => {
            app.close_dialog();
            app.notify(Notification::info(message));
            return;
        }
        Ok(PaymentDecision::Send(request)) => request,
    };
    let invoice_id = state
        .form
        .invoice_id()
        .map(|id| id.to_string())
        .unwrap_or_default();

    let amount = request.payment_amount.to_string();
    match InvoiceService::new(backend).pay(&invoice_id, Some(&amount), Some(request.payment_type)) {
        Ok(PaymentOutcome::Paid { invoice, .. }) => {
            app.close_dialog();
            app.notify(Notification::success(format!(
                "Paid {} on invoice {} ({})",
                request.payment_amount,
                invoice_id,
                invoice.invoice_status
            )));
            app.invalidate_all();
            app.refresh();
        }
        Ok(PaymentOutcome::Settled(message)) => {
            app.close_dialog();
            app.notify(Notification::info(message));
        }
        Err(e) => {
            state.error = Some(e.to_string());
            app.notify_error(&e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, PaymentStatus};

    fn invoice(total: i64, paid: i64) -> Invoice {
        Invoice {
            invoice_id: Some("i1".into()),
            total_amount: Money::from_cents(total),
            paid_amount: Money::from_cents(paid),
            invoice_status: PaymentStatus::PartiallyPaid,
            ..Default::default()
        }
    }

    fn type_text(state: &mut PaymentDialogState, text: &str) {
        for c in text.chars() {
            state.type_char(c);
        }
    }

    #[test]
    fn test_prefilled_with_remaining() {
        let state = PaymentDialogState::new(&invoice(50000, 20000), PaymentMethod::Cash);
        assert_eq!(state.amount.value(), "300.00");
    }

    #[test]
    fn test_live_clamp_caps_typed_amount() {
        let mut state = PaymentDialogState::new(&invoice(50000, 20000), PaymentMethod::Cash);
        state.amount.clear();
        type_text(&mut state, "45");
        assert_eq!(state.amount.value(), "45");
        type_text(&mut state, "0");
        assert_eq!(state.amount.value(), "300.00");
        assert_eq!(state.form.amount(), Money::from_cents(30000));
        assert!(state.form.notice().is_some());
    }

    #[test]
    fn test_settled_invoice_is_locked() {
        let mut state = PaymentDialogState::new(&invoice(50000, 50000), PaymentMethod::Card);
        assert!(state.form.is_disabled());
        type_text(&mut state, "12");
        assert_eq!(state.form.amount(), Money::zero());
    }
}
