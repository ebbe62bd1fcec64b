//! Event handler for the TUI
//!
//! Routes keyboard events to the appropriate handlers based on the current
//! application state: an open dialog first, then the filter line, then the
//! focused panel.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::app::{ActiveDialog, App, FocusedPanel, InputMode, Section};
use super::dialogs;
use super::event::Event;

/// Handle an incoming event
pub fn handle_event(app: &mut App, event: Event) {
    match event {
        Event::Key(key) => handle_key_event(app, key),
        Event::Resize(_, _) | Event::Tick => {}
    }
}

fn handle_key_event(app: &mut App, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.quit();
        return;
    }

    if app.has_dialog() {
        handle_dialog_key(app, key);
        return;
    }

    match app.input_mode {
        InputMode::Normal => handle_normal_key(app, key),
        InputMode::Filter => handle_filter_key(app, key),
    }
}

fn handle_dialog_key(app: &mut App, key: KeyEvent) {
    match &app.active_dialog {
        ActiveDialog::None => {}
        ActiveDialog::Help => app.close_dialog(),
        ActiveDialog::Confirm(_) => dialogs::confirm::handle_key(app, key.code),
        ActiveDialog::Payment(_) => dialogs::payment::handle_key(app, key.code),
        ActiveDialog::Pricing(_) => dialogs::pricing::handle_key(app, key),
    }
}

/// Typing into the `/` filter narrows the table on every keystroke
fn handle_filter_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.filter.clear();
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Enter => app.input_mode = InputMode::Normal,
        KeyCode::Backspace => app.filter.backspace(),
        KeyCode::Left => app.filter.move_left(),
        KeyCode::Right => app.filter.move_right(),
        KeyCode::Char(c) => {
            app.filter.insert(c);
            app.selected_index = 0;
        }
        _ => {}
    }
    app.clamp_selection();
}

fn handle_normal_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') => app.quit(),
        KeyCode::Char('?') => app.open_dialog(ActiveDialog::Help),
        KeyCode::Char('/') if app.section != Section::Dashboard => {
            app.input_mode = InputMode::Filter;
            app.focused_panel = FocusedPanel::Main;
        }
        KeyCode::Char('r') => app.refresh(),
        KeyCode::Esc if !app.notifications.is_empty() => app.notifications.dismiss(),
        KeyCode::Tab => app.toggle_panel_focus(),
        KeyCode::Char('h') | KeyCode::Left => app.focused_panel = FocusedPanel::Sidebar,
        KeyCode::Char('l') | KeyCode::Right | KeyCode::Enter
            if app.focused_panel == FocusedPanel::Sidebar =>
        {
            app.focused_panel = FocusedPanel::Main
        }
        KeyCode::Char('j') | KeyCode::Down => app.move_down(),
        KeyCode::Char('k') | KeyCode::Up => app.move_up(),
        KeyCode::Char(c @ '1'..='8') => {
            let index = c as usize - '1' as usize;
            app.switch_section(Section::at(index));
        }
        _ => handle_section_key(app, key),
    }
}

/// Actions on the selected row
fn handle_section_key(app: &mut App, key: KeyEvent) {
    match (app.section, key.code) {
        (Section::Invoices, KeyCode::Char('p')) => app.open_payment(),
        (Section::Appointments, KeyCode::Char('e')) => app.open_pricing(),
        (Section::Appointments, KeyCode::Char('g')) => app.confirm_generate_invoice(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::MockTransport;
    use crate::api::Method;
    use crate::models::Money;
    use crate::services::test_support::{audit_entries, backend};
    use serde_json::json;

    fn press(app: &mut App, code: KeyCode) {
        handle_event(app, Event::Key(KeyEvent::from(code)));
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn invoice_mock() -> MockTransport {
        let mock = MockTransport::new();
        let invoice = json!({"invoiceId": "i1", "patientName": "Amina", "totalAmount": 500,
                             "paidAmount": 200, "invoiceStatus": "PARTIALLY_PAID"});
        mock.on_json(Method::Get, "invoices", json!([invoice.clone()]));
        mock.on_json(Method::Get, "invoices/i1", invoice);
        mock.on_json(
            Method::Put,
            "invoices/i1/pay",
            json!({"invoiceId": "i1", "totalAmount": 500, "paidAmount": 500, "invoiceStatus": "PAID"}),
        );
        mock
    }

    #[test]
    fn test_number_keys_switch_sections() {
        let mock = MockTransport::new();
        let (backend, _dir) = backend(&mock);
        let mut app = App::new(&backend);

        press(&mut app, KeyCode::Char('8'));
        assert_eq!(app.section, Section::Invoices);
        press(&mut app, KeyCode::Char('k'));
        assert_eq!(app.section, Section::Appointments);
    }

    #[test]
    fn test_filter_mode_captures_letters() {
        let mock = invoice_mock();
        let (backend, _dir) = backend(&mock);
        let mut app = App::new(&backend);
        app.switch_section(Section::Invoices);

        press(&mut app, KeyCode::Char('/'));
        type_text(&mut app, "qzx");
        assert!(!app.should_quit);
        assert_eq!(app.query(), "qzx");
        assert_eq!(app.row_count(), 0);

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.row_count(), 1);
    }

    #[test]
    fn test_pay_from_invoice_table() {
        let mock = invoice_mock();
        let (backend, _dir) = backend(&mock);
        let mut app = App::new(&backend);
        app.switch_section(Section::Invoices);
        app.focused_panel = FocusedPanel::Main;

        press(&mut app, KeyCode::Char('p'));
        match &app.active_dialog {
            ActiveDialog::Payment(state) => {
                assert_eq!(state.form.amount(), Money::from_cents(30000))
            }
            other => panic!("unexpected dialog {other:?}"),
        }

        for _ in 0..6 {
            press(&mut app, KeyCode::Backspace);
        }
        type_text(&mut app, "450");
        match &app.active_dialog {
            ActiveDialog::Payment(state) => assert_eq!(state.amount.value(), "300.00"),
            other => panic!("unexpected dialog {other:?}"),
        }

        press(&mut app, KeyCode::Enter);
        assert!(!app.has_dialog());
        assert_eq!(mock.count(Method::Put, "invoices/i1/pay"), 1);
        let entries = audit_entries(&backend);
        assert_eq!(entries.len(), 1);
        assert!(app.notifications.current().unwrap().message.starts_with("Paid 300.00"));
    }

    #[test]
    fn test_pay_failure_keeps_dialog_open() {
        let mock = MockTransport::new();
        let invoice = json!({"invoiceId": "i1", "totalAmount": 500, "paidAmount": 0});
        mock.on_json(Method::Get, "invoices", json!([invoice.clone()]));
        mock.on_json(Method::Get, "invoices/i1", invoice);
        mock.on(Method::Put, "invoices/i1/pay", 502, r#"{"message":"gateway"}"#);
        let (backend, _dir) = backend(&mock);
        let mut app = App::new(&backend);
        app.switch_section(Section::Invoices);

        press(&mut app, KeyCode::Char('p'));
        press(&mut app, KeyCode::Enter);
        match &app.active_dialog {
            ActiveDialog::Payment(state) => {
                assert!(state.error.as_deref().unwrap_or_default().contains("gateway"));
                assert_eq!(state.form.amount(), Money::from_cents(50000));
            }
            other => panic!("unexpected dialog {other:?}"),
        }
        assert!(audit_entries(&backend).is_empty());
    }

    #[test]
    fn test_section_keys_ignored_elsewhere() {
        let mock = invoice_mock();
        let (backend, _dir) = backend(&mock);
        let mut app = App::new(&backend);
        app.switch_section(Section::Invoices);

        press(&mut app, KeyCode::Char('g'));
        press(&mut app, KeyCode::Char('e'));
        assert!(!app.has_dialog());

        press(&mut app, KeyCode::Char('?'));
        assert!(matches!(app.active_dialog, ActiveDialog::Help));
        press(&mut app, KeyCode::Char('x'));
        assert!(!app.has_dialog());
    }
}
