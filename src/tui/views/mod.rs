//! TUI views
//!
//! The sidebar, the section table or dashboard, the status bar, then any
//! dialog and the current toast on top.

pub mod dashboard;
pub mod sidebar;
pub mod status_bar;
pub mod table;

use ratatui::{
    style::{Color, Style},
    text::Span,
    widgets::Paragraph,
    Frame,
};

use super::app::{ActiveDialog, App, InputMode, Section};
use super::dialogs;
use super::layout::{AppLayout, MainPanelLayout};
use super::widgets::{toast_area, NotificationWidget};

/// Render the entire application
pub fn render(frame: &mut Frame, app: &App) {
    let layout = AppLayout::new(frame.area());

    sidebar::render(frame, app, layout.sidebar);

    let main = MainPanelLayout::new(layout.main);
    render_filter(frame, app, main.filter);
    match app.section {
        Section::Dashboard => dashboard::render(frame, app, main.content),
        _ => table::render(frame, app, main.content),
    }

    status_bar::render(frame, app, layout.status_bar);

    render_dialog(frame, app);

    if let Some(toast) = app.notifications.current() {
        let area = toast_area(layout.main, &toast.message);
        frame.render_widget(NotificationWidget::new(toast), area);
    }
}

fn render_filter(frame: &mut Frame, app: &App, area: ratatui::layout::Rect) {
    if app.input_mode == InputMode::Filter || !app.query().is_empty() {
        let input = app
            .filter
            .clone()
            .focused(app.input_mode == InputMode::Filter);
        frame.render_widget(input, area);
    } else {
        frame.render_widget(
            Paragraph::new(Span::styled(
                "Press / to filter",
                Style::default().fg(Color::DarkGray),
            )),
            area,
        );
    }
}

/// Render active dialog
fn render_dialog(frame: &mut Frame, app: &App) {
    match &app.active_dialog {
        ActiveDialog::None => {}
        ActiveDialog::Help => dialogs::help::render(frame, app),
        ActiveDialog::Confirm(action) => dialogs::confirm::render(frame, &action.message()),
        ActiveDialog::Payment(state) => dialogs::payment::render(frame, state, app.currency()),
        ActiveDialog::Pricing(state) => dialogs::pricing::render(frame, state, app.currency()),
    }
}
