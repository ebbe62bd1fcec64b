//! Sidebar view
//!
//! Section switcher with the number of loaded records per section

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::tui::app::{App, FocusedPanel, Section};
use crate::tui::layout::SidebarLayout;

/// Render the sidebar
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let layout = SidebarLayout::new(area);
    render_header(frame, app, layout.header);
    render_sections(frame, app, layout.sections);
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Cabinet ")
        .title_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let user = Paragraph::new(app.backend.user().unwrap_or("-").to_string())
        .block(block)
        .style(Style::default().fg(Color::DarkGray));

    frame.render_widget(user, area);
}

fn count(app: &App, section: Section) -> Option<usize> {
    let data = &app.data;
    let n = match section {
        Section::Dashboard => return None,
        Section::Patients => data.patients.len(),
        Section::Doctors => data.doctors.len(),
        Section::Receptionists => data.receptionists.len(),
        Section::Services => data.services.len(),
        Section::Products => data.products.len(),
        Section::Appointments => data.appointments.len(),
        Section::Invoices => data.invoices.len(),
    };
    Some(n)
}

fn render_sections(frame: &mut Frame, app: &App, area: Rect) {
    let border_color = if app.focused_panel == FocusedPanel::Sidebar {
        Color::Cyan
    } else {
        Color::DarkGray
    };

    let block = Block::default()
        .title(" Sections ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));

    let items: Vec<ListItem> = Section::ALL
        .iter()
        .enumerate()
        .map(|(i, section)| {
            let style = if app.section == *section {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            let mut spans = vec![
                Span::styled(format!("[{}] ", i + 1), Style::default().fg(Color::Yellow)),
                Span::styled(section.title(), style),
            ];
            if let Some(n) = count(app, *section).filter(|n| *n > 0) {
                spans.push(Span::styled(
                    format!(" {}", n),
                    Style::default().fg(Color::DarkGray),
                ));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(Some(app.section.index()));

    frame.render_stateful_widget(list, area, &mut state);
}
