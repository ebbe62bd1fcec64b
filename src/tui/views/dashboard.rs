//! Dashboard view
//!
//! Office figures on top, products that need restocking below.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Row, Table},
    Frame,
};

use crate::reports::DashboardReport;
use crate::tui::app::App;

fn figure(label: &str, value: String, color: Color) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{:<24}", label), Style::default().fg(Color::DarkGray)),
        Span::styled(value, Style::default().fg(color).add_modifier(Modifier::BOLD)),
    ])
}

/// Figure lines of the report
pub fn figure_lines(report: &DashboardReport, currency: &str) -> Vec<Line<'static>> {
    vec![
        figure("Patients", report.total_patients.to_string(), Color::White),
        figure("Appointments today", report.appointments_today.to_string(), Color::Cyan),
        figure("Doctors available", report.doctors_available.to_string(), Color::Green),
        figure(
            "Doctors on leave",
            report.doctors_on_leave.to_string(),
            if report.doctors_on_leave > 0 { Color::Yellow } else { Color::White },
        ),
        figure(
            "Revenue this month",
            report.revenue_this_month.format_with_symbol(currency),
            Color::Green,
        ),
        figure(
            "Outstanding",
            report.outstanding.format_with_symbol(currency),
            if report.outstanding.is_zero() { Color::Green } else { Color::Yellow },
        ),
    ]
}

/// Render the dashboard
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let Some(report) = &app.data.dashboard else {
        let block = Block::default().title(" Dashboard ").borders(Borders::ALL);
        frame.render_widget(
            Paragraph::new("Press r to load the dashboard")
                .block(block)
                .style(Style::default().fg(Color::DarkGray)),
            area,
        );
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(8), Constraint::Min(3)])
        .split(area);

    let figures = Paragraph::new(figure_lines(report, app.currency())).block(
        Block::default()
            .title(format!(" Dashboard {} ", report.date))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    frame.render_widget(figures, chunks[0]);

    let block = Block::default()
        .title(format!(" Low stock ({}) ", report.low_stock.len()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    if report.low_stock.is_empty() {
        frame.render_widget(
            Paragraph::new("All products above their minimum")
                .block(block)
                .style(Style::default().fg(Color::Green)),
            chunks[1],
        );
        return;
    }

    let rows = report.low_stock.iter().map(|row| {
        Row::new(vec![
            row.product_name.clone(),
            row.quantity.to_string(),
            row.minimum.to_string(),
        ])
        .style(Style::default().fg(Color::Yellow))
    });
    let table = Table::new(
        rows,
        [Constraint::Min(20), Constraint::Length(8), Constraint::Length(8)],
    )
    .header(
        Row::new(vec!["Product", "Qty", "Min"])
            .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
    )
    .block(block);
    frame.render_widget(table, chunks[1]);
}
