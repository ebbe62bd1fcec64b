//! Help dialog
//!
//! Shows contextual keyboard shortcuts

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::tui::app::{App, Section};
use crate::tui::layout::centered_rect;

/// Render the help dialog
pub fn render(frame: &mut Frame, app: &App) {
    let area = centered_rect(60, 70, frame.area());

    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" Help ")
        .title_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let paragraph = Paragraph::new(help_lines(app.section))
        .block(block)
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, area);
}

fn heading(text: &'static str) -> Line<'static> {
    Line::from(vec![Span::styled(
        text,
        Style::default()
            .add_modifier(Modifier::BOLD)
            .fg(Color::Yellow),
    )])
}

/// Help lines for the current section
pub fn help_lines(section: Section) -> Vec<Line<'static>> {
    let mut lines = vec![
        heading("Global Keys"),
        Line::from(""),
        key_line("q", "Quit application"),
        key_line("?", "Show/hide help"),
        key_line("/", "Filter the current table"),
        key_line("r", "Refresh the current section"),
        key_line("Tab", "Switch panel focus"),
        key_line("h/l", "Move focus left/right"),
        key_line("j/k", "Move selection up/down"),
        key_line("1-8", "Jump to a section"),
        Line::from(""),
    ];

    match section {
        Section::Appointments => {
            lines.push(heading("Appointments"));
            lines.push(Line::from(""));
            lines.push(key_line("e", "Edit services and price"));
            lines.push(key_line("g", "Generate an invoice"));
        }
        Section::Invoices => {
            lines.push(heading("Invoices"));
            lines.push(Line::from(""));
            lines.push(key_line("p", "Record a payment"));
        }
        _ => {
            lines.push(heading(section.title()));
            lines.push(Line::from(""));
            lines.push(Line::from("Read-only table; use the CLI to add or edit records."));
        }
    }

    lines.push(Line::from(""));
    lines.push(Line::from(vec![Span::styled(
        "Press any key to close",
        Style::default().fg(Color::DarkGray),
    )]));

    lines
}

/// Create a formatted key line
fn key_line(key: &str, description: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{:>12}", key), Style::default().fg(Color::Cyan)),
        Span::raw("  "),
        Span::styled(description.to_string(), Style::default().fg(Color::White)),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(lines: &[Line]) -> String {
        lines
            .iter()
            .flat_map(|l| l.spans.iter().map(|s| s.content.to_string()))
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn test_section_specific_keys() {
        assert!(text(&help_lines(Section::Invoices)).contains("Record a payment"));
        assert!(text(&help_lines(Section::Appointments)).contains("Generate an invoice"));
        assert!(!text(&help_lines(Section::Patients)).contains("Record a payment"));
    }
}
