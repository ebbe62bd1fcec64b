//! Section tables
//!
//! One table per record section, built from the filtered rows held in
//! [`App`] so the selected row always matches what the handler acts on.

use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::models::{Appointment, Invoice};
use crate::tui::app::{App, FocusedPanel, Section};

/// Header, column widths and cell text of a section
#[derive(Debug, Clone, PartialEq)]
pub struct SectionTable {
    pub header: Vec<&'static str>,
    pub widths: Vec<Constraint>,
    pub rows: Vec<Vec<String>>,
    /// Per-row highlight, e.g. low stock or money owed
    pub flagged: Vec<bool>,
}

fn dash(value: Option<&str>) -> String {
    value.filter(|s| !s.is_empty()).unwrap_or("-").to_string()
}

fn appointment_row(a: &Appointment) -> Vec<String> {
    vec![
        a.date_appointment
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".into()),
        format!("{}-{}", a.start_time, a.end_time),
        dash(
            a.patient_name
                .as_deref()
                .or(a.patient_id.as_ref().map(|id| id.as_str())),
        ),
        dash(
            a.doctor_name
                .as_deref()
                .or(a.doctor_id.as_ref().map(|id| id.as_str())),
        ),
        a.appointment_status.to_string(),
        a.payment_status.to_string(),
        format!("{}{}", a.total_amount, if a.is_custom_price { "*" } else { "" }),
        a.remaining().to_string(),
    ]
}

fn invoice_row(i: &Invoice) -> Vec<String> {
    vec![
        i.id_display(),
        i.invoice_date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".into()),
        dash(i.patient_name.as_deref()),
        i.total_amount.to_string(),
        i.paid_amount.to_string(),
        i.remaining().to_string(),
        i.invoice_status.to_string(),
        i.payment_type
            .map(|m| m.to_string())
            .unwrap_or_else(|| "-".into()),
    ]
}

/// Table contents of the current section; `None` for the dashboard
pub fn section_table(app: &App) -> Option<SectionTable> {
    let table = match app.section {
        Section::Dashboard => return None,
        Section::Patients => {
            let patients = app.visible_patients();
            SectionTable {
                header: vec!["ID", "Name", "CIN", "Phone", "Age", "Insurance"],
                widths: vec![
                    Constraint::Length(10),
                    Constraint::Min(16),
                    Constraint::Length(10),
                    Constraint::Length(14),
                    Constraint::Length(4),
                    Constraint::Length(12),
                ],
                flagged: vec![false; patients.len()],
                rows: patients
                    .iter()
                    .map(|p| {
                        vec![
                            p.id_display(),
                            p.name().to_string(),
                            p.cin.clone(),
                            dash(p.person.phone.as_deref()),
                            p.person.age.map(|a| a.to_string()).unwrap_or_else(|| "-".into()),
                            dash(p.insurance.as_deref()),
                        ]
                    })
                    .collect(),
            }
        }
        Section::Doctors => {
            let doctors = app.visible_doctors();
            SectionTable {
                header: vec!["ID", "Name", "Specialization", "Phone", "Status"],
                widths: vec![
                    Constraint::Length(10),
                    Constraint::Min(16),
                    Constraint::Length(16),
                    Constraint::Length(14),
                    Constraint::Length(10),
                ],
                flagged: doctors.iter().map(|d| d.on_leave).collect(),
                rows: doctors
                    .iter()
                    .map(|d| {
                        vec![
                            d.doctor_id
                                .as_ref()
                                .map(|id| id.to_string())
                                .unwrap_or_else(|| "-".into()),
                            d.name().to_string(),
                            d.specialization.clone(),
                            dash(d.person.phone.as_deref()),
                            if d.on_leave { "On leave" } else { "Available" }.to_string(),
                        ]
                    })
                    .collect(),
            }
        }
        Section::Receptionists => {
            let receptionists = app.visible_receptionists();
            SectionTable {
                header: vec!["ID", "Name", "Email", "Phone"],
                widths: vec![
                    Constraint::Length(10),
                    Constraint::Min(16),
                    Constraint::Length(24),
                    Constraint::Length(14),
                ],
                flagged: vec![false; receptionists.len()],
                rows: receptionists
                    .iter()
                    .map(|r| {
                        vec![
                            r.receptionist_id
                                .as_ref()
                                .map(|id| id.to_string())
                                .unwrap_or_else(|| "-".into()),
                            r.name().to_string(),
                            dash(r.person.email.as_deref()),
                            dash(r.person.phone.as_deref()),
                        ]
                    })
                    .collect(),
            }
        }
        Section::Services => {
            let services = app.visible_services();
            SectionTable {
                header: vec!["ID", "Service", "Price"],
                widths: vec![
                    Constraint::Length(10),
                    Constraint::Min(20),
                    Constraint::Length(12),
                ],
                flagged: vec![false; services.len()],
                rows: services
                    .iter()
                    .map(|s| {
                        vec![
                            s.service_id
                                .as_ref()
                                .map(|id| id.to_string())
                                .unwrap_or_else(|| "-".into()),
                            s.service_name.clone(),
                            s.price.to_string(),
                        ]
                    })
                    .collect(),
            }
        }
        Section::Products => {
            let products = app.visible_products();
            SectionTable {
                header: vec!["ID", "Product", "Price", "Qty", "Min", "Updated"],
                widths: vec![
                    Constraint::Length(10),
                    Constraint::Min(18),
                    Constraint::Length(10),
                    Constraint::Length(6),
                    Constraint::Length(6),
                    Constraint::Length(10),
                ],
                flagged: products.iter().map(|p| p.is_low_stock()).collect(),
                rows: products
                    .iter()
                    .map(|p| {
                        vec![
                            p.product_id
                                .as_ref()
                                .map(|id| id.to_string())
                                .unwrap_or_else(|| "-".into()),
                            p.product_name.clone(),
                            p.price.to_string(),
                            p.quantity.to_string(),
                            p.minimum.to_string(),
                            p.date_updated
                                .map(|d| d.to_string())
                                .unwrap_or_else(|| "-".into()),
                        ]
                    })
                    .collect(),
            }
        }
        Section::Appointments => {
            let appointments = app.visible_appointments();
            SectionTable {
                header: vec![
                    "Date", "Time", "Patient", "Doctor", "Status", "Payment", "Total", "Remaining",
                ],
                widths: vec![
                    Constraint::Length(10),
                    Constraint::Length(11),
                    Constraint::Min(14),
                    Constraint::Min(14),
                    Constraint::Length(10),
                    Constraint::Length(14),
                    Constraint::Length(10),
                    Constraint::Length(10),
                ],
                flagged: appointments.iter().map(|a| !a.remaining().is_zero()).collect(),
                rows: appointments.iter().map(|a| appointment_row(a)).collect(),
            }
        }
        Section::Invoices => {
            let invoices = app.visible_invoices();
            SectionTable {
                header: vec![
                    "ID", "Date", "Patient", "Total", "Paid", "Remaining", "Status", "Method",
                ],
                widths: vec![
                    Constraint::Length(10),
                    Constraint::Length(10),
                    Constraint::Min(14),
                    Constraint::Length(10),
                    Constraint::Length(10),
                    Constraint::Length(10),
                    Constraint::Length(14),
                    Constraint::Length(13),
                ],
                flagged: invoices.iter().map(|i| !i.is_settled()).collect(),
                rows: invoices.iter().map(|i| invoice_row(i)).collect(),
            }
        }
    };
    Some(table)
}

/// Render the current section's table
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let focused = app.focused_panel == FocusedPanel::Main;
    let block = Block::default()
        .title(format!(" {} ", app.section.title()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if focused { Color::Cyan } else { Color::DarkGray }));

    let Some(table) = section_table(app) else {
        return;
    };

    if table.rows.is_empty() {
        let text = if app.query().is_empty() {
            "No records"
        } else {
            "No records match the filter"
        };
        frame.render_widget(
            Paragraph::new(text)
                .block(block)
                .style(Style::default().fg(Color::DarkGray)),
            area,
        );
        return;
    }

    let header = Row::new(table.header.iter().copied().map(Cell::from)).style(
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    );
    let rows = table
        .rows
        .into_iter()
        .zip(table.flagged)
        .map(|(cells, flagged)| {
            let style = if flagged {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(Color::White)
            };
            Row::new(cells).style(style)
        });

    let widget = Table::new(rows, table.widths)
        .header(header)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut state = TableState::default();
    state.select(Some(app.selected_index));
    frame.render_stateful_widget(widget, area, &mut state);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::MockTransport;
    use crate::api::Method;
    use crate::services::test_support::backend;
    use serde_json::json;

    #[test]
    fn test_product_rows_flag_low_stock() {
        let mock = MockTransport::new();
        mock.on_json(
            Method::Get,
            "products/",
            json!([
                {"productId": "g1", "productName": "Gauze", "price": 5, "quantity": 2, "minimum": 10},
                {"productId": "m1", "productName": "Masks", "price": 1, "quantity": 80, "minimum": 20}
            ]),
        );
        let (backend, _dir) = backend(&mock);
        let mut app = App::new(&backend);
        app.switch_section(Section::Products);

        let table = section_table(&app).unwrap();
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0][1], "Gauze");
        assert_eq!(table.flagged, vec![true, false]);
        assert_eq!(table.header.len(), table.rows[0].len());
    }

    #[test]
    fn test_invoice_row_text() {
        let invoice = Invoice {
            invoice_id: Some("i1".into()),
            total_amount: crate::models::Money::from_cents(50000),
            paid_amount: crate::models::Money::from_cents(20000),
            ..Default::default()
        };
        let row = invoice_row(&invoice);
        assert_eq!(row[0], "i1");
        assert_eq!(row[2], "-");
        assert_eq!(row[5], "300.00");
    }

    #[test]
    fn test_dashboard_has_no_table() {
        let mock = MockTransport::new();
        let (backend, _dir) = backend(&mock);
        let app = App::new(&backend);
        assert!(section_table(&app).is_none());
    }
}
