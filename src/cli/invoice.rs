//! Invoice CLI commands

use clap::Subcommand;

use super::parse_method;
use crate::billing::NoticeLevel;
use crate::display::{format_invoice_details, format_invoice_list};
use crate::error::{CabinetError, CabinetResult};
use crate::models::{PaymentStatus, ProductId};
use crate::services::{
    AppointmentService, Backend, InvoiceEdit, InvoiceService, PatientService, PaymentOutcome,
};

/// Invoice subcommands
#[derive(Subcommand)]
pub enum InvoiceCommands {
    /// List invoices
    List {
        /// pending, partially_paid, paid or cancelled
        #[arg(long)]
        status: Option<String>,
        /// Only invoices of this patient (ID or CIN)
        #[arg(long)]
        patient: Option<String>,
        #[arg(short, long, default_value = "")]
        search: String,
    },
    /// Show an invoice
    Show { id: String },
    /// Record a payment
    Pay {
        id: String,
        /// Amount to pay; defaults to the remaining balance
        #[arg(allow_hyphen_values = true)]
        amount: Option<String>,
        /// cash, card or bank_transfer
        #[arg(short, long)]
        method: Option<String>,
    },
    /// Edit paid amount, payment method or used products
    Edit {
        id: String,
        /// New paid amount
        #[arg(long, allow_hyphen_values = true)]
        paid: Option<String>,
        #[arg(short, long)]
        method: Option<String>,
        /// Add a used product as PRODUCT_ID:QTY (repeatable)
        #[arg(long = "add-product")]
        add_products: Vec<String>,
        /// Remove a used product by ID (repeatable)
        #[arg(long = "remove-product")]
        remove_products: Vec<String>,
    },
    /// Generate an invoice for an appointment
    Generate { appointment: String },
    /// Delete an invoice
    Delete { id: String },
}

/// Parse `PRODUCT_ID:QTY`; a bare id means one unit
fn parse_used_product(raw: &str) -> CabinetResult<(ProductId, u32)> {
    let (id, qty) = match raw.split_once(':') {
        Some((id, qty)) => {
            let qty = qty.trim().parse::<u32>().map_err(|_| {
                CabinetError::Validation(format!("Invalid quantity in '{}'", raw))
            })?;
            (id.trim(), qty)
        }
        None => (raw.trim(), 1),
    };
    if id.is_empty() {
        return Err(CabinetError::Validation(format!("Missing product id in '{}'", raw)));
    }
    Ok((ProductId::new(id), qty))
}

/// Handle an invoice command
pub fn handle_invoice_command(backend: &Backend, cmd: InvoiceCommands) -> CabinetResult<()> {
    let service = InvoiceService::new(backend);
    let currency = backend.settings().currency_symbol.as_str();

    match cmd {
        InvoiceCommands::List {
            status,
            patient,
            search,
        } => {
            let status = status
                .as_deref()
                .map(|s| {
                    PaymentStatus::parse(s).ok_or_else(|| {
                        CabinetError::Validation(format!("Invalid invoice status '{}'", s))
                    })
                })
                .transpose()?;

            let invoices = match patient {
                Some(patient) => {
                    let found = PatientService::new(backend).find(&patient)?;
                    let id = found
                        .patient_id
                        .ok_or_else(|| CabinetError::patient_not_found(&patient))?;
                    service
                        .for_patient(&id)?
                        .into_iter()
                        .filter(|i| status.map_or(true, |s| i.invoice_status == s))
                        .filter(|i| i.matches(&search))
                        .collect()
                }
                None => service.list(&search, status)?,
            };
            println!("{}", format_invoice_list(&invoices));
        }

        InvoiceCommands::Show { id } => {
            print!("{}", format_invoice_details(&service.get(&id)?, currency));
        }

        InvoiceCommands::Pay { id, amount, method } => {
            let method = method.as_deref().map(parse_method).transpose()?;
            match service.pay(&id, amount.as_deref(), method)? {
                PaymentOutcome::Settled(message) => println!("{}", message),
                PaymentOutcome::Paid { invoice, notice } => {
                    if let Some(notice) = notice.filter(|n| n.level == NoticeLevel::Info) {
                        println!("Note: {}", notice.message);
                    }
                    println!("Payment recorded on invoice {}", id);
                    println!("  Paid:      {}", invoice.paid_amount.format_with_symbol(currency));
                    println!("  Remaining: {}", invoice.remaining().format_with_symbol(currency));
                    println!("  Status:    {}", invoice.invoice_status);
                }
            }
        }

        InvoiceCommands::Edit {
            id,
            paid,
            method,
            add_products,
            remove_products,
        } => {
            let edit = InvoiceEdit {
                paid,
                method: method.as_deref().map(parse_method).transpose()?,
                add_products: add_products
                    .iter()
                    .map(|raw| parse_used_product(raw))
                    .collect::<CabinetResult<_>>()?,
                remove_products: remove_products.into_iter().map(ProductId::from).collect(),
            };
            let (invoice, message) = service.edit_payment(&id, &edit)?;
            println!("{}", message);
            print!("{}", format_invoice_details(&invoice, currency));
        }

        InvoiceCommands::Generate { appointment } => {
            let invoice =
                AppointmentService::new(backend).generate_invoice(&appointment.as_str().into())?;
            println!("Generated invoice {}", invoice.id_display());
        }

        InvoiceCommands::Delete { id } => println!("{}", service.delete(&id)?),
    }

    Ok(())
}
