//! Local billing calculators
//!
//! These run without a session or network access.

use clap::Subcommand;

use super::parse_money;
use crate::billing::{clamp_payment_input, remaining, LineItem, PricingForm};
use crate::error::{CabinetError, CabinetResult};

/// Billing calculator subcommands
#[derive(Subcommand)]
pub enum BillingCommands {
    /// Remaining balance of a total after a payment
    Remaining {
        #[arg(allow_hyphen_values = true)]
        total: String,
        #[arg(allow_hyphen_values = true)]
        paid: String,
    },
    /// Clamp a typed payment to the remaining balance
    Clamp {
        /// Amount as typed
        #[arg(allow_hyphen_values = true)]
        amount: String,
        /// Remaining balance
        remaining: String,
    },
    /// Sum line items given as PRICE or PRICExQTY
    Total {
        #[arg(required = true)]
        lines: Vec<String>,
        /// Custom total overriding the sum
        #[arg(long)]
        custom: Option<String>,
    },
}

fn parse_line(raw: &str) -> CabinetResult<LineItem> {
    let (price, qty) = match raw.split_once(['x', '*']) {
        Some((price, qty)) => {
            let qty = qty.trim().parse::<u32>().map_err(|_| {
                CabinetError::Validation(format!("Invalid quantity in '{}'", raw))
            })?;
            (price, Some(qty))
        }
        None => (raw, None),
    };
    let price = parse_money(price, "price")?;
    if price.is_negative() {
        return Err(CabinetError::Validation(format!(
            "Line price must be non-negative, got '{}'",
            raw.trim()
        )));
    }
    let item = LineItem::new(raw.trim(), price);
    Ok(match qty {
        Some(qty) => item.with_quantity(qty),
        None => item,
    })
}

/// Handle a billing calculator command
pub fn handle_billing_command(cmd: BillingCommands, currency: &str) -> CabinetResult<()> {
    match cmd {
        BillingCommands::Remaining { total, paid } => {
            let balance = remaining(parse_money(&total, "total")?, parse_money(&paid, "paid")?);
            println!("{}", balance.format_with_symbol(currency));
        }
        BillingCommands::Clamp { amount, remaining } => {
            let outcome = clamp_payment_input(&amount, parse_money(&remaining, "remaining")?);
            println!("{}", outcome.value().format_with_symbol(currency));
            if let Some(message) = outcome.message() {
                eprintln!("{}", message);
            }
            if outcome.is_rejected() {
                return Err(CabinetError::Payment(
                    outcome.message().unwrap_or_default(),
                ));
            }
        }
        BillingCommands::Total { lines, custom } => {
            let mut form = PricingForm::new();
            for raw in &lines {
                form.add_line(parse_line(raw)?)?;
            }
            if let Some(custom) = custom {
                form.set_custom_price(true);
                form.set_total(parse_money(&custom, "custom total")?)?;
                println!(
                    "{} (custom; lines sum to {})",
                    form.total().format_with_symbol(currency),
                    form.computed_total()
                );
            } else {
                println!("{}", form.total().format_with_symbol(currency));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;

    #[test]
    fn test_parse_line() {
        assert_eq!(parse_line("100").unwrap().subtotal().unwrap(), Money::from_cents(10000));
        assert_eq!(parse_line("25.5x2").unwrap().subtotal().unwrap(), Money::from_cents(5100));
        assert!(parse_line("10xq").is_err());
    }

    #[test]
    fn test_negative_line_refused() {
        assert!(parse_line(" -300").unwrap_err().is_validation());
        assert!(parse_line("-1x2").is_err());
        assert!(parse_line("0").is_ok());
    }

    #[test]
    fn test_total_refuses_out_of_range_lines() {
        let cmd = BillingCommands::Total {
            lines: vec!["1e300".into(), "1".into()],
            custom: None,
        };
        assert!(handle_billing_command(cmd, "MAD").unwrap_err().is_validation());

        let cmd = BillingCommands::Total {
            lines: vec!["900000000000x1000000".into()],
            custom: None,
        };
        assert!(handle_billing_command(cmd, "MAD").is_err());
    }
}
