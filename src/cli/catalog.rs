//! Service and product CLI commands

use clap::Subcommand;

use super::{parse_money, set_if};
use crate::display::{format_product_list, format_service_list};
use crate::error::CabinetResult;
use crate::models::{CabinetService, Product};
use crate::services::{Backend, CatalogService};

/// Billable service subcommands
#[derive(Subcommand)]
pub enum ServiceCommands {
    /// List services
    List {
        #[arg(short, long, default_value = "")]
        search: String,
    },
    /// Add a service
    Add {
        name: String,
        /// Price, e.g. "250" or "250.50"
        #[arg(short, long)]
        price: String,
    },
    /// Edit a service
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(short, long)]
        price: Option<String>,
    },
    /// Delete a service
    Delete { id: String },
}

/// Product subcommands
#[derive(Subcommand)]
pub enum ProductCommands {
    /// List products
    List {
        #[arg(short, long, default_value = "")]
        search: String,
        /// Only products at or below their minimum
        #[arg(long)]
        low: bool,
    },
    /// Add a product
    Add {
        name: String,
        #[arg(short, long)]
        price: String,
        /// Units in stock
        #[arg(short, long, default_value = "0")]
        quantity: u32,
        /// Restock threshold
        #[arg(short, long, default_value = "0")]
        minimum: u32,
    },
    /// Edit a product
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(short, long)]
        price: Option<String>,
        #[arg(short, long)]
        minimum: Option<u32>,
    },
    /// Add or remove stock, e.g. `stock <id> 10` or `stock <id> -3`
    Stock {
        id: String,
        #[arg(allow_hyphen_values = true)]
        delta: i64,
    },
    /// Delete a product
    Delete { id: String },
}

/// Handle a service command
pub fn handle_service_command(backend: &Backend, cmd: ServiceCommands) -> CabinetResult<()> {
    let catalog = CatalogService::new(backend);

    match cmd {
        ServiceCommands::List { search } => {
            println!("{}", format_service_list(&catalog.list_services(&search)?));
        }
        ServiceCommands::Add { name, price } => {
            let service = CabinetService::new(name, parse_money(&price, "price")?);
            println!("{}", catalog.services().create(&service)?);
        }
        ServiceCommands::Update { id, name, price } => {
            let price = price.map(|p| parse_money(&p, "price")).transpose()?;
            let (service, message) = catalog.services().modify(&id, |s| {
                set_if(&mut s.service_name, name);
                set_if(&mut s.price, price);
                Ok(())
            })?;
            println!("{}", message);
            println!("  {}", service);
        }
        ServiceCommands::Delete { id } => println!("{}", catalog.services().delete(&id)?),
    }

    Ok(())
}

/// Handle a product command
pub fn handle_product_command(backend: &Backend, cmd: ProductCommands) -> CabinetResult<()> {
    let catalog = CatalogService::new(backend);
    let flag_low = backend.settings().low_stock_warning;

    match cmd {
        ProductCommands::List { search, low } => {
            let products = if low {
                catalog.low_stock()?
            } else {
                catalog.list_products(&search)?
            };
            println!("{}", format_product_list(&products, flag_low));
        }
        ProductCommands::Add {
            name,
            price,
            quantity,
            minimum,
        } => {
            let mut product = Product::new(name, parse_money(&price, "price")?, quantity, minimum);
            product.date_updated = Some(chrono::Local::now().date_naive());
            println!("{}", catalog.products().create(&product)?);
        }
        ProductCommands::Update {
            id,
            name,
            price,
            minimum,
        } => {
            let price = price.map(|p| parse_money(&p, "price")).transpose()?;
            let (product, message) = catalog.products().modify(&id, |p| {
                set_if(&mut p.product_name, name);
                set_if(&mut p.price, price);
                set_if(&mut p.minimum, minimum);
                Ok(())
            })?;
            println!("{}", message);
            println!("  {}", product);
        }
        ProductCommands::Stock { id, delta } => {
            let product = catalog.adjust_stock(&id, delta)?;
            println!("{}", product);
            if flag_low && product.is_low_stock() {
                println!("  Warning: at or below minimum ({})", product.minimum);
            }
        }
        ProductCommands::Delete { id } => println!("{}", catalog.products().delete(&id)?),
    }

    Ok(())
}
