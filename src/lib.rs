//! cabinet-cli - terminal administration client for a medical office
//!
//! This library talks to the office's REST backend to manage patients,
//! staff, the service and product catalogs, appointments and invoices. The
//! billing rules that decide how much may be paid live locally in
//! [`billing`] so they apply the same way in the CLI and the TUI.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Backend records (patients, appointments, invoices, etc.)
//! - `billing`: Balance, payment clamp, line-item totals and the billing forms
//! - `api`: HTTP transport, typed backend client and authentication
//! - `services`: Validated, audited operations over the backend
//! - `audit`: Local audit log of accepted changes
//! - `display`, `reports`, `export`: Output for the terminal and files
//! - `cli`, `tui`: The two user interfaces
//!
//! # Example
//!
//! ```rust,ignore
//! use cabinet_cli::config::{CabinetPaths, Settings};
//! use cabinet_cli::services::{Backend, InvoiceService};
//!
//! let paths = CabinetPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let backend = Backend::connect(&paths, &settings)?;
//! let unpaid = InvoiceService::new(&backend).list("", None)?;
//! ```

pub mod api;
pub mod audit;
pub mod billing;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod logging;
pub mod models;
pub mod reports;
pub mod services;
pub mod tui;

pub use error::{CabinetError, CabinetResult};
