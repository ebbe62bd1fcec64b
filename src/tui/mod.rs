//! Terminal User Interface module
//!
//! Full-screen front desk view built on ratatui: a section sidebar, filtered
//! record tables, the payment and pricing dialogs and toast notifications.

pub mod app;
pub mod event;
pub mod handler;
pub mod terminal;

pub mod dialogs;
pub mod layout;
pub mod views;
pub mod widgets;

pub use app::App;
pub use terminal::run_tui;
