//! Configuration module for cabinet-cli
//!
//! This module provides configuration management including:
//! - Platform-aware path resolution
//! - User settings persistence
//! - Backend and identity provider endpoints

pub mod paths;
pub mod settings;

pub use paths::CabinetPaths;
pub use settings::Settings;
