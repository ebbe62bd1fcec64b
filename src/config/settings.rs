//! User settings for cabinet-cli
//!
//! Holds the backend and identity provider endpoints plus display
//! preferences. Every field has a serde default so older files keep loading.

use serde::{Deserialize, Serialize};

use super::paths::CabinetPaths;
use crate::error::CabinetError;
use crate::models::PaymentMethod;

/// Overrides `api_base_url` when set
pub const API_URL_ENV: &str = "CABINET_API_URL";

/// Overrides `api_key` when set
pub const API_KEY_ENV: &str = "CABINET_API_KEY";

/// User settings for cabinet-cli
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Base URL of the REST backend (without trailing slash)
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Identity provider endpoint used for password sign-in
    #[serde(default = "default_identity_url")]
    pub identity_url: String,

    /// Identity provider endpoint used for refreshing tokens
    #[serde(default = "default_token_url")]
    pub token_url: String,

    /// Public web API key of the identity provider project
    #[serde(default)]
    pub api_key: String,

    /// Timeout applied to every HTTP request, in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Currency label shown next to amounts
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Date format preference (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Payment method preselected in payment forms
    #[serde(default)]
    pub default_payment_method: PaymentMethod,

    /// Whether to warn about products at or below their minimum stock
    #[serde(default = "default_true")]
    pub low_stock_warning: bool,
}

fn default_schema_version() -> u32 {
    1
}

fn default_api_base_url() -> String {
    "https://cabinet-backend-93017aca48c8.herokuapp.com/api".to_string()
}

fn default_identity_url() -> String {
    "https://identitytoolkit.googleapis.com/v1".to_string()
}

fn default_token_url() -> String {
    "https://securetoken.googleapis.com/v1".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_currency() -> String {
    "MAD".to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            api_base_url: default_api_base_url(),
            identity_url: default_identity_url(),
            token_url: default_token_url(),
            api_key: String::new(),
            request_timeout_secs: default_request_timeout_secs(),
            currency_symbol: default_currency(),
            date_format: default_date_format(),
            default_payment_method: PaymentMethod::default(),
            low_stock_warning: true,
        }
    }
}

impl Settings {
    /// Load settings from disk, or fall back to defaults if the file doesn't exist
    ///
    /// Environment overrides are applied on top of whatever was loaded.
    pub fn load_or_create(paths: &CabinetPaths) -> Result<Self, CabinetError> {
        let settings_path = paths.settings_file();

        let mut settings = if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path).map_err(|e| {
                CabinetError::Io(format!("Failed to read settings file: {}", e))
            })?;

            serde_json::from_str(&contents).map_err(|e| {
                CabinetError::Config(format!("Failed to parse settings file: {}", e))
            })?
        } else {
            Settings::default()
        };

        settings.apply_env_overrides();
        Ok(settings)
    }

    /// Save settings to disk
    pub fn save(&self, paths: &CabinetPaths) -> Result<(), CabinetError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            CabinetError::Config(format!("Failed to serialize settings: {}", e))
        })?;

        std::fs::write(paths.settings_file(), contents).map_err(|e| {
            CabinetError::Io(format!("Failed to write settings file: {}", e))
        })?;

        Ok(())
    }

    /// Apply `CABINET_API_URL` / `CABINET_API_KEY` if present
    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                self.api_base_url = url;
            }
        }
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                self.api_key = key;
            }
        }
        self.api_base_url = self.api_base_url.trim_end_matches('/').to_string();
    }

    /// Update a single setting by its key name
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), CabinetError> {
        match key {
            "api_base_url" => {
                if !value.starts_with("http://") && !value.starts_with("https://") {
                    return Err(CabinetError::Validation(format!(
                        "api_base_url must be an http(s) URL, got '{}'",
                        value
                    )));
                }
                self.api_base_url = value.trim_end_matches('/').to_string();
            }
            "identity_url" => self.identity_url = value.trim_end_matches('/').to_string(),
            "token_url" => self.token_url = value.trim_end_matches('/').to_string(),
            "api_key" => self.api_key = value.to_string(),
            "request_timeout_secs" => {
                let secs: u64 = value.parse().map_err(|_| {
                    CabinetError::Validation(format!("Invalid timeout: {}", value))
                })?;
                if secs == 0 {
                    return Err(CabinetError::Validation(
                        "request_timeout_secs must be at least 1".into(),
                    ));
                }
                self.request_timeout_secs = secs;
            }
            "currency_symbol" => self.currency_symbol = value.to_string(),
            "date_format" => self.date_format = value.to_string(),
            "default_payment_method" => {
                self.default_payment_method = PaymentMethod::parse(value).ok_or_else(|| {
                    CabinetError::Validation(format!("Unknown payment method: {}", value))
                })?;
            }
            "low_stock_warning" => {
                self.low_stock_warning = value.parse().map_err(|_| {
                    CabinetError::Validation(format!("Expected true or false, got '{}'", value))
                })?;
            }
            _ => {
                return Err(CabinetError::Config(format!("Unknown setting: {}", key)));
            }
        }
        Ok(())
    }

    /// Build a full backend URL from a relative API path
    pub fn api_url(&self, path: &str) -> String {
        format!("{}/{}", self.api_base_url, path.trim_start_matches('/'))
    }
}
