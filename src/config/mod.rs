#[cfg(feature = "cli")]
pub mod cli;
pub mod session_store;
pub mod toml_config;

use crate::core::document::Document;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{GaraError, Result};
use crate::utils::validation::{
    validate_http_method, validate_non_empty_string, validate_path, validate_positive_number,
    validate_url, Validate,
};
use reqwest::Method;
use std::collections::BTreeMap;
use std::time::Duration;
use toml_config::{FormOverride, TomlConfig};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;
pub const DEFAULT_SESSION_FILE: &str = ".gara-session.json";
pub const DEFAULT_REFRESH_SECONDS: u64 = 5;
pub const DEFAULT_RANKING_PATH: &str = "/contest/{contest_id}";

/// Effective client configuration: flags over file over defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub base_url: String,
    pub timeout_seconds: u64,
    pub session_file: String,
    pub refresh_interval_seconds: u64,
    pub ranking_path: String,
    pub forms: BTreeMap<String, FormOverride>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            session_file: DEFAULT_SESSION_FILE.to_string(),
            refresh_interval_seconds: DEFAULT_REFRESH_SECONDS,
            ranking_path: DEFAULT_RANKING_PATH.to_string(),
            forms: BTreeMap::new(),
        }
    }
}

/// Values given on the command line; `None` means "not given".
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub base_url: Option<String>,
    pub session_file: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub refresh_interval_seconds: Option<u64>,
}

impl Settings {
    pub fn from_toml(config: &TomlConfig) -> Self {
        let defaults = Self::default();
        Self {
            base_url: config.client.base_url.clone().unwrap_or(defaults.base_url),
            timeout_seconds: config
                .client
                .timeout_seconds
                .unwrap_or(defaults.timeout_seconds),
            session_file: config
                .client
                .session_file
                .clone()
                .unwrap_or(defaults.session_file),
            refresh_interval_seconds: config
                .refresh
                .interval_seconds
                .unwrap_or(defaults.refresh_interval_seconds),
            ranking_path: config
                .refresh
                .ranking_path
                .clone()
                .unwrap_or(defaults.ranking_path),
            forms: config.forms.clone(),
        }
    }

    /// Loads the optional TOML file and layers `overrides` on top.
    pub fn resolve(config_file: Option<&str>, overrides: Overrides) -> Result<Self> {
        let mut settings = match config_file {
            Some(path) => {
                tracing::debug!("Loading configuration from {}", path);
                let config = TomlConfig::from_file(path)?;
                config.validate_config()?;
                Self::from_toml(&config)
            }
            None => Self::default(),
        };
        settings.apply(overrides);
        Ok(settings)
    }

    pub fn apply(&mut self, overrides: Overrides) {
        if let Some(base_url) = overrides.base_url {
            self.base_url = base_url;
        }
        if let Some(session_file) = overrides.session_file {
            self.session_file = session_file;
        }
        if let Some(timeout) = overrides.timeout_seconds {
            self.timeout_seconds = timeout;
        }
        if let Some(interval) = overrides.refresh_interval_seconds {
            self.refresh_interval_seconds = interval;
        }
    }

    /// Rewrites the action and method of configured forms present in
    /// `document`. Forms the page does not have are skipped.
    pub fn apply_form_overrides(&self, document: &mut Document) -> Result<()> {
        for (id, form) in &self.forms {
            let method = form
                .method
                .as_deref()
                .map(|m| {
                    Method::from_bytes(m.to_uppercase().as_bytes()).map_err(|_| {
                        GaraError::InvalidConfigValueError {
                            field: format!("forms.{id}.method"),
                            value: m.to_string(),
                            reason: "Not an HTTP method".to_string(),
                        }
                    })
                })
                .transpose()?;

            if document.override_form(id, form.action.as_deref(), method) {
                tracing::debug!("Applied endpoint override to form '{}'", id);
            }
        }
        Ok(())
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validate_url("base_url", &self.base_url)?;
        validate_positive_number("timeout_seconds", self.timeout_seconds, 1)?;
        validate_path("session_file", &self.session_file)?;
        validate_positive_number("refresh_interval_seconds", self.refresh_interval_seconds, 1)?;
        validate_non_empty_string("ranking_path", &self.ranking_path)?;
        for (id, form) in &self.forms {
            if let Some(method) = &form.method {
                validate_http_method(&format!("forms.{id}.method"), method)?;
            }
        }
        Ok(())
    }
}

impl ConfigProvider for Settings {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    fn session_path(&self) -> &str {
        &self.session_file
    }

    fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_seconds)
    }

    fn ranking_path(&self) -> &str {
        &self.ranking_path
    }
}
