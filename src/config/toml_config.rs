use crate::utils::error::{GaraError, Result};
use crate::utils::validation::{
    validate_http_method, validate_non_empty_string, validate_path, validate_positive_number,
    validate_url,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub client: ClientConfig,
    #[serde(default)]
    pub refresh: RefreshConfig,
    /// Per-form endpoint overrides, keyed by form id.
    #[serde(default)]
    pub forms: BTreeMap<String, FormOverride>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientConfig {
    pub base_url: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub session_file: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RefreshConfig {
    pub interval_seconds: Option<u64>,
    pub ranking_path: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormOverride {
    pub action: Option<String>,
    pub method: Option<String>,
}

impl TomlConfig {
    /// Loads the configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(GaraError::Io)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| GaraError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown names stay as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| GaraError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        if let Some(base_url) = &self.client.base_url {
            validate_url("client.base_url", base_url)?;
        }
        if let Some(timeout) = self.client.timeout_seconds {
            validate_positive_number("client.timeout_seconds", timeout, 1)?;
        }
        if let Some(session_file) = &self.client.session_file {
            validate_path("client.session_file", session_file)?;
        }
        if let Some(interval) = self.refresh.interval_seconds {
            validate_positive_number("refresh.interval_seconds", interval, 1)?;
        }
        if let Some(ranking_path) = &self.refresh.ranking_path {
            validate_non_empty_string("refresh.ranking_path", ranking_path)?;
        }

        for (id, form) in &self.forms {
            if let Some(method) = &form.method {
                validate_http_method(&format!("forms.{id}.method"), method)?;
            }
            if let Some(action) = &form.action {
                validate_non_empty_string(&format!("forms.{id}.action"), action)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_section() {
        let config = TomlConfig::from_toml_str(
            r#"
[client]
base_url = "https://gara.example.org"
timeout_seconds = 20

[refresh]
interval_seconds = 3
ranking_path = "/contest/{contest_id}/table"

[forms.update]
method = "PUT"
"#,
        )
        .unwrap();

        assert_eq!(config.client.base_url.as_deref(), Some("https://gara.example.org"));
        assert_eq!(config.client.session_file, None);
        assert_eq!(config.refresh.interval_seconds, Some(3));
        assert_eq!(config.forms["update"].method.as_deref(), Some("PUT"));
        assert!(config.validate_config().is_ok());
    }

    #[test]
    fn empty_file_is_all_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();
        assert!(config.client.base_url.is_none());
        assert!(config.forms.is_empty());
    }

    #[test]
    fn unknown_env_vars_are_left_in_place() {
        let out = TomlConfig::substitute_env_vars("x = \"${GARA_SURELY_UNSET_VAR}\"").unwrap();
        assert_eq!(out, "x = \"${GARA_SURELY_UNSET_VAR}\"");
    }

    #[test]
    fn rejects_bad_values() {
        let config = TomlConfig::from_toml_str("[refresh]\ninterval_seconds = 0\n").unwrap();
        assert!(config.validate_config().is_err());

        let config = TomlConfig::from_toml_str("[forms.create]\nmethod = \"SEND\"\n").unwrap();
        assert!(matches!(
            config.validate_config(),
            Err(GaraError::InvalidConfigValueError { ref field, .. }) if field == "forms.create.method"
        ));

        assert!(TomlConfig::from_toml_str("[client\n").is_err());
    }
}
