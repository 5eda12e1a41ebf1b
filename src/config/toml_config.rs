use crate::core::advisor::DEFAULT_MODEL;
use crate::utils::error::{DeskError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_positive_number, validate_required_field,
    validate_url, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_DATA_FILE: &str = "taller.json";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub ai: AiConfig,
    pub storage: StorageConfig,
}

/// Settings for the generative AI backend. The API key is always passed in
/// explicitly; the client never looks it up on its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub endpoint: String,
    pub timeout_seconds: Option<u64>,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_seconds: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub data_file: String,
    pub backup_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_file: DEFAULT_DATA_FILE.to_string(),
            backup_dir: ".".to_string(),
        }
    }
}

impl AppConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(DeskError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 檔案不存在時使用預設值
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            tracing::debug!(
                "No config file at {}, using defaults",
                path.as_ref().display()
            );
            Ok(Self::default())
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        let mut config: AppConfig =
            toml::from_str(&processed_content).map_err(|e| DeskError::ConfigError {
                message: format!("TOML parsing error: {}", e),
            })?;
        config.ai.api_key = config.ai.api_key.take().filter(|key| !is_unresolved(key));
        Ok(config)
    }

    /// 替換環境變數 (例如 ${GEMINI_API_KEY})
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| DeskError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }
}

/// A key left as `${VAR}` or blank means the variable was not set.
fn is_unresolved(key: &str) -> bool {
    let key = key.trim();
    key.is_empty() || (key.starts_with("${") && key.ends_with('}'))
}

impl AiConfig {
    pub fn require_api_key(&self) -> Result<&str> {
        let key = validate_required_field("ai.api_key", &self.api_key)?;
        validate_non_empty_string("ai.api_key", key)?;
        Ok(key)
    }
}

impl Validate for AiConfig {
    fn validate(&self) -> Result<()> {
        validate_url("ai.endpoint", &self.endpoint)?;
        validate_non_empty_string("ai.model", &self.model)?;
        if let Some(timeout) = self.timeout_seconds {
            validate_positive_number("ai.timeout_seconds", timeout, 1)?;
        }
        Ok(())
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        self.ai.validate()?;
        validate_path("storage.data_file", &self.storage.data_file)?;
        validate_path("storage.backup_dir", &self.storage.backup_dir)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_file() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config.ai.model, DEFAULT_MODEL);
        assert_eq!(config.ai.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.storage.data_file, DEFAULT_DATA_FILE);
        assert!(config.ai.api_key.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_substitution_for_api_key() {
        std::env::set_var("REPAIR_DESK_TEST_KEY", "abc123");
        let config = AppConfig::from_toml_str(
            r#"
[ai]
api_key = "${REPAIR_DESK_TEST_KEY}"
model = "gemini-2.0-flash"
timeout_seconds = 30

[storage]
data_file = "data/taller.json"
"#,
        )
        .unwrap();

        assert_eq!(config.ai.require_api_key().unwrap(), "abc123");
        assert_eq!(config.ai.model, "gemini-2.0-flash");
        assert_eq!(config.ai.timeout_seconds, Some(30));
        assert_eq!(config.storage.data_file, "data/taller.json");
        assert_eq!(config.storage.backup_dir, ".");
    }

    #[test]
    fn test_unset_variable_means_no_key() {
        let config = AppConfig::from_toml_str(
            r#"
[ai]
api_key = "${REPAIR_DESK_UNSET_VARIABLE_FOR_TEST}"
"#,
        )
        .unwrap();

        assert!(config.ai.api_key.is_none());
        assert!(matches!(
            config.ai.require_api_key(),
            Err(DeskError::MissingConfigError { .. })
        ));
    }

    #[test]
    fn test_invalid_endpoint_rejected() {
        let mut config = AppConfig::default();
        config.ai.endpoint = "ftp://example.com".to_string();
        assert!(config.validate().is_err());

        assert!(AppConfig::from_toml_str("[ai\nmodel = 1").is_err());
    }
}
