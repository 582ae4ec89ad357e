use crate::config::earth_engine::EarthEngineConfig;
use crate::utils::error::{NdviError, Result};
use crate::utils::validation::Validate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub earth_engine: EarthEngineConfig,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(NdviError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        let mut config: TomlConfig =
            toml::from_str(&processed_content).map_err(|e| NdviError::ConfigValidationError {
                field: "toml_parsing".to_string(),
                message: format!("TOML parsing error: {}", e),
            })?;
        config.earth_engine = config.earth_engine.normalized();
        Ok(config)
    }

    /// 替換環境變數 (例如 ${EE_ACCESS_TOKEN})
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| NdviError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.earth_engine.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[earth_engine]
endpoint = "https://earthengine.googleapis.com"
project = "amazon-ndvi"
access_token = "token-123"
collection = "COPERNICUS/S2_SR_HARMONIZED"
cloud_threshold = 10
sample_scale = 20
timeout_seconds = 60
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.earth_engine.project.as_deref(), Some("amazon-ndvi"));
        assert_eq!(config.earth_engine.collection, "COPERNICUS/S2_SR_HARMONIZED");
        assert_eq!(config.earth_engine.cloud_threshold, 10.0);
        assert_eq!(config.earth_engine.sample_scale, 20);
        assert_eq!(config.earth_engine.timeout_seconds, Some(60));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_table_uses_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();
        assert_eq!(config.earth_engine.collection, "COPERNICUS/S2_SR");
        assert_eq!(config.earth_engine.cloud_threshold, 20.0);
        assert!(!config.earth_engine.has_credentials());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("NDVI_TEST_EE_PROJECT", "substituted-project");

        let toml_content = r#"
[earth_engine]
project = "${NDVI_TEST_EE_PROJECT}"
access_token = "${NDVI_TEST_UNSET_TOKEN}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.earth_engine.project.as_deref(), Some("substituted-project"));
        // 未設定的變數保持原樣，視為缺少 token
        assert!(config.earth_engine.access_token.is_none());

        std::env::remove_var("NDVI_TEST_EE_PROJECT");
    }

    #[test]
    fn test_config_validation() {
        let toml_content = r#"
[earth_engine]
endpoint = "invalid-url"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_toml_is_reported() {
        let err = TomlConfig::from_toml_str("[earth_engine\nproject = 1").unwrap_err();
        assert!(matches!(err, NdviError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[earth_engine]
project = "file-project"
access_token = "file-token"
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(
            config.earth_engine.credentials().unwrap(),
            ("file-project", "file-token")
        );
    }
}
