use crate::core::query::{DEFAULT_CLOUD_THRESHOLD, DEFAULT_SAMPLE_SCALE, SENTINEL2_SR};
use crate::core::ConfigProvider;
use crate::utils::error::{NdviError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_positive_number, validate_range, validate_required_field,
    validate_url, Validate,
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_ENDPOINT: &str = "https://earthengine.googleapis.com";

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}
fn default_collection() -> String {
    SENTINEL2_SR.to_string()
}
fn default_cloud_threshold() -> f64 {
    DEFAULT_CLOUD_THRESHOLD
}
fn default_sample_scale() -> u32 {
    DEFAULT_SAMPLE_SCALE
}

#[derive(Clone, Serialize, Deserialize)]
pub struct EarthEngineConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    pub project: Option<String>,
    pub access_token: Option<String>,
    #[serde(default = "default_collection")]
    pub collection: String,
    #[serde(default = "default_cloud_threshold")]
    pub cloud_threshold: f64,
    #[serde(default = "default_sample_scale")]
    pub sample_scale: u32,
    pub timeout_seconds: Option<u64>,
}

impl Default for EarthEngineConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            project: None,
            access_token: None,
            collection: default_collection(),
            cloud_threshold: default_cloud_threshold(),
            sample_scale: default_sample_scale(),
            timeout_seconds: None,
        }
    }
}

// token 不可出現在日誌中
impl std::fmt::Debug for EarthEngineConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EarthEngineConfig")
            .field("endpoint", &self.endpoint)
            .field("project", &self.project)
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .field("collection", &self.collection)
            .field("cloud_threshold", &self.cloud_threshold)
            .field("sample_scale", &self.sample_scale)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

/// 空字串或未替換的 `${VAR}` 視為未設定
fn normalize_secret(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty() && !(v.starts_with("${") && v.ends_with('}')))
}

fn parse_var<T: std::str::FromStr>(name: &str, raw: Option<String>, default: T) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(value) => {
            let parsed = value.trim().parse::<T>();
            parsed.map_err(|e| NdviError::InvalidConfigValueError {
                field: name.to_string(),
                value,
                reason: e.to_string(),
            })
        }
    }
}

impl EarthEngineConfig {
    /// 從環境變數載入 (`EE_PROJECT`, `EE_ACCESS_TOKEN`, ...)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = Self {
            endpoint: lookup("EE_ENDPOINT").unwrap_or_else(default_endpoint),
            project: lookup("EE_PROJECT"),
            access_token: lookup("EE_ACCESS_TOKEN"),
            collection: lookup("EE_COLLECTION").unwrap_or_else(default_collection),
            cloud_threshold: parse_var(
                "EE_CLOUD_THRESHOLD",
                lookup("EE_CLOUD_THRESHOLD"),
                DEFAULT_CLOUD_THRESHOLD,
            )?,
            sample_scale: parse_var(
                "EE_SAMPLE_SCALE",
                lookup("EE_SAMPLE_SCALE"),
                DEFAULT_SAMPLE_SCALE,
            )?,
            timeout_seconds: match lookup("EE_TIMEOUT_SECONDS") {
                Some(raw) => Some(parse_var("EE_TIMEOUT_SECONDS", Some(raw), 0u64)?),
                None => None,
            },
        };
        Ok(config.normalized())
    }

    pub fn normalized(mut self) -> Self {
        self.project = normalize_secret(self.project);
        self.access_token = normalize_secret(self.access_token);
        self.endpoint = self.endpoint.trim_end_matches('/').to_string();
        self
    }

    /// 取得連線所需的專案與 token
    pub fn credentials(&self) -> Result<(&str, &str)> {
        let project = validate_required_field("earth_engine.project", &self.project)?;
        let token = validate_required_field("earth_engine.access_token", &self.access_token)?;
        Ok((project.as_str(), token.as_str()))
    }

    pub fn has_credentials(&self) -> bool {
        self.credentials().is_ok()
    }
}

impl ConfigProvider for EarthEngineConfig {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn collection(&self) -> &str {
        &self.collection
    }

    fn cloud_threshold(&self) -> f64 {
        self.cloud_threshold
    }

    fn sample_scale(&self) -> u32 {
        self.sample_scale
    }

    fn timeout_seconds(&self) -> Option<u64> {
        self.timeout_seconds
    }
}

impl Validate for EarthEngineConfig {
    fn validate(&self) -> Result<()> {
        validate_url("earth_engine.endpoint", &self.endpoint)?;
        validate_non_empty_string("earth_engine.collection", &self.collection)?;
        validate_range("earth_engine.cloud_threshold", self.cloud_threshold, 0.0, 100.0)?;
        validate_positive_number("earth_engine.sample_scale", self.sample_scale, 1)?;

        if let Some(project) = &self.project {
            validate_non_empty_string("earth_engine.project", project)?;
        }
        if let Some(timeout) = self.timeout_seconds {
            if timeout == 0 {
                return Err(NdviError::InvalidConfigValueError {
                    field: "earth_engine.timeout_seconds".to_string(),
                    value: timeout.to_string(),
                    reason: "Timeout must be at least 1 second".to_string(),
                });
            }
        }

        tracing::debug!("✅ Earth Engine configuration validation passed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults_without_environment() {
        let config = EarthEngineConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.collection, "COPERNICUS/S2_SR");
        assert_eq!(config.cloud_threshold, 20.0);
        assert_eq!(config.sample_scale, 30);
        assert!(config.timeout_seconds.is_none());
        assert!(!config.has_credentials());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_environment_overrides() {
        let config = EarthEngineConfig::from_lookup(lookup_from(&[
            ("EE_ENDPOINT", "http://localhost:9000/"),
            ("EE_PROJECT", "amazon-watch"),
            ("EE_ACCESS_TOKEN", "ya29.token"),
            ("EE_CLOUD_THRESHOLD", "35"),
            ("EE_TIMEOUT_SECONDS", "15"),
        ]))
        .unwrap();

        assert_eq!(config.endpoint, "http://localhost:9000");
        assert_eq!(config.cloud_threshold, 35.0);
        assert_eq!(config.timeout_seconds, Some(15));
        assert_eq!(config.credentials().unwrap(), ("amazon-watch", "ya29.token"));
    }

    #[test]
    fn test_invalid_number_is_reported() {
        let err = EarthEngineConfig::from_lookup(lookup_from(&[("EE_CLOUD_THRESHOLD", "lots")]))
            .unwrap_err();
        assert!(matches!(
            err,
            NdviError::InvalidConfigValueError { ref field, .. } if field == "EE_CLOUD_THRESHOLD"
        ));
    }

    #[test]
    fn test_unresolved_placeholder_is_not_a_credential() {
        let config = EarthEngineConfig::from_lookup(lookup_from(&[
            ("EE_PROJECT", "amazon-watch"),
            ("EE_ACCESS_TOKEN", "${EE_ACCESS_TOKEN}"),
        ]))
        .unwrap();
        assert!(config.access_token.is_none());
        assert!(matches!(
            config.credentials(),
            Err(NdviError::MissingConfigError { .. })
        ));
    }

    #[test]
    fn test_validation_rejects_out_of_range_threshold() {
        let config = EarthEngineConfig {
            cloud_threshold: 150.0,
            ..EarthEngineConfig::default()
        };
        assert!(config.validate().is_err());

        let config = EarthEngineConfig {
            endpoint: "not a url".to_string(),
            ..EarthEngineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = EarthEngineConfig {
            access_token: Some("secret-token".to_string()),
            ..EarthEngineConfig::default()
        };
        let printed = format!("{:?}", config);
        assert!(!printed.contains("secret-token"));
        assert!(printed.contains("<redacted>"));
    }
}
