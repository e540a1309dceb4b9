//! Paginator limits configuration
//!
//! Limits can be built in code or loaded from a YAML or JSON file:
//!
//! ```yaml
//! base_limit: 50
//! max_limit: 400
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Base batch size used when none is configured
pub const DEFAULT_BASE_LIMIT: usize = 20;

/// Batch size limits for one pagination session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PaginatorConfig {
    /// Batch size requested after every productive fetch
    #[serde(default = "default_base_limit")]
    pub base_limit: usize,

    /// Ceiling for adaptive growth (unset = unbounded doubling)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_limit: Option<usize>,
}

fn default_base_limit() -> usize {
    DEFAULT_BASE_LIMIT
}

impl Default for PaginatorConfig {
    fn default() -> Self {
        Self {
            base_limit: DEFAULT_BASE_LIMIT,
            max_limit: None,
        }
    }
}

impl PaginatorConfig {
    /// Create a config with the given base limit and no ceiling
    pub fn new(base_limit: usize) -> Self {
        Self {
            base_limit,
            max_limit: None,
        }
    }

    /// Set the growth ceiling
    pub fn with_max_limit(mut self, max_limit: usize) -> Self {
        self.max_limit = Some(max_limit);
        self
    }

    /// Check that `base_limit > 0` and `max_limit >= base_limit`
    pub fn validate(&self) -> Result<()> {
        validate_limits(self.base_limit, self.max_limit)
    }

    /// Parse a config from YAML
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a config from JSON
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file; `.json` files are parsed as JSON, anything else as YAML
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let contents = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        if is_json {
            Self::from_json_str(&contents)
        } else {
            Self::from_yaml_str(&contents)
        }
    }
}

/// Validate a base limit and optional ceiling
pub(crate) fn validate_limits(base_limit: usize, max_limit: Option<usize>) -> Result<()> {
    if base_limit == 0 {
        return Err(Error::invalid_value(
            "base_limit",
            "must be greater than zero",
        ));
    }
    if let Some(max_limit) = max_limit {
        if max_limit < base_limit {
            return Err(Error::invalid_value(
                "max_limit",
                format!("{max_limit} is smaller than base_limit {base_limit}"),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = PaginatorConfig::default();
        assert_eq!(config.base_limit, DEFAULT_BASE_LIMIT);
        assert!(config.max_limit.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = PaginatorConfig::new(3).with_max_limit(4);
        assert_eq!(config.base_limit, 3);
        assert_eq!(config.max_limit, Some(4));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_base() {
        let err = PaginatorConfig::new(0).validate().unwrap_err();
        assert!(matches!(err, Error::InvalidConfigValue { ref field, .. } if field == "base_limit"));
    }

    #[test]
    fn test_validate_rejects_small_ceiling() {
        let err = PaginatorConfig::new(10)
            .with_max_limit(5)
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("5 is smaller than base_limit 10"));
    }

    #[test]
    fn test_from_yaml() {
        let config = PaginatorConfig::from_yaml_str("base_limit: 50\nmax_limit: 400\n").unwrap();
        assert_eq!(config, PaginatorConfig::new(50).with_max_limit(400));

        let config = PaginatorConfig::from_yaml_str("max_limit: 100\n").unwrap();
        assert_eq!(config.base_limit, DEFAULT_BASE_LIMIT);
    }

    #[test]
    fn test_from_yaml_unknown_field() {
        let result = PaginatorConfig::from_yaml_str("base_limit: 5\nmin_limit: 1\n");
        assert!(matches!(result, Err(Error::YamlParse(_))));
    }

    #[test]
    fn test_from_json_validates() {
        let result = PaginatorConfig::from_json_str(r#"{"base_limit": 8, "max_limit": 4}"#);
        assert!(matches!(result, Err(Error::InvalidConfigValue { .. })));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"base_limit": 3, "max_limit": 12}}"#).unwrap();

        let config = PaginatorConfig::from_file(file.path()).unwrap();
        assert_eq!(config, PaginatorConfig::new(3).with_max_limit(12));
    }

    #[test]
    fn test_from_missing_file() {
        let result = PaginatorConfig::from_file("/nonexistent/limits.yaml");
        assert!(matches!(result, Err(Error::FileNotFound { .. })));
    }
}
