//! Alias configuration file schema and loader.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AliasConfigError {
    #[error("Failed to read alias configuration: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse alias configuration JSON: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// `{ "brands": [ { "name", "value", "models": [ { "name", "value" } ] } ] }`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AliasConfig {
    #[serde(default)]
    pub brands: Vec<BrandEntry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BrandEntry {
    /// Display name, e.g. "Access Music"
    #[serde(default)]
    pub name: Option<String>,
    /// Canonical short id, e.g. "access"
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub models: Vec<ModelEntry>,
    /// Extra raw spellings that should resolve to `value`
    #[serde(default)]
    pub aliases: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelEntry {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub aliases: Vec<String>,
}

impl AliasConfig {
    pub fn from_path(path: &Path) -> Result<Self, AliasConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, AliasConfigError> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn model_count(&self) -> usize {
        self.brands.iter().map(|b| b.models.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_config() {
        let config = AliasConfig::from_json(
            r#"{"brands": [{"name": "Access Music", "value": "access", "models": [{"name": "Virus TI", "value": "virus_ti"}]}, {"name": "Nameless"}]}"#,
        )
        .unwrap();

        assert_eq!(config.brands.len(), 2);
        assert_eq!(config.model_count(), 1);
        assert!(config.brands[1].value.is_none());
    }

    #[test]
    fn test_missing_brands_key_is_empty() {
        let config = AliasConfig::from_json("{}").unwrap();
        assert!(config.brands.is_empty());
    }

    #[test]
    fn test_malformed_config_is_error() {
        assert!(matches!(
            AliasConfig::from_json(r#"{"brands": 5}"#),
            Err(AliasConfigError::ParseError(_))
        ));
    }
}
