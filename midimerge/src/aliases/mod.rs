//! Alias Table
//!
//! Known spelling variants of manufacturer and device names, each pointing at
//! one canonical key, plus the display name for every canonical key. Built
//! once from configuration and only read afterwards.

pub mod config;
pub mod variants;

pub use config::{AliasConfig, AliasConfigError, BrandEntry, ModelEntry};

use std::collections::HashMap;
use std::path::Path;

use crate::normalize::{normalize, NormalizedKey};

#[derive(Debug, Clone, Default)]
pub struct AliasTable {
    manufacturer_aliases: HashMap<String, String>,
    device_aliases: HashMap<String, String>,
    brand_display_names: HashMap<String, String>,
    model_display_names: HashMap<String, HashMap<String, String>>,
}

impl AliasTable {
    /// A table that knows no aliases: every key is its own canonical form.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build the table from a configuration listing. Entries without a
    /// `value` are skipped; a raw key registered twice keeps the later target.
    pub fn from_config(config: &AliasConfig) -> Self {
        let mut table = Self::empty();

        for brand in &config.brands {
            let Some(brand_value) = brand.value.as_deref().filter(|v| !v.is_empty()) else {
                continue;
            };
            let brand_name = brand.name.as_deref();

            for (variant, canonical) in variants::brand_variants(brand_name, brand_value) {
                table.manufacturer_aliases.insert(variant, canonical);
            }
            for alias in &brand.aliases {
                table
                    .manufacturer_aliases
                    .insert(alias.clone(), brand_value.to_string());
            }
            if let Some(name) = brand_name {
                table
                    .brand_display_names
                    .insert(brand_value.to_string(), name.to_string());
            }

            for model in &brand.models {
                let Some(model_value) = model.value.as_deref().filter(|v| !v.is_empty()) else {
                    continue;
                };
                let model_name = model.name.as_deref();

                for (variant, canonical) in variants::model_variants(model_name, model_value) {
                    table.device_aliases.insert(variant, canonical);
                }
                for alias in &model.aliases {
                    table
                        .device_aliases
                        .insert(alias.clone(), model_value.to_string());
                }
                if let Some(name) = model_name {
                    table
                        .model_display_names
                        .entry(brand_value.to_string())
                        .or_default()
                        .insert(model_value.to_string(), name.to_string());
                }
            }
        }

        tracing::debug!(
            "Alias table built: {} manufacturer variants, {} device variants",
            table.manufacturer_aliases.len(),
            table.device_aliases.len()
        );
        table
    }

    /// Load and build from a configuration file.
    pub fn load(path: &Path) -> Result<Self, AliasConfigError> {
        let config = AliasConfig::from_path(path)?;
        tracing::info!(
            "Loaded alias configuration: {} brands, {} models from {:?}",
            config.brands.len(),
            config.model_count(),
            path
        );
        Ok(Self::from_config(&config))
    }

    /// Like [`AliasTable::load`], but a missing or malformed configuration
    /// degrades to the empty table instead of failing the run.
    pub fn load_or_empty(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            tracing::warn!("No alias configuration given; merging without aliases");
            return Self::empty();
        };
        match Self::load(path) {
            Ok(table) => table,
            Err(e) => {
                tracing::warn!("{}; merging without aliases", e);
                Self::empty()
            }
        }
    }

    pub fn normalize_brand(&self, raw_key: &str) -> NormalizedKey {
        normalize(
            raw_key,
            &self.manufacturer_aliases,
            Some(&self.brand_display_names),
        )
    }

    /// Device display names are looked up under the brand's canonical key.
    pub fn normalize_device(&self, brand: &NormalizedKey, raw_key: &str) -> NormalizedKey {
        let display_names = brand
            .canonical_key
            .as_ref()
            .and_then(|key| self.model_display_names.get(key));
        normalize(raw_key, &self.device_aliases, display_names)
    }

    pub fn manufacturer_aliases(&self) -> &HashMap<String, String> {
        &self.manufacturer_aliases
    }

    pub fn device_aliases(&self) -> &HashMap<String, String> {
        &self.device_aliases
    }

    pub fn brand_display_names(&self) -> &HashMap<String, String> {
        &self.brand_display_names
    }

    pub fn model_display_names(&self, brand_key: &str) -> Option<&HashMap<String, String>> {
        self.model_display_names.get(brand_key)
    }

    pub fn is_empty(&self) -> bool {
        self.manufacturer_aliases.is_empty() && self.device_aliases.is_empty()
    }
}
