//! Unmapped-key diagnostics.
//!
//! Lists brand and device keys the alias table does not know, under their
//! raw spelling, so they can be added to the configuration. Read-only: this
//! never influences resolution.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::aliases::AliasTable;
use crate::resolve::SourceDatabase;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UnmappedReport {
    pub missing_brands: BTreeSet<String>,
    /// Canonical brand display name → raw device keys
    pub missing_devices: BTreeMap<String, BTreeSet<String>>,
}

impl UnmappedReport {
    pub fn is_empty(&self) -> bool {
        self.missing_brands.is_empty() && self.missing_devices.is_empty()
    }

    pub fn missing_device_count(&self) -> usize {
        self.missing_devices.values().map(BTreeSet::len).sum()
    }
}

pub fn find_unmapped(
    target: &SourceDatabase,
    source: &SourceDatabase,
    aliases: &AliasTable,
) -> UnmappedReport {
    let mut report = UnmappedReport::default();

    for db in [target, source] {
        for (brand_key, devices) in &db.brands {
            if !is_known(aliases.manufacturer_aliases(), brand_key) {
                report.missing_brands.insert(brand_key.clone());
            }

            let brand = aliases.normalize_brand(brand_key);
            for device_key in devices.keys() {
                if !is_known(aliases.device_aliases(), device_key) {
                    report
                        .missing_devices
                        .entry(brand.display_name.clone())
                        .or_default()
                        .insert(device_key.clone());
                }
            }
        }
    }

    tracing::info!(
        "{} unmapped brands, {} unmapped devices",
        report.missing_brands.len(),
        report.missing_device_count()
    );
    report
}

fn is_known(map: &HashMap<String, String>, key: &str) -> bool {
    let lower = key.to_lowercase();
    let stripped: String = key.chars().filter(|c| !c.is_whitespace()).collect();
    let lower_stripped = stripped.to_lowercase();

    [key, lower.as_str(), stripped.as_str(), lower_stripped.as_str()]
        .iter()
        .any(|k| map.contains_key(*k))
}
