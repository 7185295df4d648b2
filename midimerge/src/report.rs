//! Statistics and change detection for a finished [`FinalDatabase`].

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeSet;

use crate::resolve::{FinalDatabase, SourceDatabase};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DatabaseStats {
    pub brands: usize,
    pub devices: usize,
    pub cc: usize,
    pub nrpn: usize,
    pub pc: usize,
}

impl DatabaseStats {
    pub fn from_database(db: &FinalDatabase) -> Self {
        let mut stats = Self {
            brands: db.brands.len(),
            ..Self::default()
        };
        for record in db.brands.values().flat_map(|devices| devices.values()) {
            stats.devices += 1;
            stats.cc += record.cc.len();
            stats.nrpn += record.nrpn.len();
            stats.pc += record.pc.len();
        }
        stats
    }

    pub fn total_parameters(&self) -> usize {
        self.cc + self.nrpn + self.pc
    }
}

/// Difference between the previous output artifact and a new result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChangeSummary {
    pub added_brands: Vec<String>,
    pub removed_brands: Vec<String>,
    /// "Brand / Model"
    pub added_devices: Vec<String>,
    pub removed_devices: Vec<String>,
    /// Any brand content or the version differs. `generatedAt` is ignored.
    pub changed: bool,
}

impl ChangeSummary {
    pub fn between(baseline: &SourceDatabase, current: &FinalDatabase) -> Self {
        let old_brands: BTreeSet<&str> = baseline.brands.keys().map(String::as_str).collect();
        let new_brands: BTreeSet<&str> = current.brands.keys().map(String::as_str).collect();

        let old_devices: BTreeSet<String> = baseline
            .brands
            .iter()
            .flat_map(|(brand, devices)| devices.keys().map(move |d| device_label(brand, d)))
            .collect();
        let new_devices: BTreeSet<String> = current
            .brands
            .iter()
            .flat_map(|(brand, devices)| devices.keys().map(move |d| device_label(brand, d)))
            .collect();

        let version_changed =
            baseline.metadata.get("version") != current.metadata.get("version");

        Self {
            added_brands: new_brands.difference(&old_brands).map(|s| s.to_string()).collect(),
            removed_brands: old_brands.difference(&new_brands).map(|s| s.to_string()).collect(),
            added_devices: new_devices.difference(&old_devices).cloned().collect(),
            removed_devices: old_devices.difference(&new_devices).cloned().collect(),
            changed: version_changed || !same_content(baseline, current),
        }
    }
}

fn device_label(brand: &str, device: &str) -> String {
    format!("{brand} / {device}")
}

fn same_content(baseline: &SourceDatabase, current: &FinalDatabase) -> bool {
    if baseline.brands.len() != current.brands.len() {
        return false;
    }
    current.brands.iter().all(|(brand, devices)| {
        let Some(old) = baseline.brands.get(brand) else {
            return false;
        };
        old.len() == devices.len()
            && devices.iter().all(|(model, record)| {
                match (old.get(model), serde_json::to_value(record)) {
                    (Some(before), Ok(after)) => *before == after,
                    _ => false,
                }
            })
    })
}
