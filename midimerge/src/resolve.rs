//! Resolution Engine
//!
//! Normalizes every (brand, device) key of both databases, collects records
//! into identity buckets, splits each bucket by device display name and folds
//! every resulting group into one record.
//!
//! ```text
//! target ──┐                      ┌─ ModelGroup "GT-1000" ──▶ seed ◀─ merge ◀─ rest
//!          ├─▶ normalize ─▶ bucket┤
//! source ──┘   (aliases)          └─ ModelGroup "GT 1000"  ──▶ ...
//! ```
//!
//! Maps are insertion-ordered and the only reordering is the explicit
//! (parameter count, first-seen) sort, so identical inputs always produce
//! identical output.

use indexmap::{IndexMap, IndexSet};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;
use std::cmp::Reverse;
use std::collections::HashMap;

use crate::aliases::AliasTable;
use crate::core::MidiMergeError;
use crate::device::{merge, standardize_source_device, DeviceRecord};

/// Top-level keys that carry metadata rather than a brand.
pub const RESERVED_KEYS: [&str; 2] = ["version", "generatedAt"];

/// One input database: brand key → device key → raw device object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceDatabase {
    pub metadata: IndexMap<String, Value>,
    pub brands: IndexMap<String, IndexMap<String, Value>>,
}

impl SourceDatabase {
    pub fn from_json(content: &str) -> Result<Self, MidiMergeError> {
        let value: Value = serde_json::from_str(content)?;
        Self::from_value(value)
    }

    /// Split a parsed document into metadata and brands. A non-object top
    /// level is an error; non-object brands or devices are skipped.
    pub fn from_value(value: Value) -> Result<Self, MidiMergeError> {
        let Value::Object(top) = value else {
            return Err(MidiMergeError::InvalidDatabase(
                "top level must be an object of brands".to_string(),
            ));
        };

        let mut db = Self::default();
        for (key, entry) in top {
            if RESERVED_KEYS.contains(&key.as_str()) {
                db.metadata.insert(key, entry);
                continue;
            }
            let Value::Object(devices) = entry else {
                tracing::warn!("Skipping brand {:?}: not an object", key);
                continue;
            };
            let mut brand = IndexMap::new();
            for (device_key, device) in devices {
                if device.is_object() {
                    brand.insert(device_key, device);
                } else {
                    tracing::warn!("Skipping device {:?}/{:?}: not an object", key, device_key);
                }
            }
            db.brands.insert(key, brand);
        }
        Ok(db)
    }

    pub fn device_count(&self) -> usize {
        self.brands.values().map(IndexMap::len).sum()
    }
}

/// The merged output: metadata first, then brand → model → record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FinalDatabase {
    pub metadata: IndexMap<String, Value>,
    pub brands: IndexMap<String, IndexMap<String, DeviceRecord>>,
}

impl FinalDatabase {
    /// Read back a previously written database (e.g. for statistics).
    pub fn from_value(value: Value) -> Result<Self, MidiMergeError> {
        let source = SourceDatabase::from_value(value)?;
        let mut db = Self {
            metadata: source.metadata,
            brands: IndexMap::new(),
        };
        for (brand, devices) in source.brands {
            let mut records = IndexMap::new();
            for (model, device) in devices {
                records.insert(model, serde_json::from_value(device)?);
            }
            db.brands.insert(brand, records);
        }
        Ok(db)
    }

    pub fn from_json(content: &str) -> Result<Self, MidiMergeError> {
        Self::from_value(serde_json::from_str(content)?)
    }

    pub fn device(&self, brand: &str, model: &str) -> Option<&DeviceRecord> {
        self.brands.get(brand)?.get(model)
    }

    pub fn device_count(&self) -> usize {
        self.brands.values().map(IndexMap::len).sum()
    }

    pub fn to_pretty_json(&self) -> Result<String, MidiMergeError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_minified_json(&self) -> Result<String, MidiMergeError> {
        Ok(serde_json::to_string(self)?)
    }
}

impl Serialize for FinalDatabase {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.metadata.len() + self.brands.len()))?;
        for (key, value) in &self.metadata {
            map.serialize_entry(key, value)?;
        }
        for (brand, devices) in &self.brands {
            map.serialize_entry(brand, devices)?;
        }
        map.end()
    }
}

/// A standardized record and the order it was encountered in.
#[derive(Debug, Clone)]
struct Candidate {
    record: DeviceRecord,
    seen: usize,
}

/// Records sharing one (brand id, device id) pair, split by device display name.
#[derive(Debug, Default)]
struct IdentityBucket {
    groups: IndexMap<String, Vec<Candidate>>,
}

/// First mapped display name per brand id; an unmapped spelling only holds
/// the slot until a mapped one shows up.
#[derive(Debug, Default)]
struct BrandNames {
    names: HashMap<String, (String, bool)>,
}

impl BrandNames {
    fn record(&mut self, id: &str, display: &str, mapped: bool) {
        match self.names.get_mut(id) {
            Some(slot) if !slot.1 && mapped => *slot = (display.to_string(), true),
            Some(_) => {}
            None => {
                self.names
                    .insert(id.to_string(), (display.to_string(), mapped));
            }
        }
    }

    fn get(&self, id: &str) -> Option<&str> {
        self.names.get(id).map(|(name, _)| name.as_str())
    }
}

/// Merge `target` and `source` into one canonical database.
pub fn resolve(
    target: &SourceDatabase,
    source: &SourceDatabase,
    aliases: &AliasTable,
) -> FinalDatabase {
    let mut output = FinalDatabase::default();
    for key in RESERVED_KEYS {
        if let Some(value) = target.metadata.get(key) {
            output.metadata.insert(key.to_string(), value.clone());
        }
    }

    let mut buckets: IndexMap<(String, String), IdentityBucket> = IndexMap::new();
    let mut brand_names = BrandNames::default();
    let mut spellings: IndexMap<String, IndexSet<String>> = IndexMap::new();
    let mut seen = 0usize;

    for (label, db) in [("target", target), ("source", source)] {
        tracing::debug!("Normalizing {} database: {} brands", label, db.brands.len());

        for (brand_key, devices) in &db.brands {
            let brand = aliases.normalize_brand(brand_key);
            brand_names.record(&brand.id, &brand.display_name, brand.is_mapped());
            spellings
                .entry(brand.id.clone())
                .or_default()
                .insert(brand_key.clone());

            for (device_key, data) in devices {
                let device = aliases.normalize_device(&brand, device_key);
                let record =
                    standardize_source_device(data, &brand.display_name, &device.display_name);

                buckets
                    .entry((brand.id.clone(), device.id))
                    .or_default()
                    .groups
                    .entry(device.display_name)
                    .or_default()
                    .push(Candidate { record, seen });
                seen += 1;
            }
        }
    }

    for (brand_id, raw) in &spellings {
        if raw.len() > 1 {
            tracing::debug!("Brand {} seen as {:?}", brand_id, raw);
        }
    }

    for ((brand_id, device_id), bucket) in buckets {
        let brand_display = brand_names
            .get(&brand_id)
            .unwrap_or(brand_id.as_str())
            .to_string();

        if bucket.groups.len() > 1 {
            tracing::debug!(
                "Bucket {}_{} holds {} distinct models; keeping them apart",
                brand_id,
                device_id,
                bucket.groups.len()
            );
        }

        for (model_display, entries) in bucket.groups {
            let Some(mut merged) = fold_group(entries) else {
                continue;
            };
            merged.brand = brand_display.clone();
            merged.device_name = model_display.clone();

            let devices = output.brands.entry(brand_display.clone()).or_default();
            if devices.insert(model_display.clone(), merged).is_some() {
                tracing::warn!(
                    "{} / {} resolved from two different ids; keeping the later one",
                    brand_display,
                    model_display
                );
            }
        }
    }

    tracing::info!(
        "Resolved {} input devices into {} brands / {} devices",
        seen,
        output.brands.len(),
        output.device_count()
    );
    output
}

/// Fold records believed to be the same product, given in encounter order.
/// The record with the most parameters seeds the fold; ties keep the earlier
/// record first.
pub fn merge_candidates(records: Vec<DeviceRecord>) -> Option<DeviceRecord> {
    fold_group(
        records
            .into_iter()
            .enumerate()
            .map(|(seen, record)| Candidate { record, seen })
            .collect(),
    )
}

fn fold_group(mut entries: Vec<Candidate>) -> Option<DeviceRecord> {
    entries.sort_by_key(|c| (Reverse(c.record.parameter_count()), c.seen));

    let mut iter = entries.into_iter();
    let seed = iter.next()?.record;
    Some(iter.fold(seed, |acc, next| merge(&acc, &next.record)))
}
