//! Key Normalizer
//!
//! Resolves a raw brand or device key against an alias map. The result is a
//! pure function of the key and the (immutable) table, so the order in which
//! keys are normalized can never change how records are grouped.

use std::collections::HashMap;

/// A raw key resolved against the alias table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedKey {
    /// Internal grouping key. Never shown to users.
    pub id: String,
    /// Human-facing canonical name.
    pub display_name: String,
    /// Alias value the raw key resolved to, `None` when unmapped.
    pub canonical_key: Option<String>,
}

impl NormalizedKey {
    pub fn is_mapped(&self) -> bool {
        self.canonical_key.is_some()
    }
}

/// Resolve `raw_key`: exact match, then lowercase match, else the raw key
/// stands for itself.
pub fn normalize(
    raw_key: &str,
    alias_map: &HashMap<String, String>,
    display_names: Option<&HashMap<String, String>>,
) -> NormalizedKey {
    let mapped = alias_map
        .get(raw_key)
        .or_else(|| alias_map.get(&raw_key.to_lowercase()));

    match mapped {
        Some(canonical) => {
            let display_name = display_names
                .and_then(|names| names.get(canonical))
                .unwrap_or(canonical)
                .clone();
            NormalizedKey {
                id: normalized_id(&display_name),
                display_name,
                canonical_key: Some(canonical.clone()),
            }
        }
        None => NormalizedKey {
            id: normalized_id(raw_key),
            display_name: raw_key.to_string(),
            canonical_key: None,
        },
    }
}

/// Lowercase, with every whitespace run collapsed to one underscore.
pub fn normalized_id(name: &str) -> String {
    let mut id = String::with_capacity(name.len());
    let mut in_space = false;
    for c in name.chars() {
        if c.is_whitespace() {
            if !in_space {
                id.push('_');
            }
            in_space = true;
        } else {
            id.extend(c.to_lowercase());
            in_space = false;
        }
    }
    id
}
