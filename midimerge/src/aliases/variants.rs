//! Spelling variant generation.
//!
//! Each function turns one configuration entry into a finite list of
//! `(variant, canonical)` pairs. The table builder only registers what these
//! return, so the variants can be inspected and tested on their own.

use regex::Regex;
use std::sync::OnceLock;

/// Suffixes sources commonly glue onto a brand id ("access_music", "boss-effects").
pub const BRAND_SUFFIXES: &[&str] = &["music", "audio", "pedals", "effects", "engineering"];

struct MarkRewrites {
    mk_digit: Regex,
    mark_digit: Regex,
    mkii: Regex,
    mk2: Regex,
}

fn mark_rewrites() -> &'static MarkRewrites {
    static REWRITES: OnceLock<MarkRewrites> = OnceLock::new();
    REWRITES.get_or_init(|| MarkRewrites {
        mk_digit: Regex::new(r"(?i)mk(\d)").expect("static regex"),
        mark_digit: Regex::new(r"(?i)mark(\d)").expect("static regex"),
        mkii: Regex::new(r"(?i)mkii").expect("static regex"),
        mk2: Regex::new(r"(?i)mk2").expect("static regex"),
    })
}

/// Variants for a brand entry.
pub fn brand_variants(name: Option<&str>, value: &str) -> Vec<(String, String)> {
    let mut forms = vec![value.to_string()];
    forms.extend(name_forms(name));
    for suffix in BRAND_SUFFIXES {
        forms.push(format!("{value}_{suffix}"));
        forms.push(format!("{value}{suffix}"));
    }
    forms.extend(separator_swaps(value));

    pair_with(forms, value)
}

/// Variants for a model entry.
pub fn model_variants(name: Option<&str>, value: &str) -> Vec<(String, String)> {
    let mut forms = vec![value.to_string()];
    forms.extend(name_forms(name));
    forms.extend(separator_swaps(value));

    let stripped = strip_punctuation(value);
    forms.push(stripped.clone());
    forms.extend(mark_spellings(value));
    forms.extend(mark_spellings(&stripped));

    pair_with(forms, value)
}

/// The four mk/mark rewrites of `text`, case-insensitive.
/// Only rewrites that actually change the text are returned.
pub fn mark_spellings(text: &str) -> Vec<String> {
    let re = mark_rewrites();
    let candidates = [
        re.mk_digit.replace_all(text, "mark$1").into_owned(),
        re.mark_digit.replace_all(text, "mk$1").into_owned(),
        re.mkii.replace_all(text, "mk2").into_owned(),
        re.mk2.replace_all(text, "mkii").into_owned(),
    ];
    candidates.into_iter().filter(|c| c != text).collect()
}

/// Keep letters and digits only.
pub fn strip_punctuation(text: &str) -> String {
    text.chars().filter(|c| c.is_alphanumeric()).collect()
}

fn name_forms(name: Option<&str>) -> Vec<String> {
    let Some(name) = name.filter(|n| !n.trim().is_empty()) else {
        return Vec::new();
    };
    let lower = name.to_lowercase();
    let words: Vec<&str> = lower.split_whitespace().collect();
    vec![
        lower.clone(),
        words.concat(),
        words.join("_"),
        words.join("-"),
    ]
}

fn separator_swaps(value: &str) -> Vec<String> {
    vec![value.replace('-', "_"), value.replace('_', "-")]
}

/// Add lowercase forms, drop empties and duplicates, keep first-seen order.
fn pair_with(forms: Vec<String>, canonical: &str) -> Vec<(String, String)> {
    let mut seen = std::collections::HashSet::new();
    let mut pairs = Vec::new();
    for form in forms {
        let lower = form.to_lowercase();
        for candidate in [form, lower] {
            if candidate.is_empty() || !seen.insert(candidate.clone()) {
                continue;
            }
            pairs.push((candidate, canonical.to_string()));
        }
    }
    pairs
}
