//! Device Record Schema
//!
//! The fixed shape every device ends up in after standardization. Source
//! databases disagree on field presence and types; everything downstream of
//! the standardizer only ever sees these structs.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

pub const DEFAULT_PHANTOM_POWER: &str = "None";
pub const DEFAULT_CURVE: &str = "0-based";
pub const DEFAULT_PARAMETER_TYPE: &str = "Parameter";
pub const CC_MAX: i64 = 127;
pub const NRPN_MAX: i64 = 16383;

/// Integer field of a parameter.
///
/// Sources sometimes carry numbers as strings. Those are parsed base-10; a
/// string with no leading digits becomes `NaN` and is kept as-is rather than
/// rejected. `NaN` serializes as JSON `null`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamNumber {
    Int(i64),
    NaN,
}

impl ParamNumber {
    /// Parse like a base-10 `parseInt`: leading whitespace, optional sign,
    /// then as many digits as are present. Trailing garbage is ignored.
    /// Digit runs beyond the `i64` range saturate at `i64::MIN`/`i64::MAX`.
    pub fn parse_int(text: &str) -> Self {
        let trimmed = text.trim_start();
        let (negative, rest) = match trimmed.as_bytes().first() {
            Some(b'-') => (true, &trimmed[1..]),
            Some(b'+') => (false, &trimmed[1..]),
            _ => (false, trimmed),
        };
        let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
        if digits.is_empty() {
            return ParamNumber::NaN;
        }
        match digits.parse::<i64>() {
            Ok(n) if negative => ParamNumber::Int(-n),
            Ok(n) => ParamNumber::Int(n),
            Err(_) if negative => ParamNumber::Int(i64::MIN),
            Err(_) => ParamNumber::Int(i64::MAX),
        }
    }

    /// Coerce a raw JSON field, falling back to `default` when it is absent
    /// or falsy (`null`, `false`, `0`, `""`).
    pub fn coerce(value: Option<&Value>, default: i64) -> Self {
        match value {
            None | Some(Value::Null) | Some(Value::Bool(false)) => ParamNumber::Int(default),
            Some(Value::String(s)) if s.is_empty() => ParamNumber::Int(default),
            Some(Value::String(s)) => Self::parse_int(s),
            Some(Value::Number(n)) => {
                let parsed = n
                    .as_i64()
                    .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64));
                match parsed {
                    Some(0) => ParamNumber::Int(default),
                    Some(v) => ParamNumber::Int(v),
                    None => ParamNumber::NaN,
                }
            }
            Some(_) => ParamNumber::NaN,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ParamNumber::Int(v) => Some(*v),
            ParamNumber::NaN => None,
        }
    }

    pub fn is_nan(&self) -> bool {
        matches!(self, ParamNumber::NaN)
    }
}

impl From<i64> for ParamNumber {
    fn from(v: i64) -> Self {
        ParamNumber::Int(v)
    }
}

impl Serialize for ParamNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ParamNumber::Int(v) => serializer.serialize_i64(*v),
            ParamNumber::NaN => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for ParamNumber {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(match value {
            Value::Null => ParamNumber::NaN,
            Value::String(s) => ParamNumber::parse_int(&s),
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
                .map(ParamNumber::Int)
                .unwrap_or(ParamNumber::NaN),
            _ => ParamNumber::NaN,
        })
    }
}

fn zero() -> ParamNumber {
    ParamNumber::Int(0)
}

fn cc_max() -> ParamNumber {
    ParamNumber::Int(CC_MAX)
}

fn nrpn_max() -> ParamNumber {
    ParamNumber::Int(NRPN_MAX)
}

fn default_curve() -> String {
    DEFAULT_CURVE.to_string()
}

fn default_parameter_type() -> String {
    DEFAULT_PARAMETER_TYPE.to_string()
}

fn default_phantom_power() -> String {
    DEFAULT_PHANTOM_POWER.to_string()
}

/// A CC parameter. Program Change entries share this shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CcParameter {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "zero")]
    pub value: ParamNumber,
    #[serde(default = "zero")]
    pub min: ParamNumber,
    #[serde(default = "cc_max")]
    pub max: ParamNumber,
    #[serde(rename = "type", default = "default_parameter_type")]
    pub param_type: String,
    #[serde(default)]
    pub usage: String,
    #[serde(default = "default_curve")]
    pub curve: String,
}

pub type PcParameter = CcParameter;

/// An NRPN parameter, addressed by its MSB/LSB pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NrpnParameter {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "zero")]
    pub msb: ParamNumber,
    #[serde(default = "zero")]
    pub lsb: ParamNumber,
    #[serde(default = "zero")]
    pub min: ParamNumber,
    #[serde(default = "nrpn_max")]
    pub max: ParamNumber,
    #[serde(rename = "type", default = "default_parameter_type")]
    pub param_type: String,
    #[serde(default)]
    pub usage: String,
    #[serde(default = "default_curve")]
    pub curve: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MidiChannel {
    #[serde(default)]
    pub instructions: String,
}

/// Standardized device entry. Every field is always present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceRecord {
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub device_name: String,
    #[serde(default)]
    pub midi_thru: bool,
    #[serde(default)]
    pub midi_in: String,
    #[serde(default)]
    pub midi_clock: bool,
    #[serde(default = "default_phantom_power")]
    pub phantom_power: String,
    #[serde(default)]
    pub midi_channel: MidiChannel,
    #[serde(default)]
    pub instructions: String,
    #[serde(default)]
    pub cc: Vec<CcParameter>,
    #[serde(default)]
    pub nrpn: Vec<NrpnParameter>,
    #[serde(default)]
    pub pc: Vec<PcParameter>,
}

impl DeviceRecord {
    /// An all-defaults record for the given names.
    pub fn empty(brand: &str, device_name: &str) -> Self {
        Self {
            brand: brand.to_string(),
            device_name: device_name.to_string(),
            midi_thru: false,
            midi_in: String::new(),
            midi_clock: false,
            phantom_power: default_phantom_power(),
            midi_channel: MidiChannel::default(),
            instructions: String::new(),
            cc: Vec::new(),
            nrpn: Vec::new(),
            pc: Vec::new(),
        }
    }

    /// Total CC + NRPN + PC entries. Used to rank merge candidates.
    pub fn parameter_count(&self) -> usize {
        self.cc.len() + self.nrpn.len() + self.pc.len()
    }

    /// Re-fill string defaults that an empty value would otherwise leave blank.
    pub fn apply_defaults(&mut self) {
        if self.phantom_power.is_empty() {
            self.phantom_power = default_phantom_power();
        }
        for p in self.cc.iter_mut().chain(self.pc.iter_mut()) {
            fill_text(&mut p.curve, DEFAULT_CURVE);
            fill_text(&mut p.param_type, DEFAULT_PARAMETER_TYPE);
        }
        for p in &mut self.nrpn {
            fill_text(&mut p.curve, DEFAULT_CURVE);
            fill_text(&mut p.param_type, DEFAULT_PARAMETER_TYPE);
        }
    }
}

fn fill_text(field: &mut String, default: &str) {
    if field.is_empty() {
        *field = default.to_string();
    }
}

/// JS-style truthiness of a raw JSON value.
pub fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

/// Text of a raw field, or `default` when it is absent or falsy.
/// Truthy non-string scalars are rendered as text.
pub fn text_or(value: Option<&Value>, default: &str) -> String {
    if !is_truthy(value) {
        return default.to_string();
    }
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(other) => other.to_string(),
        None => default.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_int_like_base10() {
        assert_eq!(ParamNumber::parse_int("42"), ParamNumber::Int(42));
        assert_eq!(ParamNumber::parse_int("  7"), ParamNumber::Int(7));
        assert_eq!(ParamNumber::parse_int("12abc"), ParamNumber::Int(12));
        assert_eq!(ParamNumber::parse_int("-3"), ParamNumber::Int(-3));
        assert_eq!(ParamNumber::parse_int("abc"), ParamNumber::NaN);
        assert_eq!(ParamNumber::parse_int("0x1F"), ParamNumber::Int(0));
        assert_eq!(
            ParamNumber::parse_int("99999999999999999999"),
            ParamNumber::Int(i64::MAX)
        );
        assert_eq!(
            ParamNumber::parse_int("-99999999999999999999"),
            ParamNumber::Int(i64::MIN)
        );
    }

    #[test]
    fn test_coerce_falsy_uses_default() {
        assert_eq!(ParamNumber::coerce(None, 127), ParamNumber::Int(127));
        assert_eq!(ParamNumber::coerce(Some(&json!(null)), 127), ParamNumber::Int(127));
        // 0 is indistinguishable from absent
        assert_eq!(ParamNumber::coerce(Some(&json!(0)), 127), ParamNumber::Int(127));
        assert_eq!(ParamNumber::coerce(Some(&json!("64")), 127), ParamNumber::Int(64));
        assert_eq!(ParamNumber::coerce(Some(&json!("n/a")), 127), ParamNumber::NaN);
    }

    #[test]
    fn test_nan_serializes_as_null() {
        let text = serde_json::to_string(&vec![ParamNumber::Int(5), ParamNumber::NaN]).unwrap();
        assert_eq!(text, "[5,null]");
    }

    #[test]
    fn test_record_deserializes_with_defaults() {
        let record: DeviceRecord = serde_json::from_value(json!({"brand": "Acme"})).unwrap();
        assert_eq!(record.phantom_power, "None");
        assert!(record.cc.is_empty());
        assert_eq!(record.device_name, "");
    }

    #[test]
    fn test_text_or() {
        assert_eq!(text_or(Some(&json!("DIN")), ""), "DIN");
        assert_eq!(text_or(Some(&json!("")), "None"), "None");
        assert_eq!(text_or(Some(&json!(48)), "None"), "48");
        assert_eq!(text_or(None, "x"), "x");
    }
}
