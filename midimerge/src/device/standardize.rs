//! Device Record Standardizer
//!
//! Maps a heterogeneous source device object onto [`DeviceRecord`].
//! Defaulting is "falsy means absent": `null`, `false`, `0` and `""` all fall
//! back to the field default, so a legitimate `false`/`0` cannot be told apart
//! from a missing field. Existing databases depend on this, so it stays.

use serde_json::Value;

use super::schema::*;

/// Standardize one raw device. Pure; `pc` is always left empty here, see
/// [`normalize_program_changes`].
pub fn standardize(raw: &Value, brand_display: &str, device_display: &str) -> DeviceRecord {
    let cc = raw
        .get("cc")
        .and_then(Value::as_array)
        .map(|items| items.iter().map(standardize_cc).collect())
        .unwrap_or_default();

    let nrpn = raw
        .get("nrpn")
        .and_then(Value::as_array)
        .map(|items| items.iter().map(standardize_nrpn).collect())
        .unwrap_or_default();

    let channel_instructions = raw
        .get("midi_channel")
        .and_then(|c| c.get("instructions"));

    DeviceRecord {
        brand: text_or(raw.get("brand"), brand_display),
        device_name: text_or(raw.get("device_name"), device_display),
        midi_thru: is_truthy(raw.get("midi_thru")),
        midi_in: text_or(raw.get("midi_in"), ""),
        midi_clock: is_truthy(raw.get("midi_clock")),
        phantom_power: text_or(raw.get("phantom_power"), DEFAULT_PHANTOM_POWER),
        midi_channel: MidiChannel {
            instructions: text_or(channel_instructions, ""),
        },
        instructions: text_or(raw.get("instructions"), ""),
        cc,
        nrpn,
        pc: Vec::new(),
    }
}

/// Normalize a raw `pc` field into a parameter list.
///
/// An array is standardized element by element. A single object becomes one
/// "Program Change" entry spanning 0-127 that keeps the object's description.
pub fn normalize_program_changes(raw: &Value) -> Vec<PcParameter> {
    match raw.get("pc") {
        Some(Value::Array(items)) => items.iter().map(standardize_cc).collect(),
        Some(obj @ Value::Object(_)) => vec![CcParameter {
            name: "Program Change".to_string(),
            description: text_or(obj.get("description"), ""),
            value: ParamNumber::Int(0),
            min: ParamNumber::Int(0),
            max: ParamNumber::Int(CC_MAX),
            param_type: DEFAULT_PARAMETER_TYPE.to_string(),
            usage: String::new(),
            curve: DEFAULT_CURVE.to_string(),
        }],
        _ => Vec::new(),
    }
}

/// [`standardize`] plus the program-change pre-normalization step.
pub fn standardize_source_device(
    raw: &Value,
    brand_display: &str,
    device_display: &str,
) -> DeviceRecord {
    let pc = normalize_program_changes(raw);
    let mut record = standardize(raw, brand_display, device_display);
    record.pc = pc;
    record
}

fn standardize_cc(raw: &Value) -> CcParameter {
    CcParameter {
        name: text_or(raw.get("name"), ""),
        description: text_or(raw.get("description"), ""),
        value: ParamNumber::coerce(raw.get("value"), 0),
        min: ParamNumber::coerce(raw.get("min"), 0),
        max: ParamNumber::coerce(raw.get("max"), CC_MAX),
        param_type: text_or(raw.get("type"), DEFAULT_PARAMETER_TYPE),
        usage: text_or(raw.get("usage"), ""),
        curve: text_or(raw.get("curve"), DEFAULT_CURVE),
    }
}

fn standardize_nrpn(raw: &Value) -> NrpnParameter {
    NrpnParameter {
        name: text_or(raw.get("name"), ""),
        description: text_or(raw.get("description"), ""),
        msb: ParamNumber::coerce(raw.get("msb"), 0),
        lsb: ParamNumber::coerce(raw.get("lsb"), 0),
        min: ParamNumber::coerce(raw.get("min"), 0),
        max: ParamNumber::coerce(raw.get("max"), NRPN_MAX),
        param_type: text_or(raw.get("type"), DEFAULT_PARAMETER_TYPE),
        usage: text_or(raw.get("usage"), ""),
        curve: text_or(raw.get("curve"), DEFAULT_CURVE),
    }
}
