//! Device Merger
//!
//! Combines two standardized records believed to describe the same device.
//! Scalars come from `primary` wholesale. Parameter lists and the MIDI
//! channel instructions are length-wins: the longer side is kept in full and
//! lists are never concatenated or merged element-wise.

use super::schema::DeviceRecord;

pub fn merge(primary: &DeviceRecord, secondary: &DeviceRecord) -> DeviceRecord {
    let mut merged = primary.clone();

    merged.cc = longer(&primary.cc, &secondary.cc).to_vec();
    merged.nrpn = longer(&primary.nrpn, &secondary.nrpn).to_vec();
    merged.pc = longer(&primary.pc, &secondary.pc).to_vec();

    if secondary.midi_channel.instructions.chars().count()
        > primary.midi_channel.instructions.chars().count()
    {
        merged.midi_channel.instructions = secondary.midi_channel.instructions.clone();
    }

    merged.apply_defaults();
    merged
}

// ties keep primary
fn longer<'a, T>(primary: &'a [T], secondary: &'a [T]) -> &'a [T] {
    if secondary.len() > primary.len() {
        secondary
    } else {
        primary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::schema::{CcParameter, ParamNumber};
    use crate::device::standardize::standardize;
    use serde_json::json;

    fn device_with_cc(names: &[&str]) -> DeviceRecord {
        let cc: Vec<_> = names.iter().map(|n| json!({"name": n})).collect();
        standardize(&json!({ "cc": cc }), "Acme", "Synth")
    }

    #[test]
    fn test_longer_cc_wins_without_concatenation() {
        let a = device_with_cc(&["Cutoff", "Resonance", "Drive"]);
        let b = device_with_cc(&["Volume"]);

        let merged = merge(&a, &b);
        assert_eq!(merged.cc.len(), 3);
        assert_eq!(merged.cc, a.cc);

        let merged = merge(&b, &a);
        assert_eq!(merged.cc, a.cc);
    }

    #[test]
    fn test_scalars_come_from_primary() {
        let primary = standardize(&json!({"midi_in": "DIN"}), "Acme", "Synth");
        let secondary = standardize(
            &json!({"midi_in": "TRS", "midi_thru": true, "instructions": "Set channel"}),
            "Acme",
            "Synth",
        );

        let merged = merge(&primary, &secondary);
        assert_eq!(merged.midi_in, "DIN");
        // primary's default false still counts as present
        assert!(!merged.midi_thru);
        assert_eq!(merged.instructions, "");
    }

    #[test]
    fn test_longer_channel_instructions_win() {
        let primary = standardize(
            &json!({"midi_channel": {"instructions": "Menu"}}),
            "Acme",
            "Synth",
        );
        let secondary = standardize(
            &json!({"midi_channel": {"instructions": "Hold SHIFT and press CH"}}),
            "Acme",
            "Synth",
        );

        let merged = merge(&primary, &secondary);
        assert_eq!(merged.midi_channel.instructions, "Hold SHIFT and press CH");
    }

    #[test]
    fn test_channel_instructions_compare_characters_not_bytes() {
        let primary = standardize(
            &json!({"midi_channel": {"instructions": "ABC"}}),
            "Acme",
            "Synth",
        );
        let secondary = standardize(
            &json!({"midi_channel": {"instructions": "ÜÜ"}}),
            "Acme",
            "Synth",
        );

        let merged = merge(&primary, &secondary);
        assert_eq!(merged.midi_channel.instructions, "ABC");
    }

    #[test]
    fn test_lists_resolve_independently() {
        let primary = standardize(
            &json!({"cc": [{"name": "A"}, {"name": "B"}], "nrpn": []}),
            "Acme",
            "Synth",
        );
        let secondary = standardize(
            &json!({"cc": [{"name": "C"}], "nrpn": [{"name": "Fine", "msb": 1}]}),
            "Acme",
            "Synth",
        );

        let merged = merge(&primary, &secondary);
        assert_eq!(merged.cc.len(), 2);
        assert_eq!(merged.nrpn.len(), 1);
        assert_eq!(merged.nrpn[0].msb, ParamNumber::Int(1));
    }

    #[test]
    fn test_defaults_reapplied() {
        let mut primary = DeviceRecord::empty("Acme", "Synth");
        primary.phantom_power.clear();
        primary.cc.push(CcParameter {
            name: "Cutoff".to_string(),
            description: String::new(),
            value: ParamNumber::Int(74),
            min: ParamNumber::Int(0),
            max: ParamNumber::Int(127),
            param_type: String::new(),
            usage: String::new(),
            curve: String::new(),
        });

        let merged = merge(&primary, &DeviceRecord::empty("Acme", "Synth"));
        assert_eq!(merged.phantom_power, "None");
        assert_eq!(merged.cc[0].curve, "0-based");
        assert_eq!(merged.cc[0].param_type, "Parameter");
    }
}
