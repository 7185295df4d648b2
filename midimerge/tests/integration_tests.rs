//! Integration tests for the midimerge library

use midimerge::prelude::*;
use midimerge::ParamNumber;
use std::path::PathBuf;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn options(output: PathBuf) -> MergeOptions {
    MergeOptions {
        target: fixture_path("target.json"),
        source: fixture_path("source.json"),
        aliases: Some(fixture_path("aliases.json")),
        output,
        ..MergeOptions::default()
    }
}

#[test]
fn test_merge_fixtures() {
    let dir = tempfile::tempdir().unwrap();
    let report = MidiMergeCore::merge(&options(dir.path().join("merged.json")))
        .expect("Merge should succeed");

    let db = &report.database;
    assert_eq!(
        db.brands.keys().collect::<Vec<_>>(),
        vec!["BOSS", "Elektron", "Sequential", "Arturia"]
    );

    let gt = db.device("BOSS", "GT-1000").expect("GT-1000 should be merged under BOSS");
    assert_eq!(gt.cc.len(), 2, "The longer source list should win");
    assert_eq!(gt.midi_in, "TRS type A", "Scalars come from the most complete record");
    assert!(gt.midi_thru);

    let rc = db.device("BOSS", "RC-505 MKII").expect("mk2 spelling should resolve");
    assert_eq!(rc.cc.len(), 2);
    assert_eq!(rc.cc[1].value, ParamNumber::Int(2));

    let digitakt = db.device("Elektron", "Digitakt").unwrap();
    assert_eq!(digitakt.cc.len(), 3);
    assert_eq!(digitakt.nrpn[0].lsb, ParamNumber::Int(20));
    assert_eq!(
        digitakt.midi_channel.instructions,
        "SETTINGS > MIDI CONFIG > CHANNELS"
    );

    let prophet = db.device("Sequential", "Prophet-6").unwrap();
    assert_eq!(prophet.phantom_power, "None");
    assert_eq!(prophet.pc.len(), 1);
    assert_eq!(prophet.pc[0].name, "Program Change");

    let freak = db.device("Arturia", "MicroFreak").unwrap();
    assert_eq!(freak.cc[0].value, ParamNumber::Int(23));
    assert!(freak.cc[1].value.is_nan());
}

#[test]
fn test_metadata_comes_from_target() {
    let dir = tempfile::tempdir().unwrap();
    let report = MidiMergeCore::merge(&options(dir.path().join("merged.json"))).unwrap();

    assert_eq!(report.database.metadata["version"], "2.3.0");
    assert_eq!(report.database.metadata["generatedAt"], "2026-01-04T12:00:00Z");
}

#[test]
fn test_stats_match_written_database() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("merged.json");
    let report = MidiMergeCore::merge(&options(output.clone())).unwrap();

    assert_eq!(report.stats.brands, 4);
    assert_eq!(report.stats.devices, 5);
    assert_eq!(report.stats.cc, 9);
    assert_eq!(report.stats.nrpn, 1);
    assert_eq!(report.stats.pc, 1);

    let from_file = MidiMergeCore::stats(&output).unwrap();
    assert_eq!(from_file, report.stats);
}

#[test]
fn test_output_is_byte_identical_across_runs() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("first.json");
    let second = dir.path().join("second.json");

    MidiMergeCore::merge(&options(first.clone())).unwrap();
    MidiMergeCore::merge(&options(second.clone())).unwrap();

    assert_eq!(
        std::fs::read(&first).unwrap(),
        std::fs::read(&second).unwrap()
    );
}

#[test]
fn test_second_run_reports_no_changes() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("merged.json");

    let first = MidiMergeCore::merge(&options(output.clone())).unwrap();
    assert!(first.changes.is_none(), "No baseline on the first run");

    let second = MidiMergeCore::merge(&options(output)).unwrap();
    let changes = second.changes.as_ref().expect("Baseline should be compared");
    assert!(!changes.changed);
    assert!(!second.has_changes());
}

#[test]
fn test_minified_output_matches_pretty() {
    let dir = tempfile::tempdir().unwrap();
    let mut opts = options(dir.path().join("merged.json"));
    opts.minified_output = Some(dir.path().join("merged.min.json"));

    let report = MidiMergeCore::merge(&opts).unwrap();
    assert_eq!(report.written.len(), 2);

    let pretty: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join("merged.json")).unwrap())
            .unwrap();
    let minified_text = std::fs::read_to_string(dir.path().join("merged.min.json")).unwrap();
    let minified: serde_json::Value = serde_json::from_str(&minified_text).unwrap();

    assert_eq!(pretty, minified);
    assert!(!minified_text.contains('\n'));
}

#[test]
fn test_dry_run_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("merged.json");
    let mut opts = options(output.clone());
    opts.dry_run = true;

    let report = MidiMergeCore::merge(&opts).unwrap();
    assert!(report.written.is_empty());
    assert!(!output.exists());
}

#[test]
fn test_stamp_replaces_generated_at() {
    let dir = tempfile::tempdir().unwrap();
    let mut opts = options(dir.path().join("merged.json"));
    opts.stamp_generated_at = true;

    let report = MidiMergeCore::merge(&opts).unwrap();
    assert_ne!(report.database.metadata["generatedAt"], "2026-01-04T12:00:00Z");
    assert_eq!(report.database.metadata["version"], "2.3.0");
}

#[test]
fn test_broken_input_aborts_without_output() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("merged.json");
    let mut opts = options(output.clone());
    opts.source = fixture_path("broken.json");

    let result = MidiMergeCore::merge(&opts);
    assert!(matches!(result, Err(MidiMergeError::Parse { .. })));
    assert!(!output.exists(), "No partial artifact on failure");
}

#[test]
fn test_non_object_input_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let mut opts = options(dir.path().join("merged.json"));
    opts.target = fixture_path("array.json");

    assert!(matches!(
        MidiMergeCore::merge(&opts),
        Err(MidiMergeError::InvalidDatabase(_))
    ));
}

#[test]
fn test_missing_alias_config_still_merges() {
    let dir = tempfile::tempdir().unwrap();
    let mut opts = options(dir.path().join("merged.json"));
    opts.aliases = Some(fixture_path("does_not_exist.json"));

    let report = MidiMergeCore::merge(&opts).expect("Missing aliases must not block a run");

    // without aliases nothing links roland to BOSS
    assert!(report.database.brands.contains_key("roland"));
    assert_eq!(report.stats.brands, 5);
    assert_eq!(report.stats.devices, 8);
}

#[test]
fn test_find_missing_fixtures() {
    let report = MidiMergeCore::find_missing(
        &fixture_path("target.json"),
        &fixture_path("source.json"),
        Some(&fixture_path("aliases.json")),
    )
    .unwrap();

    assert_eq!(report.missing_brands.iter().collect::<Vec<_>>(), vec!["Arturia"]);
    assert_eq!(report.missing_devices.len(), 1);
    assert!(report.missing_devices["Arturia"].contains("MicroFreak"));
}
