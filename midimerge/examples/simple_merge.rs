//! Simple merge example: resolve two databases and print a summary.

use midimerge::prelude::*;
use std::path::PathBuf;

fn main() -> Result<(), MidiMergeError> {
    let mut args = std::env::args().skip(1);
    let (Some(target), Some(source)) = (args.next(), args.next()) else {
        eprintln!("Usage: cargo run --example simple_merge <target.json> <source.json> [aliases.json]");
        std::process::exit(1);
    };

    let options = MergeOptions {
        target: PathBuf::from(target),
        source: PathBuf::from(source),
        aliases: args.next().map(PathBuf::from),
        output: PathBuf::from("merged.json"),
        dry_run: true,
        ..MergeOptions::default()
    };

    let report = MidiMergeCore::merge(&options)?;

    println!("Brands:  {}", report.stats.brands);
    println!("Devices: {}", report.stats.devices);
    println!(
        "Parameters: {} CC, {} NRPN, {} PC",
        report.stats.cc, report.stats.nrpn, report.stats.pc
    );

    for (brand, devices) in &report.database.brands {
        println!("\n{}", brand);
        for (model, record) in devices {
            println!("  - {} ({} parameters)", model, record.parameter_count());
        }
    }
    Ok(())
}
