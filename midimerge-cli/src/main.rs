//! midimerge CLI - merge MIDI device CC/NRPN/PC databases from the command line.

use clap::{Parser, Subcommand, ValueEnum};
use midimerge::{ChangeSummary, DatabaseStats, MergeOptions, MergeReport, MidiMergeCore, UnmappedReport};
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "midimerge")]
#[command(about = "MIDI device CC/NRPN database merge tool", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge two databases into one canonical database
    Merge {
        /// Database whose metadata (version, generatedAt) is kept
        #[arg(long, value_name = "FILE")]
        target: PathBuf,

        /// Second database to merge in
        #[arg(long, value_name = "FILE")]
        source: PathBuf,

        /// Alias configuration (brands/models); merging continues without it
        #[arg(long, value_name = "FILE")]
        aliases: Option<PathBuf>,

        /// Pretty-printed output file (also the change-detection baseline)
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,

        /// Also write a minified copy here
        #[arg(long, value_name = "FILE")]
        minified: Option<PathBuf>,

        /// Set generatedAt to the current time
        #[arg(long)]
        stamp: bool,

        /// Resolve and report without writing any file
        #[arg(long)]
        dry_run: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,
    },

    /// List brand and device keys missing from the alias configuration
    Missing {
        /// First database to check
        #[arg(long, value_name = "FILE")]
        target: PathBuf,

        /// Second database to check
        #[arg(long, value_name = "FILE")]
        source: PathBuf,

        /// Alias configuration (brands/models); without it every key is reported
        #[arg(long, value_name = "FILE")]
        aliases: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,
    },

    /// Show statistics for a merged database
    Stats {
        /// Path to a merged database file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,
    },
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output for scripts and CI
    Json,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let exit_code = match cli.command {
        Commands::Merge {
            target,
            source,
            aliases,
            output,
            minified,
            stamp,
            dry_run,
            format,
        } => {
            let options = MergeOptions {
                target,
                source,
                aliases,
                output,
                minified_output: minified,
                stamp_generated_at: stamp,
                dry_run,
            };
            handle_merge(&options, format)
        }
        Commands::Missing {
            target,
            source,
            aliases,
            format,
        } => handle_missing(&target, &source, aliases.as_deref(), format),
        Commands::Stats { file, format } => handle_stats(&file, format),
    };

    process::exit(exit_code);
}

fn handle_merge(options: &MergeOptions, format: OutputFormat) -> i32 {
    match MidiMergeCore::merge(options) {
        Ok(report) => {
            match format {
                OutputFormat::Human => output_merge_human(&report),
                OutputFormat::Json => output_merge_json(&report),
            }
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn handle_missing(target: &Path, source: &Path, aliases: Option<&Path>, format: OutputFormat) -> i32 {
    match MidiMergeCore::find_missing(target, source, aliases) {
        Ok(report) => {
            match format {
                OutputFormat::Human => output_missing_human(&report),
                OutputFormat::Json => print_json(&report),
            }
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn handle_stats(file: &Path, format: OutputFormat) -> i32 {
    match MidiMergeCore::stats(file) {
        Ok(stats) => {
            match format {
                OutputFormat::Human => {
                    println!("\nDatabase: {}", file.display());
                    println!("{}", "─".repeat(60));
                    output_stats_human(&stats);
                }
                OutputFormat::Json => print_json(&stats),
            }
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn output_merge_human(report: &MergeReport) {
    println!("\nMerged database");
    println!("{}", "─".repeat(60));
    output_stats_human(&report.stats);

    match &report.changes {
        None => println!("\n  No previous output to compare against"),
        Some(changes) if !changes.changed => println!("\n  No changes since the previous output"),
        Some(changes) => output_changes_human(changes),
    }

    if report.written.is_empty() {
        println!("\n  Nothing written (dry run)");
    } else {
        println!("\n  Written:");
        for path in &report.written {
            println!("    - {}", path.display());
        }
    }
}

fn output_stats_human(stats: &DatabaseStats) {
    println!("  Brands:   {}", stats.brands);
    println!("  Devices:  {}", stats.devices);
    println!("  CC:       {}", stats.cc);
    println!("  NRPN:     {}", stats.nrpn);
    println!("  PC:       {}", stats.pc);
}

fn output_changes_human(changes: &ChangeSummary) {
    println!("\n  Changes:");
    let sections = [
        ("Added brands", &changes.added_brands),
        ("Removed brands", &changes.removed_brands),
        ("Added devices", &changes.added_devices),
        ("Removed devices", &changes.removed_devices),
    ];
    for (title, items) in sections {
        if items.is_empty() {
            continue;
        }
        println!("    {} ({}):", title, items.len());
        for item in items {
            println!("      - {}", item);
        }
    }
    if sections.iter().all(|(_, items)| items.is_empty()) {
        println!("    Parameter or metadata changes only");
    }
}

fn output_merge_json(report: &MergeReport) {
    let output = serde_json::json!({
        "stats": report.stats,
        "changes": report.changes,
        "written": report.written.iter().map(|p| p.display().to_string()).collect::<Vec<_>>(),
    });
    println!("{}", serde_json::to_string_pretty(&output).unwrap_or_default());
}

fn output_missing_human(report: &UnmappedReport) {
    if report.is_empty() {
        println!("All brands and devices are mapped");
        return;
    }

    if !report.missing_brands.is_empty() {
        println!("\nMissing brands ({}):", report.missing_brands.len());
        for brand in &report.missing_brands {
            println!("  - {}", brand);
        }
    }

    if !report.missing_devices.is_empty() {
        println!("\nMissing devices ({}):", report.missing_device_count());
        for (brand, devices) in &report.missing_devices {
            println!("  {}:", brand);
            for device in devices {
                println!("    - {}", device);
            }
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) {
    println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
}
