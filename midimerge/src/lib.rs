//! midimerge - MIDI device control database reconciliation
//!
//! Merges two independently maintained databases of MIDI device definitions
//! (brand → device → CC/NRPN/PC parameters) into one canonical database.
//! Brand and device names that are spelled differently across sources are
//! resolved through an alias table before records are grouped and merged.
//!
//! # Quick Start
//!
//! ```no_run
//! use midimerge::{MergeOptions, MidiMergeCore};
//! use std::path::PathBuf;
//!
//! let options = MergeOptions {
//!     target: PathBuf::from("target.json"),
//!     source: PathBuf::from("source.json"),
//!     aliases: Some(PathBuf::from("aliases.json")),
//!     output: PathBuf::from("merged.json"),
//!     ..MergeOptions::default()
//! };
//! let report = MidiMergeCore::merge(&options).unwrap();
//!
//! println!("{} brands, {} devices", report.stats.brands, report.stats.devices);
//! ```
//!
//! # Features
//!
//! - **Alias resolution**: case, spacing, suffix and mk/mark spelling variants
//! - **Standardization**: every record gets the same fields and defaults
//! - **Merging**: the most complete source wins, parameter lists are never mixed
//! - **Diagnostics**: unmapped brand/device keys for curating the aliases

pub mod aliases;
pub mod core;
pub mod device;
pub mod diagnostics;
pub mod normalize;
pub mod report;
pub mod resolve;

// Re-export main types
pub use aliases::{AliasConfig, AliasConfigError, AliasTable};
pub use crate::core::{MergeOptions, MergeReport, MidiMergeCore, MidiMergeError};
pub use device::{CcParameter, DeviceRecord, NrpnParameter, ParamNumber};
pub use diagnostics::{find_unmapped, UnmappedReport};
pub use normalize::{normalize, NormalizedKey};
pub use report::{ChangeSummary, DatabaseStats};
pub use resolve::{resolve, FinalDatabase, SourceDatabase};

/// Parse a database document (convenience wrapper).
pub fn parse_database(content: &str) -> Result<SourceDatabase, MidiMergeError> {
    SourceDatabase::from_json(content)
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        AliasTable, DatabaseStats, DeviceRecord, FinalDatabase, MergeOptions, MergeReport,
        MidiMergeCore, MidiMergeError, SourceDatabase, UnmappedReport,
    };
}
