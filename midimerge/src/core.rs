//! Core merge run shared by the CLI and library users.
//! Loads inputs, resolves, and writes outputs only once everything succeeded.

use serde_json::Value;
use std::path::{Path, PathBuf};

use crate::aliases::AliasTable;
use crate::diagnostics::{find_unmapped, UnmappedReport};
use crate::report::{ChangeSummary, DatabaseStats};
use crate::resolve::{resolve, FinalDatabase, SourceDatabase};

#[derive(Debug, thiserror::Error)]
pub enum MidiMergeError {
    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
    #[error("Invalid database: {0}")]
    InvalidDatabase(String),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Options for one merge run.
#[derive(Clone, Debug, Default)]
pub struct MergeOptions {
    /// Database whose metadata is carried into the output
    pub target: PathBuf,
    pub source: PathBuf,
    /// Alias configuration; missing or broken means "no aliases"
    pub aliases: Option<PathBuf>,
    /// Pretty-printed output, also the baseline for change detection
    pub output: PathBuf,
    pub minified_output: Option<PathBuf>,
    /// Replace `generatedAt` with the current time instead of copying it
    pub stamp_generated_at: bool,
    pub dry_run: bool,
}

/// Everything a run produced, all derived from the same database snapshot.
#[derive(Debug, Clone)]
pub struct MergeReport {
    pub database: FinalDatabase,
    pub stats: DatabaseStats,
    /// `None` when there was no previous output to compare against
    pub changes: Option<ChangeSummary>,
    pub written: Vec<PathBuf>,
}

impl MergeReport {
    pub fn has_changes(&self) -> bool {
        self.changes.as_ref().map(|c| c.changed).unwrap_or(true)
    }
}

pub struct MidiMergeCore;

impl MidiMergeCore {
    /// Read and parse one source database. Any failure here is fatal.
    pub fn load_database(path: &Path) -> Result<SourceDatabase, MidiMergeError> {
        let content = std::fs::read_to_string(path)?;
        let value: Value = serde_json::from_str(&content).map_err(|source| MidiMergeError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        let db = SourceDatabase::from_value(value)?;
        tracing::info!(
            "Loaded {:?}: {} brands, {} devices",
            path,
            db.brands.len(),
            db.device_count()
        );
        Ok(db)
    }

    /// Run a full merge.
    pub fn merge(options: &MergeOptions) -> Result<MergeReport, MidiMergeError> {
        let target = Self::load_database(&options.target)?;
        let source = Self::load_database(&options.source)?;
        let aliases = AliasTable::load_or_empty(options.aliases.as_deref());

        let mut database = resolve(&target, &source, &aliases);
        if options.stamp_generated_at {
            database.metadata.insert(
                "generatedAt".to_string(),
                Value::String(chrono::Utc::now().to_rfc3339()),
            );
        }

        let stats = DatabaseStats::from_database(&database);
        let changes = Self::compare_with_baseline(&options.output, &database);

        let mut outputs = vec![(options.output.clone(), database.to_pretty_json()?)];
        if let Some(path) = &options.minified_output {
            outputs.push((path.clone(), database.to_minified_json()?));
        }

        let mut written = Vec::new();
        if options.dry_run {
            tracing::info!("Dry run; not writing {} file(s)", outputs.len());
        } else {
            write_all_atomic(&outputs)?;
            for (path, contents) in &outputs {
                tracing::info!("Wrote {:?} ({} bytes)", path, contents.len());
                written.push(path.clone());
            }
        }

        Ok(MergeReport {
            database,
            stats,
            changes,
            written,
        })
    }

    /// Report brand/device keys the alias configuration does not cover.
    pub fn find_missing(
        target: &Path,
        source: &Path,
        aliases: Option<&Path>,
    ) -> Result<UnmappedReport, MidiMergeError> {
        let target = Self::load_database(target)?;
        let source = Self::load_database(source)?;
        let aliases = AliasTable::load_or_empty(aliases);
        Ok(find_unmapped(&target, &source, &aliases))
    }

    /// Statistics for an already merged database file.
    pub fn stats(path: &Path) -> Result<DatabaseStats, MidiMergeError> {
        let content = std::fs::read_to_string(path)?;
        let value: Value = serde_json::from_str(&content).map_err(|source| MidiMergeError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        Ok(DatabaseStats::from_database(&FinalDatabase::from_value(value)?))
    }

    fn compare_with_baseline(path: &Path, database: &FinalDatabase) -> Option<ChangeSummary> {
        if !path.is_file() {
            return None;
        }
        match Self::load_database(path) {
            Ok(baseline) => Some(ChangeSummary::between(&baseline, database)),
            Err(e) => {
                tracing::warn!("Ignoring unreadable baseline {:?}: {}", path, e);
                None
            }
        }
    }
}

/// Write through a sibling temp file and rename, so readers never see a
/// partial artifact.
/// Stage every output as `<path>.tmp`, then rename them into place. No
/// output is touched unless all temp files were written.
fn write_all_atomic(outputs: &[(PathBuf, String)]) -> Result<(), MidiMergeError> {
    let mut staged: Vec<(PathBuf, &Path)> = Vec::with_capacity(outputs.len());
    for (path, contents) in outputs {
        match stage(path, contents) {
            Ok(tmp) => staged.push((tmp, path.as_path())),
            Err(e) => {
                discard(&staged);
                return Err(e);
            }
        }
    }

    for (i, (tmp, path)) in staged.iter().enumerate() {
        if let Err(e) = std::fs::rename(tmp, path) {
            discard(&staged[i..]);
            return Err(e.into());
        }
    }
    Ok(())
}

fn stage(path: &Path, contents: &str) -> Result<PathBuf, MidiMergeError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    std::fs::write(&tmp, contents)?;
    Ok(tmp)
}

fn discard(staged: &[(PathBuf, &Path)]) {
    for (tmp, _) in staged {
        let _ = std::fs::remove_file(tmp);
    }
}
