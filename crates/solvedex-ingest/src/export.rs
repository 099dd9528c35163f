//! Writing harvested records to disk
//!
//! Three files are produced in the output directory:
//!
//! - the full record list as indented JSON
//! - the full table as CSV
//! - the numeric projection as CSV, when every record carries the projected
//!   fields
//!
//! CSV files start with a UTF-8 byte-order mark so spreadsheet tools detect
//! the encoding of Korean titles correctly. Each file is written to a
//! temporary file in the same directory and then persisted over the target.

use serde::Serialize;
use solvedex_common::{Result, SolvedexError};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{info, warn};

use crate::config::ExportConfig;
use crate::table::{Table, PROJECTION_COLUMNS};
use crate::Record;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Tables built during an export and the files that were written
#[derive(Debug, Clone)]
pub struct ExportOutcome {
    pub table: Table,
    /// `None` when the projection was disabled or its fields were incomplete
    pub projection: Option<Table>,
    pub written: Vec<PathBuf>,
}

/// Writes the JSON, CSV and projected CSV outputs
#[derive(Debug, Clone)]
pub struct Exporter {
    config: ExportConfig,
}

impl Exporter {
    pub fn new(config: ExportConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Export `records` to every configured file.
    ///
    /// A record missing one of the projected fields only skips the projected
    /// CSV; the JSON and full CSV are still written. I/O failures abort.
    pub fn export(&self, records: &[Record]) -> Result<ExportOutcome> {
        std::fs::create_dir_all(&self.config.output_dir)?;
        let mut written = Vec::new();

        let json_path = self.config.json_path();
        write_json(&json_path, records)?;
        info!("JSON export saved: {} ({} records)", json_path.display(), records.len());
        written.push(json_path);

        let table = Table::from_records(records);
        let csv_path = self.config.csv_path();
        write_table_csv(&csv_path, &table)?;
        info!(
            "CSV export saved: {} ({} columns)",
            csv_path.display(),
            table.columns().len()
        );
        written.push(csv_path);

        let projection = if self.config.write_projection {
            self.export_projection(records, &mut written)?
        } else {
            None
        };
        if projection.is_none() {
            remove_stale(&self.config.projection_path())?;
        }

        Ok(ExportOutcome {
            table,
            projection,
            written,
        })
    }

    fn export_projection(
        &self,
        records: &[Record],
        written: &mut Vec<PathBuf>,
    ) -> Result<Option<Table>> {
        let projection = match Table::project(records, &PROJECTION_COLUMNS) {
            Ok(projection) => projection,
            Err(SolvedexError::MissingField { row, field }) => {
                warn!(
                    "Skipping {}: record {} has no '{}' field",
                    self.config.projection_file, row, field
                );
                return Ok(None);
            },
            Err(e) => return Err(e),
        };

        let path = self.config.projection_path();
        write_table_csv(&path, &projection)?;
        info!("Projected CSV saved: {}", path.display());
        written.push(path);

        Ok(Some(projection))
    }
}

/// Write `records` as a JSON array indented by four spaces.
///
/// Non-ASCII text is written as-is rather than escaped.
pub fn write_json(path: &Path, records: &[Record]) -> Result<()> {
    write_atomic(path, |writer| {
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut *writer, formatter);
        records.serialize(&mut serializer)?;
        writer.write_all(b"\n")?;
        Ok(())
    })
}

/// Read back a file produced by [`write_json`]
pub fn read_json(path: &Path) -> Result<Vec<Record>> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// Write `table` as CSV prefixed with a UTF-8 byte-order mark
pub fn write_table_csv(path: &Path, table: &Table) -> Result<()> {
    write_atomic(path, |writer| {
        writer.write_all(UTF8_BOM)?;
        table.write_csv(&mut *writer)
    })
}

/// Remove a file left by an earlier export, if any
fn remove_stale(path: &Path) -> Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => {
            info!("Removed stale {}", path.display());
            Ok(())
        },
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

fn write_atomic<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<NamedTempFile>) -> Result<()>,
{
    let parent = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    let mut writer = BufWriter::new(NamedTempFile::new_in(parent)?);
    write(&mut writer)?;

    let temp = writer.into_inner().map_err(|e| e.into_error())?;
    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
