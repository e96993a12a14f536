/*
 * Persists a small JSON record of the most recent import attempt next to the
 * launcher configuration. The orchestration flow only sees success or failure;
 * the record keeps the failure subtype and counters for later diagnosis.
 * Writing the record is best effort and never affects the import outcome.
 */
use crate::core::importer::ImportResult;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

pub const IMPORT_RECORD_FILENAME: &str = "last_import.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportOutcome {
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportRecord {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub outcome: ImportOutcome,
    pub error_kind: Option<String>,
    pub error_message: Option<String>,
    pub files_copied: usize,
    pub bytes_copied: u64,
    pub finished_at: String,
}

impl ImportRecord {
    pub fn from_result(source: &Path, destination: &Path, result: &ImportResult) -> Self {
        let finished_at = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .unwrap_or_default();
        let (outcome, error_kind, error_message, files_copied, bytes_copied) = match result {
            Ok(summary) => (
                ImportOutcome::Succeeded,
                None,
                None,
                summary.files_copied,
                summary.bytes_copied,
            ),
            Err(failure) => (
                ImportOutcome::Failed,
                Some(failure.error.kind_name().to_string()),
                Some(failure.error.to_string()),
                failure.partial.files_copied,
                failure.partial.bytes_copied,
            ),
        };
        ImportRecord {
            source: source.to_path_buf(),
            destination: destination.to_path_buf(),
            outcome,
            error_kind,
            error_message,
            files_copied,
            bytes_copied,
            finished_at,
        }
    }

    pub fn write_to_dir(&self, dir: &Path) -> io::Result<()> {
        let path = dir.join(IMPORT_RECORD_FILENAME);
        let mut writer = BufWriter::new(File::create(&path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        log::debug!("ImportRecord: Wrote {path:?}.");
        Ok(())
    }
}
