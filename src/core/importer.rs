/*
 * Mirrors a source tree into the private destination root, file by file.
 *
 * The copy is a plain depth-first walk over `SourceEntry` children. Files are
 * streamed through a fixed 16 KiB buffer; directories are created if absent
 * and reused otherwise. The first failure aborts the whole walk and is
 * returned through every recursion level together with the counters reached
 * so far. Nothing already written is rolled back, and nothing outside the
 * destination root is touched. A local source that overlaps the destination is
 * refused before anything is created.
 */
use crate::core::import_progress::ImportProgress;
use crate::core::source_tree::{EntryKind, SourceEntry};
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Component, Path, PathBuf};
use std::sync::mpsc::Sender;

pub const COPY_BUFFER_SIZE: usize = 16 * 1024;

/*
 * Failure taxonomy of an import run. The orchestration layer only cares about
 * success versus failure, but each variant keeps the offending path and the
 * underlying I/O error so the log and the import record can tell them apart.
 */
#[derive(Debug)]
pub enum ImportError {
    // The source stream or directory listing could not be opened.
    SourceOpen { path: PathBuf, error: io::Error },
    // The destination file could not be created.
    DestinationWrite { path: PathBuf, error: io::Error },
    // Reading or writing failed midway through a file.
    Transfer { path: PathBuf, error: io::Error },
    DirectoryCreate { path: PathBuf, error: io::Error },
    // Source and destination are the same tree, or one lies inside the other.
    OverlappingTrees {
        source_root: PathBuf,
        destination_root: PathBuf,
    },
    // The user declined the source-tree selection.
    Cancelled,
}

impl ImportError {
    pub fn kind_name(&self) -> &'static str {
        match self {
            ImportError::SourceOpen { .. } => "source_open",
            ImportError::DestinationWrite { .. } => "destination_write",
            ImportError::Transfer { .. } => "transfer",
            ImportError::DirectoryCreate { .. } => "directory_create",
            ImportError::OverlappingTrees { .. } => "overlapping_trees",
            ImportError::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for ImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportError::SourceOpen { path, error } => {
                write!(f, "Could not open source {path:?}: {error}")
            }
            ImportError::DestinationWrite { path, error } => {
                write!(f, "Could not create destination file {path:?}: {error}")
            }
            ImportError::Transfer { path, error } => {
                write!(f, "I/O error while copying {path:?}: {error}")
            }
            ImportError::DirectoryCreate { path, error } => {
                write!(f, "Could not create directory {path:?}: {error}")
            }
            ImportError::OverlappingTrees {
                source_root,
                destination_root,
            } => write!(
                f,
                "Refusing to import {source_root:?} into the overlapping tree {destination_root:?}"
            ),
            ImportError::Cancelled => write!(f, "Source selection was cancelled"),
        }
    }
}

impl std::error::Error for ImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ImportError::SourceOpen { error, .. }
            | ImportError::DestinationWrite { error, .. }
            | ImportError::Transfer { error, .. }
            | ImportError::DirectoryCreate { error, .. } => Some(error),
            ImportError::OverlappingTrees { .. } | ImportError::Cancelled => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ImportError>;

// Counters describing a completed (or partially completed) import.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub files_copied: usize,
    pub directories_created: usize,
    pub directories_reused: usize,
    pub bytes_copied: u64,
}

// A failed run: the first error, plus what had been copied before it.
#[derive(Debug)]
pub struct ImportFailure {
    pub error: ImportError,
    pub partial: ImportSummary,
}

impl From<ImportError> for ImportFailure {
    fn from(error: ImportError) -> Self {
        ImportFailure {
            error,
            partial: ImportSummary::default(),
        }
    }
}

impl std::fmt::Display for ImportFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.error.fmt(f)
    }
}

impl std::error::Error for ImportFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/*
 * The terminal value of one import run, as consumed by the orchestration layer.
 */
pub type ImportResult = std::result::Result<ImportSummary, ImportFailure>;

pub trait ImporterOperations: Send + Sync {
    /*
     * Copies every child of `source` (a directory entry) into `destination_root`,
     * recursively. If `progress` is given, one `ImportProgress` is sent after
     * each file is written.
     */
    fn copy_tree(
        &self,
        source: &dyn SourceEntry,
        destination_root: &Path,
        progress: Option<&Sender<ImportProgress>>,
    ) -> ImportResult;
}

pub struct CoreImporter {}

impl CoreImporter {
    pub fn new() -> Self {
        CoreImporter {}
    }

    fn copy_children(
        &self,
        source: &dyn SourceEntry,
        destination: &Path,
        relative: &Path,
        summary: &mut ImportSummary,
        progress: Option<&Sender<ImportProgress>>,
    ) -> Result<()> {
        let children = source
            .list_children()
            .map_err(|error| ImportError::SourceOpen {
                path: relative.to_path_buf(),
                error,
            })?;

        for child in children {
            let child_relative = relative.join(validated_name(child.as_ref(), relative)?);
            let child_destination = destination.join(child.name());

            match child.kind() {
                EntryKind::File => {
                    let bytes = copy_file(child.as_ref(), &child_destination, &child_relative)?;
                    summary.files_copied += 1;
                    summary.bytes_copied += bytes;
                    log::trace!("Importer: Copied {child_relative:?} ({bytes} bytes).");
                    if let Some(sender) = progress {
                        // A receiver that went away is not our problem.
                        let _ = sender.send(ImportProgress {
                            relative_path: child_relative,
                            files_copied: summary.files_copied,
                            bytes_copied: summary.bytes_copied,
                        });
                    }
                }
                EntryKind::Directory => {
                    if ensure_directory(&child_destination)? {
                        summary.directories_created += 1;
                    } else {
                        summary.directories_reused += 1;
                    }
                    self.copy_children(
                        child.as_ref(),
                        &child_destination,
                        &child_relative,
                        summary,
                        progress,
                    )?;
                }
                EntryKind::Other => {
                    log::debug!("Importer: Skipping {child_relative:?}, neither file nor directory.");
                }
            }
        }
        Ok(())
    }
}

impl Default for CoreImporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ImporterOperations for CoreImporter {
    fn copy_tree(
        &self,
        source: &dyn SourceEntry,
        destination_root: &Path,
        progress: Option<&Sender<ImportProgress>>,
    ) -> ImportResult {
        log::info!(
            "Importer: Copying source '{}' into {destination_root:?}.",
            source.name()
        );
        if let Some(source_root) = source.local_path() {
            ensure_disjoint(source_root, destination_root)?;
        }
        fs::create_dir_all(destination_root).map_err(|error| ImportError::DirectoryCreate {
            path: destination_root.to_path_buf(),
            error,
        })?;

        let mut summary = ImportSummary::default();
        match self.copy_children(source, destination_root, Path::new(""), &mut summary, progress) {
            Ok(()) => {
                log::info!(
                    "Importer: Done. {} files, {} bytes, {} directories created, {} reused.",
                    summary.files_copied,
                    summary.bytes_copied,
                    summary.directories_created,
                    summary.directories_reused
                );
                Ok(summary)
            }
            Err(e) => {
                log::error!(
                    "Importer: Aborted after {} files ({}): {e}",
                    summary.files_copied,
                    e.kind_name()
                );
                Err(ImportFailure {
                    error: e,
                    partial: summary,
                })
            }
        }
    }
}

/*
 * Refuses a destination that equals the source, lies inside it, or contains it.
 * Copying a file onto itself truncates it before it is read, and a destination
 * inside the source would be walked into while it is being filled.
 */
fn ensure_disjoint(source_root: &Path, destination_root: &Path) -> Result<()> {
    let source = resolve_path(source_root);
    let destination = resolve_path(destination_root);
    if destination.starts_with(&source) || source.starts_with(&destination) {
        log::error!("Importer: {source:?} and {destination:?} overlap.");
        return Err(ImportError::OverlappingTrees {
            source_root: source_root.to_path_buf(),
            destination_root: destination_root.to_path_buf(),
        });
    }
    Ok(())
}

// Canonicalizes the longest existing ancestor and re-appends the rest, so a
// destination that does not exist yet still resolves through symbolic links.
fn resolve_path(path: &Path) -> PathBuf {
    let mut missing = Vec::new();
    let mut current = path;
    loop {
        if let Ok(resolved) = fs::canonicalize(current) {
            return missing
                .iter()
                .rev()
                .fold(resolved, |acc, name| acc.join(name));
        }
        match (current.parent(), current.file_name()) {
            (Some(parent), Some(name)) => {
                missing.push(name);
                current = if parent.as_os_str().is_empty() {
                    Path::new(".")
                } else {
                    parent
                };
            }
            _ => return path.to_path_buf(),
        }
    }
}

// Entry names must be a single plain path component so the mirror stays under the root.
fn validated_name<'a>(entry: &'a dyn SourceEntry, parent_relative: &Path) -> Result<&'a str> {
    let name = entry.name();
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) if !name.contains(['/', '\\']) => Ok(name),
        _ => Err(ImportError::SourceOpen {
            path: parent_relative.join(name),
            error: io::Error::new(
                io::ErrorKind::InvalidData,
                format!("entry name '{name}' is not a plain file name"),
            ),
        }),
    }
}

// Returns true if the directory had to be created.
fn ensure_directory(path: &Path) -> Result<bool> {
    if path.is_dir() {
        return Ok(false);
    }
    fs::create_dir(path).map_err(|error| ImportError::DirectoryCreate {
        path: path.to_path_buf(),
        error,
    })?;
    Ok(true)
}

/*
 * Streams one file. Both handles live in this scope and are dropped on every
 * exit path before the caller moves on to the next entry.
 */
fn copy_file(entry: &dyn SourceEntry, destination: &Path, relative: &Path) -> Result<u64> {
    let mut reader = entry.open_read().map_err(|error| ImportError::SourceOpen {
        path: relative.to_path_buf(),
        error,
    })?;
    let mut writer = File::create(destination).map_err(|error| ImportError::DestinationWrite {
        path: destination.to_path_buf(),
        error,
    })?;

    let transfer_error = |error: io::Error| ImportError::Transfer {
        path: relative.to_path_buf(),
        error,
    };

    let mut buffer = [0u8; COPY_BUFFER_SIZE];
    let mut total: u64 = 0;
    loop {
        let n = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(transfer_error(e)),
        };
        writer.write_all(&buffer[..n]).map_err(transfer_error)?;
        total += n as u64;
    }
    writer.flush().map_err(transfer_error)?;
    Ok(total)
}
