/*
 * Counts what a local source directory holds before it is imported, so the
 * progress indication can show "n of N files". Unreadable entries are logged
 * and left out of the totals; the import itself reports real failures.
 */
use std::path::Path;
use walkdir::WalkDir;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SourceSummary {
    pub files: usize,
    pub directories: usize,
    pub bytes: u64,
}

pub fn summarize_source(root: &Path) -> SourceSummary {
    let mut summary = SourceSummary::default();
    for entry in WalkDir::new(root).min_depth(1).follow_links(true) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("SourceSummary: Skipping unreadable entry under {root:?}: {e}");
                continue;
            }
        };
        let file_type = entry.file_type();
        if file_type.is_dir() {
            summary.directories += 1;
        } else if file_type.is_file() {
            summary.files += 1;
            summary.bytes += entry.metadata().map(|m| m.len()).unwrap_or(0);
        }
    }
    log::debug!("SourceSummary: {root:?} holds {summary:?}");
    summary
}
