/*
 * Defines the progress message the import worker sends back to the interactive
 * loop. Each message is an immutable snapshot taken right after a file has been
 * fully written, so the receiver can simply display the latest one.
 */
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportProgress {
    // Path of the file just copied, relative to the source root.
    pub relative_path: PathBuf,
    pub files_copied: usize,
    pub bytes_copied: u64,
}
