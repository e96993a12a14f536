/*
 * Abstracts the user-selected source tree that assets are imported from.
 * A `SourceEntry` is a read-only node: it has a name, a kind, and can either
 * open a byte stream (files) or enumerate its children (directories). The
 * importer only talks to this trait, so the tree can come from a local
 * directory or from any other document provider.
 */
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
    // Anything the provider reports that is neither, e.g. a dangling link.
    Other,
}

pub trait SourceEntry: Send + Sync {
    fn name(&self) -> &str;
    fn kind(&self) -> EntryKind;

    // Opens the byte stream of a file entry.
    fn open_read(&self) -> io::Result<Box<dyn Read + Send>>;

    /*
     * Lists the immediate children of a directory entry.
     * No ordering is promised; callers must not depend on sibling order.
     */
    fn list_children(&self) -> io::Result<Vec<Box<dyn SourceEntry>>>;

    // Where the entry lives on the local file system, if it lives there at all.
    fn local_path(&self) -> Option<&Path> {
        None
    }
}

/*
 * A `SourceEntry` backed by a path on the local file system. The kind is
 * resolved once at construction, following symbolic links the same way a
 * document provider would present the link target.
 */
#[derive(Debug, Clone)]
pub struct LocalSourceEntry {
    path: PathBuf,
    name: String,
    kind: EntryKind,
}

impl LocalSourceEntry {
    pub fn new(path: &Path) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let kind = match fs::metadata(path) {
            Ok(meta) if meta.is_dir() => EntryKind::Directory,
            Ok(meta) if meta.is_file() => EntryKind::File,
            Ok(_) => EntryKind::Other,
            Err(e) => {
                log::debug!("LocalSourceEntry: Cannot stat {path:?}: {e}");
                EntryKind::Other
            }
        };
        LocalSourceEntry {
            path: path.to_path_buf(),
            name,
            kind,
        }
    }
}

impl SourceEntry for LocalSourceEntry {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> EntryKind {
        self.kind
    }

    fn open_read(&self) -> io::Result<Box<dyn Read + Send>> {
        let file = File::open(&self.path)?;
        Ok(Box::new(file))
    }

    fn list_children(&self) -> io::Result<Vec<Box<dyn SourceEntry>>> {
        let mut children: Vec<Box<dyn SourceEntry>> = Vec::new();
        for dir_entry in fs::read_dir(&self.path)? {
            let dir_entry = dir_entry?;
            children.push(Box::new(LocalSourceEntry::new(&dir_entry.path())));
        }
        Ok(children)
    }

    fn local_path(&self) -> Option<&Path> {
        Some(&self.path)
    }
}
