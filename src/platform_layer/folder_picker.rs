/*
 * Obtains the source folder for an import. The console implementation first
 * hands out a folder given on the command line, once; after that it prompts on
 * the terminal. An empty answer, end of input, or a path that is not a
 * directory all count as the user cancelling the selection.
 */
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;
use std::sync::Mutex;

pub trait FolderPickerOperations: Send + Sync {
    fn pick_folder(&self, title: &str) -> Option<PathBuf>;
}

pub struct ConsoleFolderPicker {
    preselected: Mutex<Option<PathBuf>>,
    input: Mutex<Box<dyn BufRead + Send>>,
}

impl ConsoleFolderPicker {
    pub fn new(preselected: Option<PathBuf>) -> Self {
        Self::with_input(preselected, Box::new(BufReader::new(io::stdin())))
    }

    pub fn with_input(preselected: Option<PathBuf>, input: Box<dyn BufRead + Send>) -> Self {
        ConsoleFolderPicker {
            preselected: Mutex::new(preselected),
            input: Mutex::new(input),
        }
    }

    fn prompt(&self, title: &str) -> Option<PathBuf> {
        eprint!("{title}\n(leave empty to cancel) > ");
        let _ = io::stderr().flush();

        let mut line = String::new();
        let mut input = match self.input.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        match input.read_line(&mut line) {
            Ok(0) => {
                log::debug!("ConsoleFolderPicker: End of input, treating as cancel.");
                None
            }
            Ok(_) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(PathBuf::from(trimmed))
                }
            }
            Err(e) => {
                log::error!("ConsoleFolderPicker: Failed to read selection: {e}");
                None
            }
        }
    }
}

impl FolderPickerOperations for ConsoleFolderPicker {
    fn pick_folder(&self, title: &str) -> Option<PathBuf> {
        let preselected = match self.preselected.lock() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        let candidate = match preselected {
            Some(path) => {
                log::info!("ConsoleFolderPicker: Using preselected folder {path:?}.");
                Some(path)
            }
            None => self.prompt(title),
        }?;

        if candidate.is_dir() {
            Some(candidate)
        } else {
            log::warn!("ConsoleFolderPicker: {candidate:?} is not a directory, cancelling.");
            None
        }
    }
}
