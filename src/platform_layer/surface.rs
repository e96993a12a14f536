/*
 * The interactive surface: user messages and the modal progress indication
 * shown while the import worker runs. The console surface writes to stderr and
 * redraws a single spinner line on every tick. It has no cancel affordance.
 */
use super::types::MessageSeverity;
use crate::core::{ImportProgress, SourceSummary};
use std::io::{self, Write};

const SPINNER_FRAMES: [char; 4] = ['|', '/', '-', '\\'];

pub trait InteractiveSurfaceOperations: Send {
    fn show_message(&mut self, severity: MessageSeverity, text: &str);
    fn show_progress(&mut self, title: &str, message: &str);
    // Called periodically while the worker runs, with the latest progress if any arrived.
    fn tick_progress(&mut self, latest: Option<&ImportProgress>, totals: &SourceSummary);
    fn dismiss_progress(&mut self);
}

pub struct ConsoleSurface {
    out: Box<dyn Write + Send>,
    frame: usize,
    progress_visible: bool,
    last_progress: Option<ImportProgress>,
}

impl ConsoleSurface {
    pub fn new() -> Self {
        Self::with_writer(Box::new(io::stderr()))
    }

    pub fn with_writer(out: Box<dyn Write + Send>) -> Self {
        ConsoleSurface {
            out,
            frame: 0,
            progress_visible: false,
            last_progress: None,
        }
    }
}

impl Default for ConsoleSurface {
    fn default() -> Self {
        Self::new()
    }
}

// Console output is best effort; a closed stderr must not abort an import.
impl InteractiveSurfaceOperations for ConsoleSurface {
    fn show_message(&mut self, severity: MessageSeverity, text: &str) {
        let prefix = match severity {
            MessageSeverity::Information => "",
            MessageSeverity::Warning => "warning: ",
            MessageSeverity::Error => "error: ",
        };
        let _ = writeln!(self.out, "{prefix}{text}");
    }

    fn show_progress(&mut self, title: &str, message: &str) {
        self.progress_visible = true;
        self.frame = 0;
        self.last_progress = None;
        let _ = writeln!(self.out, "{title}: {message}");
    }

    fn tick_progress(&mut self, latest: Option<&ImportProgress>, totals: &SourceSummary) {
        if !self.progress_visible {
            return;
        }
        if let Some(progress) = latest {
            self.last_progress = Some(progress.clone());
        }
        let spinner = SPINNER_FRAMES[self.frame % SPINNER_FRAMES.len()];
        self.frame += 1;
        let files_copied = self.last_progress.as_ref().map_or(0, |p| p.files_copied);
        let _ = write!(
            self.out,
            "\r{spinner} {files_copied}/{} files",
            totals.files
        );
        let _ = self.out.flush();
    }

    fn dismiss_progress(&mut self) {
        if !self.progress_visible {
            return;
        }
        self.progress_visible = false;
        match &self.last_progress {
            Some(p) => {
                let _ = writeln!(
                    self.out,
                    "\rCopied {} files ({} bytes).",
                    p.files_copied, p.bytes_copied
                );
            }
            None => {
                let _ = writeln!(self.out);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};

    // Shares the written bytes with the test.
    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl SharedBuffer {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    #[test]
    fn test_progress_lifecycle_output() {
        let buffer = SharedBuffer::default();
        let mut surface = ConsoleSurface::with_writer(Box::new(buffer.clone()));
        let totals = SourceSummary {
            files: 2,
            directories: 1,
            bytes: 5,
        };

        surface.show_progress("Loading", "Copying");
        surface.tick_progress(None, &totals);
        surface.tick_progress(
            Some(&ImportProgress {
                relative_path: PathBuf::from("a.txt"),
                files_copied: 1,
                bytes_copied: 2,
            }),
            &totals,
        );
        surface.dismiss_progress();

        let text = buffer.text();
        assert!(text.starts_with("Loading: Copying\n"));
        assert!(text.contains("| 0/2 files"));
        assert!(text.contains("/ 1/2 files"));
        assert!(text.ends_with("Copied 1 files (2 bytes).\n"));
    }

    #[test]
    fn test_ticks_without_progress_are_silent() {
        let buffer = SharedBuffer::default();
        let mut surface = ConsoleSurface::with_writer(Box::new(buffer.clone()));

        surface.tick_progress(None, &SourceSummary::default());
        surface.dismiss_progress();

        assert!(buffer.text().is_empty());
    }

    #[test]
    fn test_message_prefix_by_severity() {
        let buffer = SharedBuffer::default();
        let mut surface = ConsoleSurface::with_writer(Box::new(buffer.clone()));

        surface.show_message(MessageSeverity::Information, "hello");
        surface.show_message(MessageSeverity::Error, "broken");

        assert_eq!(buffer.text(), "hello\nerror: broken\n");
    }
}
