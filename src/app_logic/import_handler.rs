use super::ui_constants;
use crate::core::{ImportError, ImportRecord, ImportResult};
use crate::platform_layer::{
    AppEvent, LifecycleEventHandler, LifecycleKind, MessageSeverity, PlatformCommand,
};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ImportPhase {
    NotStarted,
    AwaitingSelection,
    Copying,
    Finished,
}

/*
 * The import lifecycle. It asks the platform for a source folder, runs the
 * copy on the platform's worker under a non-cancelable progress indication,
 * and then queues a fresh bootstrap lifecycle. A failed copy is logged and
 * recorded but otherwise treated like a successful one; the next bootstrap
 * re-checks the data root. A cancelled selection ends the flow for good.
 */
pub struct ImportLogic {
    pub(crate) data_root: PathBuf,
    // Where `last_import.json` goes. `None` disables the record.
    pub(crate) record_dir: Option<PathBuf>,
    pub(crate) phase: ImportPhase,
    command_queue: VecDeque<PlatformCommand>,
}

impl ImportLogic {
    pub fn new(data_root: PathBuf, record_dir: Option<PathBuf>) -> Self {
        ImportLogic {
            data_root,
            record_dir,
            phase: ImportPhase::NotStarted,
            command_queue: VecDeque::new(),
        }
    }

    fn enqueue_command(&mut self, command: PlatformCommand) {
        self.command_queue.push_back(command);
    }

    fn on_folder_picked(&mut self, path: Option<PathBuf>) {
        if self.phase != ImportPhase::AwaitingSelection {
            log::warn!(
                "ImportLogic: Folder picker result in phase {:?}, ignoring.",
                self.phase
            );
            return;
        }
        match path {
            None => {
                log::info!("ImportLogic: {}", ImportError::Cancelled);
                self.phase = ImportPhase::Finished;
                self.enqueue_command(PlatformCommand::ShowMessage {
                    severity: MessageSeverity::Warning,
                    text: ui_constants::IMPORT_CANCELLED_MESSAGE.to_string(),
                });
                self.enqueue_command(PlatformCommand::FinishLifecycle);
            }
            Some(source) => {
                log::info!(
                    "ImportLogic: Importing from {source:?} into {:?}.",
                    self.data_root
                );
                self.phase = ImportPhase::Copying;
                self.enqueue_command(PlatformCommand::ShowProgress {
                    title: ui_constants::PROGRESS_TITLE.to_string(),
                    message: ui_constants::PROGRESS_MESSAGE.to_string(),
                });
                self.enqueue_command(PlatformCommand::RunImport {
                    source,
                    destination: self.data_root.clone(),
                });
            }
        }
    }

    fn on_import_completed(&mut self, source: &Path, destination: &Path, result: ImportResult) {
        if self.phase != ImportPhase::Copying {
            log::warn!(
                "ImportLogic: Import completion in phase {:?}, ignoring.",
                self.phase
            );
            return;
        }
        match &result {
            Ok(summary) => log::info!(
                "ImportLogic: Import finished, {} files ({} bytes).",
                summary.files_copied,
                summary.bytes_copied
            ),
            Err(failure) => log::error!(
                "ImportLogic: Import failed ({}) after {} files: {}",
                failure.error.kind_name(),
                failure.partial.files_copied,
                failure.error
            ),
        }
        self.write_record(source, destination, &result);

        // Success and failure continue the same way.
        self.phase = ImportPhase::Finished;
        self.enqueue_command(PlatformCommand::StartLifecycle {
            kind: LifecycleKind::Bootstrap,
        });
        self.enqueue_command(PlatformCommand::DismissProgress);
        self.enqueue_command(PlatformCommand::FinishLifecycle);
    }

    fn write_record(&self, source: &Path, destination: &Path, result: &ImportResult) {
        let Some(dir) = &self.record_dir else {
            return;
        };
        let record = ImportRecord::from_result(source, destination, result);
        if let Err(e) = record.write_to_dir(dir) {
            log::warn!("ImportLogic: Could not write import record to {dir:?}: {e}");
        }
    }
}

impl LifecycleEventHandler for ImportLogic {
    fn kind(&self) -> LifecycleKind {
        LifecycleKind::Import
    }

    fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::LifecycleStarted => {
                if self.phase != ImportPhase::NotStarted {
                    log::warn!("ImportLogic: Ignoring repeated start event.");
                    return;
                }
                self.phase = ImportPhase::AwaitingSelection;
                self.enqueue_command(PlatformCommand::ShowFolderPicker {
                    title: ui_constants::FOLDER_PICKER_TITLE.to_string(),
                });
            }
            AppEvent::FolderPickerCompleted { path } => self.on_folder_picked(path),
            AppEvent::ImportCompleted {
                source,
                destination,
                result,
            } => self.on_import_completed(&source, &destination, result),
            other => {
                log::warn!("ImportLogic: Unexpected event {other:?}, ignoring.");
            }
        }
    }

    fn try_dequeue_command(&mut self) -> Option<PlatformCommand> {
        self.command_queue.pop_front()
    }
}
