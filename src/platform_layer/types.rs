/*
 * This module defines the types exchanged between the application logic and
 * the platform layer. A lifecycle instance (bootstrap or import) receives
 * platform-agnostic `AppEvent`s and answers with `PlatformCommand`s that the
 * platform executes. The `LifecycleEventHandler` trait is the hook surface a
 * lifecycle instance implements; `LifecycleFactory` creates fresh instances
 * whenever a command asks for one.
 */

use crate::core::ImportResult;
use std::path::PathBuf;

// Identifies which lifecycle a fresh instance should run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleKind {
    Bootstrap,
    Import,
}

/*
 * What tearing down a lifecycle instance means for the process. After an
 * engine handoff the launcher must unwind normally so every destructor and the
 * logger flush run before the process ends. A lifecycle that only hands over
 * to another one must not end the process at all.
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitDisposition {
    RunExitHandlers,
    SkipExit,
}

// Ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MessageSeverity {
    Information,
    Warning,
    Error,
}

// --- Events from Platform to App Logic ---

#[derive(Debug)]
pub enum AppEvent {
    // First event every lifecycle instance receives.
    LifecycleStarted,
    // Single-shot answer to `ShowFolderPicker`; `None` means the user cancelled.
    FolderPickerCompleted {
        path: Option<PathBuf>,
    },
    // Single-shot answer to `RunImport`, delivered once the worker has finished.
    ImportCompleted {
        source: PathBuf,
        destination: PathBuf,
        result: ImportResult,
    },
    // The engine ran and returned. `None` if it was terminated by a signal.
    EngineExited {
        exit_code: Option<i32>,
    },
    EngineLaunchFailed {
        reason: String,
    },
}

// --- Commands from App Logic to Platform ---

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformCommand {
    ShowFolderPicker {
        title: String,
    },
    // Modal and non-cancelable until `DismissProgress`.
    ShowProgress {
        title: String,
        message: String,
    },
    DismissProgress,
    RunImport {
        source: PathBuf,
        destination: PathBuf,
    },
    LaunchEngine {
        working_dir: PathBuf,
    },
    ShowMessage {
        severity: MessageSeverity,
        text: String,
    },
    // Queues a fresh lifecycle instance to run after the current one finishes.
    StartLifecycle {
        kind: LifecycleKind,
    },
    // Ends the current lifecycle instance; the platform then calls `on_teardown`.
    FinishLifecycle,
}

// --- Traits for App Logic ---

pub trait LifecycleEventHandler: Send {
    fn kind(&self) -> LifecycleKind;

    // Handles one event and enqueues the resulting `PlatformCommand`s.
    fn handle_event(&mut self, event: AppEvent);

    // Attempts to dequeue a single `PlatformCommand`. Called by the run loop.
    fn try_dequeue_command(&mut self) -> Option<PlatformCommand>;

    // Called once after the instance finished. Decides whether the process unwinds.
    fn on_teardown(&mut self) -> ExitDisposition {
        ExitDisposition::SkipExit
    }
}

pub trait LifecycleFactory {
    fn create(&self, kind: LifecycleKind) -> Box<dyn LifecycleEventHandler>;
}
