use super::engine::EngineOperations;
use super::error::{PlatformError, Result as PlatformResult};
use super::folder_picker::FolderPickerOperations;
use super::surface::InteractiveSurfaceOperations;
use super::types::{
    AppEvent, ExitDisposition, LifecycleEventHandler, LifecycleFactory, LifecycleKind,
    PlatformCommand,
};
use crate::core::{ImporterOperations, LocalSourceEntry, summarize_source};

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

// How often the progress indication is redrawn while the worker runs.
const PROGRESS_TICK: Duration = Duration::from_millis(100);

/// What the run loop ended with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    pub exit_disposition: ExitDisposition,
    /// Exit code of the engine, if it ran and returned one.
    pub engine_exit_code: Option<i32>,
    pub lifecycles_run: usize,
}

/*
 * Drives lifecycle instances on the interactive thread. Each instance gets a
 * start event, then its commands are executed one by one; commands that
 * produce a result feed exactly one event back into the same instance.
 * `StartLifecycle` queues a fresh instance that runs after the current one has
 * finished and been torn down. An instance whose teardown asks for exit
 * handlers ends the run, no matter what is still queued.
 *
 * Imports run on a single worker thread; this loop only waits for the
 * completion signal and keeps the progress indication moving.
 */
pub struct PlatformInterface {
    folder_picker: Arc<dyn FolderPickerOperations>,
    engine: Arc<dyn EngineOperations>,
    importer: Arc<dyn ImporterOperations>,
    surface: Box<dyn InteractiveSurfaceOperations>,
}

impl PlatformInterface {
    pub fn new(
        folder_picker: Arc<dyn FolderPickerOperations>,
        engine: Arc<dyn EngineOperations>,
        importer: Arc<dyn ImporterOperations>,
        surface: Box<dyn InteractiveSurfaceOperations>,
    ) -> Self {
        PlatformInterface {
            folder_picker,
            engine,
            importer,
            surface,
        }
    }

    pub fn run(&mut self, factory: &dyn LifecycleFactory) -> PlatformResult<RunOutcome> {
        let mut pending = VecDeque::from([LifecycleKind::Bootstrap]);
        let mut outcome = RunOutcome {
            exit_disposition: ExitDisposition::SkipExit,
            engine_exit_code: None,
            lifecycles_run: 0,
        };

        while let Some(kind) = pending.pop_front() {
            outcome.lifecycles_run += 1;
            log::debug!(
                "Platform: Starting {kind:?} lifecycle (#{}).",
                outcome.lifecycles_run
            );
            let mut handler = factory.create(kind);
            self.drive_lifecycle(handler.as_mut(), &mut pending, &mut outcome)?;

            let disposition = handler.on_teardown();
            log::debug!("Platform: {kind:?} lifecycle torn down with {disposition:?}.");
            if disposition == ExitDisposition::RunExitHandlers {
                outcome.exit_disposition = disposition;
                if !pending.is_empty() {
                    log::warn!(
                        "Platform: Discarding {} queued lifecycle(s) on exit.",
                        pending.len()
                    );
                }
                break;
            }
        }

        log::info!("Platform: Run loop finished: {outcome:?}");
        Ok(outcome)
    }

    fn drive_lifecycle(
        &mut self,
        handler: &mut dyn LifecycleEventHandler,
        pending: &mut VecDeque<LifecycleKind>,
        outcome: &mut RunOutcome,
    ) -> PlatformResult<()> {
        handler.handle_event(AppEvent::LifecycleStarted);
        loop {
            let Some(command) = handler.try_dequeue_command() else {
                log::warn!(
                    "Platform: {:?} lifecycle went idle without finishing, tearing it down.",
                    handler.kind()
                );
                return Ok(());
            };
            log::trace!("Platform: Executing {command:?}");
            match command {
                PlatformCommand::FinishLifecycle => return Ok(()),
                PlatformCommand::StartLifecycle { kind } => pending.push_back(kind),
                other => {
                    if let Some(event) = self.execute_command(other, outcome)? {
                        handler.handle_event(event);
                    }
                }
            }
        }
    }

    fn execute_command(
        &mut self,
        command: PlatformCommand,
        outcome: &mut RunOutcome,
    ) -> PlatformResult<Option<AppEvent>> {
        match command {
            PlatformCommand::ShowFolderPicker { title } => {
                let path = self.folder_picker.pick_folder(&title);
                Ok(Some(AppEvent::FolderPickerCompleted { path }))
            }
            PlatformCommand::ShowProgress { title, message } => {
                self.surface.show_progress(&title, &message);
                Ok(None)
            }
            PlatformCommand::DismissProgress => {
                self.surface.dismiss_progress();
                Ok(None)
            }
            PlatformCommand::ShowMessage { severity, text } => {
                self.surface.show_message(severity, &text);
                Ok(None)
            }
            PlatformCommand::RunImport {
                source,
                destination,
            } => self.run_import(source, destination).map(Some),
            PlatformCommand::LaunchEngine { working_dir } => {
                match self.engine.launch(&working_dir) {
                    Ok(exit_code) => {
                        outcome.engine_exit_code = exit_code;
                        Ok(Some(AppEvent::EngineExited { exit_code }))
                    }
                    Err(e) => Ok(Some(AppEvent::EngineLaunchFailed {
                        reason: e.to_string(),
                    })),
                }
            }
            PlatformCommand::StartLifecycle { .. } | PlatformCommand::FinishLifecycle => {
                // Handled by drive_lifecycle.
                Ok(None)
            }
        }
    }

    fn run_import(&mut self, source: PathBuf, destination: PathBuf) -> PlatformResult<AppEvent> {
        let totals = summarize_source(&source);
        let (progress_tx, progress_rx) = mpsc::channel();
        let (done_tx, done_rx) = mpsc::channel();

        let importer = Arc::clone(&self.importer);
        let worker_source = source.clone();
        let worker_destination = destination.clone();
        let worker = thread::Builder::new()
            .name("import-worker".to_string())
            .spawn(move || {
                let entry = LocalSourceEntry::new(&worker_source);
                let result = importer.copy_tree(&entry, &worker_destination, Some(&progress_tx));
                let _ = done_tx.send(result);
            })?;

        let result = loop {
            match done_rx.recv_timeout(PROGRESS_TICK) {
                Ok(result) => break result,
                Err(RecvTimeoutError::Timeout) => {
                    let latest = progress_rx.try_iter().last();
                    self.surface.tick_progress(latest.as_ref(), &totals);
                }
                Err(RecvTimeoutError::Disconnected) => {
                    let _ = worker.join();
                    self.surface.dismiss_progress();
                    log::error!("Platform: Import worker ended without a result.");
                    return Err(PlatformError::WorkerPanicked);
                }
            }
        };
        if worker.join().is_err() {
            log::warn!("Platform: Import worker panicked after reporting its result.");
        }
        let latest = progress_rx.try_iter().last();
        self.surface.tick_progress(latest.as_ref(), &totals);

        Ok(AppEvent::ImportCompleted {
            source,
            destination,
            result,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_logic::LauncherLogic;
    use crate::core::asset_check::{
        CONFIG_MARKER_FILE_NAME, CRITTER_DAT_FILE_NAME, MASTER_DAT_FILE_NAME,
    };
    use crate::core::source_tree::SourceEntry;
    use crate::core::{CoreImporter, ImportProgress, ImportResult, SourceSummary};
    use crate::platform_layer::MessageSeverity;
    use std::fs;
    use std::path::Path;
    use std::sync::Mutex;
    use std::sync::mpsc::Sender;
    use tempfile::tempdir;

    struct MockFolderPicker {
        answers: Mutex<VecDeque<Option<PathBuf>>>,
        calls: Mutex<usize>,
    }

    impl MockFolderPicker {
        fn new(answers: Vec<Option<PathBuf>>) -> Self {
            MockFolderPicker {
                answers: Mutex::new(answers.into()),
                calls: Mutex::new(0),
            }
        }
        fn calls(&self) -> usize {
            *self.calls.lock().unwrap()
        }
    }

    impl FolderPickerOperations for MockFolderPicker {
        fn pick_folder(&self, _title: &str) -> Option<PathBuf> {
            *self.calls.lock().unwrap() += 1;
            self.answers.lock().unwrap().pop_front().flatten()
        }
    }

    struct MockEngine {
        result: Mutex<Option<PlatformResult<Option<i32>>>>,
        launched_in: Mutex<Vec<PathBuf>>,
    }

    impl MockEngine {
        fn returning(result: PlatformResult<Option<i32>>) -> Self {
            MockEngine {
                result: Mutex::new(Some(result)),
                launched_in: Mutex::new(Vec::new()),
            }
        }
        fn launches(&self) -> Vec<PathBuf> {
            self.launched_in.lock().unwrap().clone()
        }
    }

    impl EngineOperations for MockEngine {
        fn launch(&self, working_dir: &Path) -> PlatformResult<Option<i32>> {
            self.launched_in
                .lock()
                .unwrap()
                .push(working_dir.to_path_buf());
            self.result
                .lock()
                .unwrap()
                .take()
                .unwrap_or(Ok(Some(0)))
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    enum SurfaceCall {
        Message(MessageSeverity),
        Show,
        Dismiss,
    }

    #[derive(Clone, Default)]
    struct MockSurface {
        calls: Arc<Mutex<Vec<SurfaceCall>>>,
    }

    impl InteractiveSurfaceOperations for MockSurface {
        fn show_message(&mut self, severity: MessageSeverity, _text: &str) {
            self.calls.lock().unwrap().push(SurfaceCall::Message(severity));
        }
        fn show_progress(&mut self, _title: &str, _message: &str) {
            self.calls.lock().unwrap().push(SurfaceCall::Show);
        }
        fn tick_progress(&mut self, _latest: Option<&ImportProgress>, _totals: &SourceSummary) {}
        fn dismiss_progress(&mut self) {
            self.calls.lock().unwrap().push(SurfaceCall::Dismiss);
        }
    }

    // An importer that panics, to exercise the worker failure path.
    struct PanickingImporter;

    impl ImporterOperations for PanickingImporter {
        fn copy_tree(
            &self,
            _source: &dyn SourceEntry,
            _destination_root: &Path,
            _progress: Option<&Sender<ImportProgress>>,
        ) -> ImportResult {
            panic!("simulated worker crash");
        }
    }

    struct Harness {
        picker: Arc<MockFolderPicker>,
        engine: Arc<MockEngine>,
        surface: MockSurface,
        platform: PlatformInterface,
    }

    fn harness(answers: Vec<Option<PathBuf>>, engine_result: PlatformResult<Option<i32>>) -> Harness {
        harness_with_importer(answers, engine_result, Arc::new(CoreImporter::new()))
    }

    fn harness_with_importer(
        answers: Vec<Option<PathBuf>>,
        engine_result: PlatformResult<Option<i32>>,
        importer: Arc<dyn ImporterOperations>,
    ) -> Harness {
        let picker = Arc::new(MockFolderPicker::new(answers));
        let engine = Arc::new(MockEngine::returning(engine_result));
        let surface = MockSurface::default();
        let platform = PlatformInterface::new(
            picker.clone(),
            engine.clone(),
            importer,
            Box::new(surface.clone()),
        );
        Harness {
            picker,
            engine,
            surface,
            platform,
        }
    }

    fn write_game_source(root: &Path) {
        fs::write(root.join(MASTER_DAT_FILE_NAME), "master").unwrap();
        fs::write(root.join(CRITTER_DAT_FILE_NAME), "critter").unwrap();
        fs::create_dir(root.join("data")).unwrap();
        fs::write(root.join("data").join("proto.lst"), "proto").unwrap();
    }

    #[test]
    fn test_configured_install_goes_straight_to_engine() {
        let data = tempdir().unwrap();
        fs::write(data.path().join(CONFIG_MARKER_FILE_NAME), "").unwrap();
        let mut h = harness(vec![], Ok(Some(3)));
        let factory = LauncherLogic::new(data.path().to_path_buf(), None);

        let outcome = h.platform.run(&factory).unwrap();

        assert_eq!(
            outcome,
            RunOutcome {
                exit_disposition: ExitDisposition::RunExitHandlers,
                engine_exit_code: Some(3),
                lifecycles_run: 1,
            }
        );
        assert_eq!(h.picker.calls(), 0);
        assert_eq!(h.engine.launches(), vec![data.path().to_path_buf()]);
    }

    #[test]
    fn test_first_run_imports_then_launches_engine() {
        // Arrange
        let source = tempdir().unwrap();
        write_game_source(source.path());
        let data = tempdir().unwrap();
        let records = tempdir().unwrap();
        let mut h = harness(vec![Some(source.path().to_path_buf())], Ok(Some(0)));
        let factory = LauncherLogic::new(
            data.path().to_path_buf(),
            Some(records.path().to_path_buf()),
        );

        // Act
        let outcome = h.platform.run(&factory).unwrap();

        // Assert
        assert_eq!(outcome.lifecycles_run, 3);
        assert_eq!(outcome.exit_disposition, ExitDisposition::RunExitHandlers);
        assert_eq!(h.engine.launches().len(), 1);
        assert_eq!(
            fs::read_to_string(data.path().join("data").join("proto.lst")).unwrap(),
            "proto"
        );
        assert_eq!(
            *h.surface.calls.lock().unwrap(),
            vec![
                SurfaceCall::Message(MessageSeverity::Information),
                SurfaceCall::Show,
                SurfaceCall::Dismiss,
            ]
        );
        assert!(records.path().join("last_import.json").exists());
    }

    #[test]
    fn test_cancelled_selection_ends_without_engine() {
        let data = tempdir().unwrap();
        let mut h = harness(vec![None], Ok(Some(0)));
        let factory = LauncherLogic::new(data.path().to_path_buf(), None);

        let outcome = h.platform.run(&factory).unwrap();

        assert_eq!(outcome.exit_disposition, ExitDisposition::SkipExit);
        assert_eq!(outcome.lifecycles_run, 2);
        assert_eq!(outcome.engine_exit_code, None);
        assert!(h.engine.launches().is_empty());
        assert_eq!(h.picker.calls(), 1);
    }

    #[test]
    fn test_import_without_payloads_asks_again() {
        // The copied folder lacks the payload files, so the next bootstrap
        // still needs an import and the picker is shown a second time.
        let source = tempdir().unwrap();
        fs::write(source.path().join("readme.txt"), "not the game").unwrap();
        let data = tempdir().unwrap();
        let mut h = harness(vec![Some(source.path().to_path_buf()), None], Ok(Some(0)));
        let factory = LauncherLogic::new(data.path().to_path_buf(), None);

        let outcome = h.platform.run(&factory).unwrap();

        assert_eq!(h.picker.calls(), 2);
        assert_eq!(outcome.lifecycles_run, 4);
        assert!(h.engine.launches().is_empty());
        assert!(data.path().join("readme.txt").exists());
    }

    #[test]
    fn test_engine_launch_failure_still_unwinds() {
        let data = tempdir().unwrap();
        fs::write(data.path().join(CONFIG_MARKER_FILE_NAME), "").unwrap();
        let mut h = harness(vec![], Err(PlatformError::EngineNotConfigured));
        let factory = LauncherLogic::new(data.path().to_path_buf(), None);

        let outcome = h.platform.run(&factory).unwrap();

        assert_eq!(outcome.exit_disposition, ExitDisposition::RunExitHandlers);
        assert_eq!(outcome.engine_exit_code, None);
        assert_eq!(
            *h.surface.calls.lock().unwrap(),
            vec![SurfaceCall::Message(MessageSeverity::Error)]
        );
    }

    #[test]
    fn test_worker_crash_is_platform_error() {
        let source = tempdir().unwrap();
        let data = tempdir().unwrap();
        let mut h = harness_with_importer(
            vec![Some(source.path().to_path_buf())],
            Ok(Some(0)),
            Arc::new(PanickingImporter),
        );
        let factory = LauncherLogic::new(data.path().to_path_buf(), None);

        let result = h.platform.run(&factory);

        assert!(matches!(result, Err(PlatformError::WorkerPanicked)));
        assert_eq!(
            *h.surface.calls.lock().unwrap(),
            vec![
                SurfaceCall::Message(MessageSeverity::Information),
                SurfaceCall::Show,
                SurfaceCall::Dismiss,
            ]
        );
    }
}
