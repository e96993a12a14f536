use crate::core::{AssetPresence, Decision, check_and_dispatch};
use crate::platform_layer::{
    AppEvent, ExitDisposition, LifecycleEventHandler, LifecycleKind, MessageSeverity,
    PlatformCommand,
};
use std::collections::VecDeque;
use std::path::PathBuf;

// Whether the data root held what the engine needs when this instance started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AssetState {
    AwaitingAssets,
    Ready,
}

/*
 * The bootstrap lifecycle. On start it probes the private data root and either
 * hands the process to the engine or queues an import lifecycle and finishes
 * without touching the engine. The branch taken decides what teardown means:
 * only an instance that ran the engine lets the process unwind.
 */
pub struct BootstrapLogic {
    pub(crate) data_root: PathBuf,
    pub(crate) asset_state: AssetState,
    pub(crate) decision: Option<Decision>,
    command_queue: VecDeque<PlatformCommand>,
}

impl BootstrapLogic {
    pub fn new(data_root: PathBuf) -> Self {
        BootstrapLogic {
            data_root,
            asset_state: AssetState::AwaitingAssets,
            decision: None,
            command_queue: VecDeque::new(),
        }
    }

    fn enqueue_command(&mut self, command: PlatformCommand) {
        self.command_queue.push_back(command);
    }

    fn on_lifecycle_started(&mut self) {
        if self.decision.is_some() {
            log::warn!("BootstrapLogic: Ignoring repeated start event.");
            return;
        }
        let decision = check_and_dispatch(&self.data_root);
        self.decision = Some(decision);

        match decision {
            Decision::NeedsImport => {
                let presence = AssetPresence::probe(&self.data_root);
                self.enqueue_command(PlatformCommand::ShowMessage {
                    severity: MessageSeverity::Information,
                    text: format!(
                        "Game files not found ({}). Starting import.",
                        presence.missing_payloads().join(", ")
                    ),
                });
                self.enqueue_command(PlatformCommand::StartLifecycle {
                    kind: LifecycleKind::Import,
                });
                self.enqueue_command(PlatformCommand::FinishLifecycle);
            }
            Decision::ProceedToEngine => {
                self.asset_state = AssetState::Ready;
                self.enqueue_command(PlatformCommand::LaunchEngine {
                    working_dir: self.data_root.clone(),
                });
            }
        }
    }
}

impl LifecycleEventHandler for BootstrapLogic {
    fn kind(&self) -> LifecycleKind {
        LifecycleKind::Bootstrap
    }

    fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::LifecycleStarted => self.on_lifecycle_started(),
            AppEvent::EngineExited { exit_code } => {
                log::info!("BootstrapLogic: Engine exited with {exit_code:?}.");
                self.enqueue_command(PlatformCommand::FinishLifecycle);
            }
            AppEvent::EngineLaunchFailed { reason } => {
                log::error!("BootstrapLogic: Engine could not be started: {reason}");
                self.enqueue_command(PlatformCommand::ShowMessage {
                    severity: MessageSeverity::Error,
                    text: format!("Could not start the game: {reason}"),
                });
                self.enqueue_command(PlatformCommand::FinishLifecycle);
            }
            other => {
                log::warn!("BootstrapLogic: Unexpected event {other:?}, ignoring.");
            }
        }
    }

    fn try_dequeue_command(&mut self) -> Option<PlatformCommand> {
        self.command_queue.pop_front()
    }

    fn on_teardown(&mut self) -> ExitDisposition {
        log::debug!("BootstrapLogic: Teardown in state {:?}.", self.asset_state);
        match self.decision {
            Some(Decision::ProceedToEngine) => ExitDisposition::RunExitHandlers,
            _ => ExitDisposition::SkipExit,
        }
    }
}
