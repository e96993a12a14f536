/*
 * The engine entry point as a capability the platform invokes. The engine is
 * opaque: it gets the private data root as its working directory and the
 * configured arguments, nothing else, and reads its own configuration from
 * there.
 */
use super::error::{PlatformError, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

pub trait EngineOperations: Send + Sync {
    // Runs the engine to completion. Returns its exit code, if it had one.
    fn launch(&self, working_dir: &Path) -> Result<Option<i32>>;
}

pub struct ProcessEngine {
    engine_path: Option<PathBuf>,
    args: Vec<String>,
}

impl ProcessEngine {
    pub fn new(engine_path: Option<PathBuf>, args: Vec<String>) -> Self {
        ProcessEngine { engine_path, args }
    }
}

impl EngineOperations for ProcessEngine {
    fn launch(&self, working_dir: &Path) -> Result<Option<i32>> {
        let engine_path = self
            .engine_path
            .as_ref()
            .ok_or(PlatformError::EngineNotConfigured)?;
        log::info!("ProcessEngine: Starting {engine_path:?} in {working_dir:?}.");

        let status = Command::new(engine_path)
            .args(&self.args)
            .current_dir(working_dir)
            .status()
            .map_err(|e| PlatformError::EngineLaunchFailed(format!("{engine_path:?}: {e}")))?;

        log::info!("ProcessEngine: Engine finished with {status}.");
        Ok(status.code())
    }
}
