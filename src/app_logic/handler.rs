use super::bootstrap_handler::BootstrapLogic;
use super::import_handler::ImportLogic;
use crate::platform_layer::{LifecycleEventHandler, LifecycleFactory, LifecycleKind};
use std::path::PathBuf;

pub(crate) const APP_NAME: &str = "FalloutCE";

/*
 * Creates the launcher's lifecycle instances. Every instance is built fresh
 * from the same data root, so nothing carries over from one instance to the
 * next except what is on disk.
 */
pub struct LauncherLogic {
    data_root: PathBuf,
    record_dir: Option<PathBuf>,
}

impl LauncherLogic {
    pub fn new(data_root: PathBuf, record_dir: Option<PathBuf>) -> Self {
        LauncherLogic {
            data_root,
            record_dir,
        }
    }
}

impl LifecycleFactory for LauncherLogic {
    fn create(&self, kind: LifecycleKind) -> Box<dyn LifecycleEventHandler> {
        log::debug!("LauncherLogic: Creating {kind:?} lifecycle.");
        match kind {
            LifecycleKind::Bootstrap => Box::new(BootstrapLogic::new(self.data_root.clone())),
            LifecycleKind::Import => Box::new(ImportLogic::new(
                self.data_root.clone(),
                self.record_dir.clone(),
            )),
        }
    }
}
